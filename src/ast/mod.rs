/// AST (Abstract Syntax Tree) module
/// Contains the raw parse tree and the typed tree it is promoted to
///
/// Submodules:
/// - ast: Node kinds, the program root and the statement/expression enums
/// - expressions: Definitions for the expression node structs
/// - raw: The untyped, permissive tree produced by the parser
/// - statements: Definitions for the statement node structs
/// - types: Type nodes and the type-equality relation
/// - visit: Visitor trait for walking the typed tree
pub mod ast;
pub mod expressions;
pub mod raw;
pub mod statements;
pub mod types;
pub mod visit;
