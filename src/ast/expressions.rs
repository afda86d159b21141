use super::{
    ast::{Expr, Identifier, Stmt},
    types::Type,
};

/// A call: `operator(operands...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    pub operator: Box<Expr>,
    pub operands: Vec<Expr>,
}

/// Unary operation, `!` or `-`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnOp {
    pub opcode: String,
    pub expr: Box<Expr>,
}

/// Binary operation.
#[derive(Debug, Clone, PartialEq)]
pub struct BinOp {
    pub left: Box<Expr>,
    pub opcode: String,
    pub right: Box<Expr>,
}

/// `accessed[index]`
#[derive(Debug, Clone, PartialEq)]
pub struct IndexAccess {
    pub accessed: Box<Expr>,
    pub index: Box<Expr>,
}

/// Function declaration or function expression.
///
/// `name` is `None` for function expressions. `ret_type` is `None` when no
/// return type was written, which is not the same as `VoidType`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionNode {
    pub name: Option<Identifier>,
    pub formals: Vec<Identifier>,
    pub ret_type: Option<Type>,
    pub body: Vec<Stmt>,
}

/// `field: expr` inside a struct literal.
#[derive(Debug, Clone, PartialEq)]
pub struct StructFieldInstantiation {
    pub field: Identifier,
    pub expr: Expr,
}

/// `TypeName{ field: expr, ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct StructLiteral {
    pub val_type: Type,
    pub fields: Vec<StructFieldInstantiation>,
}

/// `accessed.field`
#[derive(Debug, Clone, PartialEq)]
pub struct StructAccess {
    pub accessed: Box<Expr>,
    pub field: Identifier,
}

/// `<-chan`
///
/// `in_select` is set when the receive is the guard of a select case.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiveExpression {
    pub chan: Box<Expr>,
    pub in_select: bool,
}
