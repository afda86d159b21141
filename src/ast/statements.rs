use serde::{Deserialize, Serialize};

use super::{
    ast::{Expr, Identifier, Stmt},
    expressions::{Application, IndexAccess, ReceiveExpression},
    types::Type,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Var,
    Const,
}

/// `var`/`const` declaration, also produced by `:=`.
///
/// A grouped `var ( ... )` block is flattened into a single declaration;
/// `ids` and `vals` are not required to have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub declaration_type: DeclarationKind,
    pub ids: Vec<Identifier>,
    pub vals: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expression: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub expressions: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    Identifier(Identifier),
    IndexAccess(IndexAccess),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentStatement {
    pub ids: Vec<AssignTarget>,
    pub vals: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElseBranch {
    Block(Vec<Stmt>),
    If(Box<IfStatement>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub cond: Expr,
    pub cons: Vec<Stmt>,
    pub alt: Option<ElseBranch>,
    pub short: Option<Box<Stmt>>,
}

/// `for` loop.
///
/// `for ;; {}` keeps an explicit `Stmt::Empty` as `init`, while `for {}`
/// leaves every clause `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub init: Option<Box<Stmt>>,
    pub cond: Option<Expr>,
    pub post: Option<Box<Stmt>>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoStatement {
    pub app: Application,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SendStatement {
    pub chan: Expr,
    pub val: Expr,
    pub in_select: bool,
}

/// Guard of a select case.
#[derive(Debug, Clone, PartialEq)]
pub enum CommStatement {
    Send(SendStatement),
    Receive(ReceiveExpression),
    /// `v := <-ch`
    Declaration(Declaration),
    /// `v = <-ch`
    Assignment(AssignmentStatement),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectCase {
    pub statement: CommStatement,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DefaultCase {
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectArm {
    Case(SelectCase),
    Default(DefaultCase),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub cases: Vec<SelectArm>,
}

/// `type Name underlying`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDeclaration {
    /// Name of the declared custom type.
    pub name: String,
    pub dec_type: Type,
}
