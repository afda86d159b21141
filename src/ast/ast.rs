use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::{
    expressions::{
        Application, BinOp, FunctionNode, IndexAccess, ReceiveExpression, StructAccess,
        StructLiteral, UnOp,
    },
    statements::{
        AssignmentStatement, Declaration, ExpressionStatement, ForStatement, GoStatement,
        IfStatement, ReturnStatement, SelectStatement, SendStatement, TypeDeclaration,
    },
    types::{BasicKind, Type},
};

/// Node Kinds
///
/// The closed set of node kinds shared by the raw and the typed tree,
/// type nodes included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    Identifier,
    Literal,
    Application,
    Declaration,
    UnOp,
    BinOp,
    ExpressionStatement,
    ReturnStatement,
    AssignmentStatement,
    IfStatement,
    ForStatement,
    GoStatement,
    SelectStatement,
    SelectCase,
    DefaultCase,
    SendStatement,
    ReceiveExpression,
    IndexAccess,
    FunctionNode,
    EmptyStatement,
    StructElement,
    StructFieldInstantiation,
    StructLiteral,
    StructAccess,
    TypeDeclaration,

    AnyType,
    VoidType,
    BasicType,
    TupleType,
    FunctionType,
    ChanType,
    ArrayType,
    SliceType,
    CustomType,
    StructType,
}

impl NodeKind {
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            NodeKind::AnyType
                | NodeKind::VoidType
                | NodeKind::BasicType
                | NodeKind::TupleType
                | NodeKind::FunctionType
                | NodeKind::ChanType
                | NodeKind::ArrayType
                | NodeKind::SliceType
                | NodeKind::CustomType
                | NodeKind::StructType
        )
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Root of the typed tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub top_declarations: Vec<TopLevel>,
}

/// Items allowed directly inside a program.
#[derive(Debug, Clone, PartialEq)]
pub enum TopLevel {
    Declaration(Declaration),
    /// Always named.
    Function(FunctionNode),
    TypeDeclaration(TypeDeclaration),
}

impl TopLevel {
    pub fn kind(&self) -> NodeKind {
        match self {
            TopLevel::Declaration(_) => NodeKind::Declaration,
            TopLevel::Function(_) => NodeKind::FunctionNode,
            TopLevel::TypeDeclaration(_) => NodeKind::TypeDeclaration,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Declaration(Declaration),
    Expression(ExpressionStatement),
    Return(ReturnStatement),
    Assignment(AssignmentStatement),
    If(IfStatement),
    For(ForStatement),
    Go(GoStatement),
    Select(SelectStatement),
    Send(SendStatement),
    Empty,
    Function(FunctionNode),
    TypeDeclaration(TypeDeclaration),
}

impl Stmt {
    pub fn kind(&self) -> NodeKind {
        match self {
            Stmt::Declaration(_) => NodeKind::Declaration,
            Stmt::Expression(_) => NodeKind::ExpressionStatement,
            Stmt::Return(_) => NodeKind::ReturnStatement,
            Stmt::Assignment(_) => NodeKind::AssignmentStatement,
            Stmt::If(_) => NodeKind::IfStatement,
            Stmt::For(_) => NodeKind::ForStatement,
            Stmt::Go(_) => NodeKind::GoStatement,
            Stmt::Select(_) => NodeKind::SelectStatement,
            Stmt::Send(_) => NodeKind::SendStatement,
            Stmt::Empty => NodeKind::EmptyStatement,
            Stmt::Function(_) => NodeKind::FunctionNode,
            Stmt::TypeDeclaration(_) => NodeKind::TypeDeclaration,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Identifier(Identifier),
    Literal(Literal),
    Application(Application),
    UnOp(UnOp),
    BinOp(BinOp),
    IndexAccess(IndexAccess),
    Function(Box<FunctionNode>),
    StructLiteral(StructLiteral),
    StructAccess(StructAccess),
    Receive(ReceiveExpression),
}

impl Expr {
    pub fn kind(&self) -> NodeKind {
        match self {
            Expr::Identifier(_) => NodeKind::Identifier,
            Expr::Literal(_) => NodeKind::Literal,
            Expr::Application(_) => NodeKind::Application,
            Expr::UnOp(_) => NodeKind::UnOp,
            Expr::BinOp(_) => NodeKind::BinOp,
            Expr::IndexAccess(_) => NodeKind::IndexAccess,
            Expr::Function(_) => NodeKind::FunctionNode,
            Expr::StructLiteral(_) => NodeKind::StructLiteral,
            Expr::StructAccess(_) => NodeKind::StructAccess,
            Expr::Receive(_) => NodeKind::ReceiveExpression,
        }
    }
}

/// A name plus an optional type annotation.
///
/// `val_type` is `None` when the type is left for the resolver to infer,
/// as in `x := 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub val_type: Option<Type>,
}

impl Identifier {
    pub fn new(name: impl Into<String>, val_type: Option<Type>) -> Self {
        Identifier {
            name: name.into(),
            val_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: LiteralValue,
    pub val_type: Type,
}

impl Literal {
    pub fn number(value: f64) -> Self {
        Literal {
            value: LiteralValue::Number(value),
            val_type: Type::Basic(BasicKind::Number),
        }
    }

    pub fn bool(value: bool) -> Self {
        Literal {
            value: LiteralValue::Bool(value),
            val_type: Type::Basic(BasicKind::Bool),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Literal {
            value: LiteralValue::String(value.into()),
            val_type: Type::Basic(BasicKind::String),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Number(f64),
    Bool(bool),
    String(String),
}

impl LiteralValue {
    /// The basic type a literal of this value must carry.
    pub fn basic_kind(&self) -> BasicKind {
        match self {
            LiteralValue::Number(_) => BasicKind::Number,
            LiteralValue::Bool(_) => BasicKind::Bool,
            LiteralValue::String(_) => BasicKind::String,
        }
    }
}
