//! The raw parse tree.
//!
//! Every node is a variant of [`RawNode`] and every child slot holds another
//! `RawNode`, whatever kind the grammar says belongs there. Nothing about the
//! shape is enforced at construction time: the parser builds these nodes,
//! a foreign producer may hand them over as JSON, and the verifier decides
//! whether a tree is fit to be converted into the typed AST.
//!
//! The serde representation is a tagged record per node, discriminated by a
//! `type` field (`{"type": "binop", "left": ..., "opcode": "+", ...}`).

use serde::{Deserialize, Serialize};

use super::{
    ast::{LiteralValue, NodeKind},
    statements::DeclarationKind,
    types::{BasicKind, ChanDirection},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RawNode {
    Program {
        top_declarations: Vec<RawNode>,
    },
    Identifier {
        name: String,
        #[serde(default)]
        val_type: Option<Box<RawNode>>,
    },
    Literal {
        value: LiteralValue,
        val_type: Box<RawNode>,
    },
    Application {
        operator: Box<RawNode>,
        operands: Vec<RawNode>,
    },
    Declaration {
        declaration_type: DeclarationKind,
        ids: Vec<RawNode>,
        vals: Vec<RawNode>,
    },
    #[serde(rename = "unop")]
    UnOp {
        opcode: String,
        expr: Box<RawNode>,
    },
    #[serde(rename = "binop")]
    BinOp {
        left: Box<RawNode>,
        opcode: String,
        right: Box<RawNode>,
    },
    ExpressionStatement {
        expression: Box<RawNode>,
    },
    ReturnStatement {
        expressions: Vec<RawNode>,
    },
    AssignmentStatement {
        ids: Vec<RawNode>,
        vals: Vec<RawNode>,
    },
    IfStatement {
        cond: Box<RawNode>,
        cons: Vec<RawNode>,
        #[serde(default)]
        alt: Option<RawAlternative>,
        #[serde(default)]
        short: Option<Box<RawNode>>,
    },
    ForStatement {
        #[serde(default)]
        init: Option<Box<RawNode>>,
        #[serde(default)]
        cond: Option<Box<RawNode>>,
        #[serde(default)]
        post: Option<Box<RawNode>>,
        body: Vec<RawNode>,
    },
    GoStatement {
        app: Box<RawNode>,
    },
    SelectStatement {
        cases: Vec<RawNode>,
    },
    SelectCase {
        statement: Box<RawNode>,
        body: Vec<RawNode>,
    },
    DefaultCase {
        body: Vec<RawNode>,
    },
    SendStatement {
        chan: Box<RawNode>,
        val: Box<RawNode>,
        #[serde(rename = "inSelect", default)]
        in_select: bool,
    },
    ReceiveExpression {
        chan: Box<RawNode>,
        #[serde(rename = "inSelect", default)]
        in_select: bool,
    },
    IndexAccess {
        accessed: Box<RawNode>,
        index: Box<RawNode>,
    },
    #[serde(rename = "function")]
    FunctionNode {
        #[serde(default)]
        name: Option<Box<RawNode>>,
        formals: Vec<RawNode>,
        #[serde(rename = "retType", default)]
        ret_type: Option<Box<RawNode>>,
        body: Vec<RawNode>,
    },
    EmptyStatement,
    StructElement {
        name: Box<RawNode>,
    },
    StructFieldInstantiation {
        field: Box<RawNode>,
        expr: Box<RawNode>,
    },
    StructLiteral {
        val_type: Box<RawNode>,
        fields: Vec<RawNode>,
    },
    StructAccess {
        accessed: Box<RawNode>,
        field: Box<RawNode>,
    },
    TypeDeclaration {
        name: Box<RawNode>,
        dec_type: Box<RawNode>,
    },

    AnyType,
    VoidType,
    BasicType {
        type_value: BasicKind,
    },
    TupleType {
        elements: Vec<RawNode>,
    },
    FunctionType {
        params_type: Box<RawNode>,
        return_type: Box<RawNode>,
    },
    ChanType {
        direction: ChanDirection,
        element: Box<RawNode>,
    },
    ArrayType {
        element: Box<RawNode>,
        size: usize,
    },
    SliceType {
        element: Box<RawNode>,
    },
    CustomType {
        name: String,
    },
    StructType {
        elems: Vec<RawNode>,
    },
}

/// The `else` part of a raw if statement: a block (a JSON array) or a
/// chained if statement (a JSON object).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAlternative {
    Block(Vec<RawNode>),
    If(Box<RawNode>),
}

impl RawNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            RawNode::Program { .. } => NodeKind::Program,
            RawNode::Identifier { .. } => NodeKind::Identifier,
            RawNode::Literal { .. } => NodeKind::Literal,
            RawNode::Application { .. } => NodeKind::Application,
            RawNode::Declaration { .. } => NodeKind::Declaration,
            RawNode::UnOp { .. } => NodeKind::UnOp,
            RawNode::BinOp { .. } => NodeKind::BinOp,
            RawNode::ExpressionStatement { .. } => NodeKind::ExpressionStatement,
            RawNode::ReturnStatement { .. } => NodeKind::ReturnStatement,
            RawNode::AssignmentStatement { .. } => NodeKind::AssignmentStatement,
            RawNode::IfStatement { .. } => NodeKind::IfStatement,
            RawNode::ForStatement { .. } => NodeKind::ForStatement,
            RawNode::GoStatement { .. } => NodeKind::GoStatement,
            RawNode::SelectStatement { .. } => NodeKind::SelectStatement,
            RawNode::SelectCase { .. } => NodeKind::SelectCase,
            RawNode::DefaultCase { .. } => NodeKind::DefaultCase,
            RawNode::SendStatement { .. } => NodeKind::SendStatement,
            RawNode::ReceiveExpression { .. } => NodeKind::ReceiveExpression,
            RawNode::IndexAccess { .. } => NodeKind::IndexAccess,
            RawNode::FunctionNode { .. } => NodeKind::FunctionNode,
            RawNode::EmptyStatement => NodeKind::EmptyStatement,
            RawNode::StructElement { .. } => NodeKind::StructElement,
            RawNode::StructFieldInstantiation { .. } => NodeKind::StructFieldInstantiation,
            RawNode::StructLiteral { .. } => NodeKind::StructLiteral,
            RawNode::StructAccess { .. } => NodeKind::StructAccess,
            RawNode::TypeDeclaration { .. } => NodeKind::TypeDeclaration,
            RawNode::AnyType => NodeKind::AnyType,
            RawNode::VoidType => NodeKind::VoidType,
            RawNode::BasicType { .. } => NodeKind::BasicType,
            RawNode::TupleType { .. } => NodeKind::TupleType,
            RawNode::FunctionType { .. } => NodeKind::FunctionType,
            RawNode::ChanType { .. } => NodeKind::ChanType,
            RawNode::ArrayType { .. } => NodeKind::ArrayType,
            RawNode::SliceType { .. } => NodeKind::SliceType,
            RawNode::CustomType { .. } => NodeKind::CustomType,
            RawNode::StructType { .. } => NodeKind::StructType,
        }
    }

    pub fn identifier(name: impl Into<String>, val_type: Option<RawNode>) -> RawNode {
        RawNode::Identifier {
            name: name.into(),
            val_type: val_type.map(Box::new),
        }
    }

    pub fn basic(type_value: BasicKind) -> RawNode {
        RawNode::BasicType { type_value }
    }

    pub fn literal(value: LiteralValue) -> RawNode {
        let val_type = Box::new(RawNode::basic(value.basic_kind()));
        RawNode::Literal { value, val_type }
    }
}
