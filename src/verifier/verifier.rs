use tracing::debug;

use crate::{
    ast::{
        ast::NodeKind,
        raw::{RawAlternative, RawNode},
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

const UNARY_OPERATORS: &[&str] = &["!", "-"];
const BINARY_OPERATORS: &[&str] = &[
    "||", "&&", "==", "!=", "<", "<=", ">", ">=", "+", "-", "*", "/", "%",
];

/// A raw tree that passed [`verify`].
///
/// Only `verify` can build one, so anything taking a `VerifiedProgram` may
/// rely on every structural invariant of the raw tree holding.
#[derive(Debug, Clone, Copy)]
pub struct VerifiedProgram<'a> {
    program: &'a RawNode,
}

impl<'a> VerifiedProgram<'a> {
    pub fn raw(&self) -> &'a RawNode {
        self.program
    }
}

#[derive(Debug)]
pub struct Verifier {
    depth: usize,
    max_depth: usize,
    nodes: usize,
}

impl Verifier {
    pub fn new(max_depth: usize) -> Self {
        Verifier {
            depth: 0,
            max_depth,
            nodes: 0,
        }
    }

    /// Runs `f` one node deeper, failing once `max_depth` is exceeded.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Verifier) -> Result<T, Error>) -> Result<T, Error> {
        if self.depth >= self.max_depth {
            return Err(Error::new(
                ErrorImpl::RecursionLimitExceeded {
                    limit: self.max_depth,
                },
                Position::null(),
            ));
        }

        self.depth += 1;
        self.nodes += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}

fn invalid_child(node: NodeKind, field: &'static str, expected: &'static str, found: &RawNode) -> Error {
    Error::new(
        ErrorImpl::InvalidChild {
            node,
            field,
            expected,
            found: found.kind(),
        },
        Position::null(),
    )
}

fn invalid_node(node: NodeKind, message: impl Into<String>) -> Error {
    Error::new(
        ErrorImpl::InvalidNode {
            node,
            message: message.into(),
        },
        Position::null(),
    )
}

/// Checks every structural invariant of a raw tree without modifying it.
///
/// The first violation is returned; verification errors carry a null
/// position because raw trees have no spans.
pub fn verify(raw: &RawNode, max_tree_depth: usize) -> Result<VerifiedProgram<'_>, Error> {
    let mut verifier = Verifier::new(max_tree_depth);

    let RawNode::Program { top_declarations } = raw else {
        return Err(invalid_node(
            raw.kind(),
            format!("root must be a program, found {}", raw.kind()),
        ));
    };

    for item in top_declarations {
        verifier.nested(|verifier| verify_top_level(verifier, item))?;
    }

    debug!(nodes = verifier.nodes, "raw tree verified");

    Ok(VerifiedProgram { program: raw })
}

fn verify_top_level(verifier: &mut Verifier, item: &RawNode) -> Result<(), Error> {
    match item {
        RawNode::Declaration { .. } => verify_stmt(verifier, item, NodeKind::Program, "top_declarations"),
        RawNode::FunctionNode { .. } => verify_named_function(verifier, item),
        RawNode::TypeDeclaration { .. } => verify_type_declaration(verifier, item),
        other => Err(invalid_child(
            NodeKind::Program,
            "top_declarations",
            "declaration, function or type declaration",
            other,
        )),
    }
}

pub fn verify_stmt(
    verifier: &mut Verifier,
    node: &RawNode,
    parent: NodeKind,
    field: &'static str,
) -> Result<(), Error> {
    verifier.nested(|verifier| match node {
        RawNode::Declaration {
            ids, vals, ..
        } => {
            if ids.is_empty() {
                return Err(invalid_node(
                    NodeKind::Declaration,
                    "declaration needs at least one identifier",
                ));
            }

            for id in ids {
                verify_identifier(verifier, id, NodeKind::Declaration, "ids")?;
            }
            verify_exprs(verifier, vals, NodeKind::Declaration, "vals")
        }
        RawNode::ExpressionStatement { expression } => {
            verify_expr(verifier, expression, NodeKind::ExpressionStatement, "expression")
        }
        RawNode::ReturnStatement { expressions } => {
            verify_exprs(verifier, expressions, NodeKind::ReturnStatement, "expressions")
        }
        RawNode::AssignmentStatement { ids, vals } => {
            verify_assignment_targets(verifier, ids)?;
            verify_exprs(verifier, vals, NodeKind::AssignmentStatement, "vals")
        }
        RawNode::IfStatement { .. } => verify_if(verifier, node),
        RawNode::ForStatement {
            init,
            cond,
            post,
            body,
        } => {
            if let Some(init) = init {
                if !matches!(init.as_ref(), RawNode::EmptyStatement) {
                    verify_simple_stmt(verifier, init, NodeKind::ForStatement, "init")?;
                }
            }
            if let Some(cond) = cond {
                verify_expr(verifier, cond, NodeKind::ForStatement, "cond")?;
            }
            if let Some(post) = post {
                if let RawNode::Declaration { .. } = post.as_ref() {
                    return Err(invalid_child(
                        NodeKind::ForStatement,
                        "post",
                        "expression, assignment or send statement",
                        post,
                    ));
                }
                verify_simple_stmt(verifier, post, NodeKind::ForStatement, "post")?;
            }
            verify_block(verifier, body, NodeKind::ForStatement, "body")
        }
        RawNode::GoStatement { app } => match app.as_ref() {
            RawNode::Application { .. } => verify_expr(verifier, app, NodeKind::GoStatement, "app"),
            other => Err(invalid_child(NodeKind::GoStatement, "app", "application", other)),
        },
        RawNode::SelectStatement { cases } => verify_select(verifier, cases),
        RawNode::SendStatement {
            chan,
            val,
            in_select,
        } => {
            if *in_select {
                return Err(invalid_node(
                    NodeKind::SendStatement,
                    "send outside a select case must not be marked in_select",
                ));
            }

            verify_expr(verifier, chan, NodeKind::SendStatement, "chan")?;
            verify_expr(verifier, val, NodeKind::SendStatement, "val")
        }
        RawNode::EmptyStatement => Ok(()),
        RawNode::FunctionNode { .. } => verify_named_function(verifier, node),
        RawNode::TypeDeclaration { .. } => verify_type_declaration(verifier, node),
        other => Err(invalid_child(parent, field, "statement", other)),
    })
}

fn verify_block(
    verifier: &mut Verifier,
    body: &[RawNode],
    parent: NodeKind,
    field: &'static str,
) -> Result<(), Error> {
    for stmt in body {
        verify_stmt(verifier, stmt, parent, field)?;
    }

    Ok(())
}

/// Statements allowed in `if`/`for` headers.
fn verify_simple_stmt(
    verifier: &mut Verifier,
    node: &RawNode,
    parent: NodeKind,
    field: &'static str,
) -> Result<(), Error> {
    match node {
        RawNode::Declaration { .. }
        | RawNode::ExpressionStatement { .. }
        | RawNode::AssignmentStatement { .. }
        | RawNode::SendStatement { .. } => verify_stmt(verifier, node, parent, field),
        other => Err(invalid_child(parent, field, "simple statement", other)),
    }
}

fn verify_assignment_targets(verifier: &mut Verifier, ids: &[RawNode]) -> Result<(), Error> {
    if ids.is_empty() {
        return Err(invalid_node(
            NodeKind::AssignmentStatement,
            "assignment needs at least one target",
        ));
    }

    for id in ids {
        match id {
            RawNode::Identifier { .. } => {
                verify_identifier(verifier, id, NodeKind::AssignmentStatement, "ids")?
            }
            RawNode::IndexAccess { .. } => {
                verify_expr(verifier, id, NodeKind::AssignmentStatement, "ids")?
            }
            other => {
                return Err(invalid_child(
                    NodeKind::AssignmentStatement,
                    "ids",
                    "identifier or index access",
                    other,
                ))
            }
        }
    }

    Ok(())
}

fn verify_if(verifier: &mut Verifier, node: &RawNode) -> Result<(), Error> {
    let RawNode::IfStatement {
        cond,
        cons,
        alt,
        short,
    } = node
    else {
        return Err(invalid_child(NodeKind::IfStatement, "alt", "if statement or block", node));
    };

    if let Some(short) = short {
        verify_simple_stmt(verifier, short, NodeKind::IfStatement, "short")?;
    }
    verify_expr(verifier, cond, NodeKind::IfStatement, "cond")?;
    verify_block(verifier, cons, NodeKind::IfStatement, "cons")?;

    match alt {
        None => Ok(()),
        Some(RawAlternative::Block(body)) => verify_block(verifier, body, NodeKind::IfStatement, "alt"),
        Some(RawAlternative::If(nested)) => verifier.nested(|verifier| verify_if(verifier, nested)),
    }
}

fn verify_select(verifier: &mut Verifier, cases: &[RawNode]) -> Result<(), Error> {
    let mut defaults = 0;

    for case in cases {
        verifier.nested(|verifier| match case {
            RawNode::SelectCase { statement, body } => {
                verify_comm_stmt(verifier, statement)?;
                verify_block(verifier, body, NodeKind::SelectCase, "body")
            }
            RawNode::DefaultCase { body } => {
                defaults += 1;
                verify_block(verifier, body, NodeKind::DefaultCase, "body")
            }
            other => Err(invalid_child(
                NodeKind::SelectStatement,
                "cases",
                "select case or default case",
                other,
            )),
        })?;
    }

    if defaults > 1 {
        return Err(invalid_node(
            NodeKind::SelectStatement,
            "select has more than one default case",
        ));
    }

    Ok(())
}

/// Guard of a select case. Every send or receive in it is marked
/// `in_select`.
fn verify_comm_stmt(verifier: &mut Verifier, node: &RawNode) -> Result<(), Error> {
    verifier.nested(|verifier| match node {
        RawNode::SendStatement {
            chan,
            val,
            in_select,
        } => {
            if !*in_select {
                return Err(invalid_node(
                    NodeKind::SendStatement,
                    "send guarding a select case must be marked in_select",
                ));
            }

            verify_expr(verifier, chan, NodeKind::SendStatement, "chan")?;
            verify_expr(verifier, val, NodeKind::SendStatement, "val")
        }
        RawNode::ReceiveExpression { .. } => verify_select_receive(verifier, node, NodeKind::SelectCase),
        RawNode::Declaration { ids, vals, .. } => {
            if ids.is_empty() {
                return Err(invalid_node(
                    NodeKind::Declaration,
                    "declaration needs at least one identifier",
                ));
            }

            for id in ids {
                verify_identifier(verifier, id, NodeKind::Declaration, "ids")?;
            }
            verify_comm_receive(verifier, vals, NodeKind::Declaration)
        }
        RawNode::AssignmentStatement { ids, vals } => {
            verify_assignment_targets(verifier, ids)?;
            verify_comm_receive(verifier, vals, NodeKind::AssignmentStatement)
        }
        other => Err(invalid_child(
            NodeKind::SelectCase,
            "statement",
            "send, receive, declaration or assignment",
            other,
        )),
    })
}

fn verify_comm_receive(verifier: &mut Verifier, vals: &[RawNode], parent: NodeKind) -> Result<(), Error> {
    match vals {
        [val] => verify_select_receive(verifier, val, parent),
        _ => Err(invalid_node(
            parent,
            format!("select case must receive exactly one value, found {}", vals.len()),
        )),
    }
}

fn verify_select_receive(verifier: &mut Verifier, node: &RawNode, parent: NodeKind) -> Result<(), Error> {
    match node {
        RawNode::ReceiveExpression { chan, in_select } => {
            if !*in_select {
                return Err(invalid_node(
                    NodeKind::ReceiveExpression,
                    "receive guarding a select case must be marked in_select",
                ));
            }

            verify_expr(verifier, chan, NodeKind::ReceiveExpression, "chan")
        }
        other => Err(invalid_child(parent, "vals", "receive expression", other)),
    }
}

fn verify_named_function(verifier: &mut Verifier, node: &RawNode) -> Result<(), Error> {
    if let RawNode::FunctionNode { name: None, .. } = node {
        return Err(invalid_node(
            NodeKind::FunctionNode,
            "function declaration must be named",
        ));
    }

    verify_function(verifier, node)
}

fn verify_function(verifier: &mut Verifier, node: &RawNode) -> Result<(), Error> {
    let RawNode::FunctionNode {
        name,
        formals,
        ret_type,
        body,
    } = node
    else {
        return Err(invalid_child(NodeKind::FunctionNode, "self", "function", node));
    };

    if let Some(name) = name {
        verify_identifier(verifier, name, NodeKind::FunctionNode, "name")?;
    }
    for formal in formals {
        verify_typed_identifier(verifier, formal, NodeKind::FunctionNode, "formals")?;
    }
    if let Some(ret_type) = ret_type {
        verify_type(verifier, ret_type, NodeKind::FunctionNode, "ret_type")?;
    }

    verify_block(verifier, body, NodeKind::FunctionNode, "body")
}

fn verify_type_declaration(verifier: &mut Verifier, node: &RawNode) -> Result<(), Error> {
    let RawNode::TypeDeclaration { name, dec_type } = node else {
        return Err(invalid_child(NodeKind::TypeDeclaration, "self", "type declaration", node));
    };

    match name.as_ref() {
        RawNode::CustomType { name } if name.is_empty() => Err(invalid_node(
            NodeKind::TypeDeclaration,
            "declared type name must not be empty",
        )),
        RawNode::CustomType { .. } => verify_type(verifier, dec_type, NodeKind::TypeDeclaration, "dec_type"),
        other => Err(invalid_child(NodeKind::TypeDeclaration, "name", "custom type", other)),
    }
}

fn verify_exprs(
    verifier: &mut Verifier,
    exprs: &[RawNode],
    parent: NodeKind,
    field: &'static str,
) -> Result<(), Error> {
    for expr in exprs {
        verify_expr(verifier, expr, parent, field)?;
    }

    Ok(())
}

pub fn verify_expr(
    verifier: &mut Verifier,
    node: &RawNode,
    parent: NodeKind,
    field: &'static str,
) -> Result<(), Error> {
    verifier.nested(|verifier| match node {
        RawNode::Identifier { .. } => verify_identifier(verifier, node, parent, field),
        RawNode::Literal { value, val_type } => match val_type.as_ref() {
            RawNode::BasicType { type_value } if *type_value == value.basic_kind() => Ok(()),
            RawNode::BasicType { type_value } => Err(invalid_node(
                NodeKind::Literal,
                format!("{:?} literal cannot have type {:?}", value.basic_kind(), type_value),
            )),
            other => Err(invalid_child(NodeKind::Literal, "val_type", "basic type", other)),
        },
        RawNode::Application { operator, operands } => {
            verify_expr(verifier, operator, NodeKind::Application, "operator")?;
            verify_exprs(verifier, operands, NodeKind::Application, "operands")
        }
        RawNode::UnOp { opcode, expr } => {
            if !UNARY_OPERATORS.contains(&opcode.as_str()) {
                return Err(invalid_node(
                    NodeKind::UnOp,
                    format!("unknown unary operator `{}`", opcode),
                ));
            }

            verify_expr(verifier, expr, NodeKind::UnOp, "expr")
        }
        RawNode::BinOp {
            left,
            opcode,
            right,
        } => {
            if !BINARY_OPERATORS.contains(&opcode.as_str()) {
                return Err(invalid_node(
                    NodeKind::BinOp,
                    format!("unknown binary operator `{}`", opcode),
                ));
            }

            verify_expr(verifier, left, NodeKind::BinOp, "left")?;
            verify_expr(verifier, right, NodeKind::BinOp, "right")
        }
        RawNode::IndexAccess { accessed, index } => {
            verify_expr(verifier, accessed, NodeKind::IndexAccess, "accessed")?;
            verify_expr(verifier, index, NodeKind::IndexAccess, "index")
        }
        RawNode::FunctionNode { .. } => verify_function(verifier, node),
        RawNode::StructLiteral { val_type, fields } => {
            verify_type(verifier, val_type, NodeKind::StructLiteral, "val_type")?;

            for field in fields {
                match field {
                    RawNode::StructFieldInstantiation { field, expr } => {
                        verify_identifier(verifier, field, NodeKind::StructFieldInstantiation, "field")?;
                        verify_expr(verifier, expr, NodeKind::StructFieldInstantiation, "expr")?;
                    }
                    other => {
                        return Err(invalid_child(
                            NodeKind::StructLiteral,
                            "fields",
                            "struct field instantiation",
                            other,
                        ))
                    }
                }
            }

            Ok(())
        }
        RawNode::StructAccess { accessed, field } => {
            verify_expr(verifier, accessed, NodeKind::StructAccess, "accessed")?;
            verify_identifier(verifier, field, NodeKind::StructAccess, "field")
        }
        RawNode::ReceiveExpression { chan, in_select } => {
            if *in_select {
                return Err(invalid_node(
                    NodeKind::ReceiveExpression,
                    "receive outside a select case must not be marked in_select",
                ));
            }

            verify_expr(verifier, chan, NodeKind::ReceiveExpression, "chan")
        }
        other => Err(invalid_child(parent, field, "expression", other)),
    })
}

fn verify_identifier(
    verifier: &mut Verifier,
    node: &RawNode,
    parent: NodeKind,
    field: &'static str,
) -> Result<(), Error> {
    match node {
        RawNode::Identifier { name, .. } if name.is_empty() => Err(invalid_node(
            NodeKind::Identifier,
            "identifier name must not be empty",
        )),
        RawNode::Identifier { val_type, .. } => match val_type {
            Some(val_type) => verify_type(verifier, val_type, NodeKind::Identifier, "val_type"),
            None => Ok(()),
        },
        other => Err(invalid_child(parent, field, "identifier", other)),
    }
}

/// Parameters and struct fields must carry their type.
fn verify_typed_identifier(
    verifier: &mut Verifier,
    node: &RawNode,
    parent: NodeKind,
    field: &'static str,
) -> Result<(), Error> {
    if let RawNode::Identifier {
        name,
        val_type: None,
    } = node
    {
        return Err(invalid_node(
            parent,
            format!("`{}` in {} needs a type", name, field),
        ));
    }

    verify_identifier(verifier, node, parent, field)
}

pub fn verify_type(
    verifier: &mut Verifier,
    node: &RawNode,
    parent: NodeKind,
    field: &'static str,
) -> Result<(), Error> {
    verifier.nested(|verifier| match node {
        RawNode::AnyType | RawNode::VoidType | RawNode::BasicType { .. } => Ok(()),
        RawNode::TupleType { elements } => {
            for element in elements {
                verify_type(verifier, element, NodeKind::TupleType, "elements")?;
            }

            Ok(())
        }
        RawNode::FunctionType {
            params_type,
            return_type,
        } => {
            match params_type.as_ref() {
                RawNode::TupleType { .. } => {
                    verify_type(verifier, params_type, NodeKind::FunctionType, "params_type")?
                }
                other => {
                    return Err(invalid_child(
                        NodeKind::FunctionType,
                        "params_type",
                        "tuple type",
                        other,
                    ))
                }
            }

            verify_type(verifier, return_type, NodeKind::FunctionType, "return_type")
        }
        RawNode::ChanType { element, .. } => verify_type(verifier, element, NodeKind::ChanType, "element"),
        RawNode::ArrayType { element, .. } => verify_type(verifier, element, NodeKind::ArrayType, "element"),
        RawNode::SliceType { element } => verify_type(verifier, element, NodeKind::SliceType, "element"),
        RawNode::CustomType { name } if name.is_empty() => Err(invalid_node(
            NodeKind::CustomType,
            "custom type name must not be empty",
        )),
        RawNode::CustomType { .. } => Ok(()),
        RawNode::StructType { elems } => {
            for elem in elems {
                match elem {
                    RawNode::StructElement { name } => {
                        verify_typed_identifier(verifier, name, NodeKind::StructElement, "name")?
                    }
                    other => {
                        return Err(invalid_child(
                            NodeKind::StructType,
                            "elems",
                            "struct element",
                            other,
                        ))
                    }
                }
            }

            Ok(())
        }
        other => Err(invalid_child(parent, field, "type", other)),
    })
}
