use crate::ast::{
    ast::{Expr, Identifier, Literal, NodeKind, Program, Stmt, TopLevel},
    expressions::{
        Application, BinOp, FunctionNode, IndexAccess, ReceiveExpression, StructAccess,
        StructFieldInstantiation, StructLiteral, UnOp,
    },
    raw::{RawAlternative, RawNode},
    statements::{
        AssignTarget, AssignmentStatement, CommStatement, Declaration, DefaultCase, ElseBranch,
        ExpressionStatement, ForStatement, GoStatement, IfStatement, ReturnStatement, SelectArm,
        SelectCase, SelectStatement, SendStatement, TypeDeclaration,
    },
    types::{StructElement, Type},
};
use crate::verifier::verifier::VerifiedProgram;

/// Converting a node the verifier should have rejected is a bug in the
/// verifier, not a user error.
fn unverified(found: NodeKind, context: &str) -> ! {
    panic!(
        "unverified {} reached the converter as {}",
        found, context
    )
}

/// Rebuilds a verified raw tree as the typed AST.
///
/// Conversion is total and deterministic: the same verified tree always
/// converts to equal programs.
pub fn convert(verified: &VerifiedProgram) -> Program {
    let RawNode::Program { top_declarations } = verified.raw() else {
        unverified(verified.raw().kind(), "program root");
    };

    Program {
        top_declarations: top_declarations.iter().map(convert_top_level).collect(),
    }
}

fn convert_top_level(node: &RawNode) -> TopLevel {
    match node {
        RawNode::Declaration { .. } => TopLevel::Declaration(convert_declaration(node)),
        RawNode::FunctionNode { .. } => TopLevel::Function(convert_function(node)),
        RawNode::TypeDeclaration { .. } => TopLevel::TypeDeclaration(convert_type_declaration(node)),
        other => unverified(other.kind(), "top-level item"),
    }
}

fn convert_block(body: &[RawNode]) -> Vec<Stmt> {
    body.iter().map(convert_stmt).collect()
}

fn convert_stmt(node: &RawNode) -> Stmt {
    match node {
        RawNode::Declaration { .. } => Stmt::Declaration(convert_declaration(node)),
        RawNode::ExpressionStatement { expression } => Stmt::Expression(ExpressionStatement {
            expression: convert_expr(expression),
        }),
        RawNode::ReturnStatement { expressions } => Stmt::Return(ReturnStatement {
            expressions: convert_exprs(expressions),
        }),
        RawNode::AssignmentStatement { .. } => Stmt::Assignment(convert_assignment(node)),
        RawNode::IfStatement { .. } => Stmt::If(convert_if(node)),
        RawNode::ForStatement {
            init,
            cond,
            post,
            body,
        } => Stmt::For(ForStatement {
            init: init.as_deref().map(|init| Box::new(convert_stmt(init))),
            cond: cond.as_deref().map(convert_expr),
            post: post.as_deref().map(|post| Box::new(convert_stmt(post))),
            body: convert_block(body),
        }),
        RawNode::GoStatement { app } => Stmt::Go(GoStatement {
            app: convert_application(app),
        }),
        RawNode::SelectStatement { cases } => Stmt::Select(SelectStatement {
            cases: cases.iter().map(convert_select_arm).collect(),
        }),
        RawNode::SendStatement { .. } => Stmt::Send(convert_send(node)),
        RawNode::EmptyStatement => Stmt::Empty,
        RawNode::FunctionNode { .. } => Stmt::Function(convert_function(node)),
        RawNode::TypeDeclaration { .. } => Stmt::TypeDeclaration(convert_type_declaration(node)),
        other => unverified(other.kind(), "statement"),
    }
}

fn convert_declaration(node: &RawNode) -> Declaration {
    let RawNode::Declaration {
        declaration_type,
        ids,
        vals,
    } = node
    else {
        unverified(node.kind(), "declaration");
    };

    Declaration {
        declaration_type: *declaration_type,
        ids: ids.iter().map(convert_identifier).collect(),
        vals: convert_exprs(vals),
    }
}

fn convert_assignment(node: &RawNode) -> AssignmentStatement {
    let RawNode::AssignmentStatement { ids, vals } = node else {
        unverified(node.kind(), "assignment");
    };

    let ids = ids
        .iter()
        .map(|id| match id {
            RawNode::Identifier { .. } => AssignTarget::Identifier(convert_identifier(id)),
            RawNode::IndexAccess { accessed, index } => AssignTarget::IndexAccess(IndexAccess {
                accessed: Box::new(convert_expr(accessed)),
                index: Box::new(convert_expr(index)),
            }),
            other => unverified(other.kind(), "assignment target"),
        })
        .collect();

    AssignmentStatement {
        ids,
        vals: convert_exprs(vals),
    }
}

fn convert_if(node: &RawNode) -> IfStatement {
    let RawNode::IfStatement {
        cond,
        cons,
        alt,
        short,
    } = node
    else {
        unverified(node.kind(), "if statement");
    };

    let alt = alt.as_ref().map(|alt| match alt {
        RawAlternative::Block(body) => ElseBranch::Block(convert_block(body)),
        RawAlternative::If(nested) => ElseBranch::If(Box::new(convert_if(nested))),
    });

    IfStatement {
        cond: convert_expr(cond),
        cons: convert_block(cons),
        alt,
        short: short.as_deref().map(|short| Box::new(convert_stmt(short))),
    }
}

fn convert_send(node: &RawNode) -> SendStatement {
    let RawNode::SendStatement {
        chan,
        val,
        in_select,
    } = node
    else {
        unverified(node.kind(), "send statement");
    };

    SendStatement {
        chan: convert_expr(chan),
        val: convert_expr(val),
        in_select: *in_select,
    }
}

fn convert_receive(node: &RawNode) -> ReceiveExpression {
    let RawNode::ReceiveExpression { chan, in_select } = node else {
        unverified(node.kind(), "receive expression");
    };

    ReceiveExpression {
        chan: Box::new(convert_expr(chan)),
        in_select: *in_select,
    }
}

fn convert_select_arm(node: &RawNode) -> SelectArm {
    match node {
        RawNode::SelectCase { statement, body } => {
            let statement = match statement.as_ref() {
                RawNode::SendStatement { .. } => CommStatement::Send(convert_send(statement)),
                RawNode::ReceiveExpression { .. } => {
                    CommStatement::Receive(convert_receive(statement))
                }
                RawNode::Declaration { .. } => {
                    CommStatement::Declaration(convert_declaration(statement))
                }
                RawNode::AssignmentStatement { .. } => {
                    CommStatement::Assignment(convert_assignment(statement))
                }
                other => unverified(other.kind(), "select case guard"),
            };

            SelectArm::Case(SelectCase {
                statement,
                body: convert_block(body),
            })
        }
        RawNode::DefaultCase { body } => SelectArm::Default(DefaultCase {
            body: convert_block(body),
        }),
        other => unverified(other.kind(), "select case"),
    }
}

fn convert_type_declaration(node: &RawNode) -> TypeDeclaration {
    match node {
        RawNode::TypeDeclaration { name, dec_type } => match name.as_ref() {
            RawNode::CustomType { name } => TypeDeclaration {
                name: name.clone(),
                dec_type: convert_type(dec_type),
            },
            other => unverified(other.kind(), "declared type name"),
        },
        other => unverified(other.kind(), "type declaration"),
    }
}

fn convert_exprs(exprs: &[RawNode]) -> Vec<Expr> {
    exprs.iter().map(convert_expr).collect()
}

fn convert_expr(node: &RawNode) -> Expr {
    match node {
        RawNode::Identifier { .. } => Expr::Identifier(convert_identifier(node)),
        RawNode::Literal { value, val_type } => Expr::Literal(Literal {
            value: value.clone(),
            val_type: convert_type(val_type),
        }),
        RawNode::Application { .. } => Expr::Application(convert_application(node)),
        RawNode::UnOp { opcode, expr } => Expr::UnOp(UnOp {
            opcode: opcode.clone(),
            expr: Box::new(convert_expr(expr)),
        }),
        RawNode::BinOp {
            left,
            opcode,
            right,
        } => Expr::BinOp(BinOp {
            left: Box::new(convert_expr(left)),
            opcode: opcode.clone(),
            right: Box::new(convert_expr(right)),
        }),
        RawNode::IndexAccess { accessed, index } => Expr::IndexAccess(IndexAccess {
            accessed: Box::new(convert_expr(accessed)),
            index: Box::new(convert_expr(index)),
        }),
        RawNode::FunctionNode { .. } => Expr::Function(Box::new(convert_function(node))),
        RawNode::StructLiteral { val_type, fields } => Expr::StructLiteral(StructLiteral {
            val_type: convert_type(val_type),
            fields: fields
                .iter()
                .map(|field| match field {
                    RawNode::StructFieldInstantiation { field, expr } => {
                        StructFieldInstantiation {
                            field: convert_identifier(field),
                            expr: convert_expr(expr),
                        }
                    }
                    other => unverified(other.kind(), "struct literal field"),
                })
                .collect(),
        }),
        RawNode::StructAccess { accessed, field } => Expr::StructAccess(StructAccess {
            accessed: Box::new(convert_expr(accessed)),
            field: convert_identifier(field),
        }),
        RawNode::ReceiveExpression { .. } => Expr::Receive(convert_receive(node)),
        other => unverified(other.kind(), "expression"),
    }
}

fn convert_application(node: &RawNode) -> Application {
    let RawNode::Application { operator, operands } = node else {
        unverified(node.kind(), "application");
    };

    Application {
        operator: Box::new(convert_expr(operator)),
        operands: convert_exprs(operands),
    }
}

fn convert_function(node: &RawNode) -> FunctionNode {
    let RawNode::FunctionNode {
        name,
        formals,
        ret_type,
        body,
    } = node
    else {
        unverified(node.kind(), "function");
    };

    FunctionNode {
        name: name.as_deref().map(convert_identifier),
        formals: formals.iter().map(convert_identifier).collect(),
        ret_type: ret_type.as_deref().map(convert_type),
        body: convert_block(body),
    }
}

fn convert_identifier(node: &RawNode) -> Identifier {
    let RawNode::Identifier { name, val_type } = node else {
        unverified(node.kind(), "identifier");
    };

    Identifier {
        name: name.clone(),
        val_type: val_type.as_deref().map(convert_type),
    }
}

fn convert_type(node: &RawNode) -> Type {
    match node {
        RawNode::AnyType => Type::Any,
        RawNode::VoidType => Type::Void,
        RawNode::BasicType { type_value } => Type::Basic(*type_value),
        RawNode::TupleType { elements } => Type::Tuple(elements.iter().map(convert_type).collect()),
        RawNode::FunctionType {
            params_type,
            return_type,
        } => Type::Function {
            params: Box::new(convert_type(params_type)),
            ret: Box::new(convert_type(return_type)),
        },
        RawNode::ChanType { direction, element } => Type::Chan {
            direction: *direction,
            element: Box::new(convert_type(element)),
        },
        RawNode::ArrayType { element, size } => Type::Array {
            element: Box::new(convert_type(element)),
            size: *size,
        },
        RawNode::SliceType { element } => Type::Slice(Box::new(convert_type(element))),
        RawNode::CustomType { name } => Type::Custom(name.clone()),
        RawNode::StructType { elems } => Type::Struct(
            elems
                .iter()
                .map(|elem| match elem {
                    RawNode::StructElement { name } => StructElement {
                        name: convert_identifier(name),
                    },
                    other => unverified(other.kind(), "struct element"),
                })
                .collect(),
        ),
        other => unverified(other.kind(), "type"),
    }
}
