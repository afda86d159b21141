//! Unit tests for the verifier.
//!
//! Trees come either from the parser or are built by hand to reach shapes
//! the parser never produces.

use pretty_assertions::assert_eq;

use super::verifier::verify;
use crate::{
    ast::{
        ast::{LiteralValue, NodeKind},
        raw::RawNode,
        statements::DeclarationKind,
        types::{BasicKind, ChanDirection},
    },
    errors::errors::{Error, ErrorImpl, ErrorKind},
    parse_raw, ParseOptions, Position,
};

const LIMIT: usize = 256;

fn raw(source: &str) -> RawNode {
    parse_raw(source, &ParseOptions::default()).unwrap()
}

fn reject(tree: &RawNode) -> Error {
    verify(tree, LIMIT).unwrap_err()
}

fn program(items: Vec<RawNode>) -> RawNode {
    RawNode::Program {
        top_declarations: items,
    }
}

/// `func main() { <body> }`
fn main_with(body: Vec<RawNode>) -> RawNode {
    program(vec![RawNode::FunctionNode {
        name: Some(Box::new(RawNode::identifier("main", None))),
        formals: vec![],
        ret_type: None,
        body,
    }])
}

fn ident(name: &str) -> Box<RawNode> {
    Box::new(RawNode::identifier(name, None))
}

fn num(value: f64) -> RawNode {
    RawNode::literal(LiteralValue::Number(value))
}

fn invalid_node(node: NodeKind, message: &str) -> ErrorImpl {
    ErrorImpl::InvalidNode {
        node,
        message: message.to_string(),
    }
}

#[test]
fn test_parsed_program_verifies() {
    let tree = raw(r#"
        type Point struct { x, y number }
        var origin = Point{ x: 0, y: 0 }

        func worker(jobs <-chan number, done chan<- bool) (number, bool) {
            total := 0
            for job := <-jobs; job > 0; job = <-jobs {
                total = total + job
            }
            select {
            case v := <-jobs:
                total = total - v
            case done <- true:
            default:
            }
            return total, true
        }

        func main() {
            jobs := newJobs(4)
            go worker(jobs, func(x number) bool { return !(x < 0) })
            if n := len(jobs); n >= 2 { jobs[0] = origin.x } else if n == 1 {} else {}
        }
    "#);

    let verified = verify(&tree, LIMIT).unwrap();
    assert_eq!(verified.raw(), &tree);
}

#[test]
fn test_root_must_be_program() {
    let error = reject(&num(1.0));

    assert_eq!(
        error.get_internal(),
        &invalid_node(NodeKind::Literal, "root must be a program, found Literal")
    );
    assert_eq!(error.get_error_kind(), ErrorKind::Verification);
    assert_eq!(error.get_position(), &Position::null());
}

#[test]
fn test_top_level_function_must_be_named() {
    let tree = program(vec![RawNode::FunctionNode {
        name: None,
        formals: vec![],
        ret_type: None,
        body: vec![],
    }]);

    assert_eq!(
        reject(&tree).get_internal(),
        &invalid_node(NodeKind::FunctionNode, "function declaration must be named")
    );
}

#[test]
fn test_top_level_rejects_statements() {
    let tree = program(vec![RawNode::ExpressionStatement {
        expression: Box::new(num(1.0)),
    }]);

    assert_eq!(
        reject(&tree).get_internal(),
        &ErrorImpl::InvalidChild {
            node: NodeKind::Program,
            field: "top_declarations",
            expected: "declaration, function or type declaration",
            found: NodeKind::ExpressionStatement,
        }
    );
}

#[test]
fn test_expression_slot_rejects_statement() {
    let tree = main_with(vec![RawNode::ExpressionStatement {
        expression: Box::new(RawNode::EmptyStatement),
    }]);

    assert_eq!(
        reject(&tree).get_internal(),
        &ErrorImpl::InvalidChild {
            node: NodeKind::ExpressionStatement,
            field: "expression",
            expected: "expression",
            found: NodeKind::EmptyStatement,
        }
    );
}

#[test]
fn test_unknown_operators() {
    let unary = main_with(vec![RawNode::ExpressionStatement {
        expression: Box::new(RawNode::UnOp {
            opcode: String::from("~"),
            expr: Box::new(num(1.0)),
        }),
    }]);
    assert_eq!(
        reject(&unary).get_internal(),
        &invalid_node(NodeKind::UnOp, "unknown unary operator `~`")
    );

    let binary = main_with(vec![RawNode::ExpressionStatement {
        expression: Box::new(RawNode::BinOp {
            left: Box::new(num(1.0)),
            opcode: String::from("<<"),
            right: Box::new(num(2.0)),
        }),
    }]);
    assert_eq!(
        reject(&binary).get_internal(),
        &invalid_node(NodeKind::BinOp, "unknown binary operator `<<`")
    );
}

#[test]
fn test_literal_type_must_match_value() {
    let tree = main_with(vec![RawNode::ExpressionStatement {
        expression: Box::new(RawNode::Literal {
            value: LiteralValue::Number(1.0),
            val_type: Box::new(RawNode::basic(BasicKind::String)),
        }),
    }]);

    assert_eq!(
        reject(&tree).get_internal(),
        &invalid_node(NodeKind::Literal, "Number literal cannot have type String")
    );
}

#[test]
fn test_declaration_needs_identifiers() {
    let tree = program(vec![RawNode::Declaration {
        declaration_type: DeclarationKind::Var,
        ids: vec![],
        vals: vec![],
    }]);

    assert_eq!(
        reject(&tree).get_internal(),
        &invalid_node(NodeKind::Declaration, "declaration needs at least one identifier")
    );
}

#[test]
fn test_assignment_targets() {
    let tree = main_with(vec![RawNode::AssignmentStatement {
        ids: vec![num(1.0)],
        vals: vec![num(2.0)],
    }]);

    assert_eq!(
        reject(&tree).get_internal(),
        &ErrorImpl::InvalidChild {
            node: NodeKind::AssignmentStatement,
            field: "ids",
            expected: "identifier or index access",
            found: NodeKind::Literal,
        }
    );

    let indexed = main_with(vec![RawNode::AssignmentStatement {
        ids: vec![RawNode::IndexAccess {
            accessed: ident("xs"),
            index: Box::new(num(0.0)),
        }],
        vals: vec![num(2.0)],
    }]);
    assert!(verify(&indexed, LIMIT).is_ok());
}

#[test]
fn test_go_needs_application() {
    let tree = main_with(vec![RawNode::GoStatement { app: ident("worker") }]);

    assert_eq!(
        reject(&tree).get_internal(),
        &ErrorImpl::InvalidChild {
            node: NodeKind::GoStatement,
            field: "app",
            expected: "application",
            found: NodeKind::Identifier,
        }
    );
}

#[test]
fn test_for_post_cannot_declare() {
    let tree = main_with(vec![RawNode::ForStatement {
        init: None,
        cond: None,
        post: Some(Box::new(RawNode::Declaration {
            declaration_type: DeclarationKind::Var,
            ids: vec![RawNode::identifier("i", None)],
            vals: vec![num(0.0)],
        })),
        body: vec![],
    }]);

    assert_eq!(
        reject(&tree).get_internal(),
        &ErrorImpl::InvalidChild {
            node: NodeKind::ForStatement,
            field: "post",
            expected: "expression, assignment or send statement",
            found: NodeKind::Declaration,
        }
    );
}

#[test]
fn test_for_init_accepts_empty_statement() {
    let tree = raw("func main() { for ;; {} }");
    assert!(verify(&tree, LIMIT).is_ok());

    let if_short = main_with(vec![RawNode::IfStatement {
        cond: ident("ok"),
        cons: vec![],
        alt: None,
        short: Some(Box::new(RawNode::EmptyStatement)),
    }]);
    assert_eq!(
        reject(&if_short).get_internal(),
        &ErrorImpl::InvalidChild {
            node: NodeKind::IfStatement,
            field: "short",
            expected: "simple statement",
            found: NodeKind::EmptyStatement,
        }
    );
}

#[test]
fn test_select_allows_one_default() {
    let tree = main_with(vec![RawNode::SelectStatement {
        cases: vec![
            RawNode::DefaultCase { body: vec![] },
            RawNode::DefaultCase { body: vec![] },
        ],
    }]);

    assert_eq!(
        reject(&tree).get_internal(),
        &invalid_node(NodeKind::SelectStatement, "select has more than one default case")
    );
}

#[test]
fn test_select_flags() {
    let unmarked = main_with(vec![RawNode::SelectStatement {
        cases: vec![RawNode::SelectCase {
            statement: Box::new(RawNode::ReceiveExpression {
                chan: ident("ch"),
                in_select: false,
            }),
            body: vec![],
        }],
    }]);
    assert_eq!(
        reject(&unmarked).get_internal(),
        &invalid_node(
            NodeKind::ReceiveExpression,
            "receive guarding a select case must be marked in_select"
        )
    );

    let stray = main_with(vec![RawNode::SendStatement {
        chan: ident("ch"),
        val: Box::new(num(1.0)),
        in_select: true,
    }]);
    assert_eq!(
        reject(&stray).get_internal(),
        &invalid_node(
            NodeKind::SendStatement,
            "send outside a select case must not be marked in_select"
        )
    );
}

#[test]
fn test_select_declaration_receives_one_value() {
    let tree = main_with(vec![RawNode::SelectStatement {
        cases: vec![RawNode::SelectCase {
            statement: Box::new(RawNode::Declaration {
                declaration_type: DeclarationKind::Var,
                ids: vec![RawNode::identifier("v", None)],
                vals: vec![num(1.0)],
            }),
            body: vec![],
        }],
    }]);

    assert_eq!(
        reject(&tree).get_internal(),
        &ErrorImpl::InvalidChild {
            node: NodeKind::Declaration,
            field: "vals",
            expected: "receive expression",
            found: NodeKind::Literal,
        }
    );
}

#[test]
fn test_type_slot_rejects_expression() {
    let tree = program(vec![RawNode::Declaration {
        declaration_type: DeclarationKind::Var,
        ids: vec![RawNode::identifier("x", Some(num(1.0)))],
        vals: vec![],
    }]);

    assert_eq!(
        reject(&tree).get_internal(),
        &ErrorImpl::InvalidChild {
            node: NodeKind::Identifier,
            field: "val_type",
            expected: "type",
            found: NodeKind::Literal,
        }
    );
}

#[test]
fn test_function_type_params_are_a_tuple() {
    let tree = program(vec![RawNode::Declaration {
        declaration_type: DeclarationKind::Var,
        ids: vec![RawNode::identifier(
            "f",
            Some(RawNode::FunctionType {
                params_type: Box::new(RawNode::basic(BasicKind::Number)),
                return_type: Box::new(RawNode::VoidType),
            }),
        )],
        vals: vec![],
    }]);

    assert_eq!(
        reject(&tree).get_internal(),
        &ErrorImpl::InvalidChild {
            node: NodeKind::FunctionType,
            field: "params_type",
            expected: "tuple type",
            found: NodeKind::BasicType,
        }
    );
}

#[test]
fn test_parameters_need_types() {
    let tree = program(vec![RawNode::FunctionNode {
        name: Some(ident("f")),
        formals: vec![RawNode::identifier("a", None)],
        ret_type: None,
        body: vec![],
    }]);

    assert_eq!(
        reject(&tree).get_internal(),
        &invalid_node(NodeKind::FunctionNode, "`a` in formals needs a type")
    );
}

#[test]
fn test_nested_types_are_checked() {
    let tree = program(vec![RawNode::TypeDeclaration {
        name: Box::new(RawNode::CustomType {
            name: String::from("Jobs"),
        }),
        dec_type: Box::new(RawNode::ChanType {
            direction: ChanDirection::Both,
            element: Box::new(RawNode::SliceType {
                element: Box::new(RawNode::CustomType {
                    name: String::new(),
                }),
            }),
        }),
    }]);

    assert_eq!(
        reject(&tree).get_internal(),
        &invalid_node(NodeKind::CustomType, "custom type name must not be empty")
    );
}

#[test]
fn test_depth_limit() {
    let tree = raw("func main() { x := -(-(-(-1))) }");

    let error = verify(&tree, 5).unwrap_err();
    assert_eq!(
        error.get_internal(),
        &ErrorImpl::RecursionLimitExceeded { limit: 5 }
    );
    assert_eq!(error.get_error_kind(), ErrorKind::Limit);

    assert!(verify(&tree, 100).is_ok());
}

fn var_decl(val: RawNode) -> RawNode {
    program(vec![RawNode::Declaration {
        declaration_type: DeclarationKind::Var,
        ids: vec![RawNode::identifier("p", None)],
        vals: vec![val],
    }])
}

fn point_type(dec_type: RawNode) -> RawNode {
    program(vec![RawNode::TypeDeclaration {
        name: Box::new(RawNode::CustomType {
            name: String::from("Point"),
        }),
        dec_type: Box::new(dec_type),
    }])
}

#[test]
fn test_struct_literal_fields_must_be_instantiations() {
    let tree = var_decl(RawNode::StructLiteral {
        val_type: Box::new(RawNode::CustomType {
            name: String::from("Point"),
        }),
        fields: vec![num(1.0)],
    });

    assert_eq!(
        reject(&tree).get_internal(),
        &ErrorImpl::InvalidChild {
            node: NodeKind::StructLiteral,
            field: "fields",
            expected: "struct field instantiation",
            found: NodeKind::Literal,
        }
    );
}

#[test]
fn test_struct_field_instantiation_needs_identifier() {
    let tree = var_decl(RawNode::StructLiteral {
        val_type: Box::new(RawNode::CustomType {
            name: String::from("Point"),
        }),
        fields: vec![RawNode::StructFieldInstantiation {
            field: Box::new(num(0.0)),
            expr: Box::new(num(1.0)),
        }],
    });

    assert_eq!(
        reject(&tree).get_internal(),
        &ErrorImpl::InvalidChild {
            node: NodeKind::StructFieldInstantiation,
            field: "field",
            expected: "identifier",
            found: NodeKind::Literal,
        }
    );
}

#[test]
fn test_struct_type_elems_must_be_struct_elements() {
    let tree = point_type(RawNode::StructType {
        elems: vec![RawNode::identifier(
            "x",
            Some(RawNode::BasicType {
                type_value: BasicKind::Number,
            }),
        )],
    });

    assert_eq!(
        reject(&tree).get_internal(),
        &ErrorImpl::InvalidChild {
            node: NodeKind::StructType,
            field: "elems",
            expected: "struct element",
            found: NodeKind::Identifier,
        }
    );
}

#[test]
fn test_type_declaration_name_must_be_custom_type() {
    let tree = program(vec![RawNode::TypeDeclaration {
        name: ident("Point"),
        dec_type: Box::new(RawNode::BasicType {
            type_value: BasicKind::Number,
        }),
    }]);

    assert_eq!(
        reject(&tree).get_internal(),
        &ErrorImpl::InvalidChild {
            node: NodeKind::TypeDeclaration,
            field: "name",
            expected: "custom type",
            found: NodeKind::Identifier,
        }
    );
}
