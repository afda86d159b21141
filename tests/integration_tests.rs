//! Integration tests for the whole front end.
//!
//! These tests run complete sources through tokenization, parsing,
//! verification and conversion, and feed raw trees in from JSON.

use gofront::{
    ast::{
        ast::{Expr, Identifier, Literal, Program, Stmt, TopLevel},
        expressions::{BinOp, FunctionNode, UnOp},
        raw::RawNode,
        statements::{Declaration, DeclarationKind, ElseBranch, ForStatement},
        types::{BasicKind, ChanDirection, Type},
        visit::{walk_expr, Visitor},
    },
    errors::errors::{ErrorImpl, ErrorKind},
    parse, parse_raw, parse_with_options, program_from_json, program_from_raw, render_error,
    ParseOptions,
};
use pretty_assertions::assert_eq;

fn number() -> Type {
    Type::Basic(BasicKind::Number)
}

fn var(name: &str) -> Expr {
    Expr::Identifier(Identifier::new(name, None))
}

fn num(value: f64) -> Expr {
    Expr::Literal(Literal::number(value))
}

fn binop(left: Expr, opcode: &str, right: Expr) -> Expr {
    Expr::BinOp(BinOp {
        left: Box::new(left),
        opcode: opcode.to_string(),
        right: Box::new(right),
    })
}

fn single_declaration(source: &str) -> Declaration {
    match parse(source).unwrap().top_declarations.remove(0) {
        TopLevel::Declaration(declaration) => declaration,
        other => panic!("expected declaration, found {:?}", other.kind()),
    }
}

/// Expression of the single expression statement in `func main() { <stmt> }`.
fn statement_expr(stmt: &str) -> Expr {
    let program = parse(&format!("func main() {{ {} }}", stmt)).unwrap();
    let TopLevel::Function(function) = &program.top_declarations[0] else {
        panic!("expected function");
    };

    match &function.body[0] {
        Stmt::Expression(statement) => statement.expression.clone(),
        other => panic!("expected expression statement, found {:?}", other.kind()),
    }
}

fn main_body(source: &str) -> Vec<Stmt> {
    match parse(source).unwrap().top_declarations.remove(0) {
        TopLevel::Function(function) => function.body,
        other => panic!("expected function, found {:?}", other.kind()),
    }
}

#[test]
fn test_empty_source() {
    assert_eq!(
        parse("").unwrap(),
        Program {
            top_declarations: vec![]
        }
    );
}

#[test]
fn test_typed_declaration() {
    assert_eq!(
        single_declaration("var x, y number = 1, 2;"),
        Declaration {
            declaration_type: DeclarationKind::Var,
            ids: vec![
                Identifier::new("x", Some(number())),
                Identifier::new("y", Some(number())),
            ],
            vals: vec![num(1.0), num(2.0)],
        }
    );
}

#[test]
fn test_grouped_declaration_flattens() {
    let declaration = single_declaration("var (\n    x, y number = 1, 2\n    z string = \"hello\"\n)");

    let names: Vec<&str> = declaration.ids.iter().map(|id| id.name.as_str()).collect();
    assert_eq!(names, vec!["x", "y", "z"]);
    assert_eq!(
        declaration.vals,
        vec![num(1.0), num(2.0), Expr::Literal(Literal::string("hello"))]
    );
    assert_eq!(
        declaration.ids[2].val_type,
        Some(Type::Basic(BasicKind::String))
    );
}

#[test]
fn test_inferred_declaration() {
    assert_eq!(
        single_declaration("x := 1;"),
        Declaration {
            declaration_type: DeclarationKind::Var,
            ids: vec![Identifier::new("x", None)],
            vals: vec![num(1.0)],
        }
    );
}

#[test]
fn test_precedence() {
    assert_eq!(
        statement_expr("x + y * z;"),
        binop(var("x"), "+", binop(var("y"), "*", var("z")))
    );
    assert_eq!(
        statement_expr("(x + y) * z;"),
        binop(binop(var("x"), "+", var("y")), "*", var("z"))
    );
    assert_eq!(
        statement_expr("x + y * z / 4;"),
        binop(
            var("x"),
            "+",
            binop(binop(var("y"), "*", var("z")), "/", num(4.0))
        )
    );
    assert_eq!(
        statement_expr("!a || b && -c < d"),
        binop(
            Expr::UnOp(UnOp {
                opcode: String::from("!"),
                expr: Box::new(var("a")),
            }),
            "||",
            binop(
                var("b"),
                "&&",
                binop(
                    Expr::UnOp(UnOp {
                        opcode: String::from("-"),
                        expr: Box::new(var("c")),
                    }),
                    "<",
                    var("d")
                )
            )
        )
    );
}

#[test]
fn test_else_if_chain() {
    let body = main_body("func main() {\n    if x > 0 {\n        a()\n    } else if x < 0 {\n        b()\n    } else {\n        c()\n    }\n}");

    assert_eq!(body.len(), 1);
    let Stmt::If(statement) = &body[0] else {
        panic!("expected if statement");
    };
    let Some(ElseBranch::If(nested)) = &statement.alt else {
        panic!("expected else-if, found {:?}", statement.alt);
    };
    assert_eq!(nested.cond, binop(var("x"), "<", num(0.0)));
    assert!(matches!(nested.alt, Some(ElseBranch::Block(ref block)) if block.len() == 1));
}

#[test]
fn test_channel_type_equality() {
    let chan = |direction| Type::Chan {
        direction,
        element: Box::new(number()),
    };

    assert_ne!(chan(ChanDirection::Send), chan(ChanDirection::Receive));
    assert_eq!(chan(ChanDirection::Send), chan(ChanDirection::Both));
    assert_eq!(chan(ChanDirection::Receive), chan(ChanDirection::Both));
    assert_eq!(chan(ChanDirection::Send), chan(ChanDirection::Send));
    assert_eq!(chan(ChanDirection::Receive), chan(ChanDirection::Receive));
    assert_eq!(Type::Any, chan(ChanDirection::Send));
}

#[test]
fn test_parsed_types_compare_through_the_relation() {
    let program = parse("var a chan<- number\nvar b <-chan number\nvar c chan number").unwrap();
    let types: Vec<Type> = program
        .top_declarations
        .iter()
        .map(|item| match item {
            TopLevel::Declaration(declaration) => declaration.ids[0].val_type.clone().unwrap(),
            other => panic!("expected declaration, found {:?}", other.kind()),
        })
        .collect();

    assert_ne!(types[0], types[1]);
    assert_eq!(types[0], types[2]);
    assert_eq!(types[1], types[2]);
}

#[test]
fn test_top_level_anonymous_function_fails_verification() {
    let error = parse("func() {}").unwrap_err();

    assert_eq!(error.get_error_kind(), ErrorKind::Verification);
    assert_eq!(error.get_error_name(), "InvalidNode");
}

#[test]
fn test_conversion_is_deterministic() {
    let source = "type Point struct { x, y number }\nfunc main() { p := Point{ x: 1, y: 2 }; go run(p.x) }";
    let options = ParseOptions::default();
    let raw = parse_raw(source, &options).unwrap();

    assert_eq!(
        program_from_raw(&raw, &options).unwrap(),
        program_from_raw(&raw, &options).unwrap()
    );
}

#[test]
fn test_formals_follow_trailing_type_rule() {
    let program = parse("func f(a, b number, c string) number {}").unwrap();

    assert_eq!(
        program.top_declarations,
        vec![TopLevel::Function(FunctionNode {
            name: Some(Identifier::new("f", None)),
            formals: vec![
                Identifier::new("a", Some(number())),
                Identifier::new("b", Some(number())),
                Identifier::new("c", Some(Type::Basic(BasicKind::String))),
            ],
            ret_type: Some(number()),
            body: vec![],
        })]
    );
}

#[test]
fn test_for_clauses() {
    let body = main_body("func main() {\n    for ;; {}\n    for {}\n}");

    assert_eq!(
        body,
        vec![
            Stmt::For(ForStatement {
                init: Some(Box::new(Stmt::Empty)),
                cond: None,
                post: None,
                body: vec![],
            }),
            Stmt::For(ForStatement {
                init: None,
                cond: None,
                post: None,
                body: vec![],
            }),
        ]
    );
}

#[test]
fn test_deep_nesting_hits_parser_limit() {
    let depth = 500;
    let source = format!(
        "func main() {{ x := {}1{} }}",
        "(".repeat(depth),
        ")".repeat(depth)
    );

    let error = parse(&source).unwrap_err();
    assert_eq!(
        error.get_internal(),
        &ErrorImpl::RecursionLimitExceeded { limit: 200 }
    );
    assert_eq!(error.get_error_kind(), ErrorKind::Limit);

    let options = ParseOptions::default().with_max_depth(20);
    assert!(parse_with_options("func main() { x := ((((1)))) }", &options).is_ok());
}

fn negations(depth: usize) -> RawNode {
    let mut expr = RawNode::identifier("x", None);
    for _ in 0..depth {
        expr = RawNode::UnOp {
            opcode: String::from("-"),
            expr: Box::new(expr),
        };
    }

    RawNode::Program {
        top_declarations: vec![RawNode::Declaration {
            declaration_type: DeclarationKind::Var,
            ids: vec![RawNode::identifier("y", None)],
            vals: vec![expr],
        }],
    }
}

#[test]
fn test_deep_raw_tree_hits_verifier_limit() {
    let raw = negations(100);

    let options = ParseOptions::default().with_max_tree_depth(50);
    let error = program_from_raw(&raw, &options).unwrap_err();
    assert_eq!(
        error.get_internal(),
        &ErrorImpl::RecursionLimitExceeded { limit: 50 }
    );

    assert!(program_from_raw(&raw, &ParseOptions::default()).is_ok());
}

#[test]
fn test_raw_tree_just_under_default_limit() {
    let options = ParseOptions::default();
    assert_eq!(options.max_tree_depth, 256);

    // Program item, declaration and identifier leaf add three levels.
    let program = program_from_raw(&negations(250), &options).unwrap();
    assert_eq!(program.top_declarations.len(), 1);

    let error = program_from_raw(&negations(260), &options).unwrap_err();
    assert_eq!(
        error.get_internal(),
        &ErrorImpl::RecursionLimitExceeded { limit: 256 }
    );
}

fn sum_of_ones(terms: usize) -> String {
    format!("var x = {}", vec!["1"; terms].join(" + "))
}

#[test]
fn test_long_operator_chain_is_bounded() {
    let program = parse(&sum_of_ones(190)).unwrap();
    assert_eq!(program.top_declarations.len(), 1);

    let error = parse(&sum_of_ones(700)).unwrap_err();
    assert_eq!(
        error.get_internal(),
        &ErrorImpl::RecursionLimitExceeded { limit: 200 }
    );
    assert_eq!(error.get_error_kind(), ErrorKind::Limit);
}

#[test]
fn test_long_else_if_chain_is_bounded() {
    let chain = |links: usize| format!("func main() {{ if a {{}} {}}}", "else if a {} ".repeat(links));

    assert!(parse(&chain(50)).is_ok());

    let error = parse_raw(&chain(3000), &ParseOptions::default()).unwrap_err();
    assert_eq!(
        error.get_internal(),
        &ErrorImpl::RecursionLimitExceeded { limit: 200 }
    );
}

#[test]
fn test_json_round_trip() {
    let source = r#"
        func pump(in <-chan number, out chan<- number) {
            for {
                select {
                case v := <-in:
                    out <- v * 2
                default:
                    return
                }
            }
        }
    "#;
    let options = ParseOptions::default();

    let raw = parse_raw(source, &options).unwrap();
    let json = serde_json::to_string(&raw).unwrap();

    assert_eq!(
        program_from_json(&json, &options).unwrap(),
        parse(source).unwrap()
    );
}

#[test]
fn test_json_from_foreign_producer() {
    let json = r#"{
        "type": "program",
        "top_declarations": [{
            "type": "declaration",
            "declaration_type": "const",
            "ids": [{ "type": "identifier", "name": "limit", "val_type": { "type": "basicType", "type_value": "number" } }],
            "vals": [{ "type": "literal", "value": 10, "val_type": { "type": "basicType", "type_value": "number" } }]
        }]
    }"#;

    assert_eq!(
        program_from_json(json, &ParseOptions::default()).unwrap(),
        Program {
            top_declarations: vec![TopLevel::Declaration(Declaration {
                declaration_type: DeclarationKind::Const,
                ids: vec![Identifier::new("limit", Some(number()))],
                vals: vec![num(10.0)],
            })],
        }
    );
}

#[test]
fn test_malformed_json() {
    let options = ParseOptions::default();

    let truncated = program_from_json("{\"type\": \"program\"", &options).unwrap_err();
    assert_eq!(truncated.get_error_name(), "MalformedRawTree");
    assert_eq!(truncated.get_error_kind(), ErrorKind::Verification);

    let unknown = program_from_json(r#"{"type": "loop", "body": []}"#, &options).unwrap_err();
    assert_eq!(unknown.get_error_name(), "MalformedRawTree");

    // Well-formed JSON, structurally invalid tree.
    let invalid = program_from_json(
        r#"{"type": "program", "top_declarations": [{"type": "emptyStatement"}]}"#,
        &options,
    )
    .unwrap_err();
    assert_eq!(invalid.get_error_name(), "InvalidChild");
}

#[test]
fn test_error_kinds_by_stage() {
    assert_eq!(parse("x := \"open").unwrap_err().get_error_kind(), ErrorKind::Lex);
    assert_eq!(parse("x := 12ab").unwrap_err().get_error_kind(), ErrorKind::Lex);
    assert_eq!(parse("var = 1").unwrap_err().get_error_kind(), ErrorKind::Syntax);
    assert_eq!(
        parse("func f(a) {}").unwrap_err().get_internal(),
        &ErrorImpl::MissingType {
            identifier: String::from("a")
        }
    );
}

#[test]
fn test_render_error_with_file_name() {
    let source = "func main() {\n    go worker\n}";
    let options = ParseOptions::default().with_file_name("main.go");

    let error = parse_with_options(source, &options).unwrap_err();
    let rendered = render_error(&error, source);

    assert_eq!(
        rendered,
        "Error: UnexpectedTokenDetailed (Unexpected token: `worker`, expression in go must be a function call)\n\
         -> main.go\n  |\n 2 | go worker\n  | ---^"
    );
}

struct BinOpCounter {
    count: usize,
}

impl Visitor for BinOpCounter {
    fn visit_expr(&mut self, expr: &Expr) {
        if let Expr::BinOp(_) = expr {
            self.count += 1;
        }
        walk_expr(self, expr);
    }
}

#[test]
fn test_visitor_reaches_nested_functions() {
    let program = parse(
        "func main() {\n    f := func(a number) number { return a * 2 }\n    if f(1) > 1 { ch <- 1 + 1 }\n}",
    )
    .unwrap();

    let mut counter = BinOpCounter { count: 0 };
    counter.visit_program(&program);
    assert_eq!(counter.count, 3);
}
