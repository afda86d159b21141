use crate::{
    ast::{
        raw::{RawAlternative, RawNode},
        statements::DeclarationKind,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{
        expr::{parse_expr, parse_expr_list, parse_expr_tail, parse_function_expr},
        lookups::BindingPower,
    },
};

use super::{
    parser::Parser,
    types::{parse_return_type, parse_type, parse_typed_identifiers, IdentifierList},
};

/// Tokens that may end a declaration's identifier list.
const DECLARATION_END: &[TokenKind] = &[
    TokenKind::Assignment,
    TokenKind::Semicolon,
    TokenKind::CloseParen,
    TokenKind::CloseCurly,
    TokenKind::EOF,
];

pub fn parse_stmt(parser: &mut Parser) -> Result<RawNode, Error> {
    parser.nested(|parser| {
        let kind = parser.current_token_kind();
        if let Some(stmt_fn) = parser.get_stmt_lookup().get(&kind).copied() {
            return stmt_fn(parser);
        }

        let stmt = parse_simple_stmt(parser)?;
        expect_terminator(parser)?;
        Ok(stmt)
    })
}

/// Accepts the end of a statement: an explicit or implied `;`, or a
/// closing bracket or end of input directly after it.
pub fn expect_terminator(parser: &mut Parser) -> Result<(), Error> {
    match parser.current_token_kind() {
        TokenKind::Semicolon => {
            parser.advance();
            Ok(())
        }
        TokenKind::CloseCurly | TokenKind::CloseParen | TokenKind::EOF => Ok(()),
        _ => Err(parser.unexpected("expected `;` or newline")),
    }
}

pub fn parse_block(parser: &mut Parser) -> Result<Vec<RawNode>, Error> {
    parser.expect_detailed(TokenKind::OpenCurly, "expected `{`")?;

    let body = parser.with_struct_literals(true, |parser| {
        let mut body = vec![];

        loop {
            parser.skip_semicolons();
            match parser.current_token_kind() {
                TokenKind::CloseCurly => break,
                TokenKind::EOF => return Err(parser.unexpected("expected `}`")),
                _ => body.push(parse_stmt(parser)?),
            }
        }

        Ok(body)
    })?;

    parser.expect(TokenKind::CloseCurly)?;
    Ok(body)
}

/// Expression, assignment, send or `:=` declaration.
pub fn parse_simple_stmt(parser: &mut Parser) -> Result<RawNode, Error> {
    let exprs = parse_expr_list(parser)?;
    finish_simple_stmt(parser, exprs)
}

fn finish_simple_stmt(parser: &mut Parser, mut exprs: Vec<RawNode>) -> Result<RawNode, Error> {
    match parser.current_token_kind() {
        TokenKind::InferAssignment => {
            if !exprs.iter().all(|expr| matches!(expr, RawNode::Identifier { .. })) {
                return Err(parser.unexpected("expected only identifiers on the left of `:=`"));
            }

            parser.advance();
            let vals = parse_expr_list(parser)?;

            Ok(RawNode::Declaration {
                declaration_type: DeclarationKind::Var,
                ids: exprs,
                vals,
            })
        }
        TokenKind::Assignment => {
            let assignable = exprs.iter().all(|expr| {
                matches!(
                    expr,
                    RawNode::Identifier { .. } | RawNode::IndexAccess { .. }
                )
            });
            if !assignable {
                return Err(parser.unexpected("expected identifier or index expression on the left of `=`"));
            }

            parser.advance();
            let vals = parse_expr_list(parser)?;

            Ok(RawNode::AssignmentStatement { ids: exprs, vals })
        }
        TokenKind::Arrow => {
            let (Some(chan), true) = (exprs.pop(), exprs.is_empty()) else {
                return Err(parser.unexpected("expected a single channel before `<-`"));
            };

            parser.advance();
            let val = parse_expr(parser, BindingPower::Default)?;

            Ok(RawNode::SendStatement {
                chan: Box::new(chan),
                val: Box::new(val),
                in_select: false,
            })
        }
        _ => match (exprs.pop(), exprs.is_empty()) {
            (Some(expression), true) => Ok(RawNode::ExpressionStatement {
                expression: Box::new(expression),
            }),
            _ => Err(parser.unexpected("expected `:=`, `=` or `<-` after expression list")),
        },
    }
}

/// Unwraps the condition of an `if`/`for` header written as a simple
/// statement.
fn into_condition(parser: &Parser, stmt: RawNode) -> Result<RawNode, Error> {
    match stmt {
        RawNode::ExpressionStatement { expression } => Ok(*expression),
        _ => Err(parser.unexpected("expected condition")),
    }
}

pub fn parse_declaration_stmt(parser: &mut Parser) -> Result<RawNode, Error> {
    let declaration = parse_declaration(parser)?;
    expect_terminator(parser)?;
    Ok(declaration)
}

fn parse_declaration(parser: &mut Parser) -> Result<RawNode, Error> {
    let declaration_type = match parser.advance().kind {
        TokenKind::Const => DeclarationKind::Const,
        _ => DeclarationKind::Var,
    };

    let mut ids = vec![];
    let mut vals = vec![];

    if parser.current_token_kind() == TokenKind::OpenParen {
        // var ( a = 1; b, c number )
        parser.advance();

        loop {
            parser.skip_semicolons();
            match parser.current_token_kind() {
                TokenKind::CloseParen => break,
                TokenKind::EOF => return Err(parser.unexpected("expected `)`")),
                _ => {
                    parse_declaration_spec(parser, &mut ids, &mut vals)?;
                    expect_terminator(parser)?;
                }
            }
        }

        parser.expect(TokenKind::CloseParen)?;
    } else {
        parse_declaration_spec(parser, &mut ids, &mut vals)?;
    }

    Ok(RawNode::Declaration {
        declaration_type,
        ids,
        vals,
    })
}

fn parse_declaration_spec(
    parser: &mut Parser,
    ids: &mut Vec<RawNode>,
    vals: &mut Vec<RawNode>,
) -> Result<(), Error> {
    ids.extend(parse_typed_identifiers(
        parser,
        DECLARATION_END,
        IdentifierList::Declaration,
    )?);

    if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        vals.extend(parse_expr_list(parser)?);
    }

    Ok(())
}

pub fn parse_type_declaration_stmt(parser: &mut Parser) -> Result<RawNode, Error> {
    parser.expect(TokenKind::Type)?;
    let name = parser
        .expect_detailed(TokenKind::Identifier, "expected type name")?
        .value;
    let dec_type = parse_type(parser)?;

    expect_terminator(parser)?;

    Ok(RawNode::TypeDeclaration {
        name: Box::new(RawNode::CustomType { name }),
        dec_type: Box::new(dec_type),
    })
}

/// Parameters, optional return type and body of a function, after `func`
/// and the name.
pub fn parse_function_rest(parser: &mut Parser, name: Option<RawNode>) -> Result<RawNode, Error> {
    parser.expect_detailed(TokenKind::OpenParen, "expected `(`")?;
    let formals = parse_typed_identifiers(
        parser,
        &[TokenKind::CloseParen],
        IdentifierList::Parameters,
    )?;
    parser.expect_detailed(TokenKind::CloseParen, "expected `)`")?;

    let ret_type = if parser.current_token_kind() == TokenKind::OpenCurly {
        None
    } else {
        Some(Box::new(parse_return_type(parser)?))
    };

    let body = parse_block(parser)?;

    Ok(RawNode::FunctionNode {
        name: name.map(Box::new),
        formals,
        ret_type,
        body,
    })
}

pub fn parse_function_stmt(parser: &mut Parser) -> Result<RawNode, Error> {
    if parser.peek_kind(1) == TokenKind::Identifier {
        parser.expect(TokenKind::Func)?;
        let name = parser.advance().value.clone();
        let function = parse_function_rest(parser, Some(RawNode::identifier(name, None)))?;

        expect_terminator(parser)?;
        return Ok(function);
    }

    // A function literal at statement position is either left bare or
    // continued as an expression, as in `func() { ... }()`.
    let (function, height) = parser.measured(parse_function_expr)?;
    if matches!(
        parser.current_token_kind(),
        TokenKind::Semicolon | TokenKind::CloseCurly | TokenKind::EOF
    ) {
        expect_terminator(parser)?;
        return Ok(function);
    }

    let mut exprs = vec![parse_expr_tail(parser, function, height, BindingPower::Default)?];
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        exprs.push(parse_expr(parser, BindingPower::Default)?);
    }

    let stmt = finish_simple_stmt(parser, exprs)?;
    expect_terminator(parser)?;
    Ok(stmt)
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<RawNode, Error> {
    parser.expect(TokenKind::Return)?;

    let expressions = match parser.current_token_kind() {
        TokenKind::Semicolon | TokenKind::CloseCurly | TokenKind::EOF => vec![],
        _ => parse_expr_list(parser)?,
    };

    expect_terminator(parser)?;

    Ok(RawNode::ReturnStatement { expressions })
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<RawNode, Error> {
    let stmt = parse_if(parser)?;
    expect_terminator(parser)?;
    Ok(stmt)
}

fn parse_if(parser: &mut Parser) -> Result<RawNode, Error> {
    parser.expect(TokenKind::If)?;

    let (short, cond) = parser.with_struct_literals(false, |parser| {
        let first = parse_simple_stmt(parser)?;

        if parser.current_token_kind() == TokenKind::Semicolon {
            parser.advance();
            let cond = parse_expr(parser, BindingPower::Default)?;
            Ok((Some(Box::new(first)), cond))
        } else {
            Ok((None, into_condition(parser, first)?))
        }
    })?;

    let cons = parse_block(parser)?;

    let alt = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        match parser.current_token_kind() {
            TokenKind::If => Some(RawAlternative::If(Box::new(parser.nested(parse_if)?))),
            TokenKind::OpenCurly => Some(RawAlternative::Block(parse_block(parser)?)),
            _ => return Err(parser.unexpected("expected `if` or `{` after `else`")),
        }
    } else {
        None
    };

    Ok(RawNode::IfStatement {
        cond: Box::new(cond),
        cons,
        alt,
        short,
    })
}

pub fn parse_for_stmt(parser: &mut Parser) -> Result<RawNode, Error> {
    parser.expect(TokenKind::For)?;

    let (init, cond, post) = parser.with_struct_literals(false, |parser| {
        // for { ... }
        if parser.current_token_kind() == TokenKind::OpenCurly {
            return Ok((None, None, None));
        }

        let init = if parser.current_token_kind() == TokenKind::Semicolon {
            RawNode::EmptyStatement
        } else {
            let stmt = parse_simple_stmt(parser)?;

            // for cond { ... }
            if parser.current_token_kind() != TokenKind::Semicolon {
                return Ok((None, Some(into_condition(parser, stmt)?), None));
            }

            stmt
        };

        parser.expect(TokenKind::Semicolon)?;

        let cond = match parser.current_token_kind() {
            TokenKind::Semicolon => None,
            _ => Some(parse_expr(parser, BindingPower::Default)?),
        };

        parser.expect_detailed(TokenKind::Semicolon, "expected `;`")?;

        let post = match parser.current_token_kind() {
            TokenKind::OpenCurly => None,
            _ => Some(parse_simple_stmt(parser)?),
        };

        Ok((Some(init), cond, post))
    })?;

    let body = parse_block(parser)?;
    expect_terminator(parser)?;

    Ok(RawNode::ForStatement {
        init: init.map(Box::new),
        cond: cond.map(Box::new),
        post: post.map(Box::new),
        body,
    })
}

pub fn parse_go_stmt(parser: &mut Parser) -> Result<RawNode, Error> {
    parser.expect(TokenKind::Go)?;

    let position = parser.get_position();
    let token = parser.current_token().describe();
    let app = parse_expr(parser, BindingPower::Default)?;

    if !matches!(app, RawNode::Application { .. }) {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token,
                message: String::from("expression in go must be a function call"),
            },
            position,
        ));
    }

    expect_terminator(parser)?;

    Ok(RawNode::GoStatement { app: Box::new(app) })
}

pub fn parse_select_stmt(parser: &mut Parser) -> Result<RawNode, Error> {
    parser.expect(TokenKind::Select)?;
    parser.expect_detailed(TokenKind::OpenCurly, "expected `{` after select")?;

    let mut cases = vec![];

    loop {
        parser.skip_semicolons();
        match parser.current_token_kind() {
            TokenKind::CloseCurly => break,
            TokenKind::Case => {
                parser.advance();
                let statement = parse_comm_stmt(parser)?;
                parser.expect_detailed(TokenKind::Colon, "expected `:`")?;
                let body = parse_case_body(parser)?;

                cases.push(RawNode::SelectCase {
                    statement: Box::new(statement),
                    body,
                });
            }
            TokenKind::Default => {
                parser.advance();
                parser.expect_detailed(TokenKind::Colon, "expected `:`")?;
                let body = parse_case_body(parser)?;

                cases.push(RawNode::DefaultCase { body });
            }
            _ => return Err(parser.unexpected("expected `case` or `default`")),
        }
    }

    parser.expect(TokenKind::CloseCurly)?;
    expect_terminator(parser)?;

    Ok(RawNode::SelectStatement { cases })
}

fn parse_case_body(parser: &mut Parser) -> Result<Vec<RawNode>, Error> {
    parser.with_struct_literals(true, |parser| {
        let mut body = vec![];

        loop {
            parser.skip_semicolons();
            match parser.current_token_kind() {
                TokenKind::Case | TokenKind::Default | TokenKind::CloseCurly | TokenKind::EOF => {
                    break
                }
                _ => body.push(parse_stmt(parser)?),
            }
        }

        Ok(body)
    })
}

/// Guard of a select case: `ch <- v`, `<-ch`, `v := <-ch` or `v = <-ch`.
fn parse_comm_stmt(parser: &mut Parser) -> Result<RawNode, Error> {
    let position = parser.get_position();
    let token = parser.current_token().describe();

    let comm = match parse_simple_stmt(parser)? {
        RawNode::SendStatement { chan, val, .. } => Some(RawNode::SendStatement {
            chan,
            val,
            in_select: true,
        }),
        RawNode::ExpressionStatement { expression } => into_select_receive(*expression),
        RawNode::Declaration {
            declaration_type,
            ids,
            vals,
        } => single_select_receive(vals).map(|vals| RawNode::Declaration {
            declaration_type,
            ids,
            vals,
        }),
        RawNode::AssignmentStatement { ids, vals } => {
            single_select_receive(vals).map(|vals| RawNode::AssignmentStatement { ids, vals })
        }
        _ => None,
    };

    comm.ok_or_else(|| {
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token,
                message: String::from("expected send or receive in select case"),
            },
            position,
        )
    })
}

fn into_select_receive(expr: RawNode) -> Option<RawNode> {
    match expr {
        RawNode::ReceiveExpression { chan, .. } => Some(RawNode::ReceiveExpression {
            chan,
            in_select: true,
        }),
        _ => None,
    }
}

fn single_select_receive(mut vals: Vec<RawNode>) -> Option<Vec<RawNode>> {
    if vals.len() != 1 {
        return None;
    }

    vals.pop().and_then(into_select_receive).map(|val| vec![val])
}
