use crate::{
    ast::{ast::LiteralValue, raw::RawNode},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser, stmt::parse_function_rest};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<RawNode, Error> {
    parser.nested(|parser| {
        // First parse NUD
        let token_kind = parser.current_token_kind();
        let Some(nud_fn) = parser.get_nud_lookup().get(&token_kind).copied() else {
            return Err(parser.unexpected("expected expression"));
        };

        let (left, height) = parser.measured(nud_fn)?;
        parse_expr_tail(parser, left, height, bp)
    })
}

/// Continues an expression whose leftmost operand is already parsed and
/// reaches `height` levels below the current nesting.
pub fn parse_expr_tail(
    parser: &mut Parser,
    mut left: RawNode,
    mut height: usize,
    bp: BindingPower,
) -> Result<RawNode, Error> {
    // While the next operator binds tighter than bp, keep folding it into lhs.
    // Every fold puts a node above lhs without recursing here, so the tree
    // height is tracked and checked explicitly.
    loop {
        let token_kind = parser.current_token_kind();

        if token_kind == TokenKind::OpenCurly
            && !(parser.allows_struct_literals() && matches!(left, RawNode::Identifier { .. }))
        {
            break;
        }

        let Some(token_bp) = parser.get_bp_lookup().get(&token_kind).copied() else {
            break;
        };

        if token_bp <= bp {
            break;
        }

        let Some(led_fn) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Err(parser.unexpected("expected operator"));
        };

        let (folded, reached) = parser.measured(|parser| led_fn(parser, left, token_bp))?;
        height = reached.max(height + 1);
        parser.reach(height)?;
        left = folded;
    }

    Ok(left)
}

/// Comma-separated expressions, at least one.
pub fn parse_expr_list(parser: &mut Parser) -> Result<Vec<RawNode>, Error> {
    let mut exprs = vec![parse_expr(parser, BindingPower::Default)?];

    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        exprs.push(parse_expr(parser, BindingPower::Default)?);
    }

    Ok(exprs)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<RawNode, Error> {
    let position = parser.get_position();
    let token = parser.advance().clone();

    match token.kind {
        // `tokenize` only emits numbers `f64` accepts. Token streams built
        // elsewhere can still carry a malformed one.
        TokenKind::Number => match token.value.parse::<f64>() {
            Ok(value) => Ok(RawNode::literal(LiteralValue::Number(value))),
            Err(_) => Err(Error::new(
                ErrorImpl::NumberParseError { token: token.value },
                position,
            )),
        },
        TokenKind::String => Ok(RawNode::literal(LiteralValue::String(token.value))),
        TokenKind::Boolean => Ok(RawNode::literal(LiteralValue::Bool(token.value == "true"))),
        TokenKind::Identifier => Ok(RawNode::identifier(token.value, None)),
        _ => Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: token.describe(),
            },
            position,
        )),
    }
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    left: RawNode,
    bp: BindingPower,
) -> Result<RawNode, Error> {
    let opcode = parser.advance().value.clone();
    let right = parse_expr(parser, bp)?;

    Ok(RawNode::BinOp {
        left: Box::new(left),
        opcode,
        right: Box::new(right),
    })
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<RawNode, Error> {
    let opcode = parser.advance().value.clone();
    let expr = parse_expr(parser, BindingPower::Unary)?;

    Ok(RawNode::UnOp {
        opcode,
        expr: Box::new(expr),
    })
}

pub fn parse_receive_expr(parser: &mut Parser) -> Result<RawNode, Error> {
    parser.expect(TokenKind::Arrow)?;
    let chan = parse_expr(parser, BindingPower::Unary)?;

    Ok(RawNode::ReceiveExpression {
        chan: Box::new(chan),
        in_select: false,
    })
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<RawNode, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let expr = parser.with_struct_literals(true, |parser| parse_expr(parser, BindingPower::Default))?;
    parser.expect_detailed(TokenKind::CloseParen, "expected `)`")?;

    Ok(expr)
}

pub fn parse_function_expr(parser: &mut Parser) -> Result<RawNode, Error> {
    parser.expect(TokenKind::Func)?;
    parse_function_rest(parser, None)
}

pub fn parse_call_expr(
    parser: &mut Parser,
    left: RawNode,
    _bp: BindingPower,
) -> Result<RawNode, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let operands = parser.with_struct_literals(true, |parser| {
        let mut operands = vec![];

        while parser.current_token_kind() != TokenKind::CloseParen {
            operands.push(parse_expr(parser, BindingPower::Default)?);

            if parser.current_token_kind() != TokenKind::CloseParen {
                parser.expect_detailed(TokenKind::Comma, "expected `,` or `)`")?;
            }
        }

        Ok(operands)
    })?;

    parser.expect(TokenKind::CloseParen)?;

    Ok(RawNode::Application {
        operator: Box::new(left),
        operands,
    })
}

pub fn parse_index_expr(
    parser: &mut Parser,
    left: RawNode,
    _bp: BindingPower,
) -> Result<RawNode, Error> {
    parser.expect(TokenKind::OpenBracket)?;
    let index = parser.with_struct_literals(true, |parser| parse_expr(parser, BindingPower::Default))?;
    parser.expect_detailed(TokenKind::CloseBracket, "expected `]`")?;

    Ok(RawNode::IndexAccess {
        accessed: Box::new(left),
        index: Box::new(index),
    })
}

pub fn parse_member_expr(
    parser: &mut Parser,
    left: RawNode,
    _bp: BindingPower,
) -> Result<RawNode, Error> {
    parser.expect(TokenKind::Dot)?;
    let field = parser
        .expect_detailed(TokenKind::Identifier, "expected field name")?
        .value;

    Ok(RawNode::StructAccess {
        accessed: Box::new(left),
        field: Box::new(RawNode::identifier(field, None)),
    })
}

pub fn parse_struct_literal_expr(
    parser: &mut Parser,
    left: RawNode,
    _bp: BindingPower,
) -> Result<RawNode, Error> {
    // Point { x: 1, y: 2 }
    let RawNode::Identifier { name, .. } = left else {
        return Err(parser.unexpected("expected struct type name before `{`"));
    };

    parser.expect(TokenKind::OpenCurly)?;

    let fields = parser.with_struct_literals(true, |parser| {
        let mut fields = vec![];

        while parser.current_token_kind() != TokenKind::CloseCurly {
            let field = parser
                .expect_detailed(TokenKind::Identifier, "expected field name")?
                .value;
            parser.expect_detailed(TokenKind::Colon, "expected `:`")?;
            let expr = parse_expr(parser, BindingPower::Default)?;

            fields.push(RawNode::StructFieldInstantiation {
                field: Box::new(RawNode::identifier(field, None)),
                expr: Box::new(expr),
            });

            if parser.current_token_kind() != TokenKind::CloseCurly {
                parser.expect_detailed(TokenKind::Comma, "expected `,` or `}`")?;
            }
        }

        Ok(fields)
    })?;

    parser.expect(TokenKind::CloseCurly)?;

    Ok(RawNode::StructLiteral {
        val_type: Box::new(RawNode::CustomType { name }),
        fields,
    })
}
