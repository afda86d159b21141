//! Type parsing implementation.
//!
//! This module handles parsing of type annotations and of the typed
//! identifier lists they appear in. It supports:
//!
//! - Basic and custom types (identifiers)
//! - Slice and array types
//! - Channel types in all three directions
//! - Function types
//! - Struct types
//!
//! Every type in this language is prefix-introduced, so types only need
//! NUD handlers.

use std::collections::HashMap;

use crate::{
    ast::{
        raw::RawNode,
        types::{BasicKind, ChanDirection},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<RawNode, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Initializes the type parsing lookup table.
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
    parser.type_nud(TokenKind::OpenBracket, parse_array_type);
    parser.type_nud(TokenKind::Chan, parse_chan_type);
    parser.type_nud(TokenKind::Arrow, parse_receive_chan_type);
    parser.type_nud(TokenKind::Func, parse_function_type);
    parser.type_nud(TokenKind::Struct, parse_struct_type);
}

pub fn parse_type(parser: &mut Parser) -> Result<RawNode, Error> {
    parser.nested(|parser| {
        let token_kind = parser.current_token_kind();
        let Some(nud_fn) = parser.get_type_nud_lookup().get(&token_kind).copied() else {
            return Err(parser.unexpected("expected type"));
        };

        nud_fn(parser)
    })
}

fn starts_type(parser: &Parser) -> bool {
    let kind = parser.current_token_kind();
    kind == TokenKind::OpenParen || parser.get_type_nud_lookup().contains_key(&kind)
}

/// A return type: a single type or a parenthesised list of types.
pub fn parse_return_type(parser: &mut Parser) -> Result<RawNode, Error> {
    if parser.current_token_kind() != TokenKind::OpenParen {
        return parse_type(parser);
    }

    parser.advance();
    let elements = parse_type_list(parser)?;
    parser.expect_detailed(TokenKind::CloseParen, "expected `)`")?;

    Ok(RawNode::TupleType { elements })
}

/// Comma-separated types up to (not including) a closing `)`.
fn parse_type_list(parser: &mut Parser) -> Result<Vec<RawNode>, Error> {
    let mut elements = vec![];

    while parser.current_token_kind() != TokenKind::CloseParen {
        elements.push(parse_type(parser)?);

        if parser.current_token_kind() != TokenKind::CloseParen {
            parser.expect_detailed(TokenKind::Comma, "expected `,` or `)`")?;
        }
    }

    Ok(elements)
}

pub fn parse_symbol_type(parser: &mut Parser) -> Result<RawNode, Error> {
    let token = parser.expect(TokenKind::Identifier)?;

    Ok(match BasicKind::from_name(&token.value) {
        Some(kind) => RawNode::basic(kind),
        None => RawNode::CustomType { name: token.value },
    })
}

/// `[]T` or `[N]T`
pub fn parse_array_type(parser: &mut Parser) -> Result<RawNode, Error> {
    parser.expect(TokenKind::OpenBracket)?;

    if parser.current_token_kind() == TokenKind::CloseBracket {
        parser.advance();
        let element = parse_type(parser)?;
        return Ok(RawNode::SliceType {
            element: Box::new(element),
        });
    }

    let position = parser.get_position();
    let token = parser.advance().clone();
    let size = match token.kind {
        TokenKind::Number => token.value.parse::<usize>().ok(),
        _ => None,
    };

    let Some(size) = size else {
        return Err(Error::new(
            ErrorImpl::InvalidArraySize {
                token: token.describe(),
            },
            position,
        ));
    };

    parser.expect_detailed(TokenKind::CloseBracket, "expected `]`")?;
    let element = parse_type(parser)?;

    Ok(RawNode::ArrayType {
        element: Box::new(element),
        size,
    })
}

/// `chan T` or `chan<- T`
pub fn parse_chan_type(parser: &mut Parser) -> Result<RawNode, Error> {
    parser.expect(TokenKind::Chan)?;

    let direction = if parser.current_token_kind() == TokenKind::Arrow {
        parser.advance();
        ChanDirection::Send
    } else {
        ChanDirection::Both
    };

    let element = parse_type(parser)?;

    Ok(RawNode::ChanType {
        direction,
        element: Box::new(element),
    })
}

/// `<-chan T`
pub fn parse_receive_chan_type(parser: &mut Parser) -> Result<RawNode, Error> {
    parser.expect(TokenKind::Arrow)?;
    parser.expect_detailed(TokenKind::Chan, "expected `chan` after `<-`")?;
    let element = parse_type(parser)?;

    Ok(RawNode::ChanType {
        direction: ChanDirection::Receive,
        element: Box::new(element),
    })
}

/// `func(T, ...) R`; a missing result is `VoidType`.
pub fn parse_function_type(parser: &mut Parser) -> Result<RawNode, Error> {
    parser.expect(TokenKind::Func)?;
    parser.expect_detailed(TokenKind::OpenParen, "expected `(`")?;
    let elements = parse_type_list(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    let return_type = if starts_type(parser) {
        parse_return_type(parser)?
    } else {
        RawNode::VoidType
    };

    Ok(RawNode::FunctionType {
        params_type: Box::new(RawNode::TupleType { elements }),
        return_type: Box::new(return_type),
    })
}

/// `struct { a, b number; c string }`
pub fn parse_struct_type(parser: &mut Parser) -> Result<RawNode, Error> {
    parser.expect(TokenKind::Struct)?;
    parser.expect_detailed(TokenKind::OpenCurly, "expected `{`")?;

    let mut elems = vec![];

    loop {
        parser.skip_semicolons();
        if parser.current_token_kind() == TokenKind::CloseCurly {
            break;
        }

        let fields = parse_typed_identifiers(
            parser,
            &[TokenKind::Semicolon, TokenKind::CloseCurly],
            IdentifierList::StructFields,
        )?;

        elems.extend(fields.into_iter().map(|name| RawNode::StructElement {
            name: Box::new(name),
        }));

        if parser.current_token_kind() != TokenKind::CloseCurly {
            parser.expect_detailed(TokenKind::Semicolon, "expected `;` or newline")?;
        }
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(RawNode::StructType { elems })
}

/// Where an identifier list appears, which decides whether every name
/// needs a type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IdentifierList {
    Declaration,
    Parameters,
    StructFields,
}

/// Parses `a, b T, c U` into identifiers.
///
/// A type applies to every untyped identifier since the previous typed
/// one. A trailing untyped run stays untyped in declarations and is a
/// `MissingType` error in parameter and field lists.
pub fn parse_typed_identifiers(
    parser: &mut Parser,
    terminators: &[TokenKind],
    list: IdentifierList,
) -> Result<Vec<RawNode>, Error> {
    let mut ids = vec![];
    let mut pending: Vec<String> = vec![];

    while !terminators.contains(&parser.current_token_kind()) {
        let name = parser
            .expect_detailed(TokenKind::Identifier, "expected identifier")?
            .value;
        pending.push(name);

        let kind = parser.current_token_kind();
        if kind != TokenKind::Comma && !terminators.contains(&kind) {
            let val_type = parse_type(parser)?;
            ids.extend(
                pending
                    .drain(..)
                    .map(|name| RawNode::identifier(name, Some(val_type.clone()))),
            );
        }

        if parser.current_token_kind() != TokenKind::Comma {
            break;
        }
        parser.advance();
    }

    if let Some(untyped) = pending.first() {
        if list != IdentifierList::Declaration {
            return Err(Error::new(
                ErrorImpl::MissingType {
                    identifier: untyped.clone(),
                },
                parser.get_position(),
            ));
        }

        ids.extend(pending.drain(..).map(|name| RawNode::identifier(name, None)));
    }

    if ids.is_empty() && list != IdentifierList::Parameters {
        return Err(parser.unexpected("expected identifier"));
    }

    Ok(ids)
}
