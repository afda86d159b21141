//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::ast::ast::NodeKind;
use crate::errors::errors::{Error, ErrorImpl, ErrorKind, ErrorTip};
use crate::Position;
use std::sync::Arc;

fn at(offset: u32) -> Position {
    Position(offset, Arc::new("test.go".to_string()))
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        at(10),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_error_kind(), ErrorKind::Lex);
}

#[test]
fn test_error_position() {
    let pos = at(42);
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "identifier".to_string(),
        },
        pos.clone(),
    );

    assert_eq!(error.get_position().0, 42);
    assert_eq!(error.get_position(), &pos);
    assert_eq!(error.get_position().1.as_str(), "test.go");
}

#[test]
fn test_error_kinds() {
    let cases = [
        (ErrorImpl::UnterminatedComment, ErrorKind::Lex),
        (
            ErrorImpl::InvalidEscape {
                lexeme: "\"\\x4\"".to_string(),
            },
            ErrorKind::Lex,
        ),
        (
            ErrorImpl::MissingType {
                identifier: "a".to_string(),
            },
            ErrorKind::Syntax,
        ),
        (
            ErrorImpl::InvalidArraySize {
                token: "n".to_string(),
            },
            ErrorKind::Syntax,
        ),
        (
            ErrorImpl::MalformedRawTree {
                message: "EOF".to_string(),
            },
            ErrorKind::Verification,
        ),
        (
            ErrorImpl::RecursionLimitExceeded { limit: 10 },
            ErrorKind::Limit,
        ),
    ];

    for (error_impl, kind) in cases {
        assert_eq!(Error::new(error_impl, at(0)).get_error_kind(), kind);
    }
}

#[test]
fn test_unexpected_token_detailed_tip() {
    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: "}".to_string(),
            message: "expected expression".to_string(),
        },
        at(3),
    );

    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
    assert_eq!(
        error.get_tip().to_string(),
        "Unexpected token: `}`, expected expression"
    );
}

#[test]
fn test_invalid_child_message() {
    let error = Error::new(
        ErrorImpl::InvalidChild {
            node: NodeKind::GoStatement,
            field: "app",
            expected: "application",
            found: NodeKind::Identifier,
        },
        Position::null(),
    );

    assert_eq!(error.get_error_kind(), ErrorKind::Verification);
    assert_eq!(
        error.to_string(),
        "InvalidChild at <null>:0: GoStatement.app must be application, found Identifier"
    );
    assert_eq!(
        error.get_tip().to_string(),
        "`GoStatement.app` must be application, found Identifier"
    );
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        at(0),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
    assert_eq!(error.get_tip().to_string(), "");
}

#[test]
fn test_error_display() {
    let error = Error::new(
        ErrorImpl::InvalidNumber {
            lexeme: "1.2.3".to_string(),
        },
        at(7),
    );

    assert_eq!(
        error.to_string(),
        "InvalidNumber at test.go:7: invalid number literal: \"1.2.3\""
    );
}

#[test]
fn test_error_source() {
    use std::error::Error as _;

    let error = Error::new(ErrorImpl::RecursionLimitExceeded { limit: 4 }, at(0));

    let source = error.source().unwrap();
    assert_eq!(source.to_string(), "recursion limit of 4 exceeded");
}

#[test]
fn test_errors_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Error>();
}
