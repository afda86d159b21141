use std::fmt::Display;

use thiserror::Error;

use crate::{ast::ast::NodeKind, Position};

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnterminatedString { .. } => "UnterminatedString",
            ErrorImpl::UnterminatedComment => "UnterminatedComment",
            ErrorImpl::InvalidNumber { .. } => "InvalidNumber",
            ErrorImpl::InvalidEscape { .. } => "InvalidEscape",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::InvalidArraySize { .. } => "InvalidArraySize",
            ErrorImpl::MissingType { .. } => "MissingType",
            ErrorImpl::InvalidChild { .. } => "InvalidChild",
            ErrorImpl::InvalidNode { .. } => "InvalidNode",
            ErrorImpl::MalformedRawTree { .. } => "MalformedRawTree",
            ErrorImpl::RecursionLimitExceeded { .. } => "RecursionLimitExceeded",
        }
    }

    /// Which pipeline stage rejected the input.
    pub fn get_error_kind(&self) -> ErrorKind {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnterminatedString { .. }
            | ErrorImpl::UnterminatedComment
            | ErrorImpl::InvalidNumber { .. }
            | ErrorImpl::InvalidEscape { .. } => ErrorKind::Lex,
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::NumberParseError { .. }
            | ErrorImpl::InvalidArraySize { .. }
            | ErrorImpl::MissingType { .. } => ErrorKind::Syntax,
            ErrorImpl::InvalidChild { .. }
            | ErrorImpl::InvalidNode { .. }
            | ErrorImpl::MalformedRawTree { .. } => ErrorKind::Verification,
            ErrorImpl::RecursionLimitExceeded { .. } => ErrorKind::Limit,
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnterminatedString { .. } => {
                ErrorTip::Suggestion(String::from("String literal is missing its closing quote"))
            }
            ErrorImpl::UnterminatedComment => {
                ErrorTip::Suggestion(String::from("Block comment is missing its closing `*/`"))
            }
            ErrorImpl::InvalidNumber { lexeme } => ErrorTip::Suggestion(format!(
                "Invalid number literal: `{}`, expected digits with an optional fraction",
                lexeme
            )),
            ErrorImpl::InvalidEscape { lexeme } => {
                ErrorTip::Suggestion(format!("Invalid escape sequence in `{}`", lexeme))
            }
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it out of range?",
                token
            )),
            ErrorImpl::InvalidArraySize { token } => ErrorTip::Suggestion(format!(
                "Array size `{}` must be a non-negative integer",
                token
            )),
            ErrorImpl::MissingType { identifier } => {
                ErrorTip::Suggestion(format!("`{}` needs a type", identifier))
            }
            ErrorImpl::InvalidChild {
                node,
                field,
                expected,
                found,
            } => ErrorTip::Suggestion(format!(
                "`{}.{}` must be {}, found {}",
                node, field, expected, found
            )),
            ErrorImpl::InvalidNode { node, message } => {
                ErrorTip::Suggestion(format!("{}: {}", node, message))
            }
            ErrorImpl::MalformedRawTree { message } => {
                ErrorTip::Suggestion(format!("Raw tree could not be read: {}", message))
            }
            ErrorImpl::RecursionLimitExceeded { limit } => ErrorTip::Suggestion(format!(
                "Nesting deeper than {} levels is not supported",
                limit
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}:{}: {}",
            self.get_error_name(),
            self.position.1,
            self.position.0,
            self.internal_error
        )
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.internal_error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lex,
    Syntax,
    Verification,
    Limit,
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexing
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unterminated string: {lexeme:?}")]
    UnterminatedString { lexeme: String },
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("invalid number literal: {lexeme:?}")]
    InvalidNumber { lexeme: String },
    #[error("invalid escape sequence in {lexeme:?}")]
    InvalidEscape { lexeme: String },

    // Parsing
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    /// Only reachable from token streams not produced by `tokenize`.
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("invalid array size: {token:?}")]
    InvalidArraySize { token: String },
    #[error("missing type for {identifier:?}")]
    MissingType { identifier: String },

    // Verification
    #[error("{node}.{field} must be {expected}, found {found}")]
    InvalidChild {
        node: NodeKind,
        field: &'static str,
        expected: &'static str,
        found: NodeKind,
    },
    #[error("invalid {node}: {message}")]
    InvalidNode { node: NodeKind, message: String },
    #[error("malformed raw tree: {message}")]
    MalformedRawTree { message: String },

    #[error("recursion limit of {limit} exceeded")]
    RecursionLimitExceeded { limit: usize },
}
