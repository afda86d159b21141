//! Parser module for building the raw parse tree.
//!
//! This module contains the parser that transforms a stream of tokens
//! into a [`RawNode`](crate::ast::raw::RawNode) tree. It uses a Pratt parser
//! for expressions with proper operator precedence and handles:
//!
//! - Statement parsing (declarations, functions, control flow, select)
//! - Expression parsing (binary ops, calls, indexing, struct literals)
//! - Type parsing for type annotations
//! - Error reporting with the offending token and its position
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
