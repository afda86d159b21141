#![allow(clippy::module_inception)]

use std::{sync::Arc, time::Instant};

use tracing::debug;

use crate::{
    ast::{ast::Program, raw::RawNode},
    errors::errors::{Error, ErrorImpl, ErrorTip},
};

pub mod ast;
pub mod converter;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod verifier;

extern crate regex;

#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Arc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Arc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Settings shared by every stage of a single parse.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Name reported in error positions.
    pub file_name: String,
    /// Maximum nesting of expressions and blocks accepted by the parser.
    pub max_depth: usize,
    /// Maximum node depth accepted by the verifier. The converter and the
    /// tree destructors recurse as deep as this, so it must fit the stack
    /// of the thread doing the parse.
    pub max_tree_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            file_name: String::from("shell"),
            max_depth: 200,
            max_tree_depth: 256,
        }
    }
}

impl ParseOptions {
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_tree_depth(mut self, max_tree_depth: usize) -> Self {
        self.max_tree_depth = max_tree_depth;
        self
    }
}

/// Parses source text into a verified, typed program using default options.
pub fn parse(source: &str) -> Result<Program, Error> {
    parse_with_options(source, &ParseOptions::default())
}

pub fn parse_with_options(source: &str, options: &ParseOptions) -> Result<Program, Error> {
    let raw = parse_raw(source, options)?;
    program_from_raw(&raw, options)
}

/// Lexes and parses without verifying, returning the raw tree.
pub fn parse_raw(source: &str, options: &ParseOptions) -> Result<RawNode, Error> {
    let start = Instant::now();
    let tokens = lexer::lexer::tokenize(source, Some(options.file_name.clone()))?;
    debug!(tokens = tokens.len(), elapsed = ?start.elapsed(), "tokenized");

    let parse_start = Instant::now();
    let raw = parser::parser::parse(tokens, options)?;
    debug!(elapsed = ?parse_start.elapsed(), "parsed");

    Ok(raw)
}

/// Verifies a raw tree from any producer and converts it into the typed AST.
pub fn program_from_raw(raw: &RawNode, options: &ParseOptions) -> Result<Program, Error> {
    let verify_start = Instant::now();
    let verified = verifier::verifier::verify(raw, options.max_tree_depth)?;
    debug!(elapsed = ?verify_start.elapsed(), "verified");

    let convert_start = Instant::now();
    let program = converter::converter::convert(&verified);
    debug!(
        items = program.top_declarations.len(),
        elapsed = ?convert_start.elapsed(),
        "converted"
    );

    Ok(program)
}

/// Reads a JSON-encoded raw tree and promotes it like [`program_from_raw`].
pub fn program_from_json(json: &str, options: &ParseOptions) -> Result<Program, Error> {
    let raw: RawNode = serde_json::from_str(json).map_err(|err| {
        Error::new(
            ErrorImpl::MalformedRawTree {
                message: err.to_string(),
            },
            Position::null(),
        )
    })?;

    program_from_raw(&raw, options)
}

/// Returns the 1-based line number, the line text and the offset of
/// `position` within that line.
pub fn get_line_at_position(source: &str, position: u32) -> (usize, String, usize) {
    let pos = (position as usize).min(source.len());

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return (line_number, line.to_string(), pos - start);
        }

        start = end;
        line_number += 1;
    }

    // Past the last newline (or empty source): point just after the end.
    match source.rsplit_once('\n') {
        Some((_, last)) if !source.ends_with('\n') => {
            (line_number - 1, last.to_string(), last.len())
        }
        _ => (line_number, String::new(), 0),
    }
}

pub fn render_error(error: &Error, source: &str) -> String {
    /*
        Error: name (tip)
        -> main.go
           |
        20 | x := #;
           | -----^
    */

    let position = error.get_position();
    let (line, line_text, line_pos) = get_line_at_position(source, position.0);

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    let mut out = String::new();
    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        out.push_str(&format!(
            "Error: {} ({})\n",
            error.get_error_name(),
            error.get_tip()
        ));
    }
    out.push_str(&format!("-> {}\n", position.1));
    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    out.push_str(&format!(
        "{:>width$} | {}\n",
        line_string,
        line_text_removed.trim_end(),
        width = padding - 1
    ));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
    out.push_str(&format!("{:>padding$} {:->arrows$}", "|", "^"));

    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string.chars().take_while(|c| *c == ' ' || *c == '\t').count();

    (String::from(&string[start..]), start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_line_at_position() {
        let source = "Hello, world!\nfoo\nbar\nTesting { }\n";

        let (line_number, line, line_pos) = get_line_at_position(source, 10);
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = get_line_at_position(source, 30);
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }\n");
        assert_eq!(line_pos, 8);
    }

    #[test]
    fn test_get_line_at_end_of_source() {
        let (line_number, line, line_pos) = get_line_at_position("a\nbc", 4);
        assert_eq!(line_number, 2);
        assert_eq!(line, "bc");
        assert_eq!(line_pos, 2);
    }

    #[test]
    fn test_render_error_points_at_token() {
        let source = "func main() {\n    x := }\n}";
        let error = parse(source).unwrap_err();
        let rendered = render_error(&error, source);

        assert!(rendered.starts_with("Error: UnexpectedTokenDetailed"));
        assert!(rendered.contains(" 2 | x := }"));
        assert!(rendered.ends_with("  | -----^"));
    }
}
