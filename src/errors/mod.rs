//! Error types and error handling for the front end.
//!
//! This module defines the single error type shared by every stage of the
//! pipeline. It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for lexing, parsing and verification
//! - Classification of an error into the stage that raised it
//! - Helpful error messages and suggestions

pub mod errors;

#[cfg(test)]
mod tests;
