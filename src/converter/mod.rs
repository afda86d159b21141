//! Conversion of verified raw trees into the typed AST.
//!
//! The converter only accepts a
//! [`VerifiedProgram`](crate::verifier::verifier::VerifiedProgram), so it
//! never reports errors: every shape it meets was already checked.

pub mod converter;
