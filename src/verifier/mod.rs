//! Structural verification of raw parse trees.
//!
//! The verifier walks a [`RawNode`](crate::ast::raw::RawNode) tree, from the
//! parser or from a foreign JSON producer, and checks that every child slot
//! holds a node of an allowed kind. It never modifies the tree. A tree that
//! passes is wrapped in a [`VerifiedProgram`](verifier::VerifiedProgram),
//! the only input the converter accepts.

pub mod verifier;

#[cfg(test)]
mod tests;
