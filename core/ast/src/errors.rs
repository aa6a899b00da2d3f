//! Error types for the AST crate.

use thiserror::Error;

/// Errors raised while converting a syntax tree into the Definition Model.
/// A conversion fault means the tree had a shape the converter does not
/// recognize, which indicates a backend/grammar mismatch rather than bad
/// user input.
#[derive(Debug, Error)]
#[must_use = "errors must not be silently ignored"]
pub enum DefinitionError {
    /// A node was missing a child the grammar guarantees.
    #[error("malformed {kind} node in {file}: missing {expected}")]
    MissingChild {
        kind: String,
        file: String,
        expected: String,
    },

    /// A node kind appeared somewhere the converter cannot place it.
    #[error("unexpected {kind} node in {file} at {line}:{column}")]
    UnexpectedNode {
        kind: String,
        file: String,
        line: u32,
        column: u32,
    },
}
