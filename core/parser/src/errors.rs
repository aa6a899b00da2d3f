//! Error types for parsing and program-model construction.

use std::path::PathBuf;

use thiserror::Error;

use enumgen_ast::errors::DefinitionError;

/// Failures of a parser backend. Malformed input is NOT a failure: the
/// parser reports it as diagnostics on the returned tree. The hard failures
/// are empty input, an unusable grammar, and conversion faults.
#[derive(Debug, Error)]
#[must_use = "errors must not be silently ignored"]
pub enum ParseError {
    /// Null/empty source text is the one malformed-input hard failure.
    #[error("source text is empty")]
    EmptySource,

    /// The requested language has no working backend.
    #[error("no backend for language `{language}`")]
    UnsupportedLanguage { language: String },

    /// The grammar could not be loaded into the parser.
    #[error("failed to load grammar: {message}")]
    Grammar { message: String },

    /// The underlying parser returned no tree at all. Distinct from syntax
    /// errors, which still produce a tree.
    #[error("parser produced no tree for {file}")]
    ParserFailure { file: String },

    /// Tree-to-definition conversion hit an unexpected node shape.
    #[error("definition conversion failed: {0}")]
    Conversion(#[from] DefinitionError),
}

/// Failures of program-model construction.
#[derive(Debug, Error)]
#[must_use = "errors must not be silently ignored"]
pub enum CompilationError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A reference path could not be read.
    #[error("failed to read reference {path}: {source}")]
    ReferenceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A reference file was not a valid module index.
    #[error("failed to decode reference {path}: {source}")]
    ReferenceDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write the module index artifact.
    #[error("failed to write index {path}: {message}")]
    IndexWrite { path: PathBuf, message: String },

    /// The rebuild was cancelled cooperatively.
    #[error("compilation was cancelled")]
    Cancelled,
}
