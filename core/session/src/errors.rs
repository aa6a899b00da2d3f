use thiserror::Error;

use enumgen_parser::errors::CompilationError;

/// Session faults are returned to the caller as values, never panicked
/// across the session boundary.
#[derive(Error, Debug)]
#[must_use = "errors must not be silently ignored"]
pub enum SessionError {
    #[error("session `{id}` has been disposed")]
    Disposed { id: String },

    #[error("session `{id}` already exists")]
    DuplicateSession { id: String },

    #[error("no parser backend registered for language `{language}`")]
    UnknownLanguage { language: String },

    #[error("file `{path}` is not part of the session")]
    UnknownFile { path: String },

    #[error(transparent)]
    Compile(#[from] CompilationError),
}
