#![warn(clippy::pedantic)]
//! Collection synthesizer: turns discovery results into generated C#
//! source text.
//!
//! Each discovered collection yields one `<CollectionName>.g.cs` unit in one
//! of four shapes, plus optional `<Base>_<Member>.g.cs` wrapper units in
//! generic-wrapper mode. Emission is pure text production over the discovery
//! facts; it never touches the syntax trees again.

pub mod collection_emitter;
pub mod errors;
pub mod wrappers;

pub use collection_emitter::{CollectionEmitter, GenerationShape};
pub use errors::EmitError;

/// One generated source file, ready to be written next to the compiled
/// sources.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub file_name: String,
    pub text: String,
}
