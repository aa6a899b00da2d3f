//! The pluggable parser backend contract.

use std::sync::Arc;

use enumgen_ast::arena::DefinitionArena;
use enumgen_ast::definitions::CompilationUnitDefinition;
use enumgen_ast::node::SyntaxTree;

use crate::errors::ParseError;

/// A parsed file converted into the Definition Model, together with the
/// arena holding the parent routes of every built node.
#[derive(Clone, Debug)]
pub struct ParsedUnit {
    pub unit: Arc<CompilationUnitDefinition>,
    pub arena: DefinitionArena,
}

/// A concrete language backend. Backends hold no mutable state; every parse
/// builds a fresh underlying parser, so a backend is safe to share across
/// concurrent sessions.
pub trait ParserBackend: Send + Sync {
    /// Stable language identifier, e.g. `csharp`.
    fn language_id(&self) -> &'static str;

    /// File extensions (without the dot) this backend claims.
    fn file_extensions(&self) -> &'static [&'static str];

    /// Parses source text into a syntax tree. Malformed input succeeds and
    /// reports its problems through [`SyntaxTree::errors`]; only empty input
    /// and grammar-level failures return `Err`.
    fn parse(&self, source: &str, file_path: &str) -> Result<SyntaxTree, ParseError>;

    /// Parses and converts into the immutable Definition Model. Conversion
    /// faults (unexpected tree shapes) are hard failures, distinct from
    /// syntax errors.
    fn parse_to_definition(&self, source: &str, file_path: &str) -> Result<ParsedUnit, ParseError>;
}

/// Placeholder backend for languages that are registered but not yet
/// implemented. Every operation reports `UnsupportedLanguage`.
pub struct StubBackend {
    language_id: &'static str,
    extensions: &'static [&'static str],
}

impl StubBackend {
    #[must_use]
    pub fn new(language_id: &'static str, extensions: &'static [&'static str]) -> Self {
        Self {
            language_id,
            extensions,
        }
    }
}

impl ParserBackend for StubBackend {
    fn language_id(&self) -> &'static str {
        self.language_id
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        self.extensions
    }

    fn parse(&self, _source: &str, _file_path: &str) -> Result<SyntaxTree, ParseError> {
        Err(ParseError::UnsupportedLanguage {
            language: self.language_id.to_string(),
        })
    }

    fn parse_to_definition(
        &self,
        _source: &str,
        _file_path: &str,
    ) -> Result<ParsedUnit, ParseError> {
        Err(ParseError::UnsupportedLanguage {
            language: self.language_id.to_string(),
        })
    }
}
