//! Language registry: maps language ids and file extensions to backends.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::backend::{ParserBackend, StubBackend};
use crate::csharp::CSharpBackend;
use crate::errors::ParseError;

/// Factory/dispatch table for parser backends. The default registry carries
/// the C# backend plus a Visual Basic stub; hosts may register more.
pub struct LanguageRegistry {
    by_language: FxHashMap<String, Arc<dyn ParserBackend>>,
    by_extension: FxHashMap<String, Arc<dyn ParserBackend>>,
}

impl LanguageRegistry {
    /// An empty registry with no backends at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            by_language: FxHashMap::default(),
            by_extension: FxHashMap::default(),
        }
    }

    /// The standard registry: C# fully implemented, VB as a stub.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(CSharpBackend::new()));
        registry.register(Arc::new(StubBackend::new("vb", &["vb"])));
        registry
    }

    /// Registers a backend under its language id and all of its extensions.
    /// Re-registering a language id replaces the previous backend.
    pub fn register(&mut self, backend: Arc<dyn ParserBackend>) {
        for extension in backend.file_extensions() {
            self.by_extension
                .insert((*extension).to_ascii_lowercase(), backend.clone());
        }
        self.by_language
            .insert(backend.language_id().to_string(), backend);
    }

    /// Resolves a backend by language identifier.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::UnsupportedLanguage` for unknown ids.
    pub fn backend_for_language(&self, language_id: &str) -> Result<Arc<dyn ParserBackend>, ParseError> {
        self.by_language
            .get(language_id)
            .cloned()
            .ok_or_else(|| ParseError::UnsupportedLanguage {
                language: language_id.to_string(),
            })
    }

    /// Resolves a backend by file extension (leading dot tolerated).
    ///
    /// # Errors
    ///
    /// Returns `ParseError::UnsupportedLanguage` for unclaimed extensions.
    pub fn backend_for_extension(&self, extension: &str) -> Result<Arc<dyn ParserBackend>, ParseError> {
        let key = extension.trim_start_matches('.').to_ascii_lowercase();
        self.by_extension
            .get(&key)
            .cloned()
            .ok_or_else(|| ParseError::UnsupportedLanguage {
                language: extension.to_string(),
            })
    }

    #[must_use]
    pub fn languages(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.by_language.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_resolves_csharp_by_id_and_extension() {
        let registry = LanguageRegistry::new();
        assert!(registry.backend_for_language("csharp").is_ok());
        assert!(registry.backend_for_extension(".cs").is_ok());
        assert!(registry.backend_for_extension("CS").is_ok());
    }

    #[test]
    fn unknown_language_is_rejected() {
        let registry = LanguageRegistry::new();
        assert!(matches!(
            registry.backend_for_language("fsharp"),
            Err(ParseError::UnsupportedLanguage { .. })
        ));
    }

    #[test]
    fn stub_backend_refuses_to_parse() {
        let registry = LanguageRegistry::new();
        let stub = registry.backend_for_language("vb").unwrap();
        assert!(matches!(
            stub.parse("Module M", "m.vb"),
            Err(ParseError::UnsupportedLanguage { .. })
        ));
    }
}
