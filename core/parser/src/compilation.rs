//! The program model: parsed trees + symbol table + diagnostics.
//!
//! A `Compilation` is a pure value built from a set of sources and reference
//! paths. Rebuilding after an edit is a full reconstruction at this layer;
//! incremental behavior lives in the session crate, which decides when a
//! rebuild happens. Construction mutates nothing outside the value, so
//! concurrent builds never interfere.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use enumgen_ast::node::{Location, SyntaxTree};

use crate::backend::{ParsedUnit, ParserBackend};
use crate::cancel::CancelToken;
use crate::errors::CompilationError;
use crate::index::ModuleIndex;
use crate::symbols::{ModuleId, SymbolTable, TypeSymbolKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// One diagnostic. Diagnostics are data, never control flow: the model is
/// always fully built and every problem is collected.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub location: Location,
}

/// Read-only answer to a position query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SemanticInfo {
    pub fq_name: String,
    pub kind: TypeSymbolKind,
    pub is_abstract: bool,
}

pub struct Compilation {
    assembly_name: String,
    trees: Vec<SyntaxTree>,
    units: Vec<ParsedUnit>,
    symbols: SymbolTable,
    reference_names: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl Compilation {
    /// Builds a program model from sources plus module-index references.
    ///
    /// # Errors
    ///
    /// Parse hard failures (empty source, conversion faults), unreadable or
    /// undecodable references, and cooperative cancellation.
    pub fn new(
        assembly_name: &str,
        sources: &[(String, String)],
        references: &[PathBuf],
        backend: &Arc<dyn ParserBackend>,
    ) -> Result<Self, CompilationError> {
        Self::build(assembly_name, sources, references, backend, None)
    }

    /// Like [`Compilation::new`] but honoring a cancellation token between
    /// syntax-tree construction and model construction.
    pub fn new_with_cancel(
        assembly_name: &str,
        sources: &[(String, String)],
        references: &[PathBuf],
        backend: &Arc<dyn ParserBackend>,
        token: &CancelToken,
    ) -> Result<Self, CompilationError> {
        Self::build(assembly_name, sources, references, backend, Some(token))
    }

    fn build(
        assembly_name: &str,
        sources: &[(String, String)],
        references: &[PathBuf],
        backend: &Arc<dyn ParserBackend>,
        token: Option<&CancelToken>,
    ) -> Result<Self, CompilationError> {
        let mut trees = Vec::with_capacity(sources.len());
        let mut units = Vec::with_capacity(sources.len());
        let mut diagnostics = Vec::new();

        for (path, text) in sources {
            let tree = backend.parse(text, path)?;
            for error in tree.errors() {
                diagnostics.push(Diagnostic {
                    severity: DiagnosticSeverity::Error,
                    message: error.message.clone(),
                    location: error.location.clone(),
                });
            }
            trees.push(tree);
            units.push(backend.parse_to_definition(text, path)?);
        }

        // Syntax is done; the model build starts here.
        if token.is_some_and(CancelToken::is_cancelled) {
            return Err(CompilationError::Cancelled);
        }

        let mut symbols = SymbolTable::new();
        for parsed in &units {
            symbols.add_unit(&parsed.unit, ModuleId::LOCAL);
        }

        let mut reference_names = Vec::with_capacity(references.len());
        for (ordinal, path) in references.iter().enumerate() {
            if token.is_some_and(CancelToken::is_cancelled) {
                return Err(CompilationError::Cancelled);
            }
            let index = ModuleIndex::load(path)?;
            let module = ModuleId(u32::try_from(ordinal).unwrap_or(u32::MAX - 1) + 1);
            index.load_into(&mut symbols, module);
            reference_names.push(index.name);
        }

        for (symbol_id, base_ref) in symbols.link_bases() {
            let Some(symbol) = symbols.get(symbol_id) else {
                continue;
            };
            // Unresolved bases on referenced modules are routine (their own
            // dependencies are not loaded); only local ones are surfaced.
            if symbol.module == ModuleId::LOCAL {
                diagnostics.push(Diagnostic {
                    severity: DiagnosticSeverity::Warning,
                    message: format!(
                        "base type `{base_ref}` of `{}` could not be resolved",
                        symbol.fq_name
                    ),
                    location: Location::default(),
                });
            }
        }

        debug!(
            assembly = assembly_name,
            files = trees.len(),
            references = reference_names.len(),
            symbols = symbols.len(),
            "compilation built"
        );

        Ok(Self {
            assembly_name: assembly_name.to_string(),
            trees,
            units,
            symbols,
            reference_names,
            diagnostics,
        })
    }

    #[must_use]
    pub fn assembly_name(&self) -> &str {
        &self.assembly_name
    }

    #[must_use]
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    #[must_use]
    pub fn trees(&self) -> &[SyntaxTree] {
        &self.trees
    }

    #[must_use]
    pub fn units(&self) -> &[ParsedUnit] {
        &self.units
    }

    #[must_use]
    pub fn reference_names(&self) -> &[String] {
        &self.reference_names
    }

    /// All collected diagnostics, syntax and semantic.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Error)
    }

    /// Resolves the identifier under the given byte offset against the
    /// symbol table. Non-identifier positions answer `None`.
    #[must_use]
    pub fn semantic_info_at(&self, file: &str, offset: u32) -> Option<SemanticInfo> {
        let tree = self.trees.iter().find(|t| t.file_path() == file)?;
        let node = tree.node_at_offset(offset)?;
        let text = node
            .metadata()
            .get("text")
            .map(String::as_str)
            .or_else(|| node.name())?;
        let reference = enumgen_ast::definitions::TypeRef::named(text);
        let id = self.symbols.resolve(&reference, ModuleId::LOCAL)?;
        let symbol = self.symbols.get(id)?;
        Some(SemanticInfo {
            fq_name: symbol.fq_name.clone(),
            kind: symbol.kind,
            is_abstract: symbol.is_abstract,
        })
    }

    /// Type names visible at the given position. The answer is the full
    /// visible type surface, sorted and deduplicated; member-level filtering
    /// is out of scope for this layer.
    #[must_use]
    pub fn completions_at(&self, file: &str, _offset: u32) -> Vec<String> {
        if !self.trees.iter().any(|t| t.file_path() == file) {
            return Vec::new();
        }
        let mut names: Vec<String> = self
            .symbols
            .types()
            .map(|symbol| symbol.name.clone())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Captures this compilation's export surface as a module index.
    #[must_use]
    pub fn to_index(&self) -> ModuleIndex {
        ModuleIndex::capture(&self.assembly_name, &self.symbols, ModuleId::LOCAL)
    }

    /// Writes the module index artifact.
    ///
    /// # Errors
    ///
    /// `IndexWrite` on serialization or IO failure.
    pub fn write_index(&self, path: &std::path::Path) -> Result<(), CompilationError> {
        self.to_index().write(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csharp::CSharpBackend;

    fn backend() -> Arc<dyn ParserBackend> {
        Arc::new(CSharpBackend::new())
    }

    fn compile(sources: &[(&str, &str)]) -> Compilation {
        let sources: Vec<(String, String)> = sources
            .iter()
            .map(|(p, t)| ((*p).to_string(), (*t).to_string()))
            .collect();
        Compilation::new("test", &sources, &[], &backend()).expect("compilation should build")
    }

    #[test]
    fn builds_symbol_table_with_linked_bases() {
        let compilation = compile(&[(
            "colors.cs",
            r"
namespace Paint
{
    public abstract class Color { }
    public class Red : Color { }
    public class Crimson : Red { }
}
",
        )]);
        let symbols = compilation.symbols();
        let color = symbols
            .types()
            .find(|s| s.fq_name == "Paint.Color")
            .expect("Color symbol");
        let crimson = symbols
            .types()
            .find(|s| s.fq_name == "Paint.Crimson")
            .expect("Crimson symbol");
        assert!(symbols.derives_from(crimson.id, color.id));
        assert!(!symbols.derives_from(color.id, crimson.id));
    }

    #[test]
    fn syntax_errors_become_diagnostics_not_failures() {
        let compilation = compile(&[("broken.cs", "class Broken {")]);
        assert!(compilation.has_errors());
    }

    #[test]
    fn semantic_info_resolves_identifier_at_position() {
        let source = "public class Color { }\npublic class Red : Color { }\n";
        let compilation = compile(&[("c.cs", source)]);
        let offset = u32::try_from(source.rfind("Color").unwrap()).unwrap();
        let info = compilation
            .semantic_info_at("c.cs", offset)
            .expect("identifier resolves");
        assert_eq!(info.fq_name, "Color");
        assert_eq!(info.kind, TypeSymbolKind::Class);
    }

    #[test]
    fn completions_list_visible_types() {
        let compilation = compile(&[("c.cs", "public class Color { }\npublic class Red { }")]);
        let completions = compilation.completions_at("c.cs", 0);
        assert!(completions.contains(&"Color".to_string()));
        assert!(completions.contains(&"Red".to_string()));
    }

    #[test]
    fn cancelled_token_aborts_model_build() {
        let token = CancelToken::new();
        token.cancel();
        let result = Compilation::new_with_cancel(
            "test",
            &[("a.cs".to_string(), "class A { }".to_string())],
            &[],
            &backend(),
            &token,
        );
        assert!(matches!(result, Err(CompilationError::Cancelled)));
    }

    #[test]
    fn reference_round_trip_extends_symbol_surface() {
        let lib = compile(&[(
            "lib.cs",
            "namespace Lib { public class Color { } public class Magenta : Color { } }",
        )]);
        let dir = tempfile::tempdir().unwrap();
        let index_path = dir.path().join("lib.index.json");
        lib.write_index(&index_path).unwrap();

        let app = Compilation::new(
            "app",
            &[(
                "app.cs".to_string(),
                "namespace App { public class Scarlet : Lib.Color { } }".to_string(),
            )],
            &[index_path],
            &backend(),
        )
        .unwrap();
        let symbols = app.symbols();
        let color = symbols
            .types()
            .find(|s| s.fq_name == "Lib.Color")
            .expect("referenced Color is visible");
        let scarlet = symbols
            .types()
            .find(|s| s.fq_name == "App.Scarlet")
            .expect("local Scarlet");
        assert!(symbols.derives_from(scarlet.id, color.id));
    }
}
