#![warn(clippy::pedantic)]
//! Core Orchestration Crate for the enumgen Pipeline
//!
//! This crate provides the main entry points for the enumgen generation
//! pipeline. It turns annotated C# sources into generated collection source
//! files.
//!
//! ## Overview
//!
//! The pipeline runs in four phases:
//!
//! ```text
//! .cs source → tree-sitter → Definition Model → Symbol Table → Discovery → .g.cs units
//! ```
//!
//! Each phase is exposed as a standalone function, allowing flexible control
//! over which stages to execute.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use enumgen::{compile, generate};
//!
//! fn run(sources: &[(String, String)]) -> anyhow::Result<()> {
//!     let compilation = compile("app", sources, &[])?;
//!     for unit in generate(&compilation) {
//!         std::fs::write(&unit.file_name, &unit.text)?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Phases
//!
//! ### Phase 1: Parse
//!
//! [`parse`] transforms one source file into a [`SyntaxTree`]. Syntax errors
//! are collected on the tree as diagnostics rather than failing the parse;
//! only empty input is a hard failure.
//!
//! ### Phase 2: Compile
//!
//! [`compile`] builds an immutable [`Compilation`]: every source is parsed
//! and converted to the Definition Model, referenced module indexes are
//! loaded, and base-type references are linked into a symbol table.
//!
//! ### Phase 3: Discover
//!
//! [`discover`] scans the compilation for marker-annotated collection
//! declarations and resolves, per collection, the concrete non-abstract
//! descendants of its base type. Local collections see only the compiled
//! unit; global ones also see every referenced module.
//!
//! ### Phase 4: Generate
//!
//! [`generate`] emits one `.g.cs` unit per discovered collection in the
//! configured shape, plus wrapper units in generic-wrapper mode. A
//! generation fault skips that one collection and keeps the others.
//!
//! ## Error Handling
//!
//! Public functions return `anyhow::Result` for flexible propagation.
//! Diagnostics (syntax and semantic) are data carried on the compilation,
//! not control flow.
//!
//! ## Architecture
//!
//! This crate acts as a thin orchestration layer that delegates to
//! specialized crates:
//!
//! - [`enumgen_ast`] - immutable Definition Model and builders
//! - [`enumgen_parser`] - tree-sitter backend, symbol table, module indexes
//! - [`enumgen_discovery`] - marker scanning and descendant discovery
//! - [`enumgen_emit`] - four-shape collection synthesis

use std::path::PathBuf;
use std::sync::Arc;

use tracing::warn;

use enumgen_ast::node::SyntaxTree;
use enumgen_discovery::{DiscoveredCollection, DiscoveryEngine};
use enumgen_emit::{CollectionEmitter, GeneratedUnit};
use enumgen_parser::backend::ParserBackend;
use enumgen_parser::compilation::Compilation;
use enumgen_parser::csharp::CSharpBackend;

/// Parses one C# source file into a syntax tree.
///
/// Malformed input still yields a tree; the syntax faults are collected as
/// diagnostics on it.
///
/// # Errors
///
/// Empty input, or a grammar-level parser failure.
pub fn parse(source: &str, file_path: &str) -> anyhow::Result<SyntaxTree> {
    let backend = CSharpBackend::new();
    Ok(backend.parse(source, file_path)?)
}

/// Builds the immutable program model from sources plus module-index
/// references.
///
/// # Errors
///
/// Parse hard failures and unreadable or undecodable reference files.
pub fn compile(
    assembly_name: &str,
    sources: &[(String, String)],
    references: &[PathBuf],
) -> anyhow::Result<Compilation> {
    let backend: Arc<dyn ParserBackend> = Arc::new(CSharpBackend::new());
    Ok(Compilation::new(
        assembly_name,
        sources,
        references,
        &backend,
    )?)
}

/// Runs collection discovery over a compilation.
#[must_use]
pub fn discover(compilation: &Compilation) -> Vec<DiscoveredCollection> {
    DiscoveryEngine::discover(compilation)
}

/// Discovers and emits every collection. A faulted collection is skipped
/// with a warning; the others still emit.
#[must_use]
pub fn generate(compilation: &Compilation) -> Vec<GeneratedUnit> {
    let mut units = Vec::new();
    for collection in discover(compilation) {
        match CollectionEmitter::new(&collection).emit() {
            Ok(generated) => units.extend(generated),
            Err(error) => {
                warn!(
                    collection = %collection.info.collection_name,
                    %error,
                    "collection skipped"
                );
            }
        }
    }
    units
}
