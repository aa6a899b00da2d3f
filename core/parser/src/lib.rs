#![warn(clippy::pedantic)]
//! Parser backends, the language registry, and the program model.
//!
//! The one fully implemented backend is C# ([`csharp::CSharpBackend`],
//! tree-sitter based). Backends turn source text into [`enumgen_ast`] syntax
//! trees and definitions; [`compilation::Compilation`] assembles one or more
//! parsed files plus external [`index::ModuleIndex`] references into a
//! resolvable symbol table with diagnostics.

pub mod backend;
pub mod cancel;
pub mod compilation;
pub mod convert;
pub mod csharp;
pub mod errors;
pub mod index;
pub mod registry;
pub mod symbols;
