//! The C# backend: tree-sitter CST in, syntax trees and definitions out.
//!
//! Parsing never throws on malformed input. tree-sitter always produces a
//! tree; ERROR and MISSING nodes are harvested into the returned tree's
//! diagnostic list. The only hard failures are empty input and a grammar
//! that fails to load.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tree_sitter::{Node, Parser};

use enumgen_ast::node::{Location, SyntaxDiagnostic, SyntaxNode, SyntaxTree};
use enumgen_ast::node_kind::NodeKind;

use crate::backend::{ParsedUnit, ParserBackend};
use crate::convert;
use crate::errors::ParseError;

/// Nodes shorter than this keep their source text in the metadata bag so
/// position queries can answer without re-slicing the file.
const LEAF_TEXT_LIMIT: usize = 256;

pub struct CSharpBackend;

impl CSharpBackend {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    pub(crate) fn raw_parse(source: &str, file_path: &str) -> Result<tree_sitter::Tree, ParseError> {
        if source.trim().is_empty() {
            return Err(ParseError::EmptySource);
        }
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .map_err(|err| ParseError::Grammar {
                message: err.to_string(),
            })?;
        parser
            .parse(source, None)
            .ok_or_else(|| ParseError::ParserFailure {
                file: file_path.to_string(),
            })
    }
}

impl Default for CSharpBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserBackend for CSharpBackend {
    fn language_id(&self) -> &'static str {
        "csharp"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["cs"]
    }

    fn parse(&self, source: &str, file_path: &str) -> Result<SyntaxTree, ParseError> {
        let tree = Self::raw_parse(source, file_path)?;
        let code = source.as_bytes();
        let mut builder = TreeBuilder { next_id: 1 };
        let root = builder.build_node(tree.root_node(), code, file_path);
        let mut errors = Vec::new();
        collect_errors(tree.root_node(), code, file_path, &mut errors);
        Ok(SyntaxTree::new(
            file_path.to_string(),
            source.to_string(),
            root,
            errors,
        ))
    }

    fn parse_to_definition(&self, source: &str, file_path: &str) -> Result<ParsedUnit, ParseError> {
        let tree = Self::raw_parse(source, file_path)?;
        convert::convert_unit(tree.root_node(), source.as_bytes(), file_path)
    }
}

pub(crate) fn node_location(node: Node, file_path: &str) -> Location {
    let start = node.start_position();
    let end = node.end_position();
    Location::new(
        u32::try_from(node.start_byte()).unwrap_or(u32::MAX),
        u32::try_from(node.end_byte()).unwrap_or(u32::MAX),
        u32::try_from(start.row).unwrap_or(u32::MAX),
        u32::try_from(start.column).unwrap_or(u32::MAX),
        u32::try_from(end.row).unwrap_or(u32::MAX),
        u32::try_from(end.column).unwrap_or(u32::MAX),
        file_path.to_string(),
    )
}

pub(crate) fn node_text<'a>(node: Node, code: &'a [u8]) -> &'a str {
    node.utf8_text(code).unwrap_or("")
}

struct TreeBuilder {
    next_id: u32,
}

impl TreeBuilder {
    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn build_node(&mut self, node: Node, code: &[u8], file_path: &str) -> Arc<SyntaxNode> {
        let id = self.next_id();
        let kind = NodeKind::from_grammar(node.kind());
        let name = node
            .child_by_field_name("name")
            .map(|name_node| node_text(name_node, code).to_string());

        let mut metadata = FxHashMap::default();
        metadata.insert("raw_kind".to_string(), node.kind().to_string());
        if node.named_child_count() == 0 {
            let text = node_text(node, code);
            if !text.is_empty() && text.len() <= LEAF_TEXT_LIMIT {
                metadata.insert("text".to_string(), text.to_string());
            }
        }

        let mut children = Vec::with_capacity(node.named_child_count());
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            children.push(self.build_node(child, code, file_path));
        }

        Arc::new(SyntaxNode::new(
            id,
            kind,
            name,
            node_location(node, file_path),
            children,
            metadata,
        ))
    }
}

fn collect_errors(node: Node, code: &[u8], file_path: &str, errors: &mut Vec<SyntaxDiagnostic>) {
    if node.is_error() {
        let snippet: String = node_text(node, code).chars().take(32).collect();
        errors.push(SyntaxDiagnostic {
            message: format!("syntax error near `{snippet}`"),
            location: node_location(node, file_path),
        });
    } else if node.is_missing() {
        errors.push(SyntaxDiagnostic {
            message: format!("missing {}", node.kind()),
            location: node_location(node, file_path),
        });
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_errors(child, code, file_path, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_source_parses_without_errors() {
        let backend = CSharpBackend::new();
        let tree = backend
            .parse("public class Color { }", "Color.cs")
            .expect("parse should succeed");
        assert!(!tree.has_errors());
        assert_eq!(*tree.root().kind(), NodeKind::CompilationUnit);
        let class = &tree.root().children()[0];
        assert_eq!(*class.kind(), NodeKind::ClassDeclaration);
        assert_eq!(class.name(), Some("Color"));
    }

    #[test]
    fn malformed_source_yields_tree_with_error_list() {
        let backend = CSharpBackend::new();
        let tree = backend
            .parse("public class { int", "Broken.cs")
            .expect("malformed input must still produce a tree");
        assert!(tree.has_errors());
    }

    #[test]
    fn empty_source_is_a_hard_failure() {
        let backend = CSharpBackend::new();
        let result = backend.parse("   \n", "Empty.cs");
        assert!(matches!(result, Err(ParseError::EmptySource)));
    }

    #[test]
    fn node_at_offset_finds_innermost_span() {
        let backend = CSharpBackend::new();
        let source = "class Color { string Hex { get; } }";
        let tree = backend.parse(source, "Color.cs").unwrap();
        let offset = u32::try_from(source.find("Hex").unwrap()).unwrap();
        let node = tree.node_at_offset(offset).expect("offset is inside root");
        assert_eq!(node.metadata().get("text").map(String::as_str), Some("Hex"));
    }
}
