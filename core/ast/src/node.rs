//! Base syntax node definitions.
//!
//! A [`SyntaxNode`] is immutable once built: identity, kind tag, optional
//! name, owned children, a source span, and a free-form metadata bag. The
//! non-owning parent edge lives in the owning [`SyntaxTree`]'s route table,
//! so nodes themselves stay acyclic and thread-safe to share.

use core::fmt;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::node_kind::NodeKind;

/// Source span of a node: absolute byte offsets plus line/column bounds.
#[derive(Clone, PartialEq, Eq, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Location {
    pub offset_start: u32,
    pub offset_end: u32,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
    pub source: String,
}

impl Location {
    #[must_use]
    pub fn new(
        offset_start: u32,
        offset_end: u32,
        start_line: u32,
        start_column: u32,
        end_line: u32,
        end_column: u32,
        source: String,
    ) -> Self {
        Self {
            offset_start,
            offset_end,
            start_line,
            start_column,
            end_line,
            end_column,
            source,
        }
    }

    /// Whether the given absolute byte offset falls inside this span.
    #[must_use]
    pub fn contains_offset(&self, offset: u32) -> bool {
        offset >= self.offset_start && offset < self.offset_end
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.start_line, self.start_column)
    }
}

/// Visitor contract for syntax nodes. `accept` dispatches to `visit`; the
/// visitor decides whether (and how) to recurse into children.
pub trait SyntaxVisitor {
    type Output;

    fn visit(&mut self, node: &SyntaxNode) -> Self::Output;
}

/// A read-only tree node. Children are exclusively owned; there is no
/// mutation API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxNode {
    id: u32,
    kind: NodeKind,
    name: Option<String>,
    location: Location,
    children: Vec<Arc<SyntaxNode>>,
    metadata: FxHashMap<String, String>,
}

impl SyntaxNode {
    #[must_use]
    pub fn new(
        id: u32,
        kind: NodeKind,
        name: Option<String>,
        location: Location,
        children: Vec<Arc<SyntaxNode>>,
        metadata: FxHashMap<String, String>,
    ) -> Self {
        Self {
            id,
            kind,
            name,
            location,
            children,
            metadata,
        }
    }

    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    #[must_use]
    pub fn children(&self) -> &[Arc<SyntaxNode>] {
        &self.children
    }

    #[must_use]
    pub fn metadata(&self) -> &FxHashMap<String, String> {
        &self.metadata
    }

    /// Finds the first direct child carrying the given name. An unknown name
    /// is "not found", never an error.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Arc<SyntaxNode>> {
        self.children
            .iter()
            .find(|child| child.name.as_deref() == Some(name))
    }

    /// Direct children with the given kind tag.
    pub fn children_of<'a>(
        &'a self,
        kind: &'a NodeKind,
    ) -> impl Iterator<Item = &'a Arc<SyntaxNode>> + 'a {
        self.children.iter().filter(move |child| child.kind == *kind)
    }

    /// Depth-first traversal of this node's subtree, excluding `self`.
    #[must_use]
    pub fn descendants(&self) -> Vec<Arc<SyntaxNode>> {
        let mut result = Vec::new();
        let mut stack: Vec<Arc<SyntaxNode>> = self.children.iter().rev().cloned().collect();
        while let Some(node) = stack.pop() {
            stack.extend(node.children.iter().rev().cloned());
            result.push(node);
        }
        result
    }

    pub fn accept<V: SyntaxVisitor>(&self, visitor: &mut V) -> V::Output {
        visitor.visit(self)
    }
}

/// One syntax-level diagnostic collected during parsing. Diagnostics are
/// data, not control flow: a malformed file still yields a tree.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SyntaxDiagnostic {
    pub message: String,
    pub location: Location,
}

impl Display for SyntaxDiagnostic {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// A parsed source file: root node, original text, and the parent route
/// table for non-owning upward lookup.
#[derive(Clone, Debug)]
pub struct SyntaxTree {
    file_path: String,
    source: String,
    root: Arc<SyntaxNode>,
    parents: FxHashMap<u32, u32>,
    errors: Vec<SyntaxDiagnostic>,
}

impl SyntaxTree {
    #[must_use]
    pub fn new(
        file_path: String,
        source: String,
        root: Arc<SyntaxNode>,
        errors: Vec<SyntaxDiagnostic>,
    ) -> Self {
        let mut parents = FxHashMap::default();
        let mut stack: Vec<&Arc<SyntaxNode>> = vec![&root];
        while let Some(node) = stack.pop() {
            for child in node.children() {
                parents.insert(child.id(), node.id());
                stack.push(child);
            }
        }
        Self {
            file_path,
            source,
            root,
            parents,
            errors,
        }
    }

    #[must_use]
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn root(&self) -> &Arc<SyntaxNode> {
        &self.root
    }

    /// Syntax errors collected while parsing. Empty for well-formed input.
    #[must_use]
    pub fn errors(&self) -> &[SyntaxDiagnostic] {
        &self.errors
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Non-owning parent edge, used only for lookup.
    #[must_use]
    pub fn parent_of(&self, id: u32) -> Option<u32> {
        self.parents.get(&id).copied()
    }

    #[must_use]
    pub fn find_node(&self, id: u32) -> Option<Arc<SyntaxNode>> {
        if self.root.id() == id {
            return Some(self.root.clone());
        }
        self.root
            .descendants()
            .into_iter()
            .find(|node| node.id() == id)
    }

    /// Innermost node whose span contains the absolute byte offset.
    #[must_use]
    pub fn node_at_offset(&self, offset: u32) -> Option<Arc<SyntaxNode>> {
        if !self.root.location().contains_offset(offset) {
            return None;
        }
        let mut current = self.root.clone();
        'descend: loop {
            for child in current.children() {
                if child.location().contains_offset(offset) {
                    current = child.clone();
                    continue 'descend;
                }
            }
            return Some(current);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: u32, kind: NodeKind, name: Option<&str>) -> Arc<SyntaxNode> {
        Arc::new(SyntaxNode::new(
            id,
            kind,
            name.map(str::to_string),
            Location::default(),
            vec![],
            FxHashMap::default(),
        ))
    }

    #[test]
    fn child_lookup_by_unknown_name_is_none() {
        let child = leaf(2, NodeKind::Identifier, Some("Color"));
        let root = SyntaxNode::new(
            1,
            NodeKind::CompilationUnit,
            None,
            Location::default(),
            vec![child],
            FxHashMap::default(),
        );
        assert!(root.child("Color").is_some());
        assert!(root.child("NotThere").is_none());
    }

    #[test]
    fn tree_records_parent_routes() {
        let grandchild = leaf(3, NodeKind::Identifier, Some("x"));
        let child = Arc::new(SyntaxNode::new(
            2,
            NodeKind::ClassDeclaration,
            Some("C".to_string()),
            Location::default(),
            vec![grandchild],
            FxHashMap::default(),
        ));
        let root = Arc::new(SyntaxNode::new(
            1,
            NodeKind::CompilationUnit,
            None,
            Location::default(),
            vec![child],
            FxHashMap::default(),
        ));
        let tree = SyntaxTree::new("test.cs".into(), String::new(), root, vec![]);
        assert_eq!(tree.parent_of(3), Some(2));
        assert_eq!(tree.parent_of(2), Some(1));
        assert_eq!(tree.parent_of(1), None);
    }

    #[test]
    fn descendants_are_depth_first() {
        let a = leaf(2, NodeKind::Identifier, Some("a"));
        let b = leaf(4, NodeKind::Identifier, Some("b"));
        let mid = Arc::new(SyntaxNode::new(
            3,
            NodeKind::ClassDeclaration,
            None,
            Location::default(),
            vec![b],
            FxHashMap::default(),
        ));
        let root = SyntaxNode::new(
            1,
            NodeKind::CompilationUnit,
            None,
            Location::default(),
            vec![a, mid],
            FxHashMap::default(),
        );
        let ids: Vec<u32> = root.descendants().iter().map(|n| n.id()).collect();
        assert_eq!(ids, vec![2, 3, 4]);
    }
}
