//! Flat storage of built definitions with parent/child routes.

use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::definitions::{ClassDefinition, DefinitionNode, InterfaceDefinition};

#[derive(Clone, Debug)]
pub(crate) struct NodeRoute {
    pub(crate) id: u32,
    pub(crate) parent: Option<u32>,
    pub(crate) children: Vec<u32>,
}

/// Id-keyed registry of every definition built for one compilation unit.
/// The routes carry the non-owning parent edge used for upward lookup; the
/// definitions themselves only own downward.
#[derive(Default, Clone, Debug)]
pub struct DefinitionArena {
    nodes: FxHashMap<u32, DefinitionNode>,
    node_routes: Vec<NodeRoute>,
}

impl DefinitionArena {
    /// Adds a node to the arena and records its parent-child relationship.
    /// A `parent_id` of zero marks a root node.
    ///
    /// # Panics
    ///
    /// Panics if `node.id()` is zero or if a node with the same ID already
    /// exists in the arena.
    pub fn add_node(&mut self, node: DefinitionNode, parent_id: u32) {
        assert!(node.id() != 0, "Node ID must be non-zero");
        assert!(
            !self.nodes.contains_key(&node.id()),
            "Node with ID {} already exists in the arena",
            node.id()
        );
        let id = node.id();
        self.nodes.insert(id, node);
        self.add_route(
            NodeRoute {
                id,
                parent: (parent_id != 0).then_some(parent_id),
                children: vec![],
            },
            parent_id,
        );
    }

    #[must_use]
    pub fn find_node(&self, id: u32) -> Option<DefinitionNode> {
        self.nodes.get(&id).cloned()
    }

    #[must_use]
    pub fn find_parent_node(&self, id: u32) -> Option<u32> {
        self.node_routes
            .iter()
            .find(|route| route.id == id)
            .and_then(|route| route.parent)
    }

    #[must_use]
    pub fn children_of(&self, id: u32) -> Vec<DefinitionNode> {
        self.node_routes
            .iter()
            .find(|route| route.id == id)
            .map(|route| {
                route
                    .children
                    .iter()
                    .filter_map(|child| self.nodes.get(child).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn classes(&self) -> Vec<Arc<ClassDefinition>> {
        self.list_nodes_cmp(|node| {
            if let DefinitionNode::Class(class) = node {
                Some(class.clone())
            } else {
                None
            }
        })
    }

    #[must_use]
    pub fn interfaces(&self) -> Vec<Arc<InterfaceDefinition>> {
        self.list_nodes_cmp(|node| {
            if let DefinitionNode::Interface(interface) = node {
                Some(interface.clone())
            } else {
                None
            }
        })
    }

    pub fn filter_nodes<T: Fn(&DefinitionNode) -> bool>(
        &self,
        fn_predicate: T,
    ) -> Vec<DefinitionNode> {
        self.nodes
            .values()
            .filter(|node| fn_predicate(node))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn list_nodes_cmp<T, F>(&self, comparator: F) -> Vec<T>
    where
        F: Fn(&DefinitionNode) -> Option<T>,
    {
        let mut routed: Vec<(u32, T)> = self
            .nodes
            .values()
            .filter_map(|node| comparator(node).map(|value| (node.id(), value)))
            .collect();
        // Stable output ordered by id: ids are assigned in build order.
        routed.sort_by_key(|(id, _)| *id);
        routed.into_iter().map(|(_, value)| value).collect()
    }

    fn add_route(&mut self, route: NodeRoute, parent: u32) {
        if let Some(parent_route) = self.node_routes.iter_mut().find(|r| r.id == parent) {
            parent_route.children.push(route.id);
        }
        self.node_routes.push(route);
    }
}
