//! In-memory object tree.

use std::any::Any;

use super::{ObjectTree, type_label};
use crate::core::KindName;

/// Handle to a node in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

struct Attached {
    kind: KindName,
    value: Box<dyn Any>,
}

struct NodeData {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    active: bool,
    components: Vec<Attached>,
}

/// Arena of named nodes, each carrying type-erased components.
///
/// Nodes are never removed, so a [`NodeId`] stays valid for the scene's
/// lifetime. Handles from another scene are a logic error and panic on use.
#[derive(Default)]
pub struct Scene {
    nodes: Vec<NodeData>,
}

impl Scene {
    /// An empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, name: &str, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            name: name.to_string(),
            parent,
            children: Vec::new(),
            active: true,
            components: Vec::new(),
        });
        id
    }

    /// Add a root node.
    pub fn spawn(&mut self, name: &str) -> NodeId {
        self.insert(name, None)
    }

    /// Add a node as the last child of `parent`.
    pub fn spawn_child(&mut self, parent: NodeId, name: &str) -> NodeId {
        let id = self.insert(name, Some(parent));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Attach a component, registered under its type's short name.
    pub fn add_component<T: Any>(&mut self, node: NodeId, component: T) {
        self.add_component_as(node, type_label::<T>(), component);
    }

    /// Attach a component under an explicit kind.
    pub fn add_component_as<T: Any>(&mut self, node: NodeId, kind: impl Into<KindName>, component: T) {
        self.nodes[node.0].components.push(Attached {
            kind: kind.into(),
            value: Box::new(component),
        });
    }

    /// Set whether the node itself is active.
    pub fn set_active(&mut self, node: NodeId, active: bool) {
        self.nodes[node.0].active = active;
    }

    /// The first `T` component on `node`.
    pub fn get_component<T: Any>(&self, node: NodeId) -> Option<&T> {
        self.components::<T>(node).into_iter().next()
    }

    /// Number of nodes in the scene.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl ObjectTree for Scene {
    type Node = NodeId;

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes[node.0].children.clone()
    }

    fn is_active_self(&self, node: NodeId) -> bool {
        self.nodes[node.0].active
    }

    fn components<T: Any>(&self, node: NodeId) -> Vec<&T> {
        self.nodes[node.0].components.iter().filter_map(|c| c.value.downcast_ref::<T>()).collect()
    }

    fn component_kinds(&self, node: NodeId) -> Vec<KindName> {
        self.nodes[node.0].components.iter().map(|c| c.kind.clone()).collect()
    }

    fn node_name(&self, node: NodeId) -> String {
        self.nodes[node.0].name.clone()
    }
}
