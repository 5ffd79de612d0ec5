//! Graph view of dependency declarations.
//!
//! The ordering itself is a linear rescan (see [`resolve_order`](super::resolve_order));
//! this graph is used where structure matters more than order: naming the
//! cycle that stalled a resolution, and rendering dependency trees for the
//! CLI.

use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

use super::{DependencySource, extract_dependencies};
use crate::core::{DepError, Kind};

/// Color states for cycle detection using DFS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Node has not been visited.
    White,
    /// Node is currently being visited (in the DFS stack).
    Gray,
    /// Node has been fully visited.
    Black,
}

/// Directed graph of kinds, with an edge from each kind to every kind it depends on.
pub struct DependencyGraph<K> {
    /// The underlying directed graph.
    graph: DiGraph<K, ()>,
    /// Map from kinds to their graph indices.
    node_map: HashMap<K, NodeIndex>,
}

impl<K: Kind> DependencyGraph<K> {
    /// Create a new empty dependency graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Build the graph reachable from `roots` through `source`.
    ///
    /// Every declared kind becomes a node, whether or not it is a root.
    pub fn from_source<S>(roots: impl IntoIterator<Item = K>, source: &S) -> Self
    where
        S: DependencySource<K> + ?Sized,
    {
        let mut graph = Self::new();
        let mut seen = HashSet::new();
        let mut stack: Vec<K> = roots.into_iter().collect();
        stack.reverse();

        while let Some(kind) = stack.pop() {
            if !seen.insert(kind.clone()) {
                continue;
            }
            graph.add_kind(kind.clone());
            let dependencies = extract_dependencies(source, &kind);
            for dependency in dependencies.iter().rev() {
                stack.push(dependency.clone());
            }
            for dependency in dependencies {
                graph.add_dependency(kind.clone(), dependency);
            }
        }

        graph
    }

    /// Add a node to the graph if it doesn't already exist.
    ///
    /// Returns the node index in the graph.
    fn ensure_node(&mut self, kind: K) -> NodeIndex {
        if let Some(&index) = self.node_map.get(&kind) {
            index
        } else {
            let index = self.graph.add_node(kind.clone());
            self.node_map.insert(kind, index);
            index
        }
    }

    /// Add a kind with no edges.
    pub fn add_kind(&mut self, kind: K) {
        self.ensure_node(kind);
    }

    /// Add a dependency relationship to the graph.
    ///
    /// `from` depends on `to`, meaning `to` must be ordered before `from`.
    pub fn add_dependency(&mut self, from: K, to: K) {
        let from_idx = self.ensure_node(from);
        let to_idx = self.ensure_node(to);

        if !self.graph.contains_edge(from_idx, to_idx) {
            self.graph.add_edge(from_idx, to_idx, ());
        }
    }

    /// Fail with [`DepError::CircularDependency`] if the graph has a cycle.
    pub fn detect_cycles(&self) -> Result<(), DepError> {
        match self.find_cycle() {
            Some(cycle) => Err(DepError::CircularDependency {
                chain: Self::format_chain(&cycle),
            }),
            None => Ok(()),
        }
    }

    /// Find one cycle, returned as a path whose last kind repeats the first.
    ///
    /// Nodes are explored in insertion order, so the result is deterministic.
    pub fn find_cycle(&self) -> Option<Vec<K>> {
        let mut colors: HashMap<NodeIndex, Color> =
            self.graph.node_indices().map(|node| (node, Color::White)).collect();
        let mut path: Vec<NodeIndex> = Vec::new();

        for node in self.graph.node_indices() {
            if colors.get(&node) == Some(&Color::White)
                && let Some(cycle) = self.dfs_visit(node, &mut colors, &mut path)
            {
                return Some(cycle.into_iter().map(|idx| self.graph[idx].clone()).collect());
            }
        }

        None
    }

    /// DFS visit for cycle detection.
    ///
    /// Returns `Some(cycle_path)` if a cycle is detected, None otherwise.
    fn dfs_visit(
        &self,
        node: NodeIndex,
        colors: &mut HashMap<NodeIndex, Color>,
        path: &mut Vec<NodeIndex>,
    ) -> Option<Vec<NodeIndex>> {
        colors.insert(node, Color::Gray);
        path.push(node);

        for neighbor in self.direct_indices(node) {
            match colors.get(&neighbor) {
                Some(Color::Gray) => {
                    let start = path.iter().position(|n| *n == neighbor).unwrap_or(0);
                    let mut cycle = path[start..].to_vec();
                    // Close the loop
                    cycle.push(neighbor);
                    return Some(cycle);
                }
                Some(Color::White) => {
                    if let Some(cycle) = self.dfs_visit(neighbor, colors, path) {
                        return Some(cycle);
                    }
                }
                _ => {}
            }
        }

        path.pop();
        colors.insert(node, Color::Black);
        None
    }

    /// Outgoing neighbors in edge insertion order.
    ///
    /// petgraph walks adjacency lists newest-first.
    fn direct_indices(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> = self.graph.neighbors(node).collect();
        neighbors.reverse();
        neighbors
    }

    /// Render a cycle path as `A -> B -> A`.
    pub fn format_chain(cycle: &[K]) -> String {
        cycle.iter().map(ToString::to_string).collect::<Vec<_>>().join(" -> ")
    }

    /// Direct dependencies of `kind`, in declaration order.
    pub fn get_direct_deps(&self, kind: &K) -> Vec<K> {
        match self.node_map.get(kind) {
            Some(&idx) => {
                self.direct_indices(idx).into_iter().map(|n| self.graph[n].clone()).collect()
            }
            None => Vec::new(),
        }
    }

    /// Every kind `kind` depends on, directly or indirectly.
    pub fn get_transitive_deps(&self, kind: &K) -> HashSet<K> {
        let mut deps = HashSet::new();
        let mut stack: Vec<NodeIndex> = self.node_map.get(kind).copied().into_iter().collect();

        while let Some(current) = stack.pop() {
            for neighbor in self.graph.neighbors(current) {
                if deps.insert(self.graph[neighbor].clone()) {
                    stack.push(neighbor);
                }
            }
        }

        deps
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Number of kinds.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of dependency edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Build a human-readable dependency tree rooted at `root`.
    pub fn to_tree_string(&self, root: &K) -> String {
        let mut result = String::new();
        let mut visited = HashSet::new();
        result.push_str(&format!("{root}\n"));
        let deps = self.get_direct_deps(root);
        visited.insert(root.clone());
        for (i, dep) in deps.iter().enumerate() {
            self.build_tree_string(dep, &mut result, "", i == deps.len() - 1, &mut visited);
        }
        result
    }

    fn build_tree_string(
        &self,
        kind: &K,
        result: &mut String,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<K>,
    ) {
        let connector = if is_last {
            "└── "
        } else {
            "├── "
        };
        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };
        result.push_str(&format!("{prefix}{connector}{kind}\n"));

        // `visited` holds the current path only
        if !visited.insert(kind.clone()) {
            result.push_str(&format!("{child_prefix}└── (circular reference)\n"));
            return;
        }

        let deps = self.get_direct_deps(kind);
        for (i, dep) in deps.iter().enumerate() {
            self.build_tree_string(dep, result, &child_prefix, i == deps.len() - 1, visited);
        }
        visited.remove(kind);
    }
}

impl<K: Kind> Default for DependencyGraph<K> {
    fn default() -> Self {
        Self::new()
    }
}
