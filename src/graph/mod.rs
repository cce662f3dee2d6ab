pub mod edge;
pub mod node;

use std::collections::HashMap;

use petgraph::Directed;
use petgraph::stable_graph::{NodeIndex, StableGraph};

use edge::ImportEdge;
use node::{GraphNode, NodeKey};

/// The graph collaborator the network builder decorates.
///
/// Implementations must tolerate repeated calls: adding a node whose key is
/// already present is a no-op, and adding an edge twice must not fail.
pub trait GraphSink {
    fn contains_node(&self, key: &NodeKey) -> bool;

    fn add_node(&mut self, node: GraphNode);

    /// Add a directed edge between two existing nodes.
    /// Returns false when either endpoint is unknown.
    fn add_edge(&mut self, from: &NodeKey, to: &NodeKey) -> bool;
}

/// In-memory import graph: a directed petgraph StableGraph with O(1) key lookup.
#[derive(Debug, Default)]
pub struct ImportGraph {
    pub graph: StableGraph<GraphNode, ImportEdge, Directed>,
    /// Maps node keys to their indices.
    pub node_index: HashMap<NodeKey, NodeIndex>,
}

impl ImportGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index_of(&self, key: &NodeKey) -> Option<NodeIndex> {
        self.node_index.get(key).copied()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn file_count(&self) -> usize {
        self.graph
            .node_indices()
            .filter(|&i| !self.graph[i].is_external())
            .count()
    }

    pub fn external_count(&self) -> usize {
        self.graph
            .node_indices()
            .filter(|&i| self.graph[i].is_external())
            .count()
    }
}

#[cfg(test)]
impl ImportGraph {
    pub fn node(&self, key: &NodeKey) -> Option<&GraphNode> {
        self.index_of(key).map(|idx| &self.graph[idx])
    }

    pub fn edge(&self, from: &NodeKey, to: &NodeKey) -> Option<&ImportEdge> {
        let edge = self.graph.find_edge(self.index_of(from)?, self.index_of(to)?)?;
        self.graph.edge_weight(edge)
    }
}

impl GraphSink for ImportGraph {
    fn contains_node(&self, key: &NodeKey) -> bool {
        self.node_index.contains_key(key)
    }

    fn add_node(&mut self, node: GraphNode) {
        let key = node.key();
        if self.contains_node(&key) {
            return;
        }
        let idx = self.graph.add_node(node);
        self.node_index.insert(key, idx);
    }

    fn add_edge(&mut self, from: &NodeKey, to: &NodeKey) -> bool {
        let (Some(src), Some(dst)) = (self.index_of(from), self.index_of(to)) else {
            return false;
        };
        match self.graph.find_edge(src, dst) {
            Some(existing) => self.graph[existing].count += 1,
            None => {
                self.graph.add_edge(src, dst, ImportEdge::default());
            }
        }
        true
    }
}
