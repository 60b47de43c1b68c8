//! Weighted compressed sparse row graph used as the working representation
//! for community detection

use serde::{Deserialize, Serialize};

/// Compressed sparse representation of an undirected weighted graph.
///
/// Each undirected edge `{a, b}` with `a != b` is stored twice (once in each
/// adjacency list); a self-loop is stored once in its node's list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressedGraph {
    /// Number of nodes in the graph
    pub node_count: usize,

    /// Offset array: index where each node's edges begin
    /// offsets[i] to offsets[i+1] defines the edge range for node i
    pub offsets: Vec<u32>,

    /// Edge array: concatenated, sorted lists of neighbour nodes
    pub edges: Vec<u32>,

    /// Weight of each entry in `edges`
    pub weights: Vec<f64>,

    /// Optional mapping from internal node IDs to original string IDs
    pub node_ids: Option<Vec<String>>,
}

impl CompressedGraph {
    /// Create a new graph with pre-allocated capacity
    pub fn with_capacity(node_count: usize, edge_count: usize) -> Self {
        Self {
            node_count,
            offsets: Vec::with_capacity(node_count + 1),
            edges: Vec::with_capacity(edge_count),
            weights: Vec::with_capacity(edge_count),
            node_ids: None,
        }
    }

    fn range(&self, node: usize) -> std::ops::Range<usize> {
        self.offsets[node] as usize..self.offsets[node + 1] as usize
    }

    /// Neighbours of a node with their edge weights, ascending by neighbour
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = (u32, f64)> + '_ {
        let range = self.range(node);
        self.edges[range.clone()]
            .iter()
            .copied()
            .zip(self.weights[range].iter().copied())
    }

    /// Weight of the edge between two nodes, if present
    pub fn edge_weight(&self, src: usize, dst: u32) -> Option<f64> {
        let range = self.range(src);
        self.edges[range.clone()]
            .binary_search(&dst)
            .ok()
            .map(|pos| self.weights[range.start + pos])
    }

    /// Check if there's an edge between src and dst
    #[cfg(test)]
    pub fn has_edge(&self, src: usize, dst: u32) -> bool {
        self.edge_weight(src, dst).is_some()
    }

    /// Weight of the node's self-loop, or zero
    pub fn self_loop_weight(&self, node: usize) -> f64 {
        self.edge_weight(node, node as u32).unwrap_or(0.0)
    }

    /// Weighted degree, with self-loops contributing twice their weight
    pub fn weighted_degree(&self, node: usize) -> f64 {
        let incident: f64 = self.weights[self.range(node)].iter().sum();
        incident + self.self_loop_weight(node)
    }

    /// Total edge weight `m`, each undirected edge and self-loop counted once
    pub fn total_weight(&self) -> f64 {
        let degree_sum: f64 = (0..self.node_count).map(|n| self.weighted_degree(n)).sum();
        degree_sum / 2.0
    }

    /// Number of entries in the node's adjacency list
    pub fn degree(&self, node: usize) -> usize {
        self.range(node).len()
    }

    /// Original string ID of a node, when known
    pub fn node_id(&self, node: usize) -> Option<&str> {
        self.node_ids
            .as_ref()
            .and_then(|ids| ids.get(node))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::builder::GraphBuilder;

    #[test]
    fn degrees_count_self_loops_twice() {
        let mut builder = GraphBuilder::with_nodes(3);
        builder.add_undirected_edge(0, 1, 2.0);
        builder.add_undirected_edge(1, 2, 1.0);
        builder.add_undirected_edge(2, 2, 4.0);
        let graph = builder.build();

        assert_eq!(graph.weighted_degree(0), 2.0);
        assert_eq!(graph.weighted_degree(1), 3.0);
        assert_eq!(graph.weighted_degree(2), 9.0);
        assert_eq!(graph.total_weight(), 7.0);
        assert_eq!(graph.self_loop_weight(2), 4.0);
        assert!(graph.has_edge(1, 0));
        assert!(!graph.has_edge(0, 2));
    }
}
