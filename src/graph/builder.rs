//! Graph construction module

use crate::graph::CompressedGraph;
use std::collections::HashMap;

/// Builder for incrementally constructing an undirected `CompressedGraph`
pub struct GraphBuilder {
    /// Number of nodes
    node_count: usize,

    /// Mapping from string IDs to node indices
    id_to_index: HashMap<String, u32>,

    /// Node string IDs, empty when nodes are added by index
    node_ids: Vec<String>,

    /// Adjacency lists for each node, duplicates merged on build
    adjacency_lists: Vec<Vec<(u32, f64)>>,
}

impl GraphBuilder {
    /// Create a new graph builder with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            node_count: 0,
            id_to_index: HashMap::with_capacity(capacity),
            node_ids: Vec::with_capacity(capacity),
            adjacency_lists: Vec::with_capacity(capacity),
        }
    }

    /// Create a builder for `node_count` anonymous nodes addressed by index
    pub fn with_nodes(node_count: usize) -> Self {
        Self {
            node_count,
            id_to_index: HashMap::new(),
            node_ids: Vec::new(),
            adjacency_lists: vec![Vec::new(); node_count],
        }
    }

    /// Get or create a node ID for the given string ID
    pub fn get_or_create_node(&mut self, id: &str) -> u32 {
        if let Some(&idx) = self.id_to_index.get(id) {
            return idx;
        }

        let idx = self.node_count as u32;
        self.id_to_index.insert(id.to_string(), idx);
        self.node_ids.push(id.to_string());
        self.adjacency_lists.push(Vec::new());
        self.node_count += 1;

        idx
    }

    /// Add weight to the undirected edge between two string IDs
    #[cfg(test)]
    pub fn add_edge(&mut self, a_id: &str, b_id: &str, weight: f64) {
        let a = self.get_or_create_node(a_id);
        let b = self.get_or_create_node(b_id);
        self.add_undirected_edge(a, b, weight);
    }

    /// Add weight to the undirected edge between two node indices
    pub fn add_undirected_edge(&mut self, a: u32, b: u32, weight: f64) {
        self.adjacency_lists[a as usize].push((b, weight));
        if a != b {
            self.adjacency_lists[b as usize].push((a, weight));
        }
    }

    /// Build the compressed graph
    pub fn build(self) -> CompressedGraph {
        let edge_count: usize = self.adjacency_lists.iter().map(Vec::len).sum();
        let mut graph = CompressedGraph::with_capacity(self.node_count, edge_count);

        graph.offsets.push(0);
        for mut list in self.adjacency_lists {
            let start = graph.edges.len();
            // Sort for binary search, then fold parallel entries together
            list.sort_unstable_by_key(|&(target, _)| target);
            for (target, weight) in list {
                if graph.edges.len() > start && graph.edges.last() == Some(&target) {
                    if let Some(last) = graph.weights.last_mut() {
                        *last += weight;
                    }
                } else {
                    graph.edges.push(target);
                    graph.weights.push(weight);
                }
            }
            graph.offsets.push(graph.edges.len() as u32);
        }

        if !self.node_ids.is_empty() {
            graph.node_ids = Some(self.node_ids);
        }

        graph
    }
}
