//! Directed and undirected views of the mention graph

use crate::config::{ReciprocalPolicy, SelfLoopPolicy};
use crate::data::EdgeList;
use crate::graph::builder::GraphBuilder;
use crate::graph::CompressedGraph;
use petgraph::graph::{DiGraph, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeMap, HashMap};

/// Immutable mention graph with a directed and an undirected view.
///
/// Both views share the same node set and node indices; index `i` is the
/// `i`-th smallest user id.
#[derive(Debug, Clone)]
pub struct MentionGraph {
    directed: DiGraph<String, u64>,
    undirected: UnGraph<String, u64>,
    index: HashMap<String, NodeIndex>,
}

impl MentionGraph {
    /// Materialize both views from an aggregated edge list
    pub fn from_edges(
        edges: &EdgeList,
        self_loops: SelfLoopPolicy,
        reciprocal: ReciprocalPolicy,
    ) -> Self {
        let nodes = edges.nodes();
        let mut directed = DiGraph::with_capacity(nodes.len(), edges.len());
        let mut undirected = UnGraph::with_capacity(nodes.len(), edges.len());
        let mut index = HashMap::with_capacity(nodes.len());

        for id in nodes {
            let idx = directed.add_node(id.to_string());
            undirected.add_node(id.to_string());
            index.insert(id.to_string(), idx);
        }

        let mut pairs: BTreeMap<(NodeIndex, NodeIndex), u64> = BTreeMap::new();
        let mut dropped = 0usize;

        for edge in edges {
            let src = index[&edge.source];
            let dst = index[&edge.target];

            if src == dst && self_loops == SelfLoopPolicy::Drop {
                dropped += 1;
                continue;
            }

            directed.add_edge(src, dst, edge.weight);

            let key = if src <= dst { (src, dst) } else { (dst, src) };
            pairs
                .entry(key)
                .and_modify(|w| {
                    *w = match reciprocal {
                        ReciprocalPolicy::Sum => *w + edge.weight,
                        ReciprocalPolicy::Max => (*w).max(edge.weight),
                    }
                })
                .or_insert(edge.weight);
        }

        for ((a, b), weight) in pairs {
            undirected.add_edge(a, b, weight);
        }

        if dropped > 0 {
            log::debug!("Dropped {} self-mention edges", dropped);
        }
        log::info!(
            "Built mention graph: {} nodes, {} directed arcs, {} undirected edges",
            directed.node_count(),
            directed.edge_count(),
            undirected.edge_count()
        );

        Self {
            directed,
            undirected,
            index,
        }
    }

    pub fn directed(&self) -> &DiGraph<String, u64> {
        &self.directed
    }

    pub fn undirected(&self) -> &UnGraph<String, u64> {
        &self.undirected
    }

    pub fn node_count(&self) -> usize {
        self.directed.node_count()
    }

    /// Number of directed arcs
    pub fn edge_count(&self) -> usize {
        self.directed.edge_count()
    }

    /// Number of undirected edges after collapsing direction
    pub fn undirected_edge_count(&self) -> usize {
        self.undirected.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    /// User ids in node index order (ascending)
    pub fn node_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.directed.node_weights().map(String::as_str)
    }

    pub fn node_id(&self, idx: NodeIndex) -> &str {
        &self.directed[idx]
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// Directed arcs as `(source, target, weight)`, in insertion order
    pub fn arcs(&self) -> impl Iterator<Item = (&str, &str, u64)> + '_ {
        self.directed.edge_references().map(|e| {
            (
                self.node_id(e.source()),
                self.node_id(e.target()),
                *e.weight(),
            )
        })
    }

    /// Weight of the directed arc `source -> target`
    pub fn weight(&self, source: &str, target: &str) -> Option<u64> {
        let a = self.index_of(source)?;
        let b = self.index_of(target)?;
        self.directed
            .find_edge(a, b)
            .map(|e| self.directed[e])
    }

    /// Weight of the undirected edge `{a, b}`
    pub fn undirected_weight(&self, a: &str, b: &str) -> Option<u64> {
        let a = self.index_of(a)?;
        let b = self.index_of(b)?;
        self.undirected
            .find_edge(a, b)
            .map(|e| self.undirected[e])
    }

    /// Sum of incoming arc weights
    pub fn in_weight(&self, idx: NodeIndex) -> u64 {
        self.directed
            .edges_directed(idx, Direction::Incoming)
            .map(|e| *e.weight())
            .sum()
    }

    /// Sum of outgoing arc weights
    pub fn out_weight(&self, idx: NodeIndex) -> u64 {
        self.directed
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| *e.weight())
            .sum()
    }

    /// Number of incoming plus outgoing arcs; a self-loop counts twice
    pub fn total_degree(&self, idx: NodeIndex) -> usize {
        self.directed
            .edges_directed(idx, Direction::Incoming)
            .count()
            + self
                .directed
                .edges_directed(idx, Direction::Outgoing)
                .count()
    }

    /// Convert the undirected view into the weighted CSR used by the
    /// community detector. Node `i` of the result is `NodeIndex(i)`.
    pub fn to_compressed(&self) -> CompressedGraph {
        let mut builder = GraphBuilder::with_capacity(self.node_count());
        for id in self.node_ids() {
            builder.get_or_create_node(id);
        }
        for edge in self.undirected.edge_references() {
            builder.add_undirected_edge(
                edge.source().index() as u32,
                edge.target().index() as u32,
                *edge.weight() as f64,
            );
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{aggregate_edges, extract_mentions, Record};

    fn graph_from(
        rows: &[(&str, &str)],
        self_loops: SelfLoopPolicy,
        reciprocal: ReciprocalPolicy,
    ) -> MentionGraph {
        let records: Vec<Record> = rows.iter().map(|(a, t)| Record::new(*a, *t)).collect();
        let edges = aggregate_edges(extract_mentions(&records));
        MentionGraph::from_edges(&edges, self_loops, reciprocal)
    }

    #[test]
    fn reciprocal_weights_are_summed_by_default() {
        let graph = graph_from(
            &[("alice", "@bob @bob"), ("bob", "@alice")],
            SelfLoopPolicy::Keep,
            ReciprocalPolicy::Sum,
        );

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.undirected_edge_count(), 1);
        assert_eq!(graph.weight("alice", "bob"), Some(2));
        assert_eq!(graph.weight("bob", "alice"), Some(1));
        assert_eq!(graph.undirected_weight("alice", "bob"), Some(3));
        assert_eq!(graph.undirected_weight("bob", "alice"), Some(3));
    }

    #[test]
    fn reciprocal_max_policy_keeps_larger_direction() {
        let graph = graph_from(
            &[("alice", "@bob @bob"), ("bob", "@alice")],
            SelfLoopPolicy::Keep,
            ReciprocalPolicy::Max,
        );

        assert_eq!(graph.undirected_weight("alice", "bob"), Some(2));
        assert_eq!(graph.weight("alice", "bob"), Some(2));
    }

    #[test]
    fn self_loops_follow_policy_in_both_views() {
        let rows = [("alice", "@alice @bob")];

        let kept = graph_from(&rows, SelfLoopPolicy::Keep, ReciprocalPolicy::Sum);
        assert_eq!(kept.weight("alice", "alice"), Some(1));
        assert_eq!(kept.undirected_weight("alice", "alice"), Some(1));

        let dropped = graph_from(&rows, SelfLoopPolicy::Drop, ReciprocalPolicy::Sum);
        assert_eq!(dropped.node_count(), 2);
        assert_eq!(dropped.weight("alice", "alice"), None);
        assert_eq!(dropped.undirected_weight("alice", "alice"), None);
        assert_eq!(dropped.edge_count(), 1);
    }

    #[test]
    fn node_indices_follow_ascending_ids() {
        let graph = graph_from(
            &[("zed", "@amy"), ("bob", "@zed")],
            SelfLoopPolicy::Keep,
            ReciprocalPolicy::Sum,
        );
        let ids: Vec<_> = graph.node_ids().collect();
        assert_eq!(ids, vec!["amy", "bob", "zed"]);
        assert_eq!(graph.index_of("bob"), Some(NodeIndex::new(1)));
    }

    #[test]
    fn in_and_out_weights() {
        let graph = graph_from(
            &[("alice", "@bob"), ("alice", "@bob"), ("carol", "@bob")],
            SelfLoopPolicy::Keep,
            ReciprocalPolicy::Sum,
        );
        let bob = graph.index_of("bob").expect("bob");
        let alice = graph.index_of("alice").expect("alice");

        assert_eq!(graph.in_weight(bob), 3);
        assert_eq!(graph.out_weight(alice), 2);
        assert_eq!(graph.total_degree(bob), 2);
    }

    #[test]
    fn compressed_view_matches_undirected_weights() {
        let graph = graph_from(
            &[("a", "@b @c"), ("b", "@a"), ("c", "@c")],
            SelfLoopPolicy::Keep,
            ReciprocalPolicy::Sum,
        );
        let csr = graph.to_compressed();

        assert_eq!(csr.node_count, 3);
        assert_eq!(csr.edge_weight(0, 1), Some(2.0));
        assert_eq!(csr.edge_weight(2, 0), Some(1.0));
        assert_eq!(csr.self_loop_weight(2), 1.0);
        assert_eq!(csr.total_weight(), 4.0);
        assert_eq!(csr.node_id(2), Some("c"));
    }
}
