//! Graph algorithms for distribution metrics

use crate::graph::MentionGraph;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rayon::prelude::*;
use std::collections::{BTreeMap, VecDeque};

/// Count nodes by total (in + out) arc degree
pub fn degree_distribution(graph: &MentionGraph) -> BTreeMap<usize, usize> {
    let mut distribution = BTreeMap::new();
    for idx in graph.directed().node_indices() {
        *distribution.entry(graph.total_degree(idx)).or_insert(0) += 1;
    }
    distribution
}

/// Number of reciprocated pairs: users who mentioned each other
pub fn count_reciprocal_pairs(graph: &MentionGraph) -> usize {
    let directed = graph.directed();
    directed
        .edge_references()
        .filter(|e| e.source() < e.target())
        .filter(|e| directed.find_edge(e.target(), e.source()).is_some())
        .count()
}

/// Frequency of shortest path lengths over all reachable ordered pairs,
/// following mention direction. Every node reaches itself at length 0.
pub fn path_length_distribution(graph: &MentionGraph) -> BTreeMap<usize, usize> {
    log::info!(
        "Computing shortest path lengths from {} sources",
        graph.node_count()
    );

    let directed = graph.directed();
    let node_count = graph.node_count();

    (0..node_count)
        .into_par_iter()
        .map(|source| {
            let mut local: BTreeMap<usize, usize> = BTreeMap::new();
            let mut dist = vec![usize::MAX; node_count];
            let mut queue = VecDeque::new();

            dist[source] = 0;
            queue.push_back(NodeIndex::new(source));

            while let Some(node) = queue.pop_front() {
                let d = dist[node.index()];
                *local.entry(d).or_insert(0) += 1;

                for next in directed.neighbors_directed(node, Direction::Outgoing) {
                    if dist[next.index()] == usize::MAX {
                        dist[next.index()] = d + 1;
                        queue.push_back(next);
                    }
                }
            }

            local
        })
        .reduce(BTreeMap::new, |mut left, right| {
            for (length, count) in right {
                *left.entry(length).or_insert(0) += count;
            }
            left
        })
}
