//! Community quality metrics

use crate::cluster::{Community, Partition};
use crate::error::{AnalysisError, Result};
use crate::graph::{CompressedGraph, MentionGraph};
use std::cmp::Ordering;

/// Number of central members reported per community
const CENTRAL_MEMBERS: usize = 5;

/// Modularity of `partition` on the undirected view of `graph`.
///
/// Fails with `InvalidState` when the partition does not assign exactly the
/// graph's nodes, and with `EmptyGraph` when the graph carries no edge weight.
pub fn modularity(graph: &MentionGraph, partition: &Partition) -> Result<f64> {
    let assignment = node_assignment(graph, partition)?;
    let csr = graph.to_compressed();
    modularity_of(&csr, &assignment)
}

/// Resolve a partition into a per-node community vector in node index order
pub fn node_assignment(graph: &MentionGraph, partition: &Partition) -> Result<Vec<usize>> {
    if partition.len() != graph.node_count() {
        return Err(AnalysisError::InvalidState(format!(
            "partition assigns {} nodes but the graph has {}",
            partition.len(),
            graph.node_count()
        )));
    }

    graph
        .node_ids()
        .map(|id| {
            partition.community_of(id).ok_or_else(|| {
                AnalysisError::InvalidState(format!("node '{}' has no community", id))
            })
        })
        .collect()
}

/// Modularity `Q = sum_c [ in_c / m - (tot_c / 2m)^2 ]` on a weighted CSR graph
pub fn modularity_of(graph: &CompressedGraph, assignment: &[usize]) -> Result<f64> {
    if graph.node_count == 0 {
        return Err(AnalysisError::EmptyGraph {
            operation: "modularity",
        });
    }

    let m = graph.total_weight();
    if m <= 0.0 {
        return Err(AnalysisError::EmptyGraph {
            operation: "modularity",
        });
    }

    let community_count = assignment.iter().max().map_or(0, |&c| c + 1);
    let mut internal = vec![0.0; community_count];
    let mut total = vec![0.0; community_count];

    for node in 0..graph.node_count {
        let community = assignment[node];
        total[community] += graph.weighted_degree(node);

        for (neighbor, weight) in graph.neighbors(node) {
            let neighbor = neighbor as usize;
            if assignment[neighbor] != community {
                continue;
            }
            // Non-loop edges are visited from both ends
            internal[community] += if neighbor == node { weight } else { weight / 2.0 };
        }
    }

    let q = internal
        .iter()
        .zip(&total)
        .map(|(&inc, &tot)| inc / m - (tot / (2.0 * m)).powi(2))
        .sum();

    Ok(q)
}

/// Calculate density (internal edges / potential edges), self-loops excluded
pub fn calculate_density(graph: &CompressedGraph, members: &[u32]) -> f64 {
    let n = members.len();
    if n <= 1 {
        return 1.0; // By convention, singleton communities have density 1
    }

    let potential_edges = n * (n - 1) / 2;

    let mut actual_edges = 0usize;
    for &node in members {
        actual_edges += graph
            .neighbors(node as usize)
            .filter(|&(neighbor, _)| neighbor > node && members.binary_search(&neighbor).is_ok())
            .count();
    }

    actual_edges as f64 / potential_edges as f64
}

/// Describe every community of a node-index assignment, largest first
pub fn describe_communities(graph: &CompressedGraph, assignment: &[usize]) -> Vec<Community> {
    let community_count = assignment.iter().max().map_or(0, |&c| c + 1);
    let mut members: Vec<Vec<u32>> = vec![Vec::new(); community_count];
    for (node, &community) in assignment.iter().enumerate() {
        members[community].push(node as u32);
    }

    let mut communities: Vec<Community> = members
        .into_iter()
        .enumerate()
        .map(|(id, nodes)| {
            let mut internal_weight = 0.0;
            let mut strengths: Vec<(u32, f64)> = Vec::with_capacity(nodes.len());

            for &node in &nodes {
                let mut strength = 0.0;
                for (neighbor, weight) in graph.neighbors(node as usize) {
                    if assignment[neighbor as usize] != id {
                        continue;
                    }
                    if neighbor == node {
                        internal_weight += weight;
                        strength += 2.0 * weight;
                    } else {
                        internal_weight += weight / 2.0;
                        strength += weight;
                    }
                }
                strengths.push((node, strength));
            }

            strengths.sort_by(|a, b| match b.1.partial_cmp(&a.1) {
                Some(Ordering::Equal) | None => a.0.cmp(&b.0),
                Some(order) => order,
            });

            let label = |node: u32| {
                graph
                    .node_id(node as usize)
                    .map_or_else(|| node.to_string(), str::to_string)
            };

            Community {
                id,
                size: nodes.len(),
                density: calculate_density(graph, &nodes),
                internal_weight,
                central_members: strengths
                    .iter()
                    .take(CENTRAL_MEMBERS)
                    .map(|&(node, _)| label(node))
                    .collect(),
                members: {
                    let mut ids: Vec<String> = nodes.iter().map(|&n| label(n)).collect();
                    ids.sort();
                    ids
                },
            }
        })
        .collect();

    communities.sort_by(|a, b| b.size.cmp(&a.size).then(a.id.cmp(&b.id)));
    communities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::GraphBuilder;

    fn two_triangles() -> CompressedGraph {
        let mut builder = GraphBuilder::with_capacity(6);
        for (a, b) in [("a", "b"), ("b", "c"), ("a", "c"), ("d", "e"), ("e", "f"), ("d", "f")] {
            builder.add_edge(a, b, 1.0);
        }
        builder.build()
    }

    #[test]
    fn triangles_split_has_known_modularity() {
        let graph = two_triangles();
        let q = modularity_of(&graph, &[0, 0, 0, 1, 1, 1]).expect("modularity");
        // each community: in = 3, tot = 6, m = 6 -> 2 * (0.5 - 0.25)
        assert!((q - 0.5).abs() < 1e-12);
    }

    #[test]
    fn single_community_has_zero_modularity() {
        let graph = two_triangles();
        let q = modularity_of(&graph, &[0; 6]).expect("modularity");
        assert!(q.abs() < 1e-12);
    }

    #[test]
    fn edgeless_graph_is_rejected() {
        let graph = GraphBuilder::with_nodes(2).build();
        assert!(matches!(
            modularity_of(&graph, &[0, 1]),
            Err(AnalysisError::EmptyGraph { .. })
        ));
    }

    #[test]
    fn density_of_full_triangle_is_one() {
        let graph = two_triangles();
        assert_eq!(calculate_density(&graph, &[0, 1, 2]), 1.0);
        assert!((calculate_density(&graph, &[0, 1, 2, 3]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn communities_are_described_largest_first() {
        let graph = two_triangles();
        let communities = describe_communities(&graph, &[1, 1, 1, 0, 0, 2]);

        assert_eq!(communities.len(), 3);
        assert_eq!(communities[0].id, 1);
        assert_eq!(communities[0].members, vec!["a", "b", "c"]);
        assert_eq!(communities[0].internal_weight, 3.0);
        assert_eq!(communities[1].id, 0);
        assert_eq!(communities[1].size, 2);
        assert_eq!(communities[2].members, vec!["f"]);
        assert_eq!(communities[2].density, 1.0);
    }
}
