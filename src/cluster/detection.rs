//! Louvain community detection

use crate::cluster::metrics::{describe_communities, modularity_of};
use crate::cluster::{CommunityDetection, Partition};
use crate::config::{LouvainConfig, VisitOrder};
use crate::error::{AnalysisError, Result};
use crate::graph::builder::GraphBuilder;
use crate::graph::{CompressedGraph, MentionGraph};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;

/// Smallest accepted move score difference, relative to the node's degree
const MOVE_EPSILON: f64 = 1e-12;

/// Partition the undirected view of `graph` by greedy modularity optimization.
///
/// Each pass runs local moving to a fixed point and then contracts every
/// community into a super-node. Passes stop when local moving no longer
/// improves modularity or `max_passes` is reached. Community ids in the
/// result are numbered by first appearance in ascending user id order.
pub fn detect_communities(graph: &MentionGraph, config: &LouvainConfig) -> Result<CommunityDetection> {
    if graph.is_empty() {
        return Err(AnalysisError::EmptyGraph {
            operation: "community detection",
        });
    }

    let base = graph.to_compressed();
    let m = base.total_weight();
    if m <= 0.0 {
        return Err(AnalysisError::EmptyGraph {
            operation: "community detection",
        });
    }

    log::info!(
        "Detecting communities on {} nodes (total weight {})",
        base.node_count,
        m
    );

    // node_community[i] = super-node holding original node i at the current level
    let mut node_community: Vec<usize> = (0..base.node_count).collect();
    let mut level_graph = base.clone();
    let mut levels = 0;

    for pass in 0..config.max_passes {
        let order = visit_order(level_graph.node_count, config.order, pass);
        let Some(assignment) = local_moving(&level_graph, &order, m, config) else {
            log::debug!("Pass {}: no improving move, stopping", pass);
            break;
        };

        let (renumbered, community_count) = renumber(&assignment);
        for community in node_community.iter_mut() {
            *community = renumbered[*community];
        }
        levels += 1;

        log::debug!(
            "Pass {}: {} nodes -> {} communities",
            pass,
            level_graph.node_count,
            community_count
        );

        level_graph = aggregate(&level_graph, &renumbered, community_count);
    }

    let (assignment, community_count) = renumber(&node_community);
    let modularity = modularity_of(&base, &assignment)?;

    let assignments: BTreeMap<String, usize> = graph
        .node_ids()
        .zip(&assignment)
        .map(|(id, &community)| (id.to_string(), community))
        .collect();
    let partition = Partition::from_assignments(assignments)?;
    let communities = describe_communities(&base, &assignment);

    log::info!(
        "Found {} communities over {} levels, modularity {:.4}",
        community_count,
        levels,
        modularity
    );

    Ok(CommunityDetection {
        partition,
        modularity,
        communities,
        levels,
    })
}

/// Node visitation order for one pass
fn visit_order(node_count: usize, order: VisitOrder, pass: usize) -> Vec<usize> {
    let mut nodes: Vec<usize> = (0..node_count).collect();
    if let VisitOrder::Seeded(seed) = order {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(pass as u64));
        nodes.shuffle(&mut rng);
    }
    nodes
}

/// Move nodes between neighbouring communities, each node to the community
/// with the largest positive gain. Sweeps repeat until one moves nothing or
/// its total modularity gain is below `min_gain`. Returns `None` if nothing
/// moved.
///
/// `m` is the total edge weight of the original graph, preserved by
/// aggregation.
fn local_moving(
    graph: &CompressedGraph,
    order: &[usize],
    m: f64,
    config: &LouvainConfig,
) -> Option<Vec<usize>> {
    let n = graph.node_count;
    let two_m = 2.0 * m;
    let degrees: Vec<f64> = (0..n).map(|node| graph.weighted_degree(node)).collect();

    let mut community: Vec<usize> = (0..n).collect();
    let mut totals = degrees.clone();
    let mut improved = false;

    for sweep in 0..config.max_sweeps {
        let mut moves = 0;
        let mut sweep_gain = 0.0;

        for &node in order {
            let current = community[node];
            let k_i = degrees[node];

            // Ordered by community id so equal gains resolve to the lowest id
            let mut links: BTreeMap<usize, f64> = BTreeMap::new();
            for (neighbor, weight) in graph.neighbors(node) {
                let neighbor = neighbor as usize;
                if neighbor != node {
                    *links.entry(community[neighbor]).or_insert(0.0) += weight;
                }
            }

            totals[current] -= k_i;

            let score = |c: usize, link: f64| link - totals[c] * k_i / two_m;
            let stay = score(current, links.get(&current).copied().unwrap_or(0.0));

            let mut best = current;
            let mut best_score = stay;
            for (&candidate, &link) in &links {
                let candidate_score = score(candidate, link);
                if candidate_score > best_score {
                    best = candidate;
                    best_score = candidate_score;
                }
            }

            // Relative epsilon keeps float noise from cycling a node between
            // equivalent communities, whatever the edge weight scale
            if best != current && best_score - stay <= MOVE_EPSILON * k_i {
                best = current;
            }

            totals[best] += k_i;
            if best != current {
                community[node] = best;
                moves += 1;
                sweep_gain += (best_score - stay) / m;
            }
        }

        log::debug!("Sweep {}: {} moves, gain {:.3e}", sweep, moves, sweep_gain);

        if moves == 0 {
            break;
        }
        improved = true;

        if sweep_gain < config.min_gain {
            break;
        }

        if sweep + 1 == config.max_sweeps {
            log::warn!(
                "Local moving stopped at the sweep limit ({})",
                config.max_sweeps
            );
        }
    }

    improved.then_some(community)
}

/// Renumber community labels to `0..k` by first appearance
fn renumber(labels: &[usize]) -> (Vec<usize>, usize) {
    let mut mapping: Vec<Option<usize>> = vec![None; labels.len().max(1)];
    let mut next = 0;
    let renumbered = labels
        .iter()
        .map(|&label| {
            *mapping[label].get_or_insert_with(|| {
                let id = next;
                next += 1;
                id
            })
        })
        .collect();
    (renumbered, next)
}

/// Contract each community into one super-node. Inter-community weights are
/// summed; intra-community weight becomes the super-node's self-loop.
fn aggregate(graph: &CompressedGraph, assignment: &[usize], community_count: usize) -> CompressedGraph {
    let mut builder = GraphBuilder::with_nodes(community_count);
    for node in 0..graph.node_count {
        let a = assignment[node] as u32;
        for (neighbor, weight) in graph.neighbors(node) {
            let neighbor = neighbor as usize;
            // Non-loop edges appear in both lists; take each once
            if neighbor < node {
                continue;
            }
            builder.add_undirected_edge(a, assignment[neighbor] as u32, weight);
        }
    }
    builder.build()
}
