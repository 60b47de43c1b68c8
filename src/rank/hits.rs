//! HITS (Hyperlink-Induced Topic Search) hub and authority scores.
//!
//! Iterative power method (Kleinberg, 1999) on the directed mention graph:
//!
//! 1. Initialize all hub and authority scores to 1.0.
//! 2. Authority update: `auth(v) = sum of hub(u) for all u -> v`.
//! 3. Hub update: `hub(v) = sum of auth(w) for all v -> w`.
//! 4. Normalize both vectors to unit L2 norm.
//! 5. Repeat until the summed L1 change of both vectors is below the
//!    tolerance, or the iteration cap is reached.
//!
//! Arcs count once regardless of mention weight. A graph with nodes but no
//! arcs yields all-zero vectors and is reported as converged.

use crate::config::{ConvergencePolicy, HitsConfig};
use crate::error::{AnalysisError, Result};
use crate::graph::MentionGraph;
use crate::rank::Ranking;
use ndarray::Array1;
use petgraph::Direction;

/// Hub and authority vectors, indexed like the graph's nodes
#[derive(Debug, Clone, PartialEq)]
pub struct HitsScores {
    /// User ids in node index order (ascending)
    pub node_ids: Vec<String>,
    pub hubs: Array1<f64>,
    pub authorities: Array1<f64>,
    /// Number of iterations performed
    pub iterations: usize,
    /// Whether the tolerance was met within the cap
    pub converged: bool,
    /// Change measured on the last iteration
    pub delta: f64,
}

impl HitsScores {
    fn position(&self, user: &str) -> Option<usize> {
        self.node_ids
            .binary_search_by(|id| id.as_str().cmp(user))
            .ok()
    }

    pub fn hub(&self, user: &str) -> Option<f64> {
        self.position(user).map(|i| self.hubs[i])
    }

    pub fn authority(&self, user: &str) -> Option<f64> {
        self.position(user).map(|i| self.authorities[i])
    }

    pub fn hub_ranking(&self) -> Ranking {
        Ranking::from_scores(self.node_ids.iter().cloned().zip(self.hubs.iter().copied()))
    }

    pub fn authority_ranking(&self) -> Ranking {
        Ranking::from_scores(
            self.node_ids
                .iter()
                .cloned()
                .zip(self.authorities.iter().copied()),
        )
    }
}

/// Compute HITS hub and authority scores on the directed view.
///
/// Under `ConvergencePolicy::Strict`, reaching `max_iterations` without
/// meeting the tolerance is an error; under `BestEffort` the last iterate is
/// returned with `converged == false`.
pub fn hits(graph: &MentionGraph, config: &HitsConfig) -> Result<HitsScores> {
    let n = graph.node_count();
    if n == 0 {
        return Err(AnalysisError::EmptyGraph { operation: "HITS" });
    }

    let node_ids: Vec<String> = graph.node_ids().map(str::to_string).collect();

    if graph.edge_count() == 0 {
        log::warn!("Graph has no arcs; hub and authority scores are all zero");
        return Ok(HitsScores {
            node_ids,
            hubs: Array1::zeros(n),
            authorities: Array1::zeros(n),
            iterations: 0,
            converged: true,
            delta: 0.0,
        });
    }

    let directed = graph.directed();
    let neighbors = |direction: Direction| -> Vec<Vec<usize>> {
        directed
            .node_indices()
            .map(|v| {
                directed
                    .neighbors_directed(v, direction)
                    .map(|u| u.index())
                    .collect()
            })
            .collect()
    };
    let incoming = neighbors(Direction::Incoming);
    let outgoing = neighbors(Direction::Outgoing);

    let mut hub: Array1<f64> = Array1::ones(n);
    let mut auth: Array1<f64> = Array1::ones(n);
    let mut converged = false;
    let mut iterations = 0;
    let mut delta = f64::INFINITY;

    for iter in 0..config.max_iterations {
        iterations = iter + 1;

        let mut new_auth: Array1<f64> = incoming
            .iter()
            .map(|sources| sources.iter().map(|&u| hub[u]).sum::<f64>())
            .collect();
        normalize_l2(&mut new_auth);

        let mut new_hub: Array1<f64> = outgoing
            .iter()
            .map(|targets| targets.iter().map(|&w| new_auth[w]).sum::<f64>())
            .collect();
        normalize_l2(&mut new_hub);

        delta = (&new_hub - &hub).mapv(f64::abs).sum() + (&new_auth - &auth).mapv(f64::abs).sum();

        hub = new_hub;
        auth = new_auth;

        if delta < config.tolerance {
            converged = true;
            break;
        }
    }

    if !converged {
        match config.policy {
            ConvergencePolicy::Strict => {
                return Err(AnalysisError::Convergence {
                    iterations,
                    delta,
                    tolerance: config.tolerance,
                });
            }
            ConvergencePolicy::BestEffort => log::warn!(
                "HITS did not converge after {} iterations (delta {:.3e}); keeping last iterate",
                iterations,
                delta
            ),
        }
    } else {
        log::info!("HITS converged after {} iterations", iterations);
    }

    Ok(HitsScores {
        node_ids,
        hubs: hub,
        authorities: auth,
        iterations,
        converged,
        delta,
    })
}

/// Normalize a vector to unit L2 norm. If the norm is zero, leave as-is.
fn normalize_l2(v: &mut Array1<f64>) {
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        v.mapv_inplace(|x| x / norm);
    }
}
