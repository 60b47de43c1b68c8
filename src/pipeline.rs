//! End-to-end batch pipeline: records -> edges -> graph -> analyses

use crate::cluster::{detect_communities, CommunityDetection};
use crate::config::Config;
use crate::data::{par_aggregate_edges, EdgeList, Record};
use crate::error::Result;
use crate::graph::MentionGraph;
use crate::rank::{hits, weighted_degree_ranking, DegreeRanking, HitsScores};

/// Immutable result of graph construction: the aggregated edges and both
/// graph views built from them
#[derive(Debug, Clone)]
pub struct MentionNetwork {
    record_count: usize,
    edges: EdgeList,
    graph: MentionGraph,
}

impl MentionNetwork {
    /// Extract, aggregate and build in one pass over the records
    pub fn from_records(records: &[Record], config: &Config) -> Self {
        log::info!("Extracting mentions from {} records", records.len());
        let edges = par_aggregate_edges(records);
        log::info!(
            "Aggregated {} mentions into {} weighted edges",
            edges.total_weight(),
            edges.len()
        );

        let mut network = Self::from_edges(edges, config);
        network.record_count = records.len();
        network
    }

    /// Build both graph views from an existing edge list
    pub fn from_edges(edges: EdgeList, config: &Config) -> Self {
        let graph = MentionGraph::from_edges(&edges, config.self_loops, config.reciprocal);
        Self {
            record_count: 0,
            edges,
            graph,
        }
    }

    /// Number of input records, zero when built from edges directly
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn edges(&self) -> &EdgeList {
        &self.edges
    }

    pub fn graph(&self) -> &MentionGraph {
        &self.graph
    }
}

/// Every analysis computed for one network
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub communities: CommunityDetection,
    pub degree: DegreeRanking,
    pub hits: HitsScores,
}

/// Run community detection and both influence rankings
pub fn analyze(network: &MentionNetwork, config: &Config) -> Result<AnalysisReport> {
    let graph = network.graph();

    let communities = detect_communities(graph, &config.louvain)?;
    log::info!("Number of communities: {}", communities.num_communities());
    log::info!("Modularity: {:.4}", communities.modularity);

    let degree = weighted_degree_ranking(graph)?;
    let scores = hits(graph, &config.hits)?;

    Ok(AnalysisReport {
        communities,
        degree,
        hits: scores,
    })
}
