//! Results persistence module

use crate::error::Result;
use crate::graph::algorithms::count_reciprocal_pairs;
use crate::pipeline::{AnalysisReport, MentionNetwork};
use crate::rank::RankingEntry;
use serde_json::{json, to_string_pretty};
use statrs::statistics::Statistics;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Save analysis results to the specified directory
pub fn save_results(
    network: &MentionNetwork,
    report: &AnalysisReport,
    top_n: usize,
    output_dir: &str,
) -> Result<()> {
    log::info!(
        "Saving {} communities to {}",
        report.communities.num_communities(),
        output_dir
    );

    fs::create_dir_all(output_dir)?;

    save_summary(network, report, output_dir)?;
    save_communities(report, output_dir)?;
    save_rankings(report, top_n, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

/// Save summary information
fn save_summary(network: &MentionNetwork, report: &AnalysisReport, output_dir: &str) -> Result<()> {
    log::info!("Saving summary information");

    let path = Path::new(output_dir).join("summary.json");
    let mut file = File::create(path)?;

    let graph = network.graph();
    let node_count = graph.node_count();
    let communities = &report.communities.communities;
    let sizes: Vec<f64> = communities.iter().map(|c| c.size as f64).collect();
    let densities: Vec<f64> = communities.iter().map(|c| c.density).collect();

    let summary = json!({
        "graph_stats": {
            "record_count": network.record_count(),
            "mention_count": network.edges().total_weight(),
            "node_count": node_count,
            "edge_count": graph.edge_count(),
            "undirected_edge_count": graph.undirected_edge_count(),
            "reciprocal_pairs": count_reciprocal_pairs(graph),
            "avg_degree": graph.edge_count() as f64 / node_count.max(1) as f64,
        },
        "community_stats": {
            "num_communities": report.communities.num_communities(),
            "modularity": report.communities.modularity,
            "levels": report.communities.levels,
            "largest_community_size": communities.first().map_or(0, |c| c.size),
            "smallest_community_size": communities.last().map_or(0, |c| c.size),
            "mean_community_size": sizes.iter().mean(),
            "std_dev_community_size": std_dev_or_zero(&sizes),
            "avg_density": densities.iter().mean(),
        },
        "hits": {
            "iterations": report.hits.iterations,
            "converged": report.hits.converged,
            "delta": report.hits.delta,
        }
    });

    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}

/// Sample standard deviation; zero when fewer than two values exist
fn std_dev_or_zero(values: &[f64]) -> f64 {
    if values.len() < 2 {
        0.0
    } else {
        values.iter().std_dev()
    }
}

/// Save every community with its members and central members
fn save_communities(report: &AnalysisReport, output_dir: &str) -> Result<()> {
    log::info!("Saving community information");

    let path = Path::new(output_dir).join("communities.json");
    let mut file = File::create(path)?;

    let communities_json = json!({
        "modularity": report.communities.modularity,
        "num_communities": report.communities.num_communities(),
        "communities": report.communities.communities,
    });

    file.write_all(to_string_pretty(&communities_json)?.as_bytes())?;

    Ok(())
}

/// Save top-N authority and hub rankings, by weighted degree and by HITS
fn save_rankings(report: &AnalysisReport, top_n: usize, output_dir: &str) -> Result<()> {
    log::info!("Saving top {} rankings", top_n);

    let path = Path::new(output_dir).join("rankings.json");
    let mut file = File::create(path)?;

    let hits_authorities = report.hits.authority_ranking();
    let hits_hubs = report.hits.hub_ranking();
    let top = |entries: &[RankingEntry]| entries.to_vec();

    let rankings = json!({
        "weighted_degree": {
            "authorities": top(report.degree.authorities.top(top_n)),
            "hubs": top(report.degree.hubs.top(top_n)),
        },
        "hits": {
            "authorities": top(hits_authorities.top(top_n)),
            "hubs": top(hits_hubs.top(top_n)),
        }
    });

    file.write_all(to_string_pretty(&rankings)?.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::data::Record;
    use crate::pipeline::analyze;

    #[test]
    fn writes_summary_communities_and_rankings() {
        let records = vec![
            Record::new("alice", "@bob"),
            Record::new("bob", "@carol"),
            Record::new("carol", "@alice"),
            Record::new("dave", "@erin"),
            Record::new("erin", "@frank"),
            Record::new("frank", "@dave"),
        ];
        let config = Config::default();
        let network = MentionNetwork::from_records(&records, &config);
        let report = analyze(&network, &config).expect("analyze");

        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().to_str().expect("utf8 path");
        save_results(&network, &report, 3, out).expect("save");

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("summary.json")).expect("read"))
                .expect("json");
        assert_eq!(summary["graph_stats"]["node_count"], 6);
        assert_eq!(summary["graph_stats"]["record_count"], 6);
        assert_eq!(summary["community_stats"]["num_communities"], 2);
        assert_eq!(summary["community_stats"]["mean_community_size"], 3.0);

        let rankings: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("rankings.json")).expect("read"))
                .expect("json");
        assert_eq!(
            rankings["weighted_degree"]["authorities"].as_array().map(Vec::len),
            Some(3)
        );

        assert!(dir.path().join("communities.json").exists());
    }

    #[test]
    fn single_community_has_zero_size_spread() {
        let records = vec![
            Record::new("alice", "@bob"),
            Record::new("bob", "@carol"),
            Record::new("carol", "@alice"),
        ];
        let config = Config::default();
        let network = MentionNetwork::from_records(&records, &config);
        let report = analyze(&network, &config).expect("analyze");
        assert_eq!(report.communities.num_communities(), 1);

        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().to_str().expect("utf8 path");
        save_results(&network, &report, 3, out).expect("save");

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("summary.json")).expect("read"))
                .expect("json");
        assert_eq!(summary["community_stats"]["std_dev_community_size"], 0.0);
        assert_eq!(summary["community_stats"]["mean_community_size"], 3.0);
    }

    #[test]
    fn std_dev_needs_two_values() {
        assert_eq!(std_dev_or_zero(&[]), 0.0);
        assert_eq!(std_dev_or_zero(&[4.0]), 0.0);
        assert!((std_dev_or_zero(&[2.0, 4.0]) - 2.0_f64.sqrt()).abs() < 1e-12);
    }
}
