//! Data files for external plotting tools

use crate::error::Result;
use crate::graph::algorithms::{degree_distribution, path_length_distribution};
use crate::pipeline::{AnalysisReport, MentionNetwork};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Generate visualization inputs from analysis results
pub fn generate_visualizations(
    network: &MentionNetwork,
    report: &AnalysisReport,
    output_dir: &str,
) -> Result<()> {
    log::info!("Generating visualization data");

    let viz_dir = Path::new(output_dir).join("visualizations");
    fs::create_dir_all(&viz_dir)?;

    generate_distribution_data(network, report, &viz_dir)?;
    generate_network_data(network, report, &viz_dir)?;

    log::info!("Visualization data generated successfully");

    Ok(())
}

/// Degree, path length, community size and hub/authority score distributions
fn generate_distribution_data(
    network: &MentionNetwork,
    report: &AnalysisReport,
    viz_dir: &Path,
) -> Result<()> {
    log::info!("Generating distribution data files");

    let graph = network.graph();

    let mut file = BufWriter::new(File::create(viz_dir.join("degree_distribution.csv"))?);
    writeln!(file, "degree,count")?;
    for (degree, count) in degree_distribution(graph) {
        writeln!(file, "{},{}", degree, count)?;
    }
    file.flush()?;

    let mut file = BufWriter::new(File::create(viz_dir.join("path_length_distribution.csv"))?);
    writeln!(file, "path_length,count")?;
    for (length, count) in path_length_distribution(graph) {
        writeln!(file, "{},{}", length, count)?;
    }
    file.flush()?;

    let mut file = BufWriter::new(File::create(viz_dir.join("community_sizes.csv"))?);
    writeln!(file, "community_id,size,density")?;
    for community in &report.communities.communities {
        writeln!(
            file,
            "{},{},{:.6}",
            community.id, community.size, community.density
        )?;
    }
    file.flush()?;

    let mut file = BufWriter::new(File::create(viz_dir.join("hub_authority_scores.csv"))?);
    writeln!(file, "user,hub_score,authority_score")?;
    let scores = &report.hits;
    for (i, user) in scores.node_ids.iter().enumerate() {
        writeln!(
            file,
            "{},{:.10},{:.10}",
            csv_field(user),
            scores.hubs[i],
            scores.authorities[i]
        )?;
    }
    file.flush()?;

    Ok(())
}

/// Node table and GraphML export with community labels and weights
fn generate_network_data(
    network: &MentionNetwork,
    report: &AnalysisReport,
    viz_dir: &Path,
) -> Result<()> {
    log::info!("Generating network data files");

    let graph = network.graph();
    let partition = &report.communities.partition;

    let mut nodes_file = BufWriter::new(File::create(viz_dir.join("nodes.csv"))?);
    writeln!(nodes_file, "id,label,community_id,in_weight,out_weight")?;
    for idx in graph.directed().node_indices() {
        let label = graph.node_id(idx);
        writeln!(
            nodes_file,
            "{},{},{},{},{}",
            idx.index(),
            csv_field(label),
            partition.community_of(label).map_or(String::new(), |c| c.to_string()),
            graph.in_weight(idx),
            graph.out_weight(idx)
        )?;
    }
    nodes_file.flush()?;

    let mut file = BufWriter::new(File::create(viz_dir.join("mention_graph.graphml"))?);

    writeln!(file, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(file, "<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">")?;
    writeln!(file, "  <key id=\"label\" for=\"node\" attr.name=\"label\" attr.type=\"string\"/>")?;
    writeln!(file, "  <key id=\"community\" for=\"node\" attr.name=\"community\" attr.type=\"int\"/>")?;
    writeln!(file, "  <key id=\"weight\" for=\"edge\" attr.name=\"weight\" attr.type=\"long\"/>")?;
    writeln!(file, "  <graph id=\"G\" edgedefault=\"directed\">")?;

    for idx in graph.directed().node_indices() {
        let label = graph.node_id(idx);
        writeln!(file, "    <node id=\"n{}\">", idx.index())?;
        writeln!(file, "      <data key=\"label\">{}</data>", xml_escape(label))?;
        if let Some(community) = partition.community_of(label) {
            writeln!(file, "      <data key=\"community\">{}</data>", community)?;
        }
        writeln!(file, "    </node>")?;
    }

    for (edge_id, (source, target, weight)) in graph.arcs().enumerate() {
        let (Some(src), Some(dst)) = (graph.index_of(source), graph.index_of(target)) else {
            continue;
        };
        writeln!(
            file,
            "    <edge id=\"e{}\" source=\"n{}\" target=\"n{}\"><data key=\"weight\">{}</data></edge>",
            edge_id,
            src.index(),
            dst.index(),
            weight
        )?;
    }

    writeln!(file, "  </graph>")?;
    writeln!(file, "</graphml>")?;
    file.flush()?;

    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
