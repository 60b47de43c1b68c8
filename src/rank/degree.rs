//! Weighted in/out degree rankings

use crate::error::{AnalysisError, Result};
use crate::graph::MentionGraph;
use crate::rank::Ranking;
use serde::{Deserialize, Serialize};

/// Authority (incoming weight) and hub (outgoing weight) rankings over all nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeRanking {
    pub authorities: Ranking,
    pub hubs: Ranking,
}

/// Rank every node by the weight of mentions it received and sent
pub fn weighted_degree_ranking(graph: &MentionGraph) -> Result<DegreeRanking> {
    if graph.is_empty() {
        return Err(AnalysisError::EmptyGraph {
            operation: "degree ranking",
        });
    }

    let directed = graph.directed();
    let authorities = Ranking::from_scores(
        directed
            .node_indices()
            .map(|idx| (graph.node_id(idx).to_string(), graph.in_weight(idx) as f64)),
    );
    let hubs = Ranking::from_scores(
        directed
            .node_indices()
            .map(|idx| (graph.node_id(idx).to_string(), graph.out_weight(idx) as f64)),
    );

    Ok(DegreeRanking { authorities, hubs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ReciprocalPolicy, SelfLoopPolicy};
    use crate::data::{aggregate_edges, extract_mentions, EdgeList, Record};

    #[test]
    fn authority_is_incoming_and_hub_is_outgoing_weight() {
        let records = vec![
            Record::new("alice", "@bob"),
            Record::new("alice", "@bob @carol"),
            Record::new("carol", "@bob"),
        ];
        let edges = aggregate_edges(extract_mentions(&records));
        let graph = MentionGraph::from_edges(&edges, SelfLoopPolicy::Keep, ReciprocalPolicy::Sum);

        let ranking = weighted_degree_ranking(&graph).expect("ranking");

        assert_eq!(ranking.authorities.top(1)[0].user, "bob");
        assert_eq!(ranking.authorities.score_of("bob"), Some(3.0));
        assert_eq!(ranking.authorities.score_of("carol"), Some(1.0));
        assert_eq!(ranking.authorities.score_of("alice"), Some(0.0));
        assert_eq!(ranking.hubs.top(1)[0].user, "alice");
        assert_eq!(ranking.hubs.score_of("alice"), Some(3.0));
        assert_eq!(ranking.hubs.len(), 3);
    }

    #[test]
    fn empty_graph_is_an_error() {
        let graph = MentionGraph::from_edges(&EdgeList::default(), SelfLoopPolicy::Keep, ReciprocalPolicy::Sum);
        assert!(matches!(
            weighted_degree_ranking(&graph),
            Err(AnalysisError::EmptyGraph { .. })
        ));
    }
}
