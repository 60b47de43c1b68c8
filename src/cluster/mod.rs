//! Community analysis module

pub mod detection;
pub mod metrics;

use crate::error::{AnalysisError, Result};
use crate::graph::MentionGraph;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use detection::detect_communities;
pub use metrics::modularity;

/// Total assignment of user ids to community ids `0..k`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    assignments: BTreeMap<String, usize>,
    community_count: usize,
}

impl Partition {
    /// Build a partition, checking that community ids are exactly `0..k`
    pub fn from_assignments(assignments: BTreeMap<String, usize>) -> Result<Self> {
        let community_count = assignments.values().max().map_or(0, |&max| max + 1);
        let mut seen = vec![false; community_count];
        for &community in assignments.values() {
            seen[community] = true;
        }
        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(AnalysisError::InvalidState(format!(
                "community ids are not contiguous: {} has no members",
                missing
            )));
        }

        Ok(Self {
            assignments,
            community_count,
        })
    }

    /// Every node in its own community, numbered in node index order
    pub fn singletons(graph: &MentionGraph) -> Self {
        let assignments: BTreeMap<String, usize> = graph
            .node_ids()
            .enumerate()
            .map(|(community, id)| (id.to_string(), community))
            .collect();
        let community_count = assignments.len();

        Self {
            assignments,
            community_count,
        }
    }

    pub fn community_of(&self, id: &str) -> Option<usize> {
        self.assignments.get(id).copied()
    }

    /// Number of assigned nodes
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn community_count(&self) -> usize {
        self.community_count
    }

    /// `(user id, community id)` pairs in ascending user id order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.assignments.iter().map(|(id, &c)| (id.as_str(), c))
    }

    /// Member lists indexed by community id, members ascending
    pub fn members(&self) -> Vec<Vec<String>> {
        let mut members = vec![Vec::new(); self.community_count];
        for (id, &community) in &self.assignments {
            members[community].push(id.clone());
        }
        members
    }
}

/// A detected community in the mention graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Community {
    /// Community id within the partition
    pub id: usize,

    /// Member user ids, ascending
    pub members: Vec<String>,

    /// Size of the community
    pub size: usize,

    /// Sum of undirected edge weights inside the community, self-loops included
    pub internal_weight: f64,

    /// Density: internal edges / potential edges
    pub density: f64,

    /// Members with the highest weighted degree inside the community
    pub central_members: Vec<String>,
}

/// Result of community detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityDetection {
    pub partition: Partition,

    /// Modularity of `partition` on the undirected graph
    pub modularity: f64,

    /// Communities sorted largest first, ties by id
    pub communities: Vec<Community>,

    /// Number of aggregation levels that improved modularity
    pub levels: usize,
}

impl CommunityDetection {
    pub fn num_communities(&self) -> usize {
        self.partition.community_count()
    }

    /// Sizes of all communities, largest first
    pub fn sizes(&self) -> Vec<usize> {
        self.communities.iter().map(|c| c.size).collect()
    }
}
