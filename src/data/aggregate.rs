//! Collapsing raw mentions into weighted edges

use crate::data::extract::{mentions_in, Mention, Record};
use itertools::Itertools;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

type PairCounts<'a> = HashMap<(&'a str, &'a str), u64>;

/// A weighted, directed mention edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    /// Number of times `source` mentioned `target`
    pub weight: u64,
}

/// Aggregated edge set, one entry per ordered pair, sorted by `(source, target)`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeList {
    edges: Vec<Edge>,
}

impl EdgeList {
    fn from_counts(counts: PairCounts<'_>) -> Self {
        let edges = counts
            .into_iter()
            .map(|((source, target), weight)| Edge {
                source: source.to_string(),
                target: target.to_string(),
                weight,
            })
            .sorted_unstable_by(|a, b| (&a.source, &a.target).cmp(&(&b.source, &b.target)))
            .collect();

        Self { edges }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edge> {
        self.edges.iter()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Sum of all edge weights, i.e. the number of raw mentions
    pub fn total_weight(&self) -> u64 {
        self.edges.iter().map(|e| e.weight).sum()
    }

    /// Weight of the ordered pair, if it was mentioned at all
    pub fn weight(&self, source: &str, target: &str) -> Option<u64> {
        self.edges
            .binary_search_by(|e| (e.source.as_str(), e.target.as_str()).cmp(&(source, target)))
            .ok()
            .map(|idx| self.edges[idx].weight)
    }

    /// Every user id appearing as a source or target, ascending
    pub fn nodes(&self) -> BTreeSet<&str> {
        self.edges
            .iter()
            .flat_map(|e| [e.source.as_str(), e.target.as_str()])
            .collect()
    }
}

impl<'a> IntoIterator for &'a EdgeList {
    type Item = &'a Edge;
    type IntoIter = std::slice::Iter<'a, Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}

/// Collect pre-weighted edges, summing duplicates of an ordered pair.
/// Zero-weight edges are discarded.
impl FromIterator<Edge> for EdgeList {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        let mut merged: BTreeMap<(String, String), u64> = BTreeMap::new();
        for edge in iter {
            *merged.entry((edge.source, edge.target)).or_insert(0) += edge.weight;
        }

        let edges = merged
            .into_iter()
            .filter(|(_, weight)| *weight > 0)
            .map(|((source, target), weight)| Edge {
                source,
                target,
                weight,
            })
            .collect();

        Self { edges }
    }
}

/// Group mentions by ordered pair, adding one unit of weight per occurrence
pub fn aggregate_edges<'a, I>(mentions: I) -> EdgeList
where
    I: IntoIterator<Item = Mention<'a>>,
{
    let mut counts = PairCounts::new();
    for mention in mentions {
        *counts.entry((mention.author, mention.handle)).or_insert(0) += 1;
    }

    log::debug!("Aggregated mentions into {} distinct pairs", counts.len());
    EdgeList::from_counts(counts)
}

/// Extract and aggregate in parallel shards across the rayon pool.
///
/// Produces exactly the same `EdgeList` as the sequential path.
pub fn par_aggregate_edges(records: &[Record]) -> EdgeList {
    let counts = records
        .par_iter()
        .fold(PairCounts::new, |mut acc, record| {
            if let Some(text) = record.text.as_deref() {
                for mention in mentions_in(&record.author, text) {
                    *acc.entry((mention.author, mention.handle)).or_insert(0) += 1;
                }
            }
            acc
        })
        .reduce(PairCounts::new, |mut left, right| {
            for (pair, weight) in right {
                *left.entry(pair).or_insert(0) += weight;
            }
            left
        });

    log::debug!("Aggregated mentions into {} distinct pairs", counts.len());
    EdgeList::from_counts(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::extract::extract_mentions;
    use proptest::prelude::*;

    fn sample_records() -> Vec<Record> {
        vec![
            Record::new("alice", "@bob hi"),
            Record::new("alice", "again @bob"),
            Record::new("carol", "@bob @alice"),
            Record::without_text("dave"),
        ]
    }

    #[test]
    fn weight_counts_repeated_pairs() {
        let records = sample_records();
        let edges = aggregate_edges(extract_mentions(&records));

        assert_eq!(edges.len(), 3);
        assert_eq!(edges.weight("alice", "bob"), Some(2));
        assert_eq!(edges.weight("carol", "bob"), Some(1));
        assert_eq!(edges.weight("carol", "alice"), Some(1));
        assert_eq!(edges.weight("bob", "alice"), None);
        assert_eq!(edges.total_weight(), 4);
    }

    #[test]
    fn edges_are_sorted_by_pair() {
        let records = sample_records();
        let edges = aggregate_edges(extract_mentions(&records));
        let pairs: Vec<_> = edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect();
        assert_eq!(pairs, vec![("alice", "bob"), ("carol", "alice"), ("carol", "bob")]);
    }

    #[test]
    fn nodes_are_the_union_of_endpoints() {
        let records = sample_records();
        let edges = aggregate_edges(extract_mentions(&records));
        let nodes: Vec<_> = edges.nodes().into_iter().collect();
        assert_eq!(nodes, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn collected_edges_merge_and_sort() {
        let edge = |s: &str, t: &str, w| Edge {
            source: s.to_string(),
            target: t.to_string(),
            weight: w,
        };
        let edges: EdgeList = vec![
            edge("carol", "bob", 1),
            edge("alice", "bob", 2),
            edge("carol", "bob", 3),
            edge("bob", "alice", 0),
        ]
        .into_iter()
        .collect();

        assert_eq!(edges.len(), 2);
        assert_eq!(edges.weight("carol", "bob"), Some(4));
        assert_eq!(edges.weight("bob", "alice"), None);
        assert_eq!(edges.edges()[0].source, "alice");
    }

    fn arb_records() -> impl Strategy<Value = Vec<Record>> {
        let user = prop::sample::select(vec!["ann", "ben", "cat", "dan", "eve"]);
        let text = prop::collection::vec(user.clone(), 0..4)
            .prop_map(|handles| handles.iter().map(|h| format!("@{h} ")).collect::<String>());
        prop::collection::vec((user, text), 0..40).prop_map(|rows| {
            rows.into_iter()
                .map(|(author, text)| Record::new(author, text))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn parallel_matches_sequential(records in arb_records()) {
            let sequential = aggregate_edges(extract_mentions(&records));
            let parallel = par_aggregate_edges(&records);
            prop_assert_eq!(sequential, parallel);
        }

        #[test]
        fn order_does_not_change_result(records in arb_records()) {
            let forward = aggregate_edges(extract_mentions(&records));
            let mut reversed = records.clone();
            reversed.reverse();
            let backward = aggregate_edges(extract_mentions(&reversed));
            prop_assert_eq!(forward, backward);
        }

        #[test]
        fn total_weight_equals_mention_count(records in arb_records()) {
            let raw = extract_mentions(&records).count() as u64;
            prop_assert_eq!(aggregate_edges(extract_mentions(&records)).total_weight(), raw);
        }
    }
}
