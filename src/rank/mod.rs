//! Influence ranking: weighted degree and HITS hub/authority scores

pub mod degree;
pub mod hits;

use serde::{Deserialize, Serialize};

pub use degree::{weighted_degree_ranking, DegreeRanking};
pub use hits::{hits, HitsScores};

/// One user's score in a ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub user: String,
    pub score: f64,
}

/// Entries ordered by descending score, ties by ascending user id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    entries: Vec<RankingEntry>,
}

impl Ranking {
    /// Sort arbitrary `(user, score)` pairs into ranking order
    pub fn from_scores<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut entries: Vec<RankingEntry> = scores
            .into_iter()
            .map(|(user, score)| RankingEntry { user, score })
            .collect();
        entries.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.user.cmp(&b.user)));
        Self { entries }
    }

    /// The first `n` entries (fewer if the ranking is shorter)
    pub fn top(&self, n: usize) -> &[RankingEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn entries(&self) -> &[RankingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Score of a user, if ranked
    pub fn score_of(&self, user: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.user == user).map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_are_broken_by_user_id() {
        let ranking = Ranking::from_scores(vec![
            ("carol".to_string(), 2.0),
            ("alice".to_string(), 2.0),
            ("bob".to_string(), 5.0),
        ]);
        let users: Vec<_> = ranking.entries().iter().map(|e| e.user.as_str()).collect();
        assert_eq!(users, vec!["bob", "alice", "carol"]);
    }

    #[test]
    fn top_is_clamped_to_length() {
        let ranking = Ranking::from_scores(vec![("a".to_string(), 1.0)]);
        assert_eq!(ranking.top(10).len(), 1);
        assert!(ranking.top(0).is_empty());
    }
}
