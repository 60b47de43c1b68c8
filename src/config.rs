//! Configuration management for the mention graph analyzer

use serde::{Deserialize, Serialize};

/// How self-mentions (author == mentioned handle) are treated when building graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelfLoopPolicy {
    /// Retain self-mentions as self-loops in both views
    #[default]
    Keep,
    /// Remove self-mentions from both views
    Drop,
}

/// Weight given to an undirected edge when both directions were mentioned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReciprocalPolicy {
    /// w(a,b) + w(b,a)
    #[default]
    Sum,
    /// max(w(a,b), w(b,a))
    Max,
}

/// Node visitation order during the Louvain local moving phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VisitOrder {
    /// Ascending node index, which is ascending user id at the first level
    #[default]
    Ascending,
    /// A fixed permutation drawn from a seeded RNG
    Seeded(u64),
}

/// What to do when HITS reaches its iteration cap without converging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConvergencePolicy {
    /// Fail with a convergence error
    #[default]
    Strict,
    /// Keep the last iterate and flag it as unconverged
    BestEffort,
}

/// Louvain community detection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LouvainConfig {
    /// Maximum number of aggregation levels
    pub max_passes: usize,

    /// Maximum number of full sweeps over the nodes in one local moving phase
    pub max_sweeps: usize,

    /// Smallest modularity gain that counts as an improvement
    pub min_gain: f64,

    /// Node visitation order
    pub order: VisitOrder,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            max_passes: 32,
            max_sweeps: 256,
            min_gain: 1e-7,
            order: VisitOrder::Ascending,
        }
    }
}

/// HITS hub/authority settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitsConfig {
    /// Iteration cap
    pub max_iterations: usize,

    /// Convergence threshold on the summed L1 change of both score vectors
    pub tolerance: f64,

    /// Behaviour when the cap is reached
    pub policy: ConvergencePolicy,
}

impl Default for HitsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-8,
            policy: ConvergencePolicy::Strict,
        }
    }
}

/// Default configuration for the mention graph analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Column holding the author's user id
    pub author_column: String,

    /// Column holding the free text
    pub text_column: String,

    /// Self-mention handling
    pub self_loops: SelfLoopPolicy,

    /// Undirected weight for reciprocated mentions
    pub reciprocal: ReciprocalPolicy,

    /// Community detection settings
    pub louvain: LouvainConfig,

    /// Hub/authority settings
    pub hits: HitsConfig,

    /// Length of the reported top-N rankings
    pub top_n: usize,

    /// Worker threads for the rayon pool (0 = all available cores)
    pub threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            author_column: "username".to_string(),
            text_column: "tweets".to_string(),
            self_loops: SelfLoopPolicy::Keep,
            reciprocal: ReciprocalPolicy::Sum,
            louvain: LouvainConfig::default(),
            hits: HitsConfig::default(),
            top_n: 10,
            threads: 0,
        }
    }
}

impl Config {
    /// Create a new configuration with custom column names and defaults elsewhere
    pub fn new(author_column: &str, text_column: &str) -> Self {
        Self {
            author_column: author_column.to_string(),
            text_column: text_column.to_string(),
            ..Self::default()
        }
    }

    /// Resolved size of the worker pool
    pub fn worker_threads(&self) -> usize {
        if self.threads > 0 {
            self.threads
        } else {
            num_cpus::get()
        }
    }
}
