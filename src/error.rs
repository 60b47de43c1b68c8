//! Error taxonomy for the analysis pipeline

use thiserror::Error;

/// Errors raised by the mention graph pipeline
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// An operation received inputs that do not belong together
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The graph has no nodes, so the requested metric is undefined
    #[error("cannot run {operation} on an empty graph")]
    EmptyGraph {
        /// Name of the analysis that was attempted
        operation: &'static str,
    },

    /// An iterative scorer hit its iteration cap before meeting tolerance
    #[error("no convergence after {iterations} iterations (delta {delta:.3e} > tolerance {tolerance:.3e})")]
    Convergence {
        iterations: usize,
        delta: f64,
        tolerance: f64,
    },

    /// The input dataset lacks a required column
    #[error("input {path} is missing required column '{column}'")]
    MalformedInput { column: String, path: String },

    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
