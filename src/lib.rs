//! Core library functions for the mention graph analyzer

pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod pipeline;
pub mod rank;
pub mod storage;
pub mod viz;

pub use config::Config;
pub use error::{AnalysisError, Result};
pub use pipeline::{analyze, AnalysisReport, MentionNetwork};
