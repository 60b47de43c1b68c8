//! Input records, mention extraction and edge aggregation

pub mod aggregate;
pub mod extract;
pub mod loader;

pub use aggregate::{aggregate_edges, par_aggregate_edges, Edge, EdgeList};
pub use extract::{extract_mentions, Mention, Record};
