//! Graph representation and algorithms module

pub mod algorithms;
pub mod builder;
pub mod compressed;
pub mod mention;

pub use compressed::CompressedGraph;
pub use mention::MentionGraph;
