//! Graph data structures and builders
//!
//! Provides the edge index consumed by attention layers and helpers to
//! construct common graphs.

mod builder;
mod edge_index;

pub use builder::EdgeIndexBuilder;
pub use edge_index::EdgeIndex;
