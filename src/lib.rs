//! Graph Attention Networks over edge-index graphs
//!
//! This crate implements the Graph Attention Network (GAT) layer and a
//! stacked GAT model. Each node attends to its incoming neighbours with
//! learned attention coefficients; coefficients are normalised per target
//! node with a segmented (scatter) softmax over the edge list.
//!
//! # Features
//!
//! - **Edge-index layer**: projection, split additive scoring, edge lifting,
//!   scatter softmax and scatter-add aggregation
//! - **Layer variants**: selected by configuration through [`gat::LayerKind`]
//! - **Model**: layer stack threading one edge index through every layer
//! - **Config**: TOML model and run configuration
//!
//! # Example
//!
//! ```rust
//! use graph_attention::prelude::*;
//! use ndarray::Array2;
//!
//! let edges = EdgeIndexBuilder::cycle(4);
//! let layer = EdgeIndexLayer::new(LayerConfig::new(2, 3, 1).seed(Some(7)))?;
//!
//! let features = Array2::from_elem((4, 2), 0.5);
//! let out = layer.forward(&features, &edges, &mut ForwardContext::inference())?;
//! assert_eq!(out.output.dim(), (4, 3));
//! # Ok::<(), graph_attention::GatError>(())
//! ```

pub mod config;
pub mod error;
pub mod gat;
pub mod graph;
pub mod ops;

// Re-export commonly used types
pub use config::{Config, RunConfig};
pub use error::{GatError, Result};
pub use gat::{EdgeIndexLayer, GatModel, GraphAttentionLayer, LayerConfig, LayerKind, ModelConfig};
pub use graph::{EdgeIndex, EdgeIndexBuilder};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, RunConfig};
    pub use crate::error::{GatError, Result};
    pub use crate::gat::{
        Activation, EdgeIndexLayer, ForwardContext, GatModel, GraphAttentionLayer, InitStrategy,
        LayerConfig, LayerKind, LayerOutput, ModelConfig, ModelOutput,
    };
    pub use crate::graph::{EdgeIndex, EdgeIndexBuilder};
}
