//! Graph Attention Network implementation
//!
//! Provides GAT layers and networks for processing graph-structured data.

mod activation;
mod aggregate;
mod attention;
mod dropout;
pub mod init;
mod kind;
mod layer;
mod network;

pub use activation::{elu, leaky_relu, Activation};
pub use aggregate::{aggregate, combine_heads};
pub use attention::{lift, AttentionScorer, LiftedEdges};
pub use dropout::{Dropout, ForwardContext, Mode};
pub use init::InitStrategy;
pub use kind::LayerKind;
pub use layer::{EdgeIndexLayer, GraphAttentionLayer, LayerConfig, LayerOutput};
pub use network::{GatModel, ModelConfig, ModelOutput};
