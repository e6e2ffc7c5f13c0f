//! Layer variant selection

use std::fmt;

use serde::{Deserialize, Serialize};

use super::layer::{EdgeIndexLayer, GraphAttentionLayer, LayerConfig};
use crate::error::{GatError, Result};

/// Graph attention layer variants.
///
/// Each variant is an independent implementation of [`GraphAttentionLayer`];
/// a configuration value picks which one [`LayerKind::build`] constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Dense adjacency-mask attention (not implemented)
    Dense,
    /// Port of the paper authors' reference layer (not implemented)
    Reference,
    /// Edge-index attention with a segmented softmax
    #[default]
    EdgeIndex,
}

impl LayerKind {
    /// All variants, in declaration order
    pub const ALL: [LayerKind; 3] = [LayerKind::Dense, LayerKind::Reference, LayerKind::EdgeIndex];

    /// Construct a layer of this variant.
    ///
    /// Selecting a variant without an implementation is a configuration error.
    pub fn build(self, config: LayerConfig) -> Result<Box<dyn GraphAttentionLayer>> {
        match self {
            LayerKind::EdgeIndex => Ok(Box::new(EdgeIndexLayer::new(config)?)),
            LayerKind::Dense | LayerKind::Reference => Err(GatError::UnsupportedLayer(self)),
        }
    }

    /// Whether [`LayerKind::build`] can succeed for this variant
    pub fn is_implemented(self) -> bool {
        matches!(self, LayerKind::EdgeIndex)
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayerKind::Dense => "dense",
            LayerKind::Reference => "reference",
            LayerKind::EdgeIndex => "edge_index",
        };
        write!(f, "{}", name)
    }
}
