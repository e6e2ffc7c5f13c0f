//! Graph Attention Network
//!
//! Stack of attention layers sharing one edge index.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::activation::Activation;
use super::dropout::ForwardContext;
use super::layer::{GraphAttentionLayer, LayerConfig};
use super::LayerKind;
use crate::error::{GatError, Result};
use crate::graph::EdgeIndex;

/// Model architecture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Declared depth (see [`GatModel::new`] for how many layers are built)
    pub num_of_layers: usize,
    /// Heads of layer `i` are `num_heads_per_layer[i]`
    pub num_heads_per_layer: Vec<usize>,
    /// Layer `i` maps `num_features_per_layer[i - 1]` to `num_features_per_layer[i]`
    pub num_features_per_layer: Vec<usize>,
    /// Dropout shared by every layer
    pub dropout: f64,
    /// Layer variant
    pub layer_kind: LayerKind,
    /// Return attention weights from every layer
    pub log_attention_weights: bool,
    /// Base seed for parameter initialisation; layer `k` uses `seed + k`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            num_of_layers: 3,
            num_heads_per_layer: vec![1, 1, 1],
            num_features_per_layer: vec![1433, 64, 7],
            dropout: 0.6,
            layer_kind: LayerKind::EdgeIndex,
            log_attention_weights: false,
            seed: None,
        }
    }
}

impl ModelConfig {
    /// Number of layers [`GatModel::new`] builds: `num_of_layers - 1`
    /// interior-plus-final layers, or one when `num_of_layers == 1`.
    pub fn built_depth(&self) -> usize {
        self.num_of_layers.saturating_sub(2) + 1
    }

    /// Check that every index the model reads exists
    pub fn validate(&self) -> Result<()> {
        if self.num_of_layers == 0 {
            return Err(GatError::InvalidConfig(
                "Number of layers must be greater than 0".to_string(),
            ));
        }

        let nfpl = self.num_features_per_layer.len();
        let nhpl = self.num_heads_per_layer.len();
        if nfpl < 2 {
            return Err(GatError::InvalidConfig(format!(
                "num_features_per_layer needs at least 2 entries, got {}",
                nfpl
            )));
        }
        if nhpl == 0 {
            return Err(GatError::InvalidConfig(
                "num_heads_per_layer must not be empty".to_string(),
            ));
        }

        let last_interior = self.num_of_layers.saturating_sub(2);
        if last_interior >= nfpl || last_interior >= nhpl {
            return Err(GatError::InvalidConfig(format!(
                "{} layers need at least {} feature and head entries, got {} and {}",
                self.num_of_layers,
                last_interior + 1,
                nfpl,
                nhpl
            )));
        }

        Ok(())
    }

    /// Per-layer configs in build order
    pub fn layer_configs(&self) -> Result<Vec<LayerConfig>> {
        self.validate()?;

        let nfpl = &self.num_features_per_layer;
        let nhpl = &self.num_heads_per_layer;
        let layer_seed = |k: usize| self.seed.map(|s| s.wrapping_add(k as u64));

        let mut configs: Vec<LayerConfig> = (1..self.num_of_layers.saturating_sub(1))
            .map(|i| {
                LayerConfig::new(nfpl[i - 1], nfpl[i], nhpl[i])
                    .dropout(self.dropout)
                    .log_attention_weights(self.log_attention_weights)
                    .seed(layer_seed(i - 1))
            })
            .collect();

        let k = configs.len();
        configs.push(
            LayerConfig::new(nfpl[nfpl.len() - 2], nfpl[nfpl.len() - 1], nhpl[nhpl.len() - 1])
                .concat(false)
                .activation(Activation::Softmax)
                .dropout(self.dropout)
                .log_attention_weights(self.log_attention_weights)
                .seed(layer_seed(k)),
        );

        Ok(configs)
    }
}

/// Output of a full model pass
#[derive(Debug, Clone)]
pub struct ModelOutput {
    /// Final node features
    pub output: Array2<f64>,
    /// Attention weights per layer, in layer order
    pub attention_weights: Vec<Option<Array2<f64>>>,
}

/// Graph Attention Network
///
/// Multi-layer GAT for node-level predictions.
#[derive(Debug)]
pub struct GatModel {
    config: ModelConfig,
    layers: Vec<Box<dyn GraphAttentionLayer>>,
}

impl GatModel {
    /// Build the layer stack.
    ///
    /// Interior layers `i = 1 .. num_of_layers - 1` (exclusive) concatenate
    /// heads with ELU; a final averaging softmax layer maps the last two
    /// feature entries. This yields `num_of_layers - 1` layers for
    /// `num_of_layers >= 2`, one fewer than declared; the discrepancy is
    /// kept as-is and reported with a warning.
    pub fn new(config: ModelConfig) -> Result<Self> {
        let layers = config
            .layer_configs()?
            .into_iter()
            .map(|layer_config| config.layer_kind.build(layer_config))
            .collect::<Result<Vec<_>>>()?;

        if layers.len() != config.num_of_layers {
            warn!(
                declared = config.num_of_layers,
                built = layers.len(),
                "model built fewer layers than num_of_layers"
            );
        }
        for (idx, pair) in layers.windows(2).enumerate() {
            if pair[0].output_dim() != pair[1].in_features() {
                warn!(
                    layer = idx + 1,
                    expected = pair[1].in_features(),
                    got = pair[0].output_dim(),
                    "layer input does not match previous layer output; forward will fail"
                );
            }
        }

        info!(
            layers = layers.len(),
            kind = %config.layer_kind,
            parameters = layers.iter().map(|l| l.num_parameters()).sum::<usize>(),
            "built graph attention model"
        );

        Ok(Self { config, layers })
    }

    /// Forward pass through all layers
    pub fn forward(
        &self,
        features: &Array2<f64>,
        edge_index: &EdgeIndex,
        ctx: &mut ForwardContext,
    ) -> Result<Array2<f64>> {
        Ok(self.forward_with_attention(features, edge_index, ctx)?.output)
    }

    /// Forward pass returning every layer's attention weights
    pub fn forward_with_attention(
        &self,
        features: &Array2<f64>,
        edge_index: &EdgeIndex,
        ctx: &mut ForwardContext,
    ) -> Result<ModelOutput> {
        let mut attention_weights = Vec::with_capacity(self.layers.len());
        let mut hidden: Option<Array2<f64>> = None;

        for (idx, layer) in self.layers.iter().enumerate() {
            let input = hidden.as_ref().unwrap_or(features);
            if input.ncols() != layer.in_features() {
                return Err(GatError::LayerShapeMismatch {
                    layer: idx,
                    expected: layer.in_features(),
                    got: input.ncols(),
                });
            }

            let out = layer.forward(input, edge_index, ctx)?;
            attention_weights.push(out.attention_weights);
            hidden = Some(out.output);
        }

        Ok(ModelOutput {
            output: hidden.unwrap_or_else(|| features.clone()),
            attention_weights,
        })
    }

    /// Model configuration
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Built layers, in order
    pub fn layers(&self) -> &[Box<dyn GraphAttentionLayer>] {
        &self.layers
    }

    /// Get number of layers actually built
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Expected input width
    pub fn input_dim(&self) -> usize {
        self.layers.first().map(|l| l.in_features()).unwrap_or(0)
    }

    /// Width of the final output
    pub fn output_dim(&self) -> usize {
        self.layers.last().map(|l| l.output_dim()).unwrap_or(0)
    }

    /// Get number of parameters
    pub fn num_parameters(&self) -> usize {
        self.layers.iter().map(|l| l.num_parameters()).sum()
    }
}
