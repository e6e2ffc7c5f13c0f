//! Graph Attention Layer implementation
//!
//! Single layer of Graph Attention Network operating on an edge index:
//! project, score, lift onto edges, normalise per target, aggregate.

use std::fmt;

use ndarray::{Array1, Array2, Array3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::activation::Activation;
use super::aggregate::{aggregate, combine_heads};
use super::attention::{lift, AttentionScorer};
use super::dropout::{Dropout, ForwardContext};
use super::init::{make_rng, InitStrategy};
use super::LayerKind;
use crate::error::{GatError, Result};
use crate::graph::EdgeIndex;

/// Construction parameters shared by every layer variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Input feature dimension
    pub in_features: usize,
    /// Output dimension per head
    pub out_features: usize,
    /// Number of attention heads
    pub num_heads: usize,
    /// Concatenate heads (true) or average them (false)
    pub concat: bool,
    /// Output activation
    pub activation: Activation,
    /// Drop probability used at all three dropout sites
    pub dropout: f64,
    /// Accepted for compatibility; has no effect on the forward pass
    pub add_skip_connection: bool,
    /// Whether to add a trainable bias
    pub bias: bool,
    /// Return attention weights alongside the output
    pub log_attention_weights: bool,
    /// Negative slope of the LeakyReLU on edge logits
    pub negative_slope: f64,
    /// Weight initialisation
    pub init: InitStrategy,
    /// Seed for parameter initialisation
    pub seed: Option<u64>,
}

impl LayerConfig {
    /// Config with GAT defaults: concat, ELU, dropout 0.6, bias
    pub fn new(in_features: usize, out_features: usize, num_heads: usize) -> Self {
        Self {
            in_features,
            out_features,
            num_heads,
            concat: true,
            activation: Activation::Elu,
            dropout: 0.6,
            add_skip_connection: true,
            bias: true,
            log_attention_weights: false,
            negative_slope: 0.2,
            init: InitStrategy::XavierUniform,
            seed: None,
        }
    }

    /// Concatenate heads (true) or average them (false)
    pub fn concat(mut self, concat: bool) -> Self {
        self.concat = concat;
        self
    }

    /// Output activation
    pub fn activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    /// Drop probability shared by the three dropout sites
    pub fn dropout(mut self, dropout: f64) -> Self {
        self.dropout = dropout;
        self
    }

    /// Skip-connection flag; stored only
    pub fn add_skip_connection(mut self, add: bool) -> Self {
        self.add_skip_connection = add;
        self
    }

    /// Add a trainable bias
    pub fn bias(mut self, bias: bool) -> Self {
        self.bias = bias;
        self
    }

    /// Return attention weights from `forward`
    pub fn log_attention_weights(mut self, log: bool) -> Self {
        self.log_attention_weights = log;
        self
    }

    /// LeakyReLU slope for edge logits
    pub fn negative_slope(mut self, slope: f64) -> Self {
        self.negative_slope = slope;
        self
    }

    /// Weight initialisation strategy
    pub fn init(mut self, init: InitStrategy) -> Self {
        self.init = init;
        self
    }

    /// Initialisation seed; entropy-seeded when `None`
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Width of the layer's output rows
    pub fn output_dim(&self) -> usize {
        if self.concat {
            self.num_heads * self.out_features
        } else {
            self.out_features
        }
    }

    /// Validate dimensions and probabilities
    pub fn validate(&self) -> Result<()> {
        if self.in_features == 0 || self.out_features == 0 {
            return Err(GatError::InvalidConfig(format!(
                "feature dimensions must be positive, got in={} out={}",
                self.in_features, self.out_features
            )));
        }
        if self.num_heads == 0 {
            return Err(GatError::InvalidConfig(
                "number of heads must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.dropout) {
            return Err(GatError::InvalidConfig(format!(
                "dropout must be in [0, 1], got {}",
                self.dropout
            )));
        }
        if !self.negative_slope.is_finite() {
            return Err(GatError::InvalidConfig(
                "negative slope must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Result of one layer forward pass
#[derive(Debug, Clone)]
pub struct LayerOutput {
    /// New node features, `[N, output_dim]`
    pub output: Array2<f64>,
    /// Attention weights `[E, H]`, present when the layer logs them
    pub attention_weights: Option<Array2<f64>>,
}

/// A graph attention layer variant
pub trait GraphAttentionLayer: fmt::Debug + Send + Sync {
    /// Which variant this is
    fn kind(&self) -> LayerKind;

    /// Construction parameters
    fn config(&self) -> &LayerConfig;

    /// Transform `[N, in_features]` node features along `edge_index`.
    ///
    /// Every id in `edge_index` must lie in `[0, N)`; this is not checked.
    fn forward(
        &self,
        features: &Array2<f64>,
        edge_index: &EdgeIndex,
        ctx: &mut ForwardContext,
    ) -> Result<LayerOutput>;

    /// Number of trainable scalars
    fn num_parameters(&self) -> usize;

    /// Expected input width
    fn in_features(&self) -> usize {
        self.config().in_features
    }

    /// Output width
    fn output_dim(&self) -> usize {
        self.config().output_dim()
    }
}

/// Graph attention layer over an edge index.
///
/// Trainable parameters: projection `[F_in, H * F_out]`, source and target
/// scoring vectors `[1, H, F_out]`, and an optional bias of width
/// `output_dim`.
#[derive(Debug, Clone)]
pub struct EdgeIndexLayer {
    config: LayerConfig,
    /// Projection matrix
    weight: Array2<f64>,
    /// Attention scoring vectors
    scorer: AttentionScorer,
    /// Bias terms
    bias: Option<Array1<f64>>,
    input_dropout: Dropout,
    projection_dropout: Dropout,
    attention_dropout: Dropout,
}

impl EdgeIndexLayer {
    /// Create a new layer, initialising all parameters
    pub fn new(config: LayerConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = make_rng(config.seed);
        let (f_in, h, f_out) = (config.in_features, config.num_heads, config.out_features);

        let weight = config.init.sample((f_in, h * f_out), f_in, h * f_out, &mut rng);
        let scorer = AttentionScorer::new(h, f_out, config.negative_slope, config.init, &mut rng);
        let bias = config.bias.then(|| Array1::zeros(config.output_dim()));

        if config.add_skip_connection {
            debug!("skip connection requested; it is not applied by the edge-index layer");
        }

        let dropout = Dropout::new(config.dropout);
        Ok(Self {
            config,
            weight,
            scorer,
            bias,
            input_dropout: dropout,
            projection_dropout: dropout,
            attention_dropout: dropout,
        })
    }

    /// Projection matrix, `[F_in, H * F_out]`
    pub fn weight(&self) -> &Array2<f64> {
        &self.weight
    }

    /// Mutable projection matrix
    pub fn weight_mut(&mut self) -> &mut Array2<f64> {
        &mut self.weight
    }

    /// Attention scoring vectors
    pub fn scorer(&self) -> &AttentionScorer {
        &self.scorer
    }

    /// Mutable attention scoring vectors
    pub fn scorer_mut(&mut self) -> &mut AttentionScorer {
        &mut self.scorer
    }

    /// Bias, if the layer has one
    pub fn bias(&self) -> Option<&Array1<f64>> {
        self.bias.as_ref()
    }

    /// Mutable bias
    pub fn bias_mut(&mut self) -> Option<&mut Array1<f64>> {
        self.bias.as_mut()
    }

    /// Dropout applied to raw input features
    pub fn input_dropout(&self) -> &Dropout {
        &self.input_dropout
    }

    /// Dropout applied to projected features
    pub fn projection_dropout(&self) -> &Dropout {
        &self.projection_dropout
    }

    /// Dropout applied to attention weights
    pub fn attention_dropout(&self) -> &Dropout {
        &self.attention_dropout
    }

    /// Linear projection `[N, F_in] -> [N, H, F_out]` (no dropout)
    pub fn project(&self, features: &Array2<f64>) -> Result<Array3<f64>> {
        self.check_input(features)?;
        let n = features.nrows();
        let projected = features.dot(&self.weight);
        Ok(projected.into_shape((n, self.config.num_heads, self.config.out_features))?)
    }

    fn check_input(&self, features: &Array2<f64>) -> Result<()> {
        if features.ncols() != self.config.in_features {
            return Err(GatError::ShapeMismatch {
                expected: self.config.in_features,
                got: features.ncols(),
            });
        }
        Ok(())
    }
}

impl GraphAttentionLayer for EdgeIndexLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::EdgeIndex
    }

    fn config(&self) -> &LayerConfig {
        &self.config
    }

    fn forward(
        &self,
        features: &Array2<f64>,
        edge_index: &EdgeIndex,
        ctx: &mut ForwardContext,
    ) -> Result<LayerOutput> {
        self.check_input(features)?;
        let num_nodes = features.nrows();
        debug!(
            num_nodes,
            num_edges = edge_index.num_edges(),
            num_heads = self.config.num_heads,
            training = ctx.is_training(),
            "edge-index attention forward"
        );

        let features = self.input_dropout.apply(features.to_owned(), ctx);
        let projected = self.project(&features)?;
        let projected = self.projection_dropout.apply(projected, ctx);

        let (scores_source, scores_target) = self.scorer.node_scores(&projected);
        let lifted = lift(&scores_source, &scores_target, &projected, edge_index);

        let attention = self.scorer.attention(&lifted, edge_index, num_nodes);
        let attention = self.attention_dropout.apply(attention, ctx);

        let aggregated = aggregate(&attention, &lifted.features, edge_index.targets(), num_nodes);
        let mut output = combine_heads(aggregated, self.config.concat)?;

        if let Some(ref bias) = self.bias {
            output += bias;
        }

        Ok(LayerOutput {
            output: self.config.activation.apply(output),
            attention_weights: self.config.log_attention_weights.then_some(attention),
        })
    }

    fn num_parameters(&self) -> usize {
        let bias_params = self.bias.as_ref().map(|b| b.len()).unwrap_or(0);
        self.weight.len() + self.scorer.num_parameters() + bias_params
    }
}
