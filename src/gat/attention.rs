//! Attention scoring and edge lifting
//!
//! The additive score `a^T [W h_i || W h_j]` is split into a source term and
//! a target term computed once per node. Both terms are then lifted onto the
//! edge list and summed, so no per-edge concatenated vector is materialised.

use ndarray::{Array2, Array3, Axis};
use rand::rngs::StdRng;

use super::activation::leaky_relu;
use super::init::InitStrategy;
use crate::graph::EdgeIndex;
use crate::ops::{index_select, scatter_softmax};

/// Per-head scoring vectors for source and target nodes
#[derive(Debug, Clone)]
pub struct AttentionScorer {
    /// Shape `[1, H, F_out]`
    scoring_source: Array3<f64>,
    /// Shape `[1, H, F_out]`
    scoring_target: Array3<f64>,
    /// Negative slope for LeakyReLU
    negative_slope: f64,
}

/// Per-node quantities re-indexed onto the edge axis
#[derive(Debug, Clone)]
pub struct LiftedEdges {
    /// Source-node scores per edge, `[E, H]`
    pub scores_source: Array2<f64>,
    /// Target-node scores per edge, `[E, H]`
    pub scores_target: Array2<f64>,
    /// Projected source features per edge, `[E, H, F_out]`
    pub features: Array3<f64>,
}

impl AttentionScorer {
    /// Create a scorer with freshly initialised vectors
    pub fn new(
        num_heads: usize,
        out_features: usize,
        negative_slope: f64,
        init: InitStrategy,
        rng: &mut StdRng,
    ) -> Self {
        // PyTorch fan rules for a [1, H, F] tensor
        let fan_in = num_heads * out_features;
        let fan_out = out_features;
        let shape = (1, num_heads, out_features);

        Self {
            scoring_source: init.sample(shape, fan_in, fan_out, rng),
            scoring_target: init.sample(shape, fan_in, fan_out, rng),
            negative_slope,
        }
    }

    /// Source scoring vector, `[1, H, F_out]`
    pub fn scoring_source(&self) -> &Array3<f64> {
        &self.scoring_source
    }

    /// Mutable source scoring vector
    pub fn scoring_source_mut(&mut self) -> &mut Array3<f64> {
        &mut self.scoring_source
    }

    /// Target scoring vector, `[1, H, F_out]`
    pub fn scoring_target(&self) -> &Array3<f64> {
        &self.scoring_target
    }

    /// Mutable target scoring vector
    pub fn scoring_target_mut(&mut self) -> &mut Array3<f64> {
        &mut self.scoring_target
    }

    /// Negative slope of the LeakyReLU applied to edge logits
    pub fn negative_slope(&self) -> f64 {
        self.negative_slope
    }

    /// Number of trainable scalars
    pub fn num_parameters(&self) -> usize {
        self.scoring_source.len() + self.scoring_target.len()
    }

    /// Source and target scores per node, each `[N, H]`
    pub fn node_scores(&self, projected: &Array3<f64>) -> (Array2<f64>, Array2<f64>) {
        let scores_source = (projected * &self.scoring_source).sum_axis(Axis(2));
        let scores_target = (projected * &self.scoring_target).sum_axis(Axis(2));
        (scores_source, scores_target)
    }

    /// Unnormalised edge logits `LeakyReLU(s_src + s_tgt)`, `[E, H]`
    pub fn edge_logits(&self, lifted: &LiftedEdges) -> Array2<f64> {
        let slope = self.negative_slope();
        (&lifted.scores_source + &lifted.scores_target).mapv_into(|v| leaky_relu(v, slope))
    }

    /// Attention weights per edge and head, normalised over each target's incoming edges
    pub fn attention(&self, lifted: &LiftedEdges, edge_index: &EdgeIndex, num_nodes: usize) -> Array2<f64> {
        let logits = self.edge_logits(lifted);
        scatter_softmax(&logits, edge_index.targets(), num_nodes)
    }
}

/// Gather node scores and projected features onto the edge list.
///
/// Source scores and features are taken at each edge's source id, target
/// scores at its target id.
///
/// # Panics
///
/// Panics if any id in `edge_index` is `>= N`.
pub fn lift(
    scores_source: &Array2<f64>,
    scores_target: &Array2<f64>,
    projected: &Array3<f64>,
    edge_index: &EdgeIndex,
) -> LiftedEdges {
    LiftedEdges {
        scores_source: index_select(scores_source, edge_index.sources()),
        scores_target: index_select(scores_target, edge_index.targets()),
        features: index_select(projected, edge_index.sources()),
    }
}
