//! Neighborhood aggregation and head combination

use ndarray::{Array2, Array3, Axis};

use crate::error::Result;
use crate::ops::scatter_add;

/// Sum attention-weighted source features into their target node slots.
///
/// `attention` is `[E, H]`, `lifted_features` is `[E, H, F_out]`; the result
/// is `[num_nodes, H, F_out]`. Nodes without incoming edges stay zero.
pub fn aggregate(
    attention: &Array2<f64>,
    lifted_features: &Array3<f64>,
    targets: &[usize],
    num_nodes: usize,
) -> Array3<f64> {
    let weighted = lifted_features * &attention.view().insert_axis(Axis(2));
    scatter_add(&weighted, targets, num_nodes)
}

/// Merge heads of an `[N, H, F_out]` tensor.
///
/// Concatenation gives `[N, H * F_out]`, averaging gives `[N, F_out]`.
pub fn combine_heads(aggregated: Array3<f64>, concat: bool) -> Result<Array2<f64>> {
    let (n, h, f) = aggregated.dim();
    if concat {
        Ok(aggregated.into_shape((n, h * f))?)
    } else {
        Ok(aggregated.sum_axis(Axis(1)) / h.max(1) as f64)
    }
}
