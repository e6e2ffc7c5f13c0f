//! Segmented reductions along axis 0
//!
//! Every function here takes a per-edge array (axis 0 has one entry per edge)
//! and an index array of the same length assigning each edge to a segment
//! (a target node). Segments that receive no edge keep the reduction's
//! identity value.

use ndarray::{Array, Array2, ArrayBase, Axis, Data, RemoveAxis};

use super::index_select;

/// Added to every segment's sum of exponentials before dividing
pub const SOFTMAX_EPSILON: f64 = 1e-16;

/// Sum slices of `src` into `num_segments` slots selected by `index`.
///
/// An `[E, ...]` input produces a `[num_segments, ...]` output. Slots that
/// no edge points at are zero.
///
/// # Panics
///
/// Panics if an index is `>= num_segments`.
pub fn scatter_add<S, D>(src: &ArrayBase<S, D>, index: &[usize], num_segments: usize) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: RemoveAxis,
{
    debug_assert_eq!(src.len_of(Axis(0)), index.len());

    let mut shape = src.raw_dim();
    shape[0] = num_segments;

    let mut out = Array::zeros(shape);
    for (contribution, &segment) in src.axis_iter(Axis(0)).zip(index) {
        let mut slot = out.index_axis_mut(Axis(0), segment);
        slot += &contribution;
    }
    out
}

/// Per-segment, per-column maximum of an `[E, H]` array.
///
/// Slots that no edge points at hold `-inf`.
///
/// # Panics
///
/// Panics if an index is `>= num_segments`.
pub fn scatter_max<S>(src: &ArrayBase<S, ndarray::Ix2>, index: &[usize], num_segments: usize) -> Array2<f64>
where
    S: Data<Elem = f64>,
{
    debug_assert_eq!(src.nrows(), index.len());

    let mut out = Array2::from_elem((num_segments, src.ncols()), f64::NEG_INFINITY);
    for (row, &segment) in src.outer_iter().zip(index) {
        out.row_mut(segment).zip_mut_with(&row, |current, &value| {
            if value > *current {
                *current = value;
            }
        });
    }
    out
}

/// Softmax of `[E, H]` logits computed independently inside each segment.
///
/// For every segment and column the returned weights of the edges in that
/// segment sum to one. The per-segment maximum is subtracted before
/// exponentiating so large logits do not overflow.
///
/// # Panics
///
/// Panics if an index is `>= num_segments`.
pub fn scatter_softmax<S>(logits: &ArrayBase<S, ndarray::Ix2>, index: &[usize], num_segments: usize) -> Array2<f64>
where
    S: Data<Elem = f64>,
{
    let segment_max = scatter_max(logits, index, num_segments);
    let shifted = logits - &index_select(&segment_max, index);
    let exp = shifted.mapv(f64::exp);

    let segment_sum = scatter_add(&exp, index, num_segments);
    let denominator = index_select(&segment_sum, index) + SOFTMAX_EPSILON;

    exp / denominator
}
