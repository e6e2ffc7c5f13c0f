//! Row gathering along axis 0

use ndarray::{Array, ArrayBase, Axis, Data, RemoveAxis};

/// Gather slices of `array` along axis 0.
///
/// Output slice `k` is a copy of `array[ids[k]]`, so an `[N, ...]` input and
/// `E` ids produce an `[E, ...]` output. Ids may repeat and may come in any
/// order.
///
/// # Panics
///
/// Panics if any id is `>= array.len_of(Axis(0))`. Ids are never clamped.
pub fn index_select<S, D>(array: &ArrayBase<S, D>, ids: &[usize]) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: RemoveAxis,
{
    let mut shape = array.raw_dim();
    shape[0] = ids.len();

    let mut out = Array::zeros(shape);
    for (mut slot, &id) in out.axis_iter_mut(Axis(0)).zip(ids) {
        slot.assign(&array.index_axis(Axis(0), id));
    }
    out
}
