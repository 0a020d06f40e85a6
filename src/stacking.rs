//! Concatenation of arrays along an axis.

use crate::aliases::{Array, ArrayView};
use crate::imp_prelude::*;

/// Concatenate views along `axis`.
///
/// Every input must have the same shape on all other axes; the result's
/// extent on `axis` is the sum of the inputs'. Errors with `ShapeMismatch`
/// otherwise.
///
/// **Panics** if `axis` is out of bounds or no arrays are given.
pub fn concatenate<A, const R: usize>(
    axis: Axis,
    arrays: &[ArrayView<'_, A, R>],
) -> Result<Array<A, R>, NdError>
where
    A: Clone,
{
    let Axis(k) = axis;
    assert!(k < R, "axis {} out of bounds for rank {}", k, R);
    assert!(!arrays.is_empty(), "concatenate needs at least one array");

    let mut shape = arrays[0].shape();
    for other in &arrays[1..] {
        let mut expected = other.shape();
        expected[k] = shape[k];
        if expected != shape {
            return Err(NdError::shape_mismatch(&shape, &other.shape()));
        }
    }
    shape[k] = arrays.iter().map(|a| a.shape()[k]).sum();

    // per-input start positions along the axis
    let mut starts = Vec::with_capacity(arrays.len() + 1);
    let mut acc = 0usize;
    for a in arrays {
        starts.push(acc);
        acc += a.shape()[k];
    }
    starts.push(acc);

    Ok(Array::from_shape_fn(shape, |ix| {
        // last segment starting at or before the index; empty segments
        // are skipped naturally
        let seg = starts.partition_point(|&s| s <= ix[k]) - 1;
        let mut src = ix;
        src[k] -= starts[seg];
        arrays[seg].get(src).expect("index in segment").clone()
    }))
}
