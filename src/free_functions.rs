// Copyright 2025-2026 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Free constructor functions for array literals and slice views.

use std::slice;

use num_traits::{Num, One, Zero};

use crate::aliases::{Array1, Array2, Array3, ArrayView1, ArrayView2, Matrix};

/// A one-dimensional array from a slice.
pub fn arr1<A: Clone>(xs: &[A]) -> Array1<A> {
    Array1::from(xs.to_vec())
}

/// A two-dimensional array from nested fixed-size rows; rectangular by
/// construction.
///
/// ```
/// use ndview::arr2;
///
/// let a = arr2(&[[1, 2, 3], [4, 5, 6]]);
/// assert_eq!(a.shape(), [2, 3]);
/// assert_eq!(a[[1, 2]], 6);
/// ```
pub fn arr2<A: Clone, const N: usize>(xs: &[[A; N]]) -> Array2<A> {
    let mut v = Vec::with_capacity(xs.len() * N);
    for row in xs {
        v.extend(row.iter().cloned());
    }
    Array2::from_shape_vec([xs.len(), N], v).expect("rectangular by construction")
}

/// A three-dimensional array from doubly nested fixed-size rows.
pub fn arr3<A: Clone, const N: usize, const M: usize>(xs: &[[[A; M]; N]]) -> Array3<A> {
    let mut v = Vec::with_capacity(xs.len() * N * M);
    for plane in xs {
        for row in plane {
            v.extend(row.iter().cloned());
        }
    }
    Array3::from_shape_vec([xs.len(), N, M], v).expect("rectangular by construction")
}

/// A read-only rank-1 view of a slice.
pub fn aview1<A>(xs: &[A]) -> ArrayView1<'_, A> {
    ArrayView1::from_shape([xs.len()], xs).expect("length matches")
}

/// A read-only rank-2 view of nested fixed-size rows.
pub fn aview2<A, const N: usize>(xs: &[[A; N]]) -> ArrayView2<'_, A> {
    // arrays of arrays are contiguous, so the flattening cast is sound
    let flat = unsafe { slice::from_raw_parts(xs.as_ptr().cast::<A>(), xs.len() * N) };
    ArrayView2::from_shape([xs.len(), N], flat).expect("length matches")
}

/// The `n`-by-`n` identity matrix.
pub fn eye<A: Zero + One>(n: usize) -> Matrix<A> {
    Matrix::eye(n)
}

/// Integer-style range `[start, end)` with step one.
pub fn arange<A: Num + PartialOrd + Copy>(start: A, end: A) -> Array1<A> {
    Array1::range(start, end, A::one())
}
