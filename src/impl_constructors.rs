// Copyright 2025-2026 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Constructors for owned arrays, views and raw arrays.

use std::ptr::NonNull;

use num_complex::Complex;
use num_traits::{Num, One, Zero};
use rand::Rng;

use crate::aliases::{ArrayView, ArrayViewMut, RawArray};
use crate::address_space::AddressSpace;
use crate::data_repr::UnownedRepr;
use crate::expr::Expr;
use crate::imp_prelude::*;
use crate::iterators::Indices;
use crate::layout::decode_static_extents;

impl<A, S, const R: usize, L, Alg> ArrayBase<S, R, L, Alg>
where
    S: Storage<Elem = A> + StorageOwned,
    L: LayoutPolicy,
    Alg: Algebra,
{
    /// Build an array of `shape` from a flat vector in the layout's
    /// memory order. Fails with `ShapeMismatch` when the element count or
    /// a static extent disagrees.
    pub fn from_shape_vec(shape: [usize; R], v: Vec<A>) -> Result<Self, NdError> {
        Self::check_static_extents(&shape)?;
        let map = IdxMap::for_policy::<L>(shape);
        if v.len() != map.size() {
            return Err(NdError::shape_mismatch(&shape, &[v.len()]));
        }
        Ok(unsafe { ArrayBase::from_data_off_map(S::from_vec(v), 0, map) })
    }

    /// `shape` filled with clones of `elem`.
    pub fn from_elem(shape: [usize; R], elem: A) -> Self
    where
        A: Clone,
    {
        let map = IdxMap::for_policy::<L>(shape);
        let v = vec![elem; map.size()];
        Self::from_shape_vec(shape, v).unwrap_or_else(|e| panic!("{}", e))
    }

    /// `shape` filled with zeros.
    pub fn zeros(shape: [usize; R]) -> Self
    where
        A: Zero + Clone,
    {
        Self::from_elem(shape, A::zero())
    }

    /// `shape` filled with ones.
    pub fn ones(shape: [usize; R]) -> Self
    where
        A: One + Clone,
    {
        Self::from_elem(shape, A::one())
    }

    /// `shape` filled with the element type's default value.
    pub fn default(shape: [usize; R]) -> Self
    where
        A: Default + Clone,
    {
        Self::from_elem(shape, A::default())
    }

    /// Call `f` for every index; elements are produced in the layout's
    /// memory order.
    pub fn from_shape_fn(shape: [usize; R], mut f: impl FnMut([usize; R]) -> A) -> Self {
        let map = IdxMap::for_policy::<L>(shape);
        let order = *map.stride_order();
        let mut permuted = [0usize; R];
        for k in 0..R {
            permuted[k] = shape[order[k]];
        }
        let mut v = Vec::with_capacity(map.size());
        for pos in Indices::new(permuted) {
            let mut ix = [0usize; R];
            for k in 0..R {
                ix[order[k]] = pos[k];
            }
            v.push(f(ix));
        }
        Self::from_shape_vec(shape, v).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Evaluate a lazy expression into a fresh array.
    ///
    /// Panics when the expression is scalar-only and has no shape to
    /// adopt.
    pub fn from_expr<E>(expr: E) -> Self
    where
        E: Expr<R, Elem = A>,
    {
        let shape = expr
            .dims()
            .expect("a scalar-only expression has no shape to adopt");
        Self::from_shape_fn(shape, |ix| expr.eval(ix))
    }

    /// Uniform `[0, 1)` fill (complex types sample the real and imaginary
    /// parts independently).
    pub fn random(shape: [usize; R]) -> Self
    where
        A: Random01,
    {
        let mut rng = rand::rng();
        Self::random_using(shape, &mut rng)
    }

    /// [`random`](Self::random) with a caller-supplied generator.
    pub fn random_using<G: Rng + ?Sized>(shape: [usize; R], rng: &mut G) -> Self
    where
        A: Random01,
    {
        Self::from_shape_fn(shape, |_| A::sample01(rng))
    }

    /// Fill the axes with static extents from the layout policy, taking
    /// only the dynamic ones from `dynamic` (in axis order).
    pub fn resolve_shape(dynamic: &[usize]) -> [usize; R] {
        let statics = decode_static_extents::<R>(L::STATIC_EXTENTS);
        let mut shape = [0usize; R];
        let mut taken = 0;
        for k in 0..R {
            if statics[k] != 0 {
                shape[k] = statics[k];
            } else {
                assert!(
                    taken < dynamic.len(),
                    "layout has {} dynamic axes, {} lengths given",
                    statics.iter().filter(|&&e| e == 0).count(),
                    dynamic.len()
                );
                shape[k] = dynamic[taken];
                taken += 1;
            }
        }
        assert!(
            taken == dynamic.len(),
            "layout has {} dynamic axes, {} lengths given",
            taken,
            dynamic.len()
        );
        shape
    }

    fn check_static_extents(shape: &[usize; R]) -> Result<(), NdError> {
        if L::STATIC_EXTENTS == 0 {
            return Ok(());
        }
        let statics = decode_static_extents::<R>(L::STATIC_EXTENTS);
        for k in 0..R {
            if statics[k] != 0 && statics[k] != shape[k] {
                return Err(NdError::shape_mismatch(&statics, shape));
            }
        }
        Ok(())
    }
}

impl<A, const R: usize, L, Alg> ArrayBase<HeapRepr<A>, R, L, Alg>
where
    L: LayoutPolicy,
    Alg: Algebra,
{
    /// Like [`from_elem`](ArrayBase::from_elem), reporting `OutOfMemory`
    /// instead of aborting on allocation failure.
    pub fn try_from_elem(shape: [usize; R], elem: A) -> Result<Self, NdError>
    where
        A: Clone,
    {
        Self::check_static_extents(&shape)?;
        let map = IdxMap::for_policy::<L>(shape);
        let data = HeapRepr::try_from_elem(map.size(), elem)?;
        Ok(unsafe { ArrayBase::from_data_off_map(data, 0, map) })
    }
}

// Nested literals, rank 2 and 3; rectangularity is checked.
impl<A, S, L, Alg> ArrayBase<S, 2, L, Alg>
where
    S: Storage<Elem = A> + StorageOwned,
    L: LayoutPolicy,
    Alg: Algebra,
{
    /// Build from nested rows; every row must have the same length.
    pub fn from_nested(rows: Vec<Vec<A>>) -> Result<Self, NdError>
    where
        A: Clone,
    {
        let n = rows.len();
        let m = rows.first().map_or(0, Vec::len);
        for row in &rows {
            if row.len() != m {
                return Err(NdError::shape_mismatch(&[n, m], &[n, row.len()]));
            }
        }
        let mut flat = Vec::with_capacity(n * m);
        for row in rows {
            flat.extend(row);
        }
        // the literal is row-major; from_shape_fn re-orders for the policy
        Ok(Self::from_shape_fn([n, m], |ix| flat[ix[0] * m + ix[1]].clone()))
    }
}

impl<A, S, L, Alg> ArrayBase<S, 3, L, Alg>
where
    S: Storage<Elem = A> + StorageOwned,
    L: LayoutPolicy,
    Alg: Algebra,
{
    /// Build from doubly nested rows; all inner lengths must agree.
    pub fn from_nested(planes: Vec<Vec<Vec<A>>>) -> Result<Self, NdError>
    where
        A: Clone,
    {
        let p = planes.len();
        let n = planes.first().map_or(0, Vec::len);
        let m = planes
            .first()
            .and_then(|pl| pl.first())
            .map_or(0, Vec::len);
        let mut flat = Vec::with_capacity(p * n * m);
        for plane in planes {
            if plane.len() != n {
                return Err(NdError::shape_mismatch(&[p, n, m], &[p, plane.len(), m]));
            }
            for row in plane {
                if row.len() != m {
                    return Err(NdError::shape_mismatch(&[p, n, m], &[p, n, row.len()]));
                }
                flat.extend(row);
            }
        }
        Ok(Self::from_shape_fn([p, n, m], |ix| {
            flat[(ix[0] * n + ix[1]) * m + ix[2]].clone()
        }))
    }
}

// Identity and range constructors.
impl<A, S, L> ArrayBase<S, 2, L, AlgMatrix>
where
    S: Storage<Elem = A> + StorageOwned,
    L: LayoutPolicy,
{
    /// The `n`-by-`n` identity matrix.
    pub fn eye(n: usize) -> Self
    where
        A: Zero + One,
    {
        Self::from_shape_fn([n, n], |ix| if ix[0] == ix[1] { A::one() } else { A::zero() })
    }
}

impl<A, S, L, Alg> ArrayBase<S, 1, L, Alg>
where
    S: Storage<Elem = A> + StorageOwned,
    L: LayoutPolicy,
    Alg: Algebra,
{
    /// Values from `start` (inclusive) towards `end` (exclusive) in
    /// increments of `step`; a negative step counts down.
    pub fn range(start: A, end: A, step: A) -> Self
    where
        A: Num + PartialOrd + Copy,
    {
        let mut v = Vec::new();
        let mut x = start;
        if step > A::zero() {
            while x < end {
                v.push(x);
                x = x + step;
            }
        } else {
            while x > end {
                v.push(x);
                x = x + step;
            }
        }
        let n = v.len();
        Self::from_shape_vec([n], v).unwrap_or_else(|e| panic!("{}", e))
    }
}

// Borrowed views over slices.
impl<'a, A, const R: usize> ArrayView<'a, A, R> {
    /// A read-only view of `shape` over a slice, in C order.
    pub fn from_shape(shape: [usize; R], xs: &'a [A]) -> Result<Self, NdError> {
        let map = IdxMap::for_policy::<CLayout>(shape);
        if xs.len() != map.size() {
            return Err(NdError::shape_mismatch(&shape, &[xs.len()]));
        }
        let ptr = NonNull::new(xs.as_ptr().cast_mut()).unwrap_or_else(NonNull::dangling);
        Ok(unsafe { ArrayBase::from_data_off_map(ViewRepr::new(ptr), 0, map) })
    }
}

impl<'a, A, const R: usize> ArrayViewMut<'a, A, R> {
    /// A mutable view of `shape` over a slice, in C order.
    pub fn from_shape(shape: [usize; R], xs: &'a mut [A]) -> Result<Self, NdError> {
        let map = IdxMap::for_policy::<CLayout>(shape);
        if xs.len() != map.size() {
            return Err(NdError::shape_mismatch(&shape, &[xs.len()]));
        }
        let ptr = NonNull::new(xs.as_mut_ptr()).unwrap_or_else(NonNull::dangling);
        Ok(unsafe { ArrayBase::from_data_off_map(ViewReprMut::new(ptr), 0, map) })
    }
}

impl<A, const R: usize> RawArray<A, R> {
    /// An array over borrowed raw memory.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for the product of `shape` elements in `space`
    /// for as long as the array or anything derived from it is used.
    pub unsafe fn from_raw_parts(ptr: *mut A, shape: [usize; R], space: AddressSpace) -> Self {
        let map = IdxMap::for_policy::<CLayout>(shape);
        let data = UnownedRepr::from_raw_parts(ptr, map.size(), space);
        ArrayBase::from_data_off_map(data, 0, map)
    }

    /// An empty array over the null handle.
    pub fn null() -> Self {
        unsafe {
            ArrayBase::from_data_off_map(
                UnownedRepr::null(),
                0,
                IdxMap::for_policy::<CLayout>([0; R]),
            )
        }
    }
}

/// Elements that can be drawn uniformly from `[0, 1)`.
pub trait Random01 {
    fn sample01<G: Rng + ?Sized>(rng: &mut G) -> Self;
}

impl Random01 for f32 {
    fn sample01<G: Rng + ?Sized>(rng: &mut G) -> Self {
        rng.random()
    }
}

impl Random01 for f64 {
    fn sample01<G: Rng + ?Sized>(rng: &mut G) -> Self {
        rng.random()
    }
}

impl<F: Random01> Random01 for Complex<F> {
    fn sample01<G: Rng + ?Sized>(rng: &mut G) -> Self {
        // real and imaginary parts are drawn independently
        let re = F::sample01(rng);
        let im = F::sample01(rng);
        Complex::new(re, im)
    }
}
