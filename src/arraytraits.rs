// Copyright 2025-2026 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Standard-library trait implementations for arrays and views.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use crate::aliases::{Array1, Vector};
use crate::imp_prelude::*;
use crate::iterators::{Iter, IterMut};

/// Types usable as a multi-index of rank `R`: `[usize; R]`, a bare
/// `usize` at rank 1, and tuples of `usize` up to rank 6.
pub trait NdIndex<const R: usize>: Copy {
    fn into_index(self) -> [usize; R];
}

impl<const R: usize> NdIndex<R> for [usize; R] {
    #[inline]
    fn into_index(self) -> [usize; R] {
        self
    }
}

impl NdIndex<1> for usize {
    #[inline]
    fn into_index(self) -> [usize; 1] {
        [self]
    }
}

macro_rules! impl_ndindex_tuple {
    ($n:expr, ($($t:ty),*), ($($k:tt),*)) => {
        impl NdIndex<$n> for ($($t,)*) {
            #[inline]
            fn into_index(self) -> [usize; $n] {
                [$(self.$k),*]
            }
        }
    };
}

impl_ndindex_tuple!(1, (usize), (0));
impl_ndindex_tuple!(2, (usize, usize), (0, 1));
impl_ndindex_tuple!(3, (usize, usize, usize), (0, 1, 2));
impl_ndindex_tuple!(4, (usize, usize, usize, usize), (0, 1, 2, 3));
impl_ndindex_tuple!(5, (usize, usize, usize, usize, usize), (0, 1, 2, 3, 4));
impl_ndindex_tuple!(6, (usize, usize, usize, usize, usize, usize), (0, 1, 2, 3, 4, 5));

impl<A, S, const R: usize, L, Alg, I> Index<I> for ArrayBase<S, R, L, Alg>
where
    S: Storage<Elem = A>,
    L: LayoutPolicy,
    Alg: Algebra,
    I: NdIndex<R>,
{
    type Output = A;

    /// Panics on out-of-bounds indices or non-host memory.
    fn index(&self, index: I) -> &A {
        self.try_get(index).unwrap_or_else(|e| panic!("{}", e))
    }
}

impl<A, S, const R: usize, L, Alg, I> IndexMut<I> for ArrayBase<S, R, L, Alg>
where
    S: Storage<Elem = A> + StorageMut,
    L: LayoutPolicy,
    Alg: Algebra,
    I: NdIndex<R>,
{
    fn index_mut(&mut self, index: I) -> &mut A {
        self.try_get_mut(index).unwrap_or_else(|e| panic!("{}", e))
    }
}

impl<S, const R: usize, L, Alg> Clone for ArrayBase<S, R, L, Alg>
where
    S: Storage + Clone,
{
    fn clone(&self) -> Self {
        // offsets are relative to the handle base, so they survive the
        // buffer duplication untouched
        ArrayBase {
            data: self.data.clone(),
            off: self.off,
            map: self.map,
            marker: PhantomData,
        }
    }
}

/// Arrays and views compare equal when their shapes match and every pair
/// of corresponding elements is equal. Non-host arrays never compare
/// equal.
impl<A, B, S, S2, const R: usize, L, L2, Alg, Alg2> PartialEq<ArrayBase<S2, R, L2, Alg2>>
    for ArrayBase<S, R, L, Alg>
where
    A: PartialEq<B>,
    S: Storage<Elem = A>,
    S2: Storage<Elem = B>,
    L: LayoutPolicy,
    L2: LayoutPolicy,
    Alg: Algebra,
    Alg2: Algebra,
{
    fn eq(&self, rhs: &ArrayBase<S2, R, L2, Alg2>) -> bool {
        if self.shape() != rhs.shape()
            || !self.address_space().is_host_accessible()
            || !rhs.address_space().is_host_accessible()
        {
            return false;
        }
        self.indices().all(|ix| {
            self.get(ix).expect("index in shape") == rhs.get(ix).expect("index in shape")
        })
    }
}

impl<A, S, const R: usize, L, Alg> fmt::Debug for ArrayBase<S, R, L, Alg>
where
    A: fmt::Debug,
    S: Storage<Elem = A>,
    L: LayoutPolicy,
    Alg: Algebra,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("ArrayBase");
        s.field("shape", &self.shape());
        if self.address_space().is_host_accessible() && !self.is_null() {
            let elems: Vec<&A> = self
                .indices()
                .map(|ix| self.get(ix).expect("index in shape"))
                .collect();
            s.field("elems", &elems);
        } else {
            s.field("address_space", &self.address_space());
        }
        s.finish()
    }
}

impl<'a, A: 'a, S, const R: usize, L, Alg> IntoIterator for &'a ArrayBase<S, R, L, Alg>
where
    S: Storage<Elem = A>,
    L: LayoutPolicy,
    Alg: Algebra,
{
    type Item = &'a A;
    type IntoIter = Iter<'a, A, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, A: 'a, S, const R: usize, L, Alg> IntoIterator for &'a mut ArrayBase<S, R, L, Alg>
where
    S: Storage<Elem = A> + StorageMut,
    L: LayoutPolicy,
    Alg: Algebra,
{
    type Item = &'a mut A;
    type IntoIter = IterMut<'a, A, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<A> From<Vec<A>> for Array1<A> {
    fn from(v: Vec<A>) -> Array1<A> {
        let n = v.len();
        Array1::from_shape_vec([n], v).expect("length matches")
    }
}

impl<A> From<Vec<A>> for Vector<A> {
    fn from(v: Vec<A>) -> Vector<A> {
        let n = v.len();
        Vector::from_shape_vec([n], v).expect("length matches")
    }
}

impl<'a, A: Clone> From<&'a [A]> for Array1<A> {
    fn from(xs: &'a [A]) -> Array1<A> {
        Array1::from(xs.to_vec())
    }
}

impl<A> FromIterator<A> for Array1<A> {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Array1<A> {
        Array1::from(iter.into_iter().collect::<Vec<A>>())
    }
}
