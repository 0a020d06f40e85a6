// Copyright 2025-2026 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Methods shared by arrays and views: shape queries, element access,
//! slicing, transposition, reshaping, assignment and iteration.

use std::ptr::NonNull;

use crate::address_space::AddressSpace;
use crate::aliases::{ArrayView, ArrayViewMut};
use crate::arraytraits::NdIndex;
use crate::expr::Expr;
use crate::idx_map::BlockLayout;
use crate::imp_prelude::*;
use crate::iterators::{Indices, Iter, IterMut, LinearIter};
use crate::layout::{LayoutInfo, LayoutProp};
use crate::permutation;
use crate::slice::SliceArgs;

fn nonnull_or_dangling<A>(ptr: *const A) -> NonNull<A> {
    NonNull::new(ptr.cast_mut()).unwrap_or_else(NonNull::dangling)
}

impl<A, S, const R: usize, L, Alg> ArrayBase<S, R, L, Alg>
where
    S: Storage<Elem = A>,
    L: LayoutPolicy,
    Alg: Algebra,
{
    /// The extent of every axis.
    #[inline]
    pub fn shape(&self) -> [usize; R] {
        *self.map.lengths()
    }

    /// Per-axis element strides.
    #[inline]
    pub fn strides(&self) -> [isize; R] {
        *self.map.strides()
    }

    /// Number of axes.
    #[inline]
    pub fn ndim(&self) -> usize {
        R
    }

    /// Total number of elements.
    #[inline]
    pub fn size(&self) -> usize {
        self.map.size()
    }

    /// Same as [`size`](Self::size).
    #[inline]
    pub fn len(&self) -> usize {
        self.map.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The index map: lengths, strides, stride order and layout property.
    #[inline]
    pub fn idx_map(&self) -> &IdxMap<R> {
        &self.map
    }

    /// The layout property the map was classified under.
    #[inline]
    pub fn layout_prop(&self) -> LayoutProp {
        self.map.prop()
    }

    #[inline]
    pub fn layout_info(&self) -> LayoutInfo {
        self.map.layout_info()
    }

    /// Recompute contiguity from the raw strides.
    pub fn is_contiguous(&self) -> bool {
        self.map.is_contiguous()
    }

    /// Axes from slowest to fastest varying.
    #[inline]
    pub fn stride_order(&self) -> [usize; R] {
        *self.map.stride_order()
    }

    /// The block decomposition of the underlying layout, when one exists.
    pub fn block_layout(&self) -> Option<BlockLayout> {
        self.map.block_layout()
    }

    /// Stride of the fastest-varying non-trivial axis.
    #[inline]
    pub fn min_stride(&self) -> isize {
        self.map.min_stride()
    }

    /// Where the elements live.
    #[inline]
    pub fn address_space(&self) -> AddressSpace {
        self.data.address_space()
    }

    /// Whether the handle points at nothing.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.data.is_null()
    }

    /// Pointer to the element at the map's origin.
    #[inline]
    pub(crate) fn base_ptr(&self) -> *const A {
        self.data.as_base_ptr().wrapping_offset(self.off)
    }

    #[inline]
    pub(crate) fn base_ptr_mut(&mut self) -> *mut A
    where
        S: StorageMut,
    {
        self.data.as_base_ptr_mut().wrapping_offset(self.off)
    }

    /// A reference to the element at `index`, or `None` when out of
    /// bounds or when the memory is not host accessible.
    pub fn get<I: NdIndex<R>>(&self, index: I) -> Option<&A> {
        self.try_get(index).ok()
    }

    /// A reference to the element at `index`, with the violated contract
    /// on failure.
    pub fn try_get<I: NdIndex<R>>(&self, index: I) -> Result<&A, NdError> {
        self.data.address_space().expect_host()?;
        let offset = self.map.offset_checked(index.into_index())?;
        Ok(unsafe { &*self.base_ptr().offset(offset) })
    }

    /// Unchecked element access.
    ///
    /// # Safety
    ///
    /// `index` must be in bounds on every axis, and the memory host
    /// accessible.
    #[inline]
    pub unsafe fn uget<I: NdIndex<R>>(&self, index: I) -> &A {
        let ix = index.into_index();
        debug_assert!(self.map.offset_checked(ix).is_ok());
        &*self.base_ptr().offset(self.map.offset(ix))
    }

    /// The first element in memory order, when there is one.
    pub fn first(&self) -> Option<&A> {
        if self.is_empty() {
            None
        } else {
            self.get([0; R])
        }
    }

    /// Iterate over references in stride order: a contiguous array is
    /// visited in increasing memory order.
    pub fn iter(&self) -> Iter<'_, A, R> {
        unsafe { Iter::new(self.base_ptr(), &self.map) }
    }

    /// Every multi-index of the shape, last axis fastest.
    pub fn indices(&self) -> Indices<R> {
        Indices::new(self.shape())
    }

    /// Iterate over `(index, &element)` pairs in C index order.
    pub fn indexed_iter<'a>(&'a self) -> impl Iterator<Item = ([usize; R], &'a A)>
    where
        A: 'a,
    {
        self.indices()
            .map(move |ix| (ix, self.get(ix).expect("index in shape")))
    }

    /// A borrowed view of the whole array, keeping the algebra tag.
    pub fn view(&self) -> ArrayBase<ViewRepr<'_, A>, R, L::AfterSlice, Alg> {
        unsafe {
            ArrayBase::from_data_off_map(
                ViewRepr::new(nonnull_or_dangling(self.base_ptr())),
                0,
                self.map,
            )
        }
    }

    /// A borrowed view with generic array algebra, read-only by
    /// construction.
    pub fn as_array_view(&self) -> ArrayView<'_, A, R> {
        unsafe {
            ArrayBase::from_data_off_map(
                ViewRepr::new(nonnull_or_dangling(self.base_ptr())),
                0,
                self.map,
            )
        }
    }

    /// Slice into a borrowed view of rank `OUT`.
    ///
    /// The argument is a tuple of indices, ranges and at most one
    /// [`Ellipsis`](crate::Ellipsis); see [`SliceArgs`]. `OUT` must equal
    /// the number of range arguments after ellipsis expansion (usually
    /// inferred). Panics on out-of-bounds arguments.
    pub fn slice<const OUT: usize, I: SliceArgs<R>>(&self, info: I) -> ArrayView<'_, A, OUT> {
        self.try_slice(info).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Fallible [`slice`](Self::slice).
    pub fn try_slice<const OUT: usize, I: SliceArgs<R>>(
        &self,
        info: I,
    ) -> Result<ArrayView<'_, A, OUT>, NdError> {
        self.data.address_space().expect_host()?;
        let items = info.normalize();
        let (offset, map) = self.map.slice::<OUT>(&items)?;
        let origin = self.base_ptr().wrapping_offset(offset);
        Ok(unsafe { ArrayBase::from_data_off_map(ViewRepr::new(nonnull_or_dangling(origin)), 0, map) })
    }

    /// Transposed view: axis `i` of `self` becomes axis `perm[i]`.
    pub fn transpose(&self, perm: [usize; R]) -> ArrayBase<ViewRepr<'_, A>, R, CStrideLayout, Alg> {
        unsafe {
            ArrayBase::from_data_off_map(
                ViewRepr::new(nonnull_or_dangling(self.base_ptr())),
                0,
                self.map.transpose(&perm),
            )
        }
    }

    /// Transpose by the reversed identity; on matrices, the matrix
    /// transpose.
    pub fn t(&self) -> ArrayBase<ViewRepr<'_, A>, R, CStrideLayout, Alg> {
        self.transpose(permutation::reverse_identity::<R>())
    }

    /// View with axes `i` and `j` swapped.
    pub fn swap_axes(&self, i: usize, j: usize) -> ArrayBase<ViewRepr<'_, A>, R, CStrideLayout, Alg> {
        self.transpose(permutation::transposition::<R>(i, j))
    }

    /// Reinterpret the elements under a new shape, as a view.
    ///
    /// Requires the array to be contiguous in its policy's stride order;
    /// otherwise the elements cannot be renumbered without copying and the
    /// call fails with `LayoutMismatch`.
    pub fn reshape<const R2: usize>(
        &self,
        shape: [usize; R2],
    ) -> Result<ArrayView<'_, A, R2>, NdError> {
        self.reshape_check(&shape)?;
        let map = IdxMap::contiguous_with_order(shape, L::stride_order::<R2>());
        let origin = self.base_ptr();
        Ok(unsafe { ArrayBase::from_data_off_map(ViewRepr::new(nonnull_or_dangling(origin)), 0, map) })
    }

    fn reshape_check<const R2: usize>(&self, shape: &[usize; R2]) -> Result<(), NdError> {
        self.data.address_space().expect_host()?;
        let new_size: usize = shape.iter().product();
        if new_size != self.size() {
            return Err(NdError::shape_mismatch(shape, self.map.lengths()));
        }
        if !self.is_contiguous() || self.map.stride_order() != &L::stride_order::<R>() {
            return Err(NdError::layout_mismatch(LayoutProp::CONTIGUOUS, self.map.prop()));
        }
        Ok(())
    }

    /// Consuming [`reshape`](Self::reshape): the storage moves to the new
    /// array.
    pub fn into_shape<const R2: usize>(
        self,
        shape: [usize; R2],
    ) -> Result<ArrayBase<S, R2, L, Alg>, NdError> {
        self.reshape_check(&shape)?;
        let map = IdxMap::contiguous_with_order(shape, L::stride_order::<R2>());
        Ok(unsafe { ArrayBase::from_data_off_map(self.data, self.off, map) })
    }

    /// Copy into a freshly allocated C-order [`Array`](crate::Array).
    pub fn to_owned(&self) -> crate::Array<A, R>
    where
        A: Clone,
    {
        let map = IdxMap::for_policy::<CLayout>(self.shape());
        let mut v = Vec::with_capacity(map.size());
        for ix in Indices::new(self.shape()) {
            v.push(self.get(ix).expect("index in shape").clone());
        }
        unsafe { ArrayBase::from_data_off_map(HeapRepr::from_vec(v), 0, map) }
    }
}

// Mutating methods.
impl<A, S, const R: usize, L, Alg> ArrayBase<S, R, L, Alg>
where
    S: Storage<Elem = A> + StorageMut,
    L: LayoutPolicy,
    Alg: Algebra,
{
    pub fn get_mut<I: NdIndex<R>>(&mut self, index: I) -> Option<&mut A> {
        self.try_get_mut(index).ok()
    }

    pub fn try_get_mut<I: NdIndex<R>>(&mut self, index: I) -> Result<&mut A, NdError> {
        self.data.address_space().expect_host()?;
        self.data.ensure_unique();
        let offset = self.map.offset_checked(index.into_index())?;
        Ok(unsafe { &mut *self.base_ptr_mut().offset(offset) })
    }

    /// Unchecked mutable element access.
    ///
    /// # Safety
    ///
    /// As [`uget`](Self::uget); additionally the storage must already be
    /// uniquely owned (shared handles detach in the checked paths).
    #[inline]
    pub unsafe fn uget_mut<I: NdIndex<R>>(&mut self, index: I) -> &mut A {
        let ix = index.into_index();
        debug_assert!(self.map.offset_checked(ix).is_ok());
        &mut *self.base_ptr_mut().offset(self.map.offset(ix))
    }

    pub fn first_mut(&mut self) -> Option<&mut A> {
        if self.is_empty() {
            None
        } else {
            self.get_mut([0; R])
        }
    }

    /// Iterate over mutable references in stride order.
    pub fn iter_mut(&mut self) -> IterMut<'_, A, R> {
        self.data.ensure_unique();
        let map = self.map;
        let ptr = self.base_ptr_mut();
        unsafe { IterMut::new(ptr, &map) }
    }

    /// A mutable borrowed view of the whole array.
    pub fn view_mut(&mut self) -> ArrayBase<ViewReprMut<'_, A>, R, L::AfterSlice, Alg> {
        self.data.ensure_unique();
        let map = self.map;
        let origin = self.base_ptr_mut();
        unsafe {
            ArrayBase::from_data_off_map(ViewReprMut::new(nonnull_or_dangling(origin)), 0, map)
        }
    }

    /// Mutable [`slice`](Self::slice).
    pub fn slice_mut<const OUT: usize, I: SliceArgs<R>>(
        &mut self,
        info: I,
    ) -> ArrayViewMut<'_, A, OUT> {
        self.try_slice_mut(info).unwrap_or_else(|e| panic!("{}", e))
    }

    pub fn try_slice_mut<const OUT: usize, I: SliceArgs<R>>(
        &mut self,
        info: I,
    ) -> Result<ArrayViewMut<'_, A, OUT>, NdError> {
        self.data.address_space().expect_host()?;
        self.data.ensure_unique();
        let items = info.normalize();
        let (offset, map) = self.map.slice::<OUT>(&items)?;
        let origin = self.base_ptr_mut().wrapping_offset(offset);
        Ok(unsafe {
            ArrayBase::from_data_off_map(ViewReprMut::new(nonnull_or_dangling(origin)), 0, map)
        })
    }

    /// Walk every element mutably together with its index, in C index
    /// order.
    pub(crate) fn for_each_indexed_mut(&mut self, mut f: impl FnMut([usize; R], &mut A)) {
        self.data.ensure_unique();
        let map = self.map;
        let ptr = self.base_ptr_mut();
        for ix in Indices::new(*map.lengths()) {
            unsafe { f(ix, &mut *ptr.offset(map.offset(ix))) }
        }
    }

    /// Broadcast `x` into every element, regardless of algebra.
    pub(crate) fn fill_all(&mut self, x: A)
    where
        A: Clone,
    {
        for elem in self.iter_mut() {
            *elem = x.clone();
        }
    }

    /// Copy the elements of `rhs` into `self`; the shapes must match.
    ///
    /// Uses a single strided loop when both sides share their stride order
    /// and are strided-1d, a blockwise copy when both decompose into equal
    /// blocks, and an elementwise traversal otherwise.
    pub fn assign<S2, L2, Alg2>(&mut self, rhs: &ArrayBase<S2, R, L2, Alg2>)
    where
        A: Clone,
        S2: Storage<Elem = A>,
        L2: LayoutPolicy,
        Alg2: Algebra,
    {
        self.try_assign(rhs).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Fallible [`assign`](Self::assign): `ShapeMismatch` on differing
    /// shapes, `AddressSpaceMismatch` when either side is off host.
    pub fn try_assign<S2, L2, Alg2>(
        &mut self,
        rhs: &ArrayBase<S2, R, L2, Alg2>,
    ) -> Result<(), NdError>
    where
        A: Clone,
        S2: Storage<Elem = A>,
        L2: LayoutPolicy,
        Alg2: Algebra,
    {
        if self.shape() != rhs.shape() {
            return Err(NdError::shape_mismatch(rhs.map.lengths(), self.map.lengths()));
        }
        let joined = self.data.address_space().combine(rhs.data.address_space())?;
        joined.expect_host()?;
        self.data.ensure_unique();

        let dst_map = self.map;
        let src_map = rhs.map;
        let dst = self.base_ptr_mut();
        let src = rhs.base_ptr();

        if dst_map.stride_order() == src_map.stride_order() {
            // one strided loop covers both sides
            if dst_map.prop().has_strided_1d() && src_map.prop().has_strided_1d() {
                let ds = dst_map.min_stride();
                let ss = src_map.min_stride();
                unsafe {
                    for k in 0..dst_map.size() as isize {
                        *dst.offset(k * ds) = (*src.offset(k * ss)).clone();
                    }
                }
                return Ok(());
            }
            // equal block decompositions copy run by run
            if let (Some(d), Some(s)) = (dst_map.block_layout(), src_map.block_layout()) {
                if d.block_size == s.block_size && d.n_blocks == s.n_blocks {
                    unsafe {
                        for b in 0..d.n_blocks as isize {
                            let to = std::slice::from_raw_parts_mut(
                                dst.offset(b * d.block_stride),
                                d.block_size,
                            );
                            let from = std::slice::from_raw_parts(
                                src.offset(b * s.block_stride),
                                s.block_size,
                            );
                            to.clone_from_slice(from);
                        }
                    }
                    return Ok(());
                }
            }
        }

        for ix in Indices::new(*dst_map.lengths()) {
            unsafe {
                *dst.offset(dst_map.offset(ix)) = (*src.offset(src_map.offset(ix))).clone();
            }
        }
        Ok(())
    }

    /// Evaluate a lazy expression into `self`, elementwise. A scalar-only
    /// expression broadcasts; anything shaped must match `self`.
    pub fn assign_expr<E>(&mut self, expr: E)
    where
        E: Expr<R, Elem = A>,
    {
        self.try_assign_expr(expr).unwrap_or_else(|e| panic!("{}", e))
    }

    pub fn try_assign_expr<E>(&mut self, expr: E) -> Result<(), NdError>
    where
        E: Expr<R, Elem = A>,
    {
        if let Some(dims) = expr.dims() {
            if dims != self.shape() {
                return Err(NdError::shape_mismatch(&dims, self.map.lengths()));
            }
        }
        self.data.address_space().expect_host()?;
        self.data.ensure_unique();
        let map = self.map;
        let ptr = self.base_ptr_mut();
        for ix in Indices::new(*map.lengths()) {
            unsafe {
                *ptr.offset(map.offset(ix)) = expr.eval(ix);
            }
        }
        Ok(())
    }
}

// Methods of arrays that own their elements.
impl<A, S, const R: usize, L, Alg> ArrayBase<S, R, L, Alg>
where
    S: Storage<Elem = A> + StorageOwned,
    L: LayoutPolicy,
    Alg: Algebra,
{
    /// Move the elements into a reference-counted array.
    pub fn into_shared(self) -> ArrayBase<SharedRepr<A>, R, L, Alg> {
        unsafe { ArrayBase::from_data_off_map(self.data.into_shared(), self.off, self.map) }
    }
}

impl<A, S, const R: usize, L, Alg> ArrayBase<S, R, L, Alg>
where
    S: Storage<Elem = A> + StorageOwned + StorageMut,
    L: LayoutPolicy,
    Alg: Algebra,
{
    /// Change the shape in place.
    ///
    /// The storage is kept when the total size is unchanged; otherwise it
    /// is reallocated and the contents are unspecified (default values).
    /// References and views into the old storage do not survive either
    /// way — the borrow checker enforces what the contract demands.
    pub fn resize(&mut self, shape: [usize; R])
    where
        A: Clone + Default,
    {
        let map = IdxMap::for_policy::<L>(shape);
        if map.size() != self.map.size() {
            self.data = S::from_vec(vec![A::default(); map.size()]);
            self.off = 0;
        }
        self.map = map;
    }
}

// Rank-1 arrays get the constant-stride iterator.
impl<A, S, L, Alg> ArrayBase<S, 1, L, Alg>
where
    S: Storage<Elem = A>,
    L: LayoutPolicy,
    Alg: Algebra,
{
    /// Random-access iteration with the array's constant stride.
    pub fn linear_iter(&self) -> LinearIter<'_, A> {
        unsafe { LinearIter::new(self.base_ptr(), self.map.lengths()[0], self.map.strides()[0]) }
    }
}

// Scalar fill, algebra by algebra: arrays and vectors broadcast.
impl<A, S, const R: usize, L> ArrayBase<S, R, L, AlgArray>
where
    S: Storage<Elem = A> + StorageMut,
    L: LayoutPolicy,
{
    /// Set every element to `x`.
    pub fn fill(&mut self, x: A)
    where
        A: Clone,
    {
        self.fill_all(x);
    }
}

impl<A, S, L> ArrayBase<S, 1, L, AlgVector>
where
    S: Storage<Elem = A> + StorageMut,
    L: LayoutPolicy,
{
    /// Set every element to `x`.
    pub fn fill(&mut self, x: A)
    where
        A: Clone,
    {
        self.fill_all(x);
    }
}

// Matrices fill the diagonal and zero everything else.
impl<A, S, L> ArrayBase<S, 2, L, AlgMatrix>
where
    S: Storage<Elem = A> + StorageMut,
    L: LayoutPolicy,
{
    /// Matrix scalar assignment: `x` along the (shorter) diagonal, zero
    /// off it.
    pub fn fill(&mut self, x: A)
    where
        A: Clone + num_traits::Zero,
    {
        self.for_each_indexed_mut(|ix, elem| {
            *elem = if ix[0] == ix[1] { x.clone() } else { A::zero() };
        });
    }
}
