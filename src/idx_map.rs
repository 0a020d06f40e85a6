// Copyright 2025-2026 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The multi-index to linear-offset mapping.
//!
//! An [`IdxMap`] is the triple of per-axis lengths, per-axis element strides
//! and the stride order (axes named slowest to fastest varying), together
//! with the [`LayoutProp`] its strides were classified under. It is immutable
//! once constructed; slicing and transposition build new maps.

use crate::errors::NdError;
use crate::layout::{LayoutInfo, LayoutPolicy, LayoutProp};
use crate::permutation;
use crate::slice::SliceItem;

/// A strided array described as equally sized contiguous runs separated by
/// a constant gap.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockLayout {
    pub n_blocks: usize,
    pub block_size: usize,
    pub block_stride: isize,
}

/// Maps a multi-index to a linear element offset.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct IdxMap<const R: usize> {
    lengths: [usize; R],
    strides: [isize; R],
    /// Axes from slowest to fastest varying.
    order: [usize; R],
    prop: LayoutProp,
}

impl<const R: usize> IdxMap<R> {
    /// Contiguous map for `lengths`, strides assigned in `order`: the
    /// fastest axis gets stride 1, each slower axis the running product.
    pub fn contiguous_with_order(lengths: [usize; R], order: [usize; R]) -> IdxMap<R> {
        assert!(R <= permutation::MAX_RANK, "rank is limited to 16");
        assert!(permutation::is_valid(&order), "invalid stride order");
        let mut strides = [0isize; R];
        let mut cum = 1isize;
        for k in (0..R).rev() {
            let axis = order[k];
            strides[axis] = cum;
            cum *= lengths[axis] as isize;
        }
        IdxMap {
            lengths,
            strides,
            order,
            prop: LayoutProp::CONTIGUOUS,
        }
    }

    /// Contiguous map in the stride order of the layout policy `L`.
    pub fn for_policy<L: LayoutPolicy>(lengths: [usize; R]) -> IdxMap<R> {
        Self::contiguous_with_order(lengths, L::stride_order::<R>())
    }

    /// Map over caller-supplied strides, classified under the stride order
    /// of `L`. Fails with `LayoutMismatch` when the strides cannot honor
    /// the property `L` asserts.
    pub fn from_shape_strides<L: LayoutPolicy>(
        lengths: [usize; R],
        strides: [isize; R],
    ) -> Result<IdxMap<R>, NdError> {
        let order = L::stride_order::<R>();
        let map = Self::from_raw_parts(lengths, strides, order);
        if map.prop.satisfies(L::PROP) {
            Ok(map)
        } else {
            Err(NdError::layout_mismatch(L::PROP, map.prop))
        }
    }

    /// Map over caller-supplied strides with the order recomputed from the
    /// stride magnitudes.
    pub fn from_lengths_strides(lengths: [usize; R], strides: [isize; R]) -> IdxMap<R> {
        let order = order_by_descending_stride(&strides);
        Self::from_raw_parts(lengths, strides, order)
    }

    pub(crate) fn from_raw_parts(
        lengths: [usize; R],
        strides: [isize; R],
        order: [usize; R],
    ) -> IdxMap<R> {
        assert!(R <= permutation::MAX_RANK, "rank is limited to 16");
        debug_assert!(permutation::is_valid(&order));
        let prop = classify(&lengths, &strides, &order);
        IdxMap {
            lengths,
            strides,
            order,
            prop,
        }
    }

    #[inline]
    pub fn rank(&self) -> usize {
        R
    }

    #[inline]
    pub fn lengths(&self) -> &[usize; R] {
        &self.lengths
    }

    #[inline]
    pub fn strides(&self) -> &[isize; R] {
        &self.strides
    }

    /// Axes from slowest to fastest varying.
    #[inline]
    pub fn stride_order(&self) -> &[usize; R] {
        &self.order
    }

    /// The property the strides were classified under at construction.
    #[inline]
    pub fn prop(&self) -> LayoutProp {
        self.prop
    }

    pub fn layout_info(&self) -> LayoutInfo {
        LayoutInfo::new(permutation::encode(&self.order), self.prop)
    }

    /// Number of elements addressed by the map.
    pub fn size(&self) -> usize {
        self.lengths.iter().product()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lengths.iter().any(|&l| l == 0)
    }

    /// Stride of the fastest-varying axis with more than one element
    /// (1 for maps without one).
    pub fn min_stride(&self) -> isize {
        for &axis in self.order.iter().rev() {
            if self.lengths[axis] > 1 {
                return self.strides[axis];
            }
        }
        1
    }

    /// Linear offset of a multi-index. No bounds checking.
    #[inline]
    pub fn offset(&self, index: [usize; R]) -> isize {
        let mut acc = 0isize;
        for k in 0..R {
            acc += index[k] as isize * self.strides[k];
        }
        acc
    }

    /// Linear offset of a multi-index, every axis checked.
    pub fn offset_checked(&self, index: [usize; R]) -> Result<isize, NdError> {
        for k in 0..R {
            if index[k] >= self.lengths[k] {
                return Err(NdError::out_of_bounds(
                    k,
                    index[k] as isize,
                    self.lengths[k],
                ));
            }
        }
        Ok(self.offset(index))
    }

    /// Recover the multi-index that produced a linear offset.
    ///
    /// Defined for maps with the `strided_1d` guarantee: the offset is
    /// divided by the minimum stride and the quotient decomposed along the
    /// stride order. For other maps the result is meaningful only for
    /// offsets that a valid multi-index can produce.
    pub fn to_idx(&self, offset: isize) -> [usize; R] {
        let s = self.min_stride();
        debug_assert!(s > 0 && offset % s == 0);
        let mut k = (offset / s) as usize;
        let mut index = [0usize; R];
        for pos in (0..R).rev() {
            let axis = self.order[pos];
            let len = self.lengths[axis];
            if len > 0 {
                index[axis] = k % len;
                k /= len;
            }
        }
        index
    }

    /// Recompute contiguity from the raw strides: axes sorted by ascending
    /// stride must chain (`stride[k+1] == stride[k] * length[k]`) and the
    /// smallest stride must be 1. Length-1 axes are free, an empty map is
    /// contiguous.
    pub fn is_contiguous(&self) -> bool {
        if self.is_empty() {
            return true;
        }
        let order = order_by_descending_stride(&self.strides);
        let mut expected = 1isize;
        for &axis in order.iter().rev() {
            if self.lengths[axis] == 1 {
                continue;
            }
            if self.strides[axis] != expected {
                return false;
            }
            expected *= self.lengths[axis] as isize;
        }
        true
    }

    /// Transpose by `perm`: axis `i` of `self` becomes axis `perm[i]` of
    /// the result. The stride order follows along, so the property is
    /// unchanged.
    pub fn transpose(&self, perm: &[usize; R]) -> IdxMap<R> {
        assert!(permutation::is_valid(perm), "invalid permutation");
        IdxMap {
            lengths: permutation::apply_inverse(perm, &self.lengths),
            strides: permutation::apply_inverse(perm, &self.strides),
            order: permutation::compose(perm, &self.order),
            prop: self.prop,
        }
    }

    /// Transpose by the reversed identity (the matrix transpose at rank 2).
    pub fn t(&self) -> IdxMap<R> {
        self.transpose(&permutation::reverse_identity::<R>())
    }

    /// Swap two axes.
    pub fn swap_axes(&self, i: usize, j: usize) -> IdxMap<R> {
        self.transpose(&permutation::transposition::<R>(i, j))
    }

    /// Apply per-axis slice items (no ellipsis; exactly one item per axis)
    /// and return the element offset of the slice origin plus the map of
    /// the surviving axes.
    ///
    /// The caller chooses `OUT`; it is a fatal contract violation for the
    /// argument list to keep a different number of axes. Out-of-range
    /// indices and bounds report `OutOfBounds`.
    pub fn slice<const OUT: usize>(
        &self,
        items: &[SliceItem; R],
    ) -> Result<(isize, IdxMap<OUT>), NdError> {
        let mut kept_len = [0usize; R];
        let mut kept_str = [0isize; R];
        // new axis number for every surviving source axis
        let mut new_axis = [usize::MAX; R];
        let mut kept = 0usize;
        let mut offset = 0isize;

        for (axis, item) in items.iter().enumerate() {
            let m = self.lengths[axis];
            let s = self.strides[axis];
            match *item {
                SliceItem::Index(i) => {
                    let i = absolute_index(i, m).ok_or_else(|| {
                        NdError::out_of_bounds(axis, i, m)
                    })?;
                    offset += i as isize * s;
                }
                SliceItem::Slice { start, end, step } => {
                    assert!(step != 0, "slice step must be nonzero");
                    let b = absolute_bound(start, m)
                        .ok_or_else(|| NdError::out_of_bounds(axis, start, m))?;
                    let e = match end {
                        Some(end) => absolute_bound(end, m)
                            .ok_or_else(|| NdError::out_of_bounds(axis, end, m))?,
                        None => m,
                    };
                    let e = e.max(b);
                    let span = e - b;

                    offset += b as isize * s;
                    // a negative step walks the restricted range from its
                    // far end
                    if step < 0 && span > 0 {
                        offset += (span - 1) as isize * s;
                    }
                    let abs_step = step.unsigned_abs();
                    kept_len[kept] = span.div_ceil(abs_step);
                    kept_str[kept] = s * step;
                    new_axis[axis] = kept;
                    kept += 1;
                }
                SliceItem::Ellipsis => unreachable!("ellipsis must be expanded before slicing"),
            }
        }

        assert!(
            kept == OUT,
            "slice arguments keep {} axes, but the result rank is {}",
            kept,
            OUT
        );

        let mut lengths = [0usize; OUT];
        let mut strides = [0isize; OUT];
        for k in 0..OUT {
            lengths[k] = kept_len[k];
            strides[k] = kept_str[k];
        }
        // surviving subsequence of the original stride order
        let mut order = [0usize; OUT];
        let mut pos = 0;
        for &axis in self.order.iter() {
            if new_axis[axis] != usize::MAX {
                order[pos] = new_axis[axis];
                pos += 1;
            }
        }
        debug_assert!(pos == OUT);

        Ok((offset, IdxMap::from_raw_parts(lengths, strides, order)))
    }

    /// Describe the map as `n_blocks` runs of `block_size` elements whose
    /// starts are `block_stride` apart, walking axes from fastest to
    /// slowest. Detection fails (`None`) when more than one stride gap
    /// exists; only a single strided dimension is permissible.
    ///
    /// Note that the decomposition assumes the slowest axis in the stride
    /// order carries the largest stride; orders violating that are reported
    /// as not detectable rather than reordered.
    pub fn block_layout(&self) -> Option<BlockLayout> {
        if self.size() == 0 {
            return None;
        }
        // fastest to slowest, length-1 axes are free
        let axes: Vec<usize> = self
            .order
            .iter()
            .rev()
            .copied()
            .filter(|&a| self.lengths[a] > 1)
            .collect();

        let mut block_size = 1usize;
        let mut i = 0;
        while i < axes.len() && self.strides[axes[i]] == block_size as isize {
            block_size *= self.lengths[axes[i]];
            i += 1;
        }
        if i == axes.len() {
            // no gap: one dense block
            return Some(BlockLayout {
                n_blocks: 1,
                block_size,
                block_stride: block_size as isize,
            });
        }

        let block_stride = self.strides[axes[i]];
        if block_stride <= 0 {
            return None;
        }
        let mut n_blocks = 1usize;
        let mut expected = block_stride;
        for &axis in &axes[i..] {
            if self.strides[axis] != expected {
                return None;
            }
            expected *= self.lengths[axis] as isize;
            n_blocks *= self.lengths[axis];
        }
        Some(BlockLayout {
            n_blocks,
            block_size,
            block_stride,
        })
    }
}

impl<const R: usize> std::fmt::Debug for IdxMap<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdxMap")
            .field("lengths", &self.lengths)
            .field("strides", &self.strides)
            .field("order", &self.order)
            .field("prop", &self.prop)
            .finish()
    }
}

/// Stable argsort of the axes, largest stride magnitude first.
fn order_by_descending_stride<const R: usize>(strides: &[isize; R]) -> [usize; R] {
    let mut order = permutation::identity::<R>();
    let mut i = 1;
    while i < R {
        let mut j = i;
        while j > 0 && strides[order[j - 1]].unsigned_abs() < strides[order[j]].unsigned_abs() {
            order.swap(j - 1, j);
            j -= 1;
        }
        i += 1;
    }
    order
}

/// Classify strides under a fixed stride order.
///
/// `strided_1d` holds when the non-trivial axes, walked fastest to slowest,
/// chain without gaps and with positive strides; `smallest_stride_is_one`
/// when the fastest non-trivial axis has stride 1. Empty maps get the full
/// property.
fn classify<const R: usize>(
    lengths: &[usize; R],
    strides: &[isize; R],
    order: &[usize; R],
) -> LayoutProp {
    let mut size = 1usize;
    for &l in lengths.iter() {
        size *= l;
    }
    if size == 0 {
        return LayoutProp::CONTIGUOUS;
    }

    let mut prop = LayoutProp::CONTIGUOUS;
    let mut expected: Option<isize> = None;
    for &axis in order.iter().rev() {
        if lengths[axis] == 1 {
            continue;
        }
        let s = strides[axis];
        match expected {
            None => {
                // fastest non-trivial axis
                if s != 1 {
                    prop = prop.meet(LayoutProp::STRIDED_1D);
                }
                if s <= 0 {
                    return LayoutProp::NONE;
                }
            }
            Some(e) => {
                if s != e {
                    prop = prop.meet(LayoutProp::SMALLEST_STRIDE_IS_ONE);
                    break;
                }
            }
        }
        expected = Some(s * lengths[axis] as isize);
    }
    prop
}

fn absolute_index(i: isize, len: usize) -> Option<usize> {
    let i = if i < 0 { i + len as isize } else { i };
    if i >= 0 && (i as usize) < len {
        Some(i as usize)
    } else {
        None
    }
}

/// Like `absolute_index` but permits the one-past-the-end position.
fn absolute_bound(i: isize, len: usize) -> Option<usize> {
    let i = if i < 0 { i + len as isize } else { i };
    if i >= 0 && (i as usize) <= len {
        Some(i as usize)
    } else {
        None
    }
}
