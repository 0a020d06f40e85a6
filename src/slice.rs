// Copyright 2025-2026 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Slice argument types.
//!
//! Slicing takes a tuple with one item per axis: an integer fixes an axis
//! (and drops it from the result), a range keeps it, and [`Ellipsis`]
//! stands for as many full ranges as needed to reach the array's rank.
//! Negative indices count from the back of the axis, and negative steps
//! walk a range from its far end.
//!
//! ```
//! use ndview::{Array, Ellipsis, Slice};
//!
//! let a = Array::<i32, 3>::zeros([2, 3, 4]);
//! let v = a.slice::<2, _>((1, .., Slice::new(0, None, 2)));
//! assert_eq!(v.shape(), [3, 2]);
//! let w = a.slice::<2, _>((Ellipsis, 0));
//! assert_eq!(w.shape(), [2, 3]);
//! ```

use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

use crate::permutation::MAX_RANK;

/// A range with step size.
///
/// `end` is an exclusive index. Negative `start` or `end` are counted from
/// the back of the axis; `end == None` means the full length. `step` may be
/// negative but not zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Slice {
    pub start: isize,
    pub end: Option<isize>,
    pub step: isize,
}

impl Slice {
    /// Create a new `Slice` with the given extents.
    ///
    /// See also the `From` impls, converting from ranges; for example
    /// `Slice::from(i..)` or `Slice::from(j..k)`.
    pub fn new(start: isize, end: Option<isize>, step: isize) -> Slice {
        debug_assert_ne!(step, 0, "Slice::new: step must be nonzero");
        Slice { start, end, step }
    }

    /// Multiply the step size by `step`.
    #[inline]
    pub fn step_by(self, step: isize) -> Self {
        debug_assert_ne!(step, 0, "Slice::step_by: step must be nonzero");
        Slice {
            step: self.step * step,
            ..self
        }
    }
}

/// Token standing for as many full ranges as the rank requires.
///
/// At most one may appear in a slice argument list.
#[derive(Copy, Clone, Debug)]
pub struct Ellipsis;

/// One slice argument: an index, a range with step, or the ellipsis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SliceItem {
    /// Fix the axis at an index; the axis is dropped from the result.
    Index(isize),
    /// Keep the axis, restricted to a stepped range.
    Slice {
        start: isize,
        end: Option<isize>,
        step: isize,
    },
    /// Expands to full ranges over the remaining axes.
    Ellipsis,
}

impl SliceItem {
    /// The full range of an axis.
    #[inline]
    pub const fn full() -> SliceItem {
        SliceItem::Slice {
            start: 0,
            end: None,
            step: 1,
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, SliceItem::Index(_))
    }
}

macro_rules! impl_slice_from_range {
    ($self:ty, $constructor:path, $index:ty) => {
        impl From<Range<$index>> for $self {
            #[inline]
            fn from(r: Range<$index>) -> $self {
                $constructor {
                    start: r.start as isize,
                    end: Some(r.end as isize),
                    step: 1,
                }
            }
        }

        impl From<RangeInclusive<$index>> for $self {
            #[inline]
            fn from(r: RangeInclusive<$index>) -> $self {
                let end = *r.end() as isize;
                $constructor {
                    start: *r.start() as isize,
                    end: if end == -1 { None } else { Some(end + 1) },
                    step: 1,
                }
            }
        }

        impl From<RangeFrom<$index>> for $self {
            #[inline]
            fn from(r: RangeFrom<$index>) -> $self {
                $constructor {
                    start: r.start as isize,
                    end: None,
                    step: 1,
                }
            }
        }

        impl From<RangeTo<$index>> for $self {
            #[inline]
            fn from(r: RangeTo<$index>) -> $self {
                $constructor {
                    start: 0,
                    end: Some(r.end as isize),
                    step: 1,
                }
            }
        }

        impl From<RangeToInclusive<$index>> for $self {
            #[inline]
            fn from(r: RangeToInclusive<$index>) -> $self {
                let end = r.end as isize;
                $constructor {
                    start: 0,
                    end: if end == -1 { None } else { Some(end + 1) },
                    step: 1,
                }
            }
        }
    };
}
impl_slice_from_range!(Slice, Slice, isize);
impl_slice_from_range!(Slice, Slice, usize);
impl_slice_from_range!(Slice, Slice, i32);
impl_slice_from_range!(SliceItem, SliceItem::Slice, isize);
impl_slice_from_range!(SliceItem, SliceItem::Slice, usize);
impl_slice_from_range!(SliceItem, SliceItem::Slice, i32);

impl From<RangeFull> for Slice {
    #[inline]
    fn from(_: RangeFull) -> Slice {
        Slice {
            start: 0,
            end: None,
            step: 1,
        }
    }
}

impl From<RangeFull> for SliceItem {
    #[inline]
    fn from(_: RangeFull) -> SliceItem {
        SliceItem::full()
    }
}

impl From<Slice> for SliceItem {
    #[inline]
    fn from(s: Slice) -> SliceItem {
        SliceItem::Slice {
            start: s.start,
            end: s.end,
            step: s.step,
        }
    }
}

impl From<Ellipsis> for SliceItem {
    #[inline]
    fn from(_: Ellipsis) -> SliceItem {
        SliceItem::Ellipsis
    }
}

macro_rules! impl_sliceitem_from_index {
    ($index:ty) => {
        impl From<$index> for SliceItem {
            #[inline]
            fn from(i: $index) -> SliceItem {
                SliceItem::Index(i as isize)
            }
        }
    };
}
impl_sliceitem_from_index!(isize);
impl_sliceitem_from_index!(usize);
impl_sliceitem_from_index!(i32);

/// Argument lists accepted by `slice`/`slice_mut` on rank-`R` arrays.
///
/// Implemented for tuples of up to eight items convertible to
/// [`SliceItem`], for `[SliceItem; N]` and for `&[SliceItem]`. The empty
/// tuple selects the whole array.
pub trait SliceArgs<const R: usize>: Sized {
    /// One item per axis, ellipsis expanded.
    ///
    /// Panics when the items cannot be matched to `R` axes or when more
    /// than one ellipsis appears; those are contract violations, not
    /// recoverable errors.
    fn normalize(self) -> [SliceItem; R];
}

impl<const R: usize, const N: usize> SliceArgs<R> for [SliceItem; N] {
    fn normalize(self) -> [SliceItem; R] {
        expand_items(&self)
    }
}

impl<const R: usize> SliceArgs<R> for &[SliceItem] {
    fn normalize(self) -> [SliceItem; R] {
        expand_items(self)
    }
}

macro_rules! impl_slice_args_tuple {
    ($($name:ident)*) => {
        impl<const R: usize, $($name,)*> SliceArgs<R> for ($($name,)*)
        where
            $($name: Into<SliceItem>,)*
        {
            fn normalize(self) -> [SliceItem; R] {
                #[allow(non_snake_case)]
                let ($($name,)*) = self;
                expand_items(&[$($name.into(),)*])
            }
        }
    };
}

impl_slice_args_tuple!();
impl_slice_args_tuple!(A);
impl_slice_args_tuple!(A B);
impl_slice_args_tuple!(A B C);
impl_slice_args_tuple!(A B C D);
impl_slice_args_tuple!(A B C D E);
impl_slice_args_tuple!(A B C D E F);
impl_slice_args_tuple!(A B C D E F G);
impl_slice_args_tuple!(A B C D E F G H);

/// Expand one ellipsis into full ranges and check the item count.
///
/// An empty list is the whole-array slice.
fn expand_items<const R: usize>(items: &[SliceItem]) -> [SliceItem; R] {
    assert!(R <= MAX_RANK);
    let mut out = [SliceItem::full(); R];
    if items.is_empty() {
        return out;
    }

    let n_ellipsis = items
        .iter()
        .filter(|i| matches!(i, SliceItem::Ellipsis))
        .count();
    assert!(
        n_ellipsis <= 1,
        "at most one ellipsis is permitted in a slice"
    );
    let concrete = items.len() - n_ellipsis;
    if n_ellipsis == 0 {
        assert!(
            concrete == R,
            "{} slice arguments do not match rank {}",
            concrete,
            R
        );
    } else {
        assert!(
            concrete <= R,
            "{} slice arguments (plus ellipsis) exceed rank {}",
            concrete,
            R
        );
    }

    let mut axis = 0;
    for item in items {
        match item {
            SliceItem::Ellipsis => axis += R - concrete,
            other => {
                out[axis] = *other;
                axis += 1;
            }
        }
    }
    debug_assert!(axis == R);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(SliceItem::from(3usize), SliceItem::Index(3));
        assert_eq!(SliceItem::from(-1), SliceItem::Index(-1));
        assert_eq!(SliceItem::from(..), SliceItem::full());
        assert_eq!(
            SliceItem::from(1..4),
            SliceItem::Slice {
                start: 1,
                end: Some(4),
                step: 1
            }
        );
        assert_eq!(
            SliceItem::from(Slice::from(2..).step_by(-3)),
            SliceItem::Slice {
                start: 2,
                end: None,
                step: -3
            }
        );
        assert_eq!(
            SliceItem::from(..=-1),
            SliceItem::Slice {
                start: 0,
                end: None,
                step: 1
            }
        );
    }

    #[test]
    fn ellipsis_expansion() {
        let items: [SliceItem; 3] = (Ellipsis, 1).normalize();
        assert_eq!(
            items,
            [SliceItem::full(), SliceItem::full(), SliceItem::Index(1)]
        );
        let items: [SliceItem; 3] = (0, Ellipsis, 1).normalize();
        assert_eq!(
            items,
            [SliceItem::Index(0), SliceItem::full(), SliceItem::Index(1)]
        );
        let items: [SliceItem; 2] = ().normalize();
        assert_eq!(items, [SliceItem::full(); 2]);
        // an ellipsis may expand to nothing
        let items: [SliceItem; 1] = (Ellipsis, 2).normalize();
        assert_eq!(items, [SliceItem::Index(2)]);
    }

    #[test]
    #[should_panic(expected = "at most one ellipsis")]
    fn double_ellipsis_is_fatal() {
        let _: [SliceItem; 4] = (Ellipsis, 0, Ellipsis).normalize();
    }

    #[test]
    #[should_panic(expected = "do not match rank")]
    fn arity_mismatch_is_fatal() {
        let _: [SliceItem; 3] = (0, 1).normalize();
    }
}
