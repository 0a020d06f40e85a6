// Copyright 2025-2026 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `ndview` crate provides generic multi-dimensional arrays and
//! lightweight non-owning views over strided memory.
//!
//! - [`ArrayBase`] — the generic container, parametrized by storage handle,
//!   rank, layout policy and algebra tag. [`Array`], [`Matrix`], [`Vector`],
//!   [`ArrayView`] and friends are aliases over it.
//! - [`IdxMap`] — the multi-index to linear-offset mapping: lengths,
//!   strides, stride order and the [`LayoutProp`] lattice of layout
//!   guarantees.
//! - Slicing with integers, ranges and [`Ellipsis`] produces views sharing
//!   the storage; see [`ArrayBase::slice`].
//! - Arithmetic builds lazy [`Expr`] trees that evaluate elementwise on
//!   assignment; matrices (`Matrix`) treat `scalar ± matrix` as acting on
//!   the diagonal only.
//! - Storage handles span exclusive heap, inline, small-size-optimized,
//!   reference-counted and borrowed memory, with an [`AddressSpace`]
//!   discipline that keeps device pointers out of host code.
//!
//! ## Highlights
//!
//! ```
//! use ndview::prelude::*;
//!
//! let a = Array::from_shape_vec([2, 3], vec![0, 1, 2, 3, 4, 5]).unwrap();
//! assert_eq!(a[[1, 2]], 5);
//!
//! // views share storage
//! let mut b = a.to_owned();
//! let mut v = b.slice_mut::<2, _>((.., 1..3));
//! v.fill(9);
//! assert_eq!(b[[0, 1]], 9);
//!
//! // lazy expressions
//! let c = Array::from_expr(&a + &a);
//! assert_eq!(c[[1, 2]], 10);
//! ```
//!
//! Rank is a compile-time constant (at most 16). Bounds-checked access is
//! the default; `uget`/`uget_mut` are the unsafe opt-outs.

mod address_space;
mod algebra;
mod aliases;
mod arraytraits;
mod data_repr;
mod data_traits;
mod errors;
mod expr;
mod free_functions;
mod idx_map;
mod impl_constructors;
mod impl_methods;
mod impl_ops;
mod iterators;
pub mod layout;
pub mod permutation;
mod slice;
mod stacking;

use std::marker::PhantomData;

pub use crate::address_space::AddressSpace;
pub use crate::algebra::{AlgArray, AlgMatrix, AlgNone, AlgVector, Algebra};
pub use crate::aliases::*;
pub use crate::arraytraits::NdIndex;
pub use crate::data_repr::{
    HeapRepr, SharedRepr, SsoRepr, StackRepr, UnownedRepr, ViewRepr, ViewReprMut,
};
pub use crate::data_traits::{Storage, StorageMut, StorageOwned, StorageShared};
pub use crate::errors::{ErrorKind, NdError, ShapeBuf};
pub use crate::expr::{
    map_expr, zip_map, zip_map3, BinOp, BinaryExpr, CallExpr, Expr, OpAdd, OpDiv, OpMul, OpSub,
    ScalarExpr, UnaryExpr,
};
pub use crate::free_functions::{arange, arr1, arr2, arr3, aview1, aview2, eye};
pub use crate::idx_map::{BlockLayout, IdxMap};
pub use crate::impl_constructors::Random01;
pub use crate::impl_ops::ScalarOperand;
pub use crate::iterators::{Indices, Iter, IterMut, LinearIter};
pub use crate::layout::{
    BasicLayout, CLayout, CStrideLayout, FLayout, FStrideLayout, LayoutInfo, LayoutPolicy,
    LayoutProp, StaticOrder,
};
pub use crate::permutation::MAX_RANK;
pub use crate::slice::{Ellipsis, Slice, SliceArgs, SliceItem};
pub use crate::stacking::concatenate;

/// An axis index of an array.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Axis(pub usize);

impl Axis {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// An `R`-dimensional array over storage `S`.
///
/// The struct pairs an [`IdxMap`] with a storage handle; elements live at
/// `handle base + off + map(index)`. Whether the array owns, shares or
/// borrows its elements is decided entirely by `S` — see the aliases:
///
/// - [`Array`], [`FArray`] — exclusively owned, heap allocated
/// - [`Matrix`], [`Vector`] — owned, with matrix/vector algebra
/// - [`SharedArray`] — reference counted, clone-on-write
/// - [`StackArray`], [`SsoArray`] — inline storage
/// - [`ArrayView`], [`ArrayViewMut`] — borrowed views
/// - [`RawArray`] — borrowed raw memory with an address-space tag
///
/// `L` is the [`LayoutPolicy`] governing stride assignment and the static
/// layout guarantee; `Alg` the [`Algebra`] tag steering arithmetic.
pub struct ArrayBase<S, const R: usize, L, Alg>
where
    S: Storage,
{
    pub(crate) data: S,
    /// Element offset of the map's origin from the handle's base pointer.
    pub(crate) off: isize,
    pub(crate) map: IdxMap<R>,
    pub(crate) marker: PhantomData<(L, Alg)>,
}

impl<S, const R: usize, L, Alg> ArrayBase<S, R, L, Alg>
where
    S: Storage,
    L: LayoutPolicy,
    Alg: Algebra,
{
    /// Assemble an array from its raw parts.
    ///
    /// # Safety
    ///
    /// Every offset the map can produce, shifted by `off`, must be in
    /// bounds of the handle's buffer.
    pub(crate) unsafe fn from_data_off_map(data: S, off: isize, map: IdxMap<R>) -> Self {
        Alg::check_rank(R);
        ArrayBase {
            data,
            off,
            map,
            marker: PhantomData,
        }
    }
}

/// The ndview prelude: the names nearly every user wants in scope.
pub mod prelude {
    pub use crate::aliases::*;
    pub use crate::expr::Expr;
    pub use crate::free_functions::{arange, arr1, arr2, arr3, aview1, aview2, eye};
    pub use crate::layout::{CLayout, FLayout, LayoutPolicy, LayoutProp};
    pub use crate::stacking::concatenate;
    pub use crate::{ArrayBase, Axis, Ellipsis, NdError, Slice};
}

// The internal prelude used by the impl files.
pub(crate) mod imp_prelude {
    pub(crate) use crate::algebra::{AlgArray, AlgMatrix, AlgVector, Algebra};
    pub(crate) use crate::data_repr::{HeapRepr, SharedRepr, ViewRepr, ViewReprMut};
    pub(crate) use crate::data_traits::{Storage, StorageMut, StorageOwned};
    pub(crate) use crate::errors::NdError;
    pub(crate) use crate::idx_map::IdxMap;
    pub(crate) use crate::layout::{CLayout, CStrideLayout, LayoutPolicy};
    pub(crate) use crate::ArrayBase;
    pub(crate) use crate::Axis;
}
