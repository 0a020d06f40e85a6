//! Type aliases for the common array flavors.

use crate::algebra::{AlgArray, AlgMatrix, AlgVector};
use crate::data_repr::{HeapRepr, SharedRepr, SsoRepr, StackRepr, UnownedRepr, ViewRepr, ViewReprMut};
use crate::layout::{CLayout, CStrideLayout, FLayout};
use crate::ArrayBase;

/// An owned, heap-allocated array in row-major order.
pub type Array<T, const R: usize> = ArrayBase<HeapRepr<T>, R, CLayout, AlgArray>;

/// one-dimensional owned array
pub type Array1<T> = Array<T, 1>;
/// two-dimensional owned array
pub type Array2<T> = Array<T, 2>;
/// three-dimensional owned array
pub type Array3<T> = Array<T, 3>;
/// four-dimensional owned array
pub type Array4<T> = Array<T, 4>;

/// An owned array in column-major (Fortran) order.
pub type FArray<T, const R: usize> = ArrayBase<HeapRepr<T>, R, FLayout, AlgArray>;

/// A rank-2 owned array under matrix algebra: scalars act on the diagonal.
pub type Matrix<T> = ArrayBase<HeapRepr<T>, 2, CLayout, AlgMatrix>;

/// A column-major matrix.
pub type FMatrix<T> = ArrayBase<HeapRepr<T>, 2, FLayout, AlgMatrix>;

/// A rank-1 owned array under vector algebra.
pub type Vector<T> = ArrayBase<HeapRepr<T>, 1, CLayout, AlgVector>;

/// A reference-counted array; clones share the elements and detach on
/// write.
pub type SharedArray<T, const R: usize> = ArrayBase<SharedRepr<T>, R, CLayout, AlgArray>;

/// An array over an inline buffer of exactly `N` elements.
pub type StackArray<T, const R: usize, const N: usize> =
    ArrayBase<StackRepr<T, N>, R, CLayout, AlgArray>;

/// An array that stays inline up to `N` elements and spills to the heap
/// beyond.
pub type SsoArray<T, const R: usize, const N: usize> =
    ArrayBase<SsoRepr<T, N>, R, CLayout, AlgArray>;

/// A read-only borrowed view.
pub type ArrayView<'a, T, const R: usize> = ArrayBase<ViewRepr<'a, T>, R, CStrideLayout, AlgArray>;

/// one-dimensional read-only view
pub type ArrayView1<'a, T> = ArrayView<'a, T, 1>;
/// two-dimensional read-only view
pub type ArrayView2<'a, T> = ArrayView<'a, T, 2>;
/// three-dimensional read-only view
pub type ArrayView3<'a, T> = ArrayView<'a, T, 3>;

/// A mutable borrowed view.
pub type ArrayViewMut<'a, T, const R: usize> =
    ArrayBase<ViewReprMut<'a, T>, R, CStrideLayout, AlgArray>;

/// one-dimensional mutable view
pub type ArrayViewMut1<'a, T> = ArrayViewMut<'a, T, 1>;
/// two-dimensional mutable view
pub type ArrayViewMut2<'a, T> = ArrayViewMut<'a, T, 2>;

/// A read-only view with matrix algebra.
pub type MatrixView<'a, T> = ArrayBase<ViewRepr<'a, T>, 2, CStrideLayout, AlgMatrix>;

/// A mutable view with matrix algebra.
pub type MatrixViewMut<'a, T> = ArrayBase<ViewReprMut<'a, T>, 2, CStrideLayout, AlgMatrix>;

/// A read-only view with vector algebra.
pub type VectorView<'a, T> = ArrayBase<ViewRepr<'a, T>, 1, CStrideLayout, AlgVector>;

/// A mutable view with vector algebra.
pub type VectorViewMut<'a, T> = ArrayBase<ViewReprMut<'a, T>, 1, CStrideLayout, AlgVector>;

/// An array over borrowed raw memory carrying an address-space tag; the
/// way device-resident buffers enter the type system.
pub type RawArray<T, const R: usize> = ArrayBase<UnownedRepr<T>, R, CStrideLayout, AlgArray>;
