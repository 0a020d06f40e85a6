// Copyright 2025-2026 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Lazy elementwise expressions.
//!
//! Arithmetic on arrays does not compute anything: it builds a small tree
//! of [`Expr`] nodes that evaluates per element when assigned into an
//! array (or indexed directly). The tree layout is fixed at compile time,
//! so no node ever touches the heap.
//!
//! Matrix algebra bends two rules here: a scalar combined with a matrix
//! under `+`/`-` acts on the diagonal only (`s + m` reads as `s·I + m`),
//! and `*`/`/` between two matrices is refused — matrix products belong to
//! a linear-algebra layer, not to elementwise arithmetic.

use std::marker::PhantomData;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::algebra::combined_tag;
use crate::imp_prelude::*;
use crate::layout::LayoutInfo;

/// A value producer over a rank-`R` index space.
///
/// Implemented by array references, scalars and the expression nodes.
pub trait Expr<const R: usize> {
    type Elem;

    /// Algebra tag: `'A'`, `'M'`, `'V'`, or `'N'` for scalars.
    fn tag(&self) -> char;

    /// The shape, or `None` for scalars.
    fn dims(&self) -> Option<[usize; R]>;

    /// Stride order and property of the values this node produces.
    fn layout_info(&self) -> LayoutInfo;

    /// Evaluate one element. The index must be inside [`dims`](Expr::dims).
    fn eval(&self, index: [usize; R]) -> Self::Elem;
}

impl<'a, A, S, const R: usize, L, Alg> Expr<R> for &'a ArrayBase<S, R, L, Alg>
where
    A: Clone,
    S: Storage<Elem = A>,
    L: LayoutPolicy,
    Alg: Algebra,
{
    type Elem = A;

    fn tag(&self) -> char {
        Alg::TAG
    }

    fn dims(&self) -> Option<[usize; R]> {
        Some(self.shape())
    }

    fn layout_info(&self) -> LayoutInfo {
        self.idx_map().layout_info()
    }

    fn eval(&self, index: [usize; R]) -> A {
        self.get(index).expect("expression index in bounds").clone()
    }
}

/// A scalar leaf; evaluates to the same value everywhere.
#[derive(Copy, Clone, Debug)]
pub struct ScalarExpr<T>(pub T);

impl<T: Clone, const R: usize> Expr<R> for ScalarExpr<T> {
    type Elem = T;

    fn tag(&self) -> char {
        'N'
    }

    fn dims(&self) -> Option<[usize; R]> {
        None
    }

    fn layout_info(&self) -> LayoutInfo {
        LayoutInfo::none()
    }

    fn eval(&self, _index: [usize; R]) -> T {
        self.0.clone()
    }
}

/// One of the four elementwise operations, applied at the type level.
pub trait BinOp<T> {
    const CHAR: char;
    fn apply(a: T, b: T) -> T;
}

macro_rules! impl_bin_op {
    ($name:ident, $ch:expr, $trt:ident, $mth:ident) => {
        #[derive(Copy, Clone, Debug, Default)]
        pub struct $name;

        impl<T: $trt<Output = T>> BinOp<T> for $name {
            const CHAR: char = $ch;
            #[inline]
            fn apply(a: T, b: T) -> T {
                T::$mth(a, b)
            }
        }
    };
}

impl_bin_op!(OpAdd, '+', Add, add);
impl_bin_op!(OpSub, '-', Sub, sub);
impl_bin_op!(OpMul, '*', Mul, mul);
impl_bin_op!(OpDiv, '/', Div, div);

/// Elementwise negation of an inner expression. Shape, size and layout
/// info pass through untouched.
#[derive(Copy, Clone, Debug)]
pub struct UnaryExpr<X, const R: usize> {
    inner: X,
}

pub(crate) fn make_unary<X, const R: usize>(inner: X) -> UnaryExpr<X, R>
where
    X: Expr<R>,
{
    UnaryExpr { inner }
}

impl<X, const R: usize> Expr<R> for UnaryExpr<X, R>
where
    X: Expr<R>,
    X::Elem: Neg<Output = X::Elem>,
{
    type Elem = X::Elem;

    fn tag(&self) -> char {
        self.inner.tag()
    }

    fn dims(&self) -> Option<[usize; R]> {
        self.inner.dims()
    }

    fn layout_info(&self) -> LayoutInfo {
        self.inner.layout_info()
    }

    fn eval(&self, index: [usize; R]) -> Self::Elem {
        -self.inner.eval(index)
    }
}

/// An elementwise binary operation between two producers, at least one of
/// which has a shape.
#[derive(Copy, Clone, Debug)]
pub struct BinaryExpr<Op, X, Y, const R: usize> {
    lhs: X,
    rhs: Y,
    op: PhantomData<Op>,
}

/// Build a binary node, enforcing the algebra and shape contracts up
/// front so that evaluation never has to.
pub(crate) fn make_binary<Op, X, Y, const R: usize>(lhs: X, rhs: Y) -> BinaryExpr<Op, X, Y, R>
where
    X: Expr<R>,
    Y: Expr<R, Elem = X::Elem>,
    Op: BinOp<X::Elem>,
{
    let tag = combined_tag(lhs.tag(), rhs.tag());
    if tag == 'M' && lhs.tag() == 'M' && rhs.tag() == 'M' {
        assert!(
            Op::CHAR == '+' || Op::CHAR == '-',
            "'{}' between matrices is not elementwise; it belongs to the linear-algebra layer",
            Op::CHAR
        );
    }
    if let (Some(a), Some(b)) = (lhs.dims(), rhs.dims()) {
        assert!(
            a == b,
            "shape mismatch in expression: {:?} vs {:?}",
            a,
            b
        );
    }
    BinaryExpr {
        lhs,
        rhs,
        op: PhantomData,
    }
}

impl<Op, X, Y, const R: usize> BinaryExpr<Op, X, Y, R>
where
    X: Expr<R>,
    Y: Expr<R, Elem = X::Elem>,
{
    /// Exactly one operand is a bare scalar.
    #[inline]
    fn one_scalar_side(&self) -> bool {
        self.lhs.dims().is_some() != self.rhs.dims().is_some()
    }

    #[inline]
    fn array_side_eval(&self, index: [usize; R]) -> X::Elem {
        if self.lhs.dims().is_some() {
            self.lhs.eval(index)
        } else {
            self.rhs.eval(index)
        }
    }
}

impl<Op, X, Y, const R: usize> Expr<R> for BinaryExpr<Op, X, Y, R>
where
    X: Expr<R>,
    Y: Expr<R, Elem = X::Elem>,
    Op: BinOp<X::Elem>,
{
    type Elem = X::Elem;

    fn tag(&self) -> char {
        combined_tag(self.lhs.tag(), self.rhs.tag())
    }

    fn dims(&self) -> Option<[usize; R]> {
        self.lhs.dims().or_else(|| self.rhs.dims())
    }

    fn layout_info(&self) -> LayoutInfo {
        match (self.lhs.dims().is_some(), self.rhs.dims().is_some()) {
            (true, true) => self.lhs.layout_info().meet(self.rhs.layout_info()),
            // the diagonal-only broadcast breaks stride regularity
            (true, false) if self.tag() == 'M' => LayoutInfo::none(),
            (false, true) if self.tag() == 'M' => LayoutInfo::none(),
            (true, false) => self.lhs.layout_info(),
            (false, true) => self.rhs.layout_info(),
            (false, false) => LayoutInfo::none(),
        }
    }

    fn eval(&self, index: [usize; R]) -> Self::Elem {
        // scalar ± matrix touches the diagonal only; elsewhere the matrix
        // element passes through unchanged
        if (Op::CHAR == '+' || Op::CHAR == '-')
            && self.tag() == 'M'
            && self.one_scalar_side()
            && !crate::algebra::is_diagonal(&index)
        {
            return self.array_side_eval(index);
        }
        Op::apply(self.lhs.eval(index), self.rhs.eval(index))
    }
}

/// Apply a function elementwise over one, two or three zipped producers.
#[derive(Copy, Clone)]
pub struct CallExpr<F, Args, const R: usize> {
    f: F,
    args: Args,
}

/// `f` mapped over every element of `x`.
pub fn map_expr<F, O, X, const R: usize>(x: X, f: F) -> CallExpr<F, (X,), R>
where
    X: Expr<R>,
    F: Fn(X::Elem) -> O,
{
    CallExpr { f, args: (x,) }
}

/// `f` applied to the zipped elements of `x` and `y`; the shapes must
/// agree.
pub fn zip_map<F, O, X, Y, const R: usize>(x: X, y: Y, f: F) -> CallExpr<F, (X, Y), R>
where
    X: Expr<R>,
    Y: Expr<R>,
    F: Fn(X::Elem, Y::Elem) -> O,
{
    debug_assert!(
        zip_shapes_agree(&[x.dims(), y.dims()]),
        "shape mismatch in zipped expression"
    );
    CallExpr { f, args: (x, y) }
}

/// Three-way [`zip_map`].
pub fn zip_map3<F, O, X, Y, Z, const R: usize>(
    x: X,
    y: Y,
    z: Z,
    f: F,
) -> CallExpr<F, (X, Y, Z), R>
where
    X: Expr<R>,
    Y: Expr<R>,
    Z: Expr<R>,
    F: Fn(X::Elem, Y::Elem, Z::Elem) -> O,
{
    debug_assert!(
        zip_shapes_agree(&[x.dims(), y.dims(), z.dims()]),
        "shape mismatch in zipped expression"
    );
    CallExpr { f, args: (x, y, z) }
}

fn zip_shapes_agree<const R: usize>(dims: &[Option<[usize; R]>]) -> bool {
    let mut first = None;
    for d in dims.iter().flatten() {
        match first {
            None => first = Some(*d),
            Some(f) => {
                if f != *d {
                    return false;
                }
            }
        }
    }
    true
}

impl<F, O, X, const R: usize> Expr<R> for CallExpr<F, (X,), R>
where
    X: Expr<R>,
    F: Fn(X::Elem) -> O,
{
    type Elem = O;

    fn tag(&self) -> char {
        self.args.0.tag()
    }

    fn dims(&self) -> Option<[usize; R]> {
        self.args.0.dims()
    }

    fn layout_info(&self) -> LayoutInfo {
        self.args.0.layout_info()
    }

    fn eval(&self, index: [usize; R]) -> O {
        (self.f)(self.args.0.eval(index))
    }
}

impl<F, O, X, Y, const R: usize> Expr<R> for CallExpr<F, (X, Y), R>
where
    X: Expr<R>,
    Y: Expr<R>,
    F: Fn(X::Elem, Y::Elem) -> O,
{
    type Elem = O;

    fn tag(&self) -> char {
        combined_tag(self.args.0.tag(), self.args.1.tag())
    }

    fn dims(&self) -> Option<[usize; R]> {
        self.args.0.dims().or_else(|| self.args.1.dims())
    }

    fn layout_info(&self) -> LayoutInfo {
        self.args.0.layout_info().meet(self.args.1.layout_info())
    }

    fn eval(&self, index: [usize; R]) -> O {
        (self.f)(self.args.0.eval(index), self.args.1.eval(index))
    }
}

impl<F, O, X, Y, Z, const R: usize> Expr<R> for CallExpr<F, (X, Y, Z), R>
where
    X: Expr<R>,
    Y: Expr<R>,
    Z: Expr<R>,
    F: Fn(X::Elem, Y::Elem, Z::Elem) -> O,
{
    type Elem = O;

    fn tag(&self) -> char {
        combined_tag(
            combined_tag(self.args.0.tag(), self.args.1.tag()),
            self.args.2.tag(),
        )
    }

    fn dims(&self) -> Option<[usize; R]> {
        self.args
            .0
            .dims()
            .or_else(|| self.args.1.dims())
            .or_else(|| self.args.2.dims())
    }

    fn layout_info(&self) -> LayoutInfo {
        self.args
            .0
            .layout_info()
            .meet(self.args.1.layout_info())
            .meet(self.args.2.layout_info())
    }

    fn eval(&self, index: [usize; R]) -> O {
        (self.f)(
            self.args.0.eval(index),
            self.args.1.eval(index),
            self.args.2.eval(index),
        )
    }
}
