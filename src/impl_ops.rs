// Copyright 2025-2026 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Arithmetic operators.
//!
//! `&a + &b` and friends build lazy [`BinaryExpr`]/[`UnaryExpr`] nodes;
//! nothing is evaluated until the expression is assigned into an array or
//! indexed. Compound assignment (`a += ...`) evaluates elementwise in
//! place, which is the same as `a = a OP rhs` because the operations are
//! pointwise.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_complex::Complex;

use crate::expr::{
    make_binary, make_unary, BinOp, BinaryExpr, CallExpr, Expr, OpAdd, OpDiv, OpMul, OpSub,
    ScalarExpr, UnaryExpr,
};
use crate::imp_prelude::*;

/// Elements that can appear as direct scalar operands in array arithmetic.
///
/// For an array `a` of `f64`, this is what allows `&a + 1.0` and
/// `a += 3.0`. Left-hand-side scalars (`1.0 + &a`) are not related to this
/// trait; they need one impl per concrete scalar type and are provided for
/// the same list of types.
pub trait ScalarOperand: 'static + Clone {}
impl ScalarOperand for i8 {}
impl ScalarOperand for u8 {}
impl ScalarOperand for i16 {}
impl ScalarOperand for u16 {}
impl ScalarOperand for i32 {}
impl ScalarOperand for u32 {}
impl ScalarOperand for i64 {}
impl ScalarOperand for u64 {}
impl ScalarOperand for i128 {}
impl ScalarOperand for u128 {}
impl ScalarOperand for isize {}
impl ScalarOperand for usize {}
impl ScalarOperand for f32 {}
impl ScalarOperand for f64 {}
impl ScalarOperand for Complex<f32> {}
impl ScalarOperand for Complex<f64> {}

// Operators with an array reference on the left.
macro_rules! impl_binary_op {
    ($trt:ident, $mth:ident, $op:ident) => {
        impl<'a, 'b, A, S, S2, const R: usize, L, L2, Alg, Alg2>
            $trt<&'b ArrayBase<S2, R, L2, Alg2>> for &'a ArrayBase<S, R, L, Alg>
        where
            A: Clone + $trt<Output = A>,
            S: Storage<Elem = A>,
            S2: Storage<Elem = A>,
            L: LayoutPolicy,
            L2: LayoutPolicy,
            Alg: Algebra,
            Alg2: Algebra,
        {
            type Output =
                BinaryExpr<$op, &'a ArrayBase<S, R, L, Alg>, &'b ArrayBase<S2, R, L2, Alg2>, R>;

            fn $mth(self, rhs: &'b ArrayBase<S2, R, L2, Alg2>) -> Self::Output {
                make_binary(self, rhs)
            }
        }

        impl<'a, A, S, const R: usize, L, Alg> $trt<A> for &'a ArrayBase<S, R, L, Alg>
        where
            A: ScalarOperand + $trt<Output = A>,
            S: Storage<Elem = A>,
            L: LayoutPolicy,
            Alg: Algebra,
        {
            type Output = BinaryExpr<$op, &'a ArrayBase<S, R, L, Alg>, ScalarExpr<A>, R>;

            fn $mth(self, rhs: A) -> Self::Output {
                make_binary(self, ScalarExpr(rhs))
            }
        }
    };
}

impl_binary_op!(Add, add, OpAdd);
impl_binary_op!(Sub, sub, OpSub);
impl_binary_op!(Mul, mul, OpMul);
impl_binary_op!(Div, div, OpDiv);

// Operators with an expression node on the left: node OP &array and
// node OP scalar, for each node kind.
macro_rules! impl_node_lhs_op {
    ($trt:ident, $mth:ident, $op:ident, ($($g:tt)*), $node:ty) => {
        impl<'b, EA, $($g)*, S2, L2, Alg2, const R: usize>
            $trt<&'b ArrayBase<S2, R, L2, Alg2>> for $node
        where
            $node: Expr<R, Elem = EA>,
            EA: Clone + $trt<Output = EA>,
            S2: Storage<Elem = EA>,
            L2: LayoutPolicy,
            Alg2: Algebra,
        {
            type Output = BinaryExpr<$op, $node, &'b ArrayBase<S2, R, L2, Alg2>, R>;

            fn $mth(self, rhs: &'b ArrayBase<S2, R, L2, Alg2>) -> Self::Output {
                make_binary(self, rhs)
            }
        }

        impl<EA, $($g)*, const R: usize> $trt<EA> for $node
        where
            $node: Expr<R, Elem = EA>,
            EA: ScalarOperand + $trt<Output = EA>,
        {
            type Output = BinaryExpr<$op, $node, ScalarExpr<EA>, R>;

            fn $mth(self, rhs: EA) -> Self::Output {
                make_binary(self, ScalarExpr(rhs))
            }
        }
    };
}

macro_rules! impl_node_lhs_all_ops {
    (($($g:tt)*), $node:ty) => {
        impl_node_lhs_op!(Add, add, OpAdd, ($($g)*), $node);
        impl_node_lhs_op!(Sub, sub, OpSub, ($($g)*), $node);
        impl_node_lhs_op!(Mul, mul, OpMul, ($($g)*), $node);
        impl_node_lhs_op!(Div, div, OpDiv, ($($g)*), $node);
    };
}

impl_node_lhs_all_ops!((Op2, X, Y), BinaryExpr<Op2, X, Y, R>);
impl_node_lhs_all_ops!((X1), UnaryExpr<X1, R>);
impl_node_lhs_all_ops!((F1, Args), CallExpr<F1, Args, R>);

// Expression node OP expression node.
macro_rules! impl_node_node_op {
    ($trt:ident, $mth:ident, $op:ident, ($($g1:tt)*), $lhs:ty, ($($g2:tt)*), $rhs:ty) => {
        impl<EA, $($g1)*, $($g2)*, const R: usize> $trt<$rhs> for $lhs
        where
            $lhs: Expr<R, Elem = EA>,
            $rhs: Expr<R, Elem = EA>,
            EA: $trt<Output = EA>,
        {
            type Output = BinaryExpr<$op, $lhs, $rhs, R>;

            fn $mth(self, rhs: $rhs) -> Self::Output {
                make_binary(self, rhs)
            }
        }
    };
}

macro_rules! impl_node_node_all_ops {
    (($($g1:tt)*), $lhs:ty, ($($g2:tt)*), $rhs:ty) => {
        impl_node_node_op!(Add, add, OpAdd, ($($g1)*), $lhs, ($($g2)*), $rhs);
        impl_node_node_op!(Sub, sub, OpSub, ($($g1)*), $lhs, ($($g2)*), $rhs);
        impl_node_node_op!(Mul, mul, OpMul, ($($g1)*), $lhs, ($($g2)*), $rhs);
        impl_node_node_op!(Div, div, OpDiv, ($($g1)*), $lhs, ($($g2)*), $rhs);
    };
}

impl_node_node_all_ops!((Op2, X, Y), BinaryExpr<Op2, X, Y, R>, (Op3, X2, Y2), BinaryExpr<Op3, X2, Y2, R>);
impl_node_node_all_ops!((Op2, X, Y), BinaryExpr<Op2, X, Y, R>, (X2), UnaryExpr<X2, R>);
impl_node_node_all_ops!((X1), UnaryExpr<X1, R>, (Op3, X2, Y2), BinaryExpr<Op3, X2, Y2, R>);
impl_node_node_all_ops!((X1), UnaryExpr<X1, R>, (X2), UnaryExpr<X2, R>);

// Array reference OP expression node.
macro_rules! impl_array_node_op {
    ($trt:ident, $mth:ident, $op:ident, ($($g:tt)*), $node:ty) => {
        impl<'a, EA, S, L, Alg, $($g)*, const R: usize> $trt<$node> for &'a ArrayBase<S, R, L, Alg>
        where
            $node: Expr<R, Elem = EA>,
            EA: Clone + $trt<Output = EA>,
            S: Storage<Elem = EA>,
            L: LayoutPolicy,
            Alg: Algebra,
        {
            type Output = BinaryExpr<$op, &'a ArrayBase<S, R, L, Alg>, $node, R>;

            fn $mth(self, rhs: $node) -> Self::Output {
                make_binary(self, rhs)
            }
        }
    };
}

macro_rules! impl_array_node_all_ops {
    (($($g:tt)*), $node:ty) => {
        impl_array_node_op!(Add, add, OpAdd, ($($g)*), $node);
        impl_array_node_op!(Sub, sub, OpSub, ($($g)*), $node);
        impl_array_node_op!(Mul, mul, OpMul, ($($g)*), $node);
        impl_array_node_op!(Div, div, OpDiv, ($($g)*), $node);
    };
}

impl_array_node_all_ops!((Op2, X, Y), BinaryExpr<Op2, X, Y, R>);
impl_array_node_all_ops!((X1), UnaryExpr<X1, R>);
impl_array_node_all_ops!((F1, Args), CallExpr<F1, Args, R>);

// Left-hand-side scalars need one impl per concrete type.
macro_rules! impl_scalar_lhs_single {
    ($scalar:ty, $trt:ident, $mth:ident, $op:ident) => {
        impl<'a, S, const R: usize, L, Alg> $trt<&'a ArrayBase<S, R, L, Alg>> for $scalar
        where
            S: Storage<Elem = $scalar>,
            L: LayoutPolicy,
            Alg: Algebra,
        {
            type Output = BinaryExpr<$op, ScalarExpr<$scalar>, &'a ArrayBase<S, R, L, Alg>, R>;

            fn $mth(self, rhs: &'a ArrayBase<S, R, L, Alg>) -> Self::Output {
                make_binary(ScalarExpr(self), rhs)
            }
        }
    };
}

macro_rules! impl_scalar_lhs_ops {
    ($($scalar:ty),*) => {
        $(
            impl_scalar_lhs_single!($scalar, Add, add, OpAdd);
            impl_scalar_lhs_single!($scalar, Sub, sub, OpSub);
            impl_scalar_lhs_single!($scalar, Mul, mul, OpMul);
            impl_scalar_lhs_single!($scalar, Div, div, OpDiv);
        )*
    };
}

impl_scalar_lhs_ops!(
    i8, u8, i16, u16, i32, u32, i64, u64, i128, u128, isize, usize, f32, f64, Complex<f32>,
    Complex<f64>
);

// Negation.
impl<'a, A, S, const R: usize, L, Alg> Neg for &'a ArrayBase<S, R, L, Alg>
where
    A: Clone + Neg<Output = A>,
    S: Storage<Elem = A>,
    L: LayoutPolicy,
    Alg: Algebra,
{
    type Output = UnaryExpr<&'a ArrayBase<S, R, L, Alg>, R>;

    fn neg(self) -> Self::Output {
        make_unary(self)
    }
}

macro_rules! impl_node_neg {
    (($($g:tt)*), $node:ty) => {
        impl<EA, $($g)*, const R: usize> Neg for $node
        where
            $node: Expr<R, Elem = EA>,
            EA: Neg<Output = EA>,
        {
            type Output = UnaryExpr<$node, R>;

            fn neg(self) -> Self::Output {
                make_unary(self)
            }
        }
    };
}

impl_node_neg!((Op2, X, Y), BinaryExpr<Op2, X, Y, R>);
impl_node_neg!((X1), UnaryExpr<X1, R>);
impl_node_neg!((F1, Args), CallExpr<F1, Args, R>);

// Compound assignment: elementwise in place, equivalent to
// `a = a OP rhs`. `diag` marks the operations where matrix algebra
// restricts a scalar operand to the diagonal.
macro_rules! impl_assign_op {
    ($trt:ident, $mth:ident, $op:ident, $diag:expr, $opchar:expr) => {
        impl<'b, A, S, S2, const R: usize, L, L2, Alg, Alg2>
            $trt<&'b ArrayBase<S2, R, L2, Alg2>> for ArrayBase<S, R, L, Alg>
        where
            A: Clone,
            $op: BinOp<A>,
            S: Storage<Elem = A> + StorageMut,
            S2: Storage<Elem = A>,
            L: LayoutPolicy,
            L2: LayoutPolicy,
            Alg: Algebra,
            Alg2: Algebra,
        {
            fn $mth(&mut self, rhs: &'b ArrayBase<S2, R, L2, Alg2>) {
                crate::algebra::combined_tag(Alg::TAG, Alg2::TAG);
                if Alg::TAG == 'M' && Alg2::TAG == 'M' {
                    assert!(
                        $diag,
                        "'{}' between matrices is not elementwise; it belongs to the linear-algebra layer",
                        $opchar
                    );
                }
                assert!(
                    self.shape() == rhs.shape(),
                    "shape mismatch in compound assignment: {:?} vs {:?}",
                    self.shape(),
                    rhs.shape()
                );
                self.for_each_indexed_mut(|ix, elem| {
                    let r = rhs.get(ix).expect("index in shape").clone();
                    *elem = <$op as BinOp<A>>::apply(elem.clone(), r);
                });
            }
        }

        impl<A, S, const R: usize, L, Alg> $trt<A> for ArrayBase<S, R, L, Alg>
        where
            A: ScalarOperand,
            $op: BinOp<A>,
            S: Storage<Elem = A> + StorageMut,
            L: LayoutPolicy,
            Alg: Algebra,
        {
            fn $mth(&mut self, rhs: A) {
                if Alg::TAG == 'M' && $diag {
                    // scalar acts on the diagonal only
                    self.for_each_indexed_mut(|ix, elem| {
                        if crate::algebra::is_diagonal(&ix) {
                            *elem = <$op as BinOp<A>>::apply(elem.clone(), rhs.clone());
                        }
                    });
                } else {
                    self.for_each_indexed_mut(|_, elem| {
                        *elem = <$op as BinOp<A>>::apply(elem.clone(), rhs.clone());
                    });
                }
            }
        }
    };
}

impl_assign_op!(AddAssign, add_assign, OpAdd, true, '+');
impl_assign_op!(SubAssign, sub_assign, OpSub, true, '-');
impl_assign_op!(MulAssign, mul_assign, OpMul, false, '*');
impl_assign_op!(DivAssign, div_assign, OpDiv, false, '/');

// Compound assignment from expression nodes.
macro_rules! impl_assign_from_node {
    ($trt:ident, $mth:ident, $op:ident, ($($g:tt)*), $node:ty) => {
        impl<A, S, $($g)*, const R: usize, L, Alg> $trt<$node> for ArrayBase<S, R, L, Alg>
        where
            $node: Expr<R, Elem = A>,
            A: Clone,
            $op: BinOp<A>,
            S: Storage<Elem = A> + StorageMut,
            L: LayoutPolicy,
            Alg: Algebra,
        {
            fn $mth(&mut self, rhs: $node) {
                if let Some(dims) = rhs.dims() {
                    assert!(
                        self.shape() == dims,
                        "shape mismatch in compound assignment: {:?} vs {:?}",
                        self.shape(),
                        dims
                    );
                }
                self.for_each_indexed_mut(|ix, elem| {
                    *elem = <$op as BinOp<A>>::apply(elem.clone(), rhs.eval(ix));
                });
            }
        }
    };
}

macro_rules! impl_assign_from_node_all {
    (($($g:tt)*), $node:ty) => {
        impl_assign_from_node!(AddAssign, add_assign, OpAdd, ($($g)*), $node);
        impl_assign_from_node!(SubAssign, sub_assign, OpSub, ($($g)*), $node);
        impl_assign_from_node!(MulAssign, mul_assign, OpMul, ($($g)*), $node);
        impl_assign_from_node!(DivAssign, div_assign, OpDiv, ($($g)*), $node);
    };
}

impl_assign_from_node_all!((Op2, X, Y), BinaryExpr<Op2, X, Y, R>);
impl_assign_from_node_all!((X1), UnaryExpr<X1, R>);
impl_assign_from_node_all!((F1, Args), CallExpr<F1, Args, R>);
