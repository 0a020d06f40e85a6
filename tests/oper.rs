use approx::assert_relative_eq;
use itertools::zip_eq;

use ndview::prelude::*;
use ndview::{arr1, arr2, map_expr, zip_map, ErrorKind, Matrix};

#[test]
fn elementwise_binary_expressions() {
    let a = arr2(&[[1, 2], [3, 4]]);
    let b = arr2(&[[10, 20], [30, 40]]);

    let sum = Array::from_expr(&a + &b);
    assert_eq!(sum, arr2(&[[11, 22], [33, 44]]));

    let diff = Array::from_expr(&b - &a);
    assert_eq!(diff, arr2(&[[9, 18], [27, 36]]));

    let prod = Array::from_expr(&a * &b);
    assert_eq!(prod[[1, 1]], 160);

    let quot = Array::from_expr(&b / &a);
    assert_eq!(quot[[1, 0]], 10);
}

#[test]
fn expressions_are_lazy() {
    let a = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
    let e = &a * 2.0;
    // nothing evaluated yet; the node produces values on demand
    assert_eq!(e.dims(), Some([2, 2]));
    assert_relative_eq!(e.eval([1, 0]), 6.0);
    let out = Array::from_expr(e);
    assert_relative_eq!(out[[0, 1]], 4.0);
}

#[test]
fn scalar_operands_on_both_sides() {
    let a = arr1(&[1, 2, 3]);
    assert_eq!(Array::from_expr(&a + 10), arr1(&[11, 12, 13]));
    assert_eq!(Array::from_expr(10 + &a), arr1(&[11, 12, 13]));
    assert_eq!(Array::from_expr(2 * &a), arr1(&[2, 4, 6]));
    assert_eq!(Array::from_expr(&a - 1), arr1(&[0, 1, 2]));
}

#[test]
fn negation_and_chains() {
    let a = arr1(&[1.0, -2.0, 3.0]);
    let b = arr1(&[0.5, 0.5, 0.5]);
    assert_eq!(Array::from_expr(-&a), arr1(&[-1.0, 2.0, -3.0]));

    // node-with-node and node-with-array chains
    let e = Array::from_expr((&a + &b) - &a);
    for (x, y) in zip_eq(e.iter(), b.iter()) {
        assert_relative_eq!(*x, *y);
    }
    let f = -(&a * 2.0);
    assert_relative_eq!(Array::from_expr(f)[0], -2.0);
    let g = Array::from_expr((&a + &b) + (&a - &b));
    let doubled = Array::from_expr(&a * 2.0);
    for (x, y) in zip_eq(g.iter(), doubled.iter()) {
        assert_relative_eq!(*x, *y);
    }
}

#[test]
#[should_panic(expected = "shape mismatch")]
fn shape_mismatch_in_expressions_is_fatal() {
    let a = arr1(&[1, 2, 3]);
    let b = arr1(&[1, 2]);
    let _ = &a + &b;
}

#[test]
fn compound_assignment() {
    let mut a = arr2(&[[1, 2], [3, 4]]);
    let b = arr2(&[[10, 10], [10, 10]]);
    a += &b;
    assert_eq!(a, arr2(&[[11, 12], [13, 14]]));
    a -= 1;
    assert_eq!(a, arr2(&[[10, 11], [12, 13]]));
    a *= 2;
    assert_eq!(a[[1, 1]], 26);

    let c = arr2(&[[1, 1], [1, 1]]);
    let d = arr2(&[[1, 2], [3, 4]]);
    a += &c + &d;
    assert_eq!(a[[0, 0]], 20 + 2);
}

#[test]
fn scalar_plus_matrix_touches_the_diagonal_only() {
    let m = Matrix::from_nested(vec![vec![1, 2], vec![3, 4]]).unwrap();
    let e = 5i32 + &m;
    assert_eq!(e.eval([0, 0]), 6);
    assert_eq!(e.eval([0, 1]), 2);
    assert_eq!(e.eval([1, 0]), 3);
    assert_eq!(e.eval([1, 1]), 9);

    let out = Matrix::from_expr(5 + &m);
    assert_eq!(out[[0, 0]], 6);
    assert_eq!(out[[0, 1]], 2);

    // same rule for subtraction
    let s = &m - 1;
    assert_eq!(s.eval([0, 0]), 0);
    assert_eq!(s.eval([0, 1]), 2);

    // multiplication scales everything
    let scaled = Matrix::from_expr(&m * 10);
    assert_eq!(scaled[[0, 1]], 20);

    // the same matrix under array algebra adds everywhere
    let a = m.as_array_view();
    let plain = Array::from_expr(&a + 5);
    assert_eq!(plain[[0, 1]], 7);
}

#[test]
fn matrix_compound_scalar_is_diagonal_only() {
    let mut m = Matrix::from_nested(vec![vec![1, 2], vec![3, 4]]).unwrap();
    m += 5;
    assert_eq!(m[[0, 0]], 6);
    assert_eq!(m[[0, 1]], 2);
    assert_eq!(m[[1, 1]], 9);

    m *= 2;
    assert_eq!(m[[0, 1]], 4);
    assert_eq!(m[[0, 0]], 12);
}

#[test]
#[should_panic(expected = "not elementwise")]
fn matrix_products_are_refused() {
    let m = Matrix::<i32>::eye(2);
    let n = Matrix::<i32>::eye(2);
    let _ = &m * &n;
}

#[test]
fn matrix_scalar_fill() {
    let mut m = Matrix::<i32>::zeros([3, 3]);
    m.fill(7);
    for i in 0..3 {
        for j in 0..3 {
            assert_eq!(m[[i, j]], if i == j { 7 } else { 0 });
        }
    }

    // the short diagonal of a rectangular matrix
    let mut r = Matrix::<i32>::ones([2, 3]);
    r.fill(5);
    assert_eq!(r[[0, 0]], 5);
    assert_eq!(r[[1, 1]], 5);
    assert_eq!(r[[1, 2]], 0);
}

#[test]
fn call_expressions() {
    let a = arr1(&[1.0f64, 4.0, 9.0]);
    let roots = Array::from_expr(map_expr(&a, |x| x.sqrt()));
    for (x, y) in zip_eq(roots.iter(), [1.0, 2.0, 3.0].iter()) {
        assert_relative_eq!(*x, *y);
    }

    let b = arr1(&[1.0f64, 2.0, 3.0]);
    let fma = Array::from_expr(zip_map(&a, &b, |x, y| x * y + 1.0));
    for (x, y) in zip_eq(fma.iter(), [2.0, 9.0, 28.0].iter()) {
        assert_relative_eq!(*x, *y);
    }
}

#[test]
fn assignment_from_expressions() {
    let a = arr2(&[[1, 2], [3, 4]]);
    let mut out = Array::<i32, 2>::zeros([2, 2]);
    out.assign_expr(&a + &a);
    assert_eq!(out, arr2(&[[2, 4], [6, 8]]));

    // scalar expressions broadcast
    out.assign_expr(ndview::ScalarExpr(9));
    assert!(out.iter().all(|&x| x == 9));

    // a shaped expression must match a view's shape
    let mut small = Array::<i32, 2>::zeros([1, 2]);
    let err = small.view_mut().try_assign_expr(&a + &a).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
}

#[test]
fn expression_layout_info() {
    let a = arr2(&[[1, 2], [3, 4]]);
    let b = arr2(&[[5, 6], [7, 8]]);
    // matching contiguous operands keep the full guarantee
    let info = (&a + &b).layout_info();
    assert!(info.prop.is_contiguous());
    assert!(info.stride_order.is_some());

    // a transposed operand breaks the shared order
    let t = b.t();
    let info = (&a + &t).layout_info();
    assert!(info.stride_order.is_none());

    // diagonal broadcast resets layout info under matrix algebra
    let m = Matrix::<i32>::eye(2);
    let info = (1 + &m).layout_info();
    assert!(info.stride_order.is_none());

    // scalar with a plain array passes the array's info through
    let info = (&a + 1).layout_info();
    assert!(info.prop.is_contiguous());
}
