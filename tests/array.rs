use approx::assert_relative_eq;

use ndview::prelude::*;
use ndview::{arr1, arr2, arr3, arange, eye, ErrorKind, SharedArray, SsoArray, StackArray};

#[test]
fn zeros_and_ones() {
    let a = Array::<i32, 2>::zeros([3, 3]);
    assert_eq!(a.shape(), [3, 3]);
    assert_eq!(a.size(), 9);
    assert!(a.iter().all(|&x| x == 0));

    let b = Array::<f64, 1>::ones([4]);
    assert!(b.iter().all(|&x| x == 1.0));

    let d = Array::<u8, 3>::default([2, 2, 2]);
    assert!(d.iter().all(|&x| x == 0));
}

#[test]
fn from_shape_vec_checks_length() {
    let ok = Array::from_shape_vec([2, 3], vec![1, 2, 3, 4, 5, 6]);
    assert!(ok.is_ok());
    let err = Array::<i32, 2>::from_shape_vec([2, 3], vec![1, 2, 3]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
}

#[test]
fn nested_literals() {
    let a = arr2(&[[1, 2, 3], [4, 5, 6]]);
    assert_eq!(a.shape(), [2, 3]);
    assert_eq!(a[[1, 2]], 6);
    assert_eq!(a[(0, 1)], 2);

    let t = a.t();
    assert_eq!(t.shape(), [3, 2]);
    assert_eq!(t[[2, 1]], 6);

    let b = Array2::from_nested(vec![vec![1, 2], vec![3, 4], vec![5, 6]]).unwrap();
    assert_eq!(b.shape(), [3, 2]);
    assert_eq!(b[[2, 0]], 5);

    let ragged = Array2::from_nested(vec![vec![1, 2], vec![3]]);
    assert_eq!(ragged.unwrap_err().kind(), ErrorKind::ShapeMismatch);

    let c = arr3(&[[[1, 2], [3, 4]], [[5, 6], [7, 8]]]);
    assert_eq!(c.shape(), [2, 2, 2]);
    assert_eq!(c[[1, 0, 1]], 6);

    let d = Array3::from_nested(vec![vec![vec![1], vec![2]], vec![vec![3], vec![4]]]).unwrap();
    assert_eq!(d.shape(), [2, 2, 1]);

    assert_eq!(arr1(&[7, 8, 9])[2], 9);
}

#[test]
fn element_access() {
    let mut a = arr2(&[[1, 2], [3, 4]]);
    assert_eq!(a.get([1, 1]), Some(&4));
    assert_eq!(a.get([2, 0]), None);
    let err = a.try_get([0, 5]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfBounds);
    assert_eq!(a.first(), Some(&1));

    *a.get_mut([0, 0]).unwrap() = 9;
    assert_eq!(a[[0, 0]], 9);
    a[[1, 0]] = 11;
    assert_eq!(a[[1, 0]], 11);

    unsafe {
        assert_eq!(*a.uget([0, 1]), 2);
    }
}

#[test]
#[should_panic]
fn index_out_of_bounds_panics() {
    let a = arr2(&[[1, 2], [3, 4]]);
    let _ = a[[0, 2]];
}

#[test]
fn resize_semantics() {
    let mut a = Array::from_shape_vec([2, 3], vec![1, 2, 3, 4, 5, 6]).unwrap();
    // same size: the handle is kept, elements renumber
    a.resize([3, 2]);
    assert_eq!(a.shape(), [3, 2]);
    assert_eq!(a.size(), 6);
    assert_eq!(a[[0, 1]], 2);

    // new size: reallocated, contents are defaults
    a.resize([2, 2]);
    assert_eq!(a.shape(), [2, 2]);
    assert_eq!(a.size(), 4);
    assert!(a.iter().all(|&x| x == 0));
}

#[test]
fn equality() {
    let a = arr2(&[[1, 2], [3, 4]]);
    let b = Array2::from_nested(vec![vec![1, 2], vec![3, 4]]).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, a.view());
    assert_eq!(a.view(), b.view());

    let c = arr2(&[[1, 2], [3, 5]]);
    assert_ne!(a, c);
    let d = Array::from_shape_vec([1, 4], vec![1, 2, 3, 4]).unwrap();
    assert_ne!(a, d);
}

#[test]
fn clone_is_deep() {
    let a = arr2(&[[1, 2], [3, 4]]);
    let mut b = a.clone();
    b[[0, 0]] = 9;
    assert_eq!(a[[0, 0]], 1);
    assert_eq!(b[[0, 0]], 9);
}

#[test]
fn fortran_arrays() {
    let a = FArray::<i32, 2>::from_shape_fn([2, 3], |ix| (ix[0] * 10 + ix[1]) as i32);
    assert_eq!(a.strides(), [1, 2]);
    assert_eq!(a.stride_order(), [1, 0]);
    assert!(a.is_contiguous());
    assert_eq!(a[[1, 2]], 12);
    // memory order is column by column
    let mem: Vec<i32> = a.iter().copied().collect();
    assert_eq!(mem, vec![0, 10, 1, 11, 2, 12]);
}

#[test]
fn identity_matrix() {
    let m = eye::<f64>(3);
    for i in 0..3 {
        for j in 0..3 {
            assert_eq!(m[[i, j]], if i == j { 1.0 } else { 0.0 });
        }
    }
}

#[test]
fn arange_and_reshape() {
    let a = arange(0, 6).into_shape([2, 3]).unwrap();
    assert_eq!(a.shape(), [2, 3]);
    assert_eq!(a[[1, 0]], 3);

    let back = a.reshape([6]).unwrap();
    assert_eq!(back[5], 5);

    let size_err = a.reshape([4]).unwrap_err();
    assert_eq!(size_err.kind(), ErrorKind::ShapeMismatch);

    // a non-contiguous view cannot be renumbered without a copy
    let v = a.slice::<2, _>((.., 0..2));
    let err = v.reshape([4]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LayoutMismatch);

    let stepped = Array1::range(0.0, 3.0, 0.5);
    assert_eq!(stepped.size(), 6);
    assert_relative_eq!(stepped[3], 1.5);
    let down = Array1::range(3, 0, -1);
    assert_eq!(down, arr1(&[3, 2, 1]));
}

#[test]
fn random_fills_unit_interval() {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    let a = Array::<f64, 2>::random([4, 5]);
    assert_eq!(a.shape(), [4, 5]);
    assert!(a.iter().all(|&x| (0.0..1.0).contains(&x)));

    let mut r1 = SmallRng::seed_from_u64(7);
    let mut r2 = SmallRng::seed_from_u64(7);
    let x = Array::<f64, 1>::random_using([8], &mut r1);
    let y = Array::<f64, 1>::random_using([8], &mut r2);
    assert_eq!(x, y);

    let z = Array::<num_complex::Complex<f64>, 1>::random([3]);
    assert!(z.iter().all(|c| c.re < 1.0 && c.im < 1.0));
}

#[test]
fn alternative_storages() {
    let s = StackArray::<i32, 2, 6>::from_shape_vec([2, 3], vec![1, 2, 3, 4, 5, 6]).unwrap();
    assert_eq!(s[[1, 1]], 5);
    let s2 = s.clone();
    assert_eq!(s, s2);

    let small = SsoArray::<i32, 1, 8>::from_shape_vec([3], vec![1, 2, 3]).unwrap();
    assert_eq!(small[1], 2);
    let big = SsoArray::<i32, 1, 2>::from_shape_vec([5], vec![1, 2, 3, 4, 5]).unwrap();
    assert_eq!(big[4], 5);

    let shared = SharedArray::<i32, 2>::from_shape_vec([2, 2], vec![1, 2, 3, 4]).unwrap();
    let mut other = shared.clone();
    other[[0, 0]] = 9;
    // the write detached `other`; the original is untouched
    assert_eq!(shared[[0, 0]], 1);
    assert_eq!(other[[0, 0]], 9);

    let owned = Array::from_shape_vec([2, 2], vec![1, 2, 3, 4]).unwrap();
    let promoted = owned.into_shared();
    assert_eq!(promoted[[1, 1]], 4);
}

#[test]
fn fallible_allocation_path() {
    let a = Array::<i32, 2>::try_from_elem([2, 2], 7).unwrap();
    assert!(a.iter().all(|&x| x == 7));
}

#[test]
fn vectors_and_from_impls() {
    let v: Vector<i32> = Vector::from(vec![1, 2, 3]);
    assert_eq!(v.size(), 3);
    assert_eq!(v[2], 3);

    let a: Array1<i32> = (0..5).collect();
    assert_eq!(a[4], 4);
}
