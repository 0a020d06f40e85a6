use ndview::prelude::*;
use ndview::{arange, arr2, FArray, Indices};

#[test]
fn iteration_follows_memory_order() {
    let c = arr2(&[[1, 2, 3], [4, 5, 6]]);
    let in_c: Vec<i32> = c.iter().copied().collect();
    assert_eq!(in_c, vec![1, 2, 3, 4, 5, 6]);

    let f = FArray::<i32, 2>::from_shape_fn([2, 3], |ix| (ix[0] * 3 + ix[1] + 1) as i32);
    // same logical values as `c`, different traversal
    let in_f: Vec<i32> = f.iter().copied().collect();
    assert_eq!(in_f, vec![1, 4, 2, 5, 3, 6]);
}

#[test]
fn iteration_over_strided_views() {
    let a = arange(0, 12).into_shape([3, 4]).unwrap();
    let v = a.slice::<2, _>((.., Slice::from(..).step_by(2)));
    let elems: Vec<i32> = v.iter().copied().collect();
    assert_eq!(elems, vec![0, 2, 4, 6, 8, 10]);
    assert_eq!(v.iter().len(), 6);
}

#[test]
fn iter_mut_and_into_iterator() {
    let mut a = arange(0, 6).into_shape([2, 3]).unwrap();
    for x in a.iter_mut() {
        *x *= 2;
    }
    assert_eq!(a[[1, 2]], 10);

    let mut total = 0;
    for &x in &a {
        total += x;
    }
    assert_eq!(total, 30);

    for x in &mut a {
        *x += 1;
    }
    assert_eq!(a[[0, 0]], 1);
}

#[test]
fn indices_and_indexed_iteration() {
    let shape = [2, 3];
    let ix: Vec<[usize; 2]> = Indices::new(shape).collect();
    assert_eq!(ix.len(), 6);
    assert_eq!(ix[0], [0, 0]);
    assert_eq!(ix[5], [1, 2]);

    let a = arange(0, 6).into_shape([2, 3]).unwrap();
    for (ix, &val) in a.indexed_iter() {
        assert_eq!(val, a[ix]);
    }
    assert_eq!(a.indices().count(), 6);
}

#[test]
fn linear_iteration_is_random_access() {
    let a = arange(0, 10);
    let every_third = a.slice::<1, _>((Slice::from(..).step_by(3),));
    let it = every_third.linear_iter();
    assert_eq!(it.len(), 4);
    assert_eq!(it.get(2), Some(&6));
    assert_eq!(it.get(4), None);

    let mut it = every_third.linear_iter();
    assert_eq!(it.next(), Some(&0));
    assert_eq!(it.nth(1), Some(&6));
    assert_eq!(it.next_back(), Some(&9));
    assert_eq!(it.next(), None);

    let rev: Vec<i32> = every_third.linear_iter().rev().copied().collect();
    assert_eq!(rev, vec![9, 6, 3, 0]);
}

#[test]
fn empty_arrays_iterate_nothing() {
    let a = Array::<i32, 2>::zeros([0, 3]);
    assert!(a.is_empty());
    assert_eq!(a.iter().count(), 0);
    assert_eq!(a.indices().count(), 0);
}
