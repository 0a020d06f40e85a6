use ndview::prelude::*;
use ndview::{arange, arr2, aview1, aview2, AddressSpace, ErrorKind, RawArray};

#[test]
fn slicing_produces_shared_storage_views() {
    let mut a = arange(0, 6).into_shape([2, 3]).unwrap();
    {
        let v = a.slice::<2, _>((.., 1..3));
        assert_eq!(v.shape(), [2, 2]);
        assert_eq!(v[[0, 0]], 1);
        assert_eq!(v[[1, 1]], 5);
    }
    {
        let mut v = a.slice_mut::<2, _>((.., 1..3));
        v[[1, 1]] = 99;
    }
    // the write went through to the owner
    assert_eq!(a[[1, 2]], 99);
}

#[test]
fn integer_arguments_drop_axes() {
    let a = arange(0, 24).into_shape([2, 3, 4]).unwrap();
    let row = a.slice::<1, _>((1, 2, ..));
    assert_eq!(row.shape(), [4]);
    assert_eq!(row[0], a[[1, 2, 0]]);

    let pair = a.slice::<2, _>((.., 1, ..));
    assert_eq!(pair.shape(), [2, 4]);
    assert_eq!(pair[[1, 3]], a[[1, 1, 3]]);

    let elem = a.slice::<0, _>((1, 2, 3));
    assert_eq!(elem.size(), 1);
    assert_eq!(*elem.first().unwrap(), a[[1, 2, 3]]);
}

#[test]
fn ellipsis_expands_to_full_ranges() {
    let a = arange(0, 24).into_shape([2, 3, 4]).unwrap();
    let v = a.slice::<2, _>((Ellipsis, 0));
    assert_eq!(v.shape(), [2, 3]);
    assert_eq!(v[[1, 2]], a[[1, 2, 0]]);

    let w = a.slice::<3, _>((Ellipsis,));
    assert_eq!(w, a.view());
}

#[test]
fn negative_indices_and_steps() {
    let a = arange(0, 6);
    let last_two = a.slice::<1, _>((-2..,));
    assert_eq!(last_two, arange(4, 6).view());

    let rev = a.slice::<1, _>((Slice::new(0, None, -1),));
    let collected: Vec<i32> = rev.iter().copied().collect();
    assert_eq!(collected, vec![5, 4, 3, 2, 1, 0]);

    let every_other = a.slice::<1, _>((Slice::from(..).step_by(2),));
    assert_eq!(every_other.shape(), [3]);
    assert_eq!(every_other[2], 4);
}

#[test]
fn out_of_bounds_slices_error() {
    let a = arange(0, 6).into_shape([2, 3]).unwrap();
    let err = a.try_slice::<2, _>((.., 0..7)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfBounds);
    let err = a.try_slice::<1, _>((5, ..)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfBounds);
}

#[test]
#[should_panic(expected = "at most one ellipsis")]
fn two_ellipses_are_rejected() {
    let a = Array::<i32, 3>::zeros([2, 2, 2]);
    let _ = a.slice::<3, _>((Ellipsis, 0, Ellipsis));
}

#[test]
fn transposed_views() {
    let a = arr2(&[[1, 2, 3], [4, 5, 6]]);
    let t = a.t();
    assert_eq!(t.shape(), [3, 2]);
    assert_eq!(t.strides(), [1, 3]);
    assert_eq!(t[[2, 0]], 3);
    assert!(t.is_contiguous());
    assert_eq!(t.stride_order(), [1, 0]);

    let back = t.t();
    assert_eq!(back, a.view());

    let s = a.swap_axes(0, 1);
    assert_eq!(s.shape(), [3, 2]);

    let c = arange(0, 24).into_shape([2, 3, 4]).unwrap();
    let p = c.transpose([2, 0, 1]);
    // axis 0 becomes axis 2, axis 1 becomes axis 0, axis 2 becomes axis 1
    assert_eq!(p.shape(), [3, 4, 2]);
    assert_eq!(p[[1, 3, 0]], c[[0, 1, 3]]);
}

#[test]
fn views_of_slices() {
    let xs = [1.0f64, 2.0, 3.0, 4.0];
    let v = aview1(&xs);
    assert_eq!(v.size(), 4);
    assert_eq!(v[3], 4.0);

    let m = aview2(&[[1, 2], [3, 4], [5, 6]]);
    assert_eq!(m.shape(), [3, 2]);
    assert_eq!(m[[2, 1]], 6);

    let mut buf = vec![0i32; 6];
    {
        let mut mv = ndview::ArrayViewMut::from_shape([2, 3], &mut buf[..]).unwrap();
        mv[[1, 2]] = 7;
    }
    // the view wrote straight into the backing slice
    assert_eq!(buf[5], 7);
}

#[test]
fn view_to_owned_copies() {
    let a = arange(0, 6).into_shape([2, 3]).unwrap();
    let v = a.slice::<2, _>((.., 1..));
    let o = v.to_owned();
    assert_eq!(o.shape(), [2, 2]);
    assert!(o.is_contiguous());
    assert_eq!(o, v);
}

#[test]
fn raw_arrays_carry_address_spaces() {
    let mut backing = vec![1i32, 2, 3, 4, 5, 6];
    let raw = unsafe {
        RawArray::from_raw_parts(backing.as_mut_ptr(), [2, 3], AddressSpace::Host)
    };
    assert_eq!(raw[[1, 2]], 6);
    assert_eq!(raw.address_space(), AddressSpace::Host);

    let device = unsafe {
        RawArray::<i32, 2>::from_raw_parts(std::ptr::NonNull::dangling().as_ptr(), [2, 3], AddressSpace::Device)
    };
    let err = device.try_get([0, 0]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AddressSpaceMismatch);
    let err = device.try_slice::<2, _>((.., ..)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AddressSpaceMismatch);

    let null = RawArray::<u8, 1>::null();
    assert!(null.is_null());
    assert_eq!(null.address_space(), AddressSpace::None);
}

#[test]
fn assignment_through_views() {
    // matching stride orders, both strided-1d: the linear fast path
    let src = arange(0, 6).into_shape([2, 3]).unwrap();
    let mut dst = Array::<i32, 2>::zeros([2, 3]);
    dst.assign(&src);
    assert_eq!(dst, src);

    // block path: same stride gaps on both sides
    let big_a = arange(0, 12).into_shape([2, 6]).unwrap();
    let big_b = arange(100, 112).into_shape([2, 6]).unwrap();
    let va = big_a.slice::<2, _>((.., 0..4));
    let mut owned = Array::<i32, 2>::zeros([2, 4]);
    let mut vb_owner = big_b.to_owned();
    let mut vb = vb_owner.slice_mut::<2, _>((.., 0..4));
    vb.assign(&va);
    for i in 0..2 {
        for j in 0..4 {
            assert_eq!(vb[[i, j]], va[[i, j]]);
        }
    }

    // differing stride orders fall back to the elementwise walk
    let f = ndview::FArray::<i32, 2>::from_shape_fn([2, 4], |ix| (ix[0] * 4 + ix[1]) as i32);
    owned.assign(&f);
    assert_eq!(owned, f);

    // shape mismatch on a view is an error
    let mut short = Array::<i32, 2>::zeros([2, 2]);
    let err = short.view_mut().try_assign(&src).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
}
