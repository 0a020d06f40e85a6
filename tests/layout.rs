use itertools::enumerate;

use ndview::layout::{encode_static_extents, BasicLayout, LayoutPolicy};
use ndview::permutation;
use ndview::{
    AlgArray, ArrayBase, CLayout, ErrorKind, FLayout, HeapRepr, IdxMap, Indices, SliceItem,
};
use quickcheck::{quickcheck, TestResult};

/// A permutation of `0..4` derived from arbitrary sort keys.
fn perm4(keys: &[u16]) -> [usize; 4] {
    let mut key = [0u16; 4];
    for k in 0..4 {
        key[k] = keys.get(k).copied().unwrap_or(k as u16);
    }
    let mut p = [0usize, 1, 2, 3];
    p.sort_by_key(|&i| (key[i], i));
    p
}

fn small_shape(a: u8, b: u8, c: u8) -> [usize; 3] {
    [(a % 4 + 1) as usize, (b % 4 + 1) as usize, (c % 4 + 1) as usize]
}

/// Offsets visited when walking the map in stride order.
fn offsets_in_stride_order<const R: usize>(m: &IdxMap<R>) -> Vec<isize> {
    let order = *m.stride_order();
    let mut permuted = [0usize; R];
    for k in 0..R {
        permuted[k] = m.lengths()[order[k]];
    }
    Indices::new(permuted)
        .map(|pos| {
            let mut ix = [0usize; R];
            for k in 0..R {
                ix[order[k]] = pos[k];
            }
            m.offset(ix)
        })
        .collect()
}

quickcheck! {
    fn encode_decode_roundtrip(keys: Vec<u16>) -> bool {
        let p = perm4(&keys);
        permutation::decode::<4>(permutation::encode(&p)) == p
    }

    fn compose_with_inverse_is_identity(keys: Vec<u16>) -> bool {
        let p = perm4(&keys);
        permutation::compose(&p, &permutation::inverse(&p)) == permutation::identity::<4>()
            && permutation::is_valid(&p)
    }

    fn offset_index_roundtrip(a: u8, b: u8, c: u8) -> bool {
        let m = IdxMap::for_policy::<CLayout>(small_shape(a, b, c));
        Indices::new(*m.lengths()).all(|ix| m.to_idx(m.offset(ix)) == ix)
    }

    fn offset_index_roundtrip_strided(a: u8, b: u8) -> bool {
        // a stepped rank-1 map stays strided-1d with a minimum stride
        // above one
        let n = (a % 12 + 1) as usize;
        let step = (b % 3 + 2) as isize;
        let m = IdxMap::for_policy::<CLayout>([n]);
        let item = SliceItem::Slice { start: 0, end: None, step };
        let (off, m2) = m.slice::<1>(&[item]).unwrap();
        off == 0
            && m2.prop().has_strided_1d()
            && Indices::new(*m2.lengths()).all(|ix| m2.to_idx(m2.offset(ix)) == ix)
    }

    fn full_slice_is_identity(a: u8, b: u8, c: u8) -> bool {
        let m = IdxMap::for_policy::<FLayout>(small_shape(a, b, c));
        let (off, s) = m.slice::<3>(&[SliceItem::full(); 3]).unwrap();
        off == 0 && s == m
    }

    fn transpose_involution(keys: Vec<u16>, a: u8, b: u8, c: u8) -> TestResult {
        let p4 = perm4(&keys);
        if p4[3] != 3 {
            // stay within rank 3
            return TestResult::discard();
        }
        let perm = [p4[0], p4[1], p4[2]];
        let m = IdxMap::for_policy::<CLayout>(small_shape(a, b, c));
        let back = m.transpose(&perm).transpose(&permutation::inverse(&perm));
        TestResult::from_bool(back == m)
    }
}

#[test]
fn classified_property_matches_recomputation() {
    let m = IdxMap::for_policy::<CLayout>([3, 4, 5]);
    let cases: Vec<(isize, IdxMap<2>)> = vec![
        m.slice::<2>(&[SliceItem::Index(1), SliceItem::full(), SliceItem::full()]).unwrap(),
        m.slice::<2>(&[SliceItem::full(), SliceItem::Index(0), SliceItem::full()]).unwrap(),
        m.slice::<2>(&[
            SliceItem::full(),
            SliceItem::full(),
            SliceItem::Index(2),
        ]).unwrap(),
    ];
    for (_, sub) in cases {
        // a claimed contiguous bit must survive recomputation from strides
        if sub.prop().is_contiguous() {
            assert!(sub.is_contiguous());
        }
    }
    // fixing the slowest axis of a C map keeps it contiguous
    let (_, fixed) = m
        .slice::<2>(&[SliceItem::Index(2), SliceItem::full(), SliceItem::full()])
        .unwrap();
    assert!(fixed.prop().is_contiguous());
    assert!(fixed.is_contiguous());
}

#[test]
fn block_layout_addresses_match_traversal() {
    let m = IdxMap::for_policy::<CLayout>([4, 6]);
    for (_, sub) in [
        m.slice::<2>(&[SliceItem::full(), SliceItem::full()]).unwrap(),
        m.slice::<2>(&[
            SliceItem::full(),
            SliceItem::Slice { start: 0, end: Some(3), step: 1 },
        ])
        .unwrap(),
    ] {
        let block = sub.block_layout().expect("single gap at most");
        let offsets = offsets_in_stride_order(&sub);
        for (k, &off) in enumerate(offsets.iter()) {
            let expect =
                (k / block.block_size) as isize * block.block_stride + (k % block.block_size) as isize;
            assert_eq!(off, expect);
        }
    }
}

#[test]
fn strided_construction_honors_the_policy() {
    let ok = IdxMap::from_shape_strides::<CLayout>([2, 3], [3, 1]);
    assert!(ok.is_ok());
    assert!(ok.unwrap().prop().is_contiguous());

    let err = IdxMap::from_shape_strides::<CLayout>([2, 3], [4, 1]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LayoutMismatch);

    // the strided policy takes anything
    let loose = IdxMap::from_shape_strides::<ndview::CStrideLayout>([2, 3], [4, 1]);
    assert!(loose.is_ok());
}

// A custom layout: the first axis is pinned to 3 elements at compile time.
type FixedRows = BasicLayout<
    { encode_static_extents(&[3usize, 0]) },
    { permutation::encode(&[0usize, 1]) },
    3,
>;

#[test]
fn static_extents_constrain_construction() {
    type FixedArray = ArrayBase<HeapRepr<i32>, 2, FixedRows, AlgArray>;

    assert_eq!(FixedRows::stride_order::<2>(), [0, 1]);
    let a = FixedArray::from_shape_vec([3, 2], (0..6).collect()).unwrap();
    assert_eq!(a[[2, 1]], 5);

    let err = FixedArray::from_shape_vec([4, 2], (0..8).collect()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);

    // only the dynamic axis needs a length
    assert_eq!(FixedArray::resolve_shape(&[2]), [3, 2]);
}
