#![cfg(feature = "alloc")]

use core::alloc::Layout;
use core::marker::PhantomData as Cfg;

use rstest::rstest;

#[cfg(feature = "zeroize")]
use vector_alloc::alloc::ZeroizingAlloc;
use vector_alloc::{alloc::AllocatorDefault, vector, Global, StorageError, Vector};

mod common;

use common::{TaggedAlloc, TrackingAlloc};

const SLICE: &[usize] = &[1, 2, 3, 4, 5];

#[rstest]
#[case::global(Cfg::<Global>)]
#[cfg_attr(feature = "zeroize", case::zeroizing(Cfg::<ZeroizingAlloc<Global>>))]
fn vector_new<A: AllocatorDefault>(#[case] _config: Cfg<A>) {
    let v = Vector::<usize, A>::new();
    assert!(v.is_empty());
    assert_eq!(v.capacity(), 0);
    assert_eq!(v.begin(), v.end());
}

#[rstest]
#[case::global(Cfg::<Global>)]
#[cfg_attr(feature = "zeroize", case::zeroizing(Cfg::<ZeroizingAlloc<Global>>))]
fn vector_extend<A: AllocatorDefault>(#[case] _config: Cfg<A>) {
    let mut v = Vector::<usize, A>::new();
    v.extend(SLICE.iter().cloned());
    assert!(v.capacity() >= SLICE.len());
    assert_eq!(v.len(), SLICE.len());
    assert_eq!(v.as_slice(), SLICE);
}

#[rstest]
#[case::global(Cfg::<Global>)]
#[cfg_attr(feature = "zeroize", case::zeroizing(Cfg::<ZeroizingAlloc<Global>>))]
fn vector_extend_large<A: AllocatorDefault>(#[case] _config: Cfg<A>) {
    let data: Vec<usize> = (0..1000).collect();
    let mut v = Vector::<usize, A>::with_capacity(1);
    v.extend(data.iter().filter(|_| true));
    assert_eq!(v, data);
}

#[rstest]
#[case::empty(0)]
#[case::one(1)]
#[case::small(7)]
#[case::large(100)]
fn vector_from_elem(#[case] count: usize) {
    let v = Vector::<u32>::from_elem(count, 2019);
    assert_eq!(v.len(), count);
    assert_eq!(v.capacity(), count);
    assert!(v.iter().all(|&x| x == 2019));
}

#[test]
fn vector_check_capacity_growth() {
    let mut res = [0usize; 10];
    let mut v = Vector::<usize>::new();
    for cap in res.iter_mut() {
        v.push(1);
        *cap = v.capacity();
    }
    assert_eq!(res, [8, 8, 8, 8, 8, 8, 8, 8, 16, 16]);
}

#[test]
fn vector_push_is_amortized() {
    const COUNT: usize = 10_000;
    let mut v = Vector::<usize>::new();
    let mut moved = 0;
    for value in 0..COUNT {
        if v.len() == v.capacity() {
            moved += v.len();
        }
        v.push(value);
    }
    assert_eq!(v.len(), COUNT);
    assert!(moved <= 2 * COUNT, "moved {moved} values");
}

#[test]
fn vector_push_insert_scenario() {
    let mut v = Vector::<i32>::new();
    for value in [5, 1, 3, 7] {
        v.push(value);
    }
    let pos = v.insert(v.begin() + 2, 666);
    assert_eq!(v.get_at(pos), Some(&666));
    assert_eq!(v, [5, 1, 666, 3, 7]);
    v.push(4);
    assert_eq!(v, [5, 1, 666, 3, 7, 4]);
    let pos = v.insert(v.begin(), 777);
    assert_eq!(pos, v.begin());
    assert_eq!(v, [777, 5, 1, 666, 3, 7, 4]);
}

#[test]
fn vector_resize_scenario() {
    let mut v = Vector::<i32>::from_elem(3, 2019);
    v.resize(10, 666);
    assert_eq!(v.len(), 10);
    assert_eq!(v.capacity(), 10);
    assert!(v[..3].iter().all(|&x| x == 2019));
    assert!(v[3..].iter().all(|&x| x == 666));
}

#[test]
fn vector_resize_shrink() {
    let mut v = Vector::<usize>::from_slice(SLICE);
    let cap = v.capacity();
    v.resize(2, 0);
    assert_eq!(v, [1, 2]);
    assert_eq!(v.capacity(), cap);
    v.resize(2, 0);
    assert_eq!(v, [1, 2]);
    let mut next = 10;
    v.resize_with(4, || {
        next += 1;
        next
    });
    assert_eq!(v, [1, 2, 11, 12]);
}

#[test]
fn vector_resize_shrink_keeps_prefix() {
    let mut v = Vector::<usize>::from_slice(SLICE);
    let start = v.as_ptr();
    let second = v.cursor_at(1);
    v.resize(2, 0);
    assert_eq!(v.as_ptr(), start);
    assert_eq!(v.get_at(second), Some(&2));
    assert_eq!(v.get_at(v.begin()), Some(&1));
    assert_eq!(v.position(second), Some(1));
}

#[test]
fn vector_reserve_to() {
    let mut v = Vector::<usize>::new();
    v.reserve_to(10);
    assert_eq!(v.capacity(), 10);
    v.extend_from_slice(SLICE);
    let start = v.as_ptr();
    v.reserve_to(4);
    v.reserve_to(10);
    assert_eq!(v.capacity(), 10);
    assert_eq!(v.as_ptr(), start);
    v.reserve_to(40);
    assert_eq!(v.capacity(), 40);
    assert_eq!(v, SLICE);
}

#[test]
fn vector_reserve_additional() {
    let mut v = Vector::<usize>::from_slice(SLICE);
    v.reserve_exact(3);
    assert_eq!(v.capacity(), 8);
    v.reserve(1);
    assert_eq!(v.capacity(), 8);
    v.reserve(4);
    assert_eq!(v.capacity(), 10);
    v.shrink_to_fit();
    assert_eq!(v.capacity(), 5);
    assert_eq!(v, SLICE);
}

#[test]
fn vector_insert_forms() {
    let mut v = Vector::<u32>::from_slice(&[1, 2, 3]);
    let pos = v.insert_n(v.begin() + 1, 3, 0);
    assert_eq!(v.index_of(pos), 1);
    assert_eq!(v, [1, 0, 0, 0, 2, 3]);
    let pos = v.insert_slice(v.end(), &[8, 9]);
    assert_eq!(v.index_of(pos), 6);
    assert_eq!(v, [1, 0, 0, 0, 2, 3, 8, 9]);
    let pos = v.insert_iter(v.begin(), [5u8, 6]);
    assert_eq!(pos, v.begin());
    assert_eq!(v, [5, 6, 1, 0, 0, 0, 2, 3, 8, 9]);
    let pos = v.insert_slice(v.begin() + 3, &[]);
    assert_eq!(v.index_of(pos), 3);
    assert_eq!(v.len(), 10);
}

#[test]
fn vector_insert_in_place_keeps_buffer() {
    let mut v = Vector::<u32>::with_capacity(8);
    v.extend([1, 2, 3]);
    let start = v.as_ptr();
    let head = v.cursor_at(0);
    v.insert(v.begin() + 1, 9);
    assert_eq!(v.as_ptr(), start);
    // positions before the insertion point still refer to the same values
    assert_eq!(v.get_at(head), Some(&1));
    assert_eq!(v, [1, 9, 2, 3]);
}

#[test]
fn vector_growth_relocates() {
    let mut v = Vector::<u32>::with_capacity(2);
    v.extend([1, 2]);
    let start = v.as_ptr();
    v.push(3);
    assert_ne!(v.as_ptr(), start);
    assert_eq!(v.capacity(), 8);
    assert_eq!(v, [1, 2, 3]);
}

#[test]
fn vector_remove_truncate_clear() {
    let mut v = Vector::<usize>::from_slice(SLICE);
    assert_eq!(v.remove(1), 2);
    assert_eq!(v, [1, 3, 4, 5]);
    assert_eq!(v.pop(), Some(5));
    v.truncate(1);
    assert_eq!(v, [1]);
    let cap = v.capacity();
    v.clear();
    assert!(v.is_empty());
    assert_eq!(v.capacity(), cap);
    assert_eq!(v.pop(), None);
}

#[test]
#[should_panic(expected = "Invalid element index")]
fn vector_remove_out_of_range() {
    let mut v = Vector::<usize>::from_slice(SLICE);
    v.remove(5);
}

#[test]
#[should_panic]
fn vector_index_out_of_range() {
    let v = Vector::<usize>::from_slice(SLICE);
    let _value = v[5];
}

#[test]
fn vector_assign() {
    let mut v = Vector::<u32>::from_slice(&[1, 2, 3]);
    v.assign(2, 7);
    assert_eq!(v, [7, 7]);
    v.assign_iter(4..8);
    assert_eq!(v, [4, 5, 6, 7]);
    v.assign_slice(&[1]);
    assert_eq!(v, [1]);
}

#[test]
fn vector_clone_is_deep() {
    let a = vector![1, 2, 3];
    let mut b = a.clone();
    b[0] = 10;
    assert_eq!(a, [1, 2, 3]);
    assert_eq!(b, [10, 2, 3]);
    assert_eq!(b.capacity(), 3);
    assert_ne!(a.as_ptr(), b.as_ptr());
}

#[test]
fn vector_clone_from_reuses_capacity() {
    let src = vector![4, 5];
    let mut dst = Vector::<i32>::with_capacity(10);
    dst.extend([1, 2, 3]);
    dst.clone_from(&src);
    assert_eq!(dst, [4, 5]);
    assert_eq!(dst.capacity(), 10);
}

#[test]
fn vector_assign_from_allocator() {
    let src = Vector::from_slice_in(&[1, 2, 3], TaggedAlloc(1));
    let mut other = Vector::from_slice_in(&[9; 10], TaggedAlloc(2));
    other.assign_from(&src);
    assert_eq!(other, [1, 2, 3]);
    assert_eq!(other.allocator(), &TaggedAlloc(1));
    assert_eq!(other.capacity(), 3);

    let mut same = Vector::with_capacity_in(10, TaggedAlloc(1));
    same.push(7);
    same.assign_from(&src);
    assert_eq!(same, [1, 2, 3]);
    assert_eq!(same.capacity(), 10);
}

#[test]
fn vector_take_and_move_from() {
    let mut a = vector![1, 2, 3];
    let b = a.take();
    assert_eq!(b, [1, 2, 3]);
    assert_eq!((a.len(), a.capacity()), (0, 0));

    let mut c = vector![7];
    let mut b = b;
    c.move_from(&mut b);
    assert_eq!(c, [1, 2, 3]);
    assert_eq!((b.len(), b.capacity()), (0, 0));

    let mut d = vector![4];
    c.swap_with(&mut d);
    assert_eq!(c, [4]);
    assert_eq!(d, [1, 2, 3]);
}

#[test]
fn vector_try_push_alloc_error() {
    let alloc = TrackingAlloc::with_budget(0);
    let mut v = Vector::new_in(&alloc);
    let err = v.try_push(5u32).unwrap_err();
    assert_eq!(
        err.error(),
        &StorageError::AllocError(Layout::array::<u32>(8).unwrap())
    );
    assert_eq!(err.into_value(), 5);
    assert_eq!(v.capacity(), 0);
    assert_eq!(alloc.live(), 0);
}

#[test]
fn vector_failed_growth_is_unchanged() {
    let alloc = TrackingAlloc::with_budget(32);
    let mut v = Vector::with_capacity_in(8, &alloc);
    v.extend(0u32..8);
    let start = v.as_ptr();
    let err = v.try_insert(v.begin(), 99).unwrap_err();
    assert!(matches!(err.error(), StorageError::AllocError(_)));
    assert_eq!(err.into_value(), 99);
    assert_eq!(v.as_ptr(), start);
    assert_eq!(v.capacity(), 8);
    assert_eq!(v, [0, 1, 2, 3, 4, 5, 6, 7]);
    assert!(v.try_reserve_to(9).is_err());
    assert_eq!(v.capacity(), 8);
    assert_eq!(alloc.live(), 1);
    drop(v);
    assert_eq!(alloc.live(), 0);
}

#[test]
fn vector_capacity_limit() {
    let mut v = Vector::<u64>::new();
    assert_eq!(v.try_reserve(usize::MAX), Err(StorageError::CapacityLimit));
    assert_eq!(
        v.try_reserve_to(isize::MAX as usize / 8 + 1),
        Err(StorageError::CapacityLimit)
    );
    assert_eq!(
        Vector::<u64>::try_with_capacity(usize::MAX).unwrap_err(),
        StorageError::CapacityLimit
    );
    v.push(1);
    let err = v.try_insert_n(v.end(), usize::MAX, 2).unwrap_err();
    assert_eq!(err.error(), &StorageError::CapacityLimit);
    assert_eq!(v, [1]);
}

#[test]
#[should_panic(expected = "Exceeded storage capacity limit")]
fn vector_reserve_panics_on_limit() {
    let mut v = Vector::<u64>::new();
    v.reserve(usize::MAX);
}

#[test]
fn vector_cursor_span() {
    let v = Vector::<u16>::from_slice(&[3, 4, 5]);
    assert_eq!(v.end() - v.begin(), 3);
    let mut pos = v.begin();
    let mut seen = Vec::new();
    while pos != v.end() {
        seen.push(*v.get_at(pos).unwrap());
        pos += 1;
    }
    assert_eq!(seen, [3, 4, 5]);
    assert_eq!(v.cursor_at(3), v.end());
}

#[test]
fn vector_zst() {
    let mut v = Vector::<()>::new();
    for _ in 0..3 {
        v.push(());
    }
    v.insert(v.begin() + 1, ());
    assert_eq!(v.len(), 4);
    assert!(v.capacity() >= 4);
    assert_eq!(v.end() - v.begin(), 4);
    assert_eq!(v.into_iter().count(), 4);
}

#[test]
fn vector_into_iter() {
    let v = vector![String::from("a"), String::from("b"), String::from("c")];
    let mut iter = v.into_iter();
    assert_eq!(iter.len(), 3);
    assert_eq!(iter.next().as_deref(), Some("a"));
    assert_eq!(iter.next_back().as_deref(), Some("c"));
    assert_eq!(iter.as_slice(), ["b"]);
}

#[test]
fn vector_std_conversions() {
    let std_vec = vec![1, 2, 3];
    let v: Vector<i32> = Vector::from(std_vec.clone());
    assert_eq!(v, std_vec);
    assert_eq!(std_vec, v);
    let back: Vec<i32> = v.into();
    assert_eq!(back, [1, 2, 3]);
    let collected: Vector<i32> = back.iter().map(|x| x * 2).collect();
    assert_eq!(collected, [2, 4, 6]);
}

#[test]
fn vector_macro_forms() {
    let empty: Vector<u8> = vector![];
    assert!(empty.is_empty());
    assert_eq!(vector![0u8; 4], [0, 0, 0, 0]);
    let v = vector![in TaggedAlloc(3); 1, 2];
    assert_eq!(v, [1, 2]);
    assert_eq!(v.allocator(), &TaggedAlloc(3));
    let v = vector![in TaggedAlloc(4); 'x'; 2];
    assert_eq!(v, ['x', 'x']);
}

#[test]
fn vector_ordering_and_hash() {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let a = vector![1, 2, 3];
    let b = vector![1, 2, 4];
    assert!(a < b);

    let hash = |data: &[i32]| {
        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        hasher.finish()
    };
    let mut hasher = DefaultHasher::new();
    a.hash(&mut hasher);
    assert_eq!(hasher.finish(), hash(&[1, 2, 3]));
}

#[cfg(feature = "std")]
#[test]
fn vector_io_write() {
    use std::io::Write;

    let mut v = Vector::<u8>::new();
    write!(v, "{}-{}", 1, 2).unwrap();
    assert_eq!(v, b"1-2");
}
