// Copyright 2025-2026 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The concrete storage handles.
//!
//! Five ownership flavors over a contiguous buffer of elements:
//! [`HeapRepr`] (exclusive heap), [`StackRepr`] (inline, fixed capacity),
//! [`SsoRepr`] (inline until a threshold, heap beyond), [`SharedRepr`]
//! (reference counted) and [`UnownedRepr`] (borrowed raw memory with an
//! address-space tag). [`ViewRepr`]/[`ViewReprMut`] carry the element
//! pointer and borrow lifetime of safe views.

use std::marker::PhantomData;
use std::mem::{self, ManuallyDrop, MaybeUninit};
use std::ptr::NonNull;
use std::sync::Arc;

use num_traits::Zero;

use crate::address_space::AddressSpace;
use crate::data_traits::{Storage, StorageMut, StorageOwned, StorageShared};
use crate::errors::NdError;

/// Exclusively owned heap storage.
///
/// Like a `Vec` without growth; the allocation is released exactly once on
/// drop.
pub struct HeapRepr<A> {
    ptr: NonNull<A>,
    len: usize,
    capacity: usize,
}

impl<A> HeapRepr<A> {
    pub fn from_vec(v: Vec<A>) -> Self {
        let mut v = ManuallyDrop::new(v);
        HeapRepr {
            // a Vec's pointer is never null
            ptr: unsafe { NonNull::new_unchecked(v.as_mut_ptr()) },
            len: v.len(),
            capacity: v.capacity(),
        }
    }

    /// `len` copies of `elem`.
    pub fn from_elem(len: usize, elem: A) -> Self
    where
        A: Clone,
    {
        Self::from_vec(vec![elem; len])
    }

    /// `len` copies of `elem`, reporting `OutOfMemory` instead of aborting
    /// when the allocation fails.
    pub fn try_from_elem(len: usize, elem: A) -> Result<Self, NdError>
    where
        A: Clone,
    {
        let mut v = Vec::new();
        v.try_reserve_exact(len)
            .map_err(|_| NdError::out_of_memory(len.saturating_mul(mem::size_of::<A>())))?;
        v.resize(len, elem);
        Ok(Self::from_vec(v))
    }

    /// Zero-filled storage; the moral equivalent of a memset.
    pub fn zeroed(len: usize) -> Self
    where
        A: Zero + Copy,
    {
        Self::from_elem(len, A::zero())
    }

    /// Allocate without constructing the elements.
    ///
    /// # Safety
    ///
    /// Every element must be written before it is read; restricted to
    /// `Copy` types so skipped writes can at worst yield garbage values.
    pub unsafe fn uninitialized(len: usize) -> Self
    where
        A: Copy,
    {
        let mut v = Vec::with_capacity(len);
        v.set_len(len);
        Self::from_vec(v)
    }

    /// Adopt an existing allocation of `len` elements.
    ///
    /// # Safety
    ///
    /// `ptr` must come from a `Vec<A>` (or equivalent allocation) of length
    /// and capacity `len`; ownership moves to the handle.
    pub unsafe fn from_raw(ptr: *mut A, len: usize) -> Self {
        HeapRepr {
            ptr: NonNull::new_unchecked(ptr),
            len,
            capacity: len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[A] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [A] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Take the buffer as a `Vec`, leaving the handle empty.
    fn take_as_vec(&mut self) -> Vec<A> {
        let len = self.len;
        let capacity = self.capacity;
        self.len = 0;
        self.capacity = 0;
        unsafe { Vec::from_raw_parts(self.ptr.as_ptr(), len, capacity) }
    }

    pub fn into_vec(self) -> Vec<A> {
        ManuallyDrop::new(self).take_as_vec()
    }
}

impl<A: Clone> Clone for HeapRepr<A> {
    fn clone(&self) -> Self {
        Self::from_vec(self.as_slice().to_vec())
    }
}

impl<A> Drop for HeapRepr<A> {
    fn drop(&mut self) {
        if self.capacity > 0 {
            // if the elements don't need dropping, only the allocation does
            if !mem::needs_drop::<A>() {
                self.len = 0;
            }
            drop(self.take_as_vec());
        }
    }
}

unsafe impl<A: Send> Send for HeapRepr<A> {}
unsafe impl<A: Sync> Sync for HeapRepr<A> {}

unsafe impl<A> Storage for HeapRepr<A> {
    type Elem = A;

    fn as_base_ptr(&self) -> *const A {
        self.ptr.as_ptr()
    }

    fn data(&self) -> &[A] {
        self.as_slice()
    }
}

unsafe impl<A> StorageMut for HeapRepr<A> {
    fn as_base_ptr_mut(&mut self) -> *mut A {
        self.ptr.as_ptr()
    }

    fn data_mut(&mut self) -> &mut [A] {
        self.as_mut_slice()
    }
}

unsafe impl<A> StorageOwned for HeapRepr<A> {
    fn from_vec(elements: Vec<A>) -> Self {
        HeapRepr::from_vec(elements)
    }

    fn into_shared(self) -> SharedRepr<A> {
        SharedRepr(Arc::new(self))
    }
}

/// Inline storage of exactly `N` elements; a value type that lives wherever
/// the array does.
#[derive(Clone)]
pub struct StackRepr<A, const N: usize> {
    buf: [A; N],
}

impl<A, const N: usize> StackRepr<A, N> {
    pub fn new(buf: [A; N]) -> Self {
        StackRepr { buf }
    }

    pub fn from_fn(f: impl FnMut(usize) -> A) -> Self {
        StackRepr {
            buf: std::array::from_fn(f),
        }
    }

    pub fn as_slice(&self) -> &[A] {
        &self.buf
    }
}

unsafe impl<A, const N: usize> Storage for StackRepr<A, N> {
    type Elem = A;

    fn as_base_ptr(&self) -> *const A {
        self.buf.as_ptr()
    }

    fn data(&self) -> &[A] {
        &self.buf
    }
}

unsafe impl<A, const N: usize> StorageMut for StackRepr<A, N> {
    fn as_base_ptr_mut(&mut self) -> *mut A {
        self.buf.as_mut_ptr()
    }

    fn data_mut(&mut self) -> &mut [A] {
        &mut self.buf
    }
}

unsafe impl<A, const N: usize> StorageOwned for StackRepr<A, N> {
    /// Panics unless exactly `N` elements are supplied; the inline size is
    /// part of the type.
    fn from_vec(elements: Vec<A>) -> Self {
        match <[A; N]>::try_from(elements) {
            Ok(buf) => StackRepr { buf },
            Err(v) => panic!("stack storage of size {} given {} elements", N, v.len()),
        }
    }

    fn into_shared(self) -> SharedRepr<A> {
        HeapRepr::from_vec(Vec::from(self.buf)).into_shared()
    }
}

enum SsoInner<A, const N: usize> {
    Inline {
        buf: [MaybeUninit<A>; N],
        len: usize,
    },
    Spilled(HeapRepr<A>),
}

/// Small-size optimized storage: inline while the element count stays
/// within `N`, heap otherwise. The mode is frozen at construction.
pub struct SsoRepr<A, const N: usize>(SsoInner<A, N>);

impl<A, const N: usize> SsoRepr<A, N> {
    pub fn from_vec(v: Vec<A>) -> Self {
        if v.len() <= N {
            let len = v.len();
            let mut buf = [const { MaybeUninit::uninit() }; N];
            for (slot, x) in buf.iter_mut().zip(v) {
                slot.write(x);
            }
            SsoRepr(SsoInner::Inline { buf, len })
        } else {
            SsoRepr(SsoInner::Spilled(HeapRepr::from_vec(v)))
        }
    }

    pub fn is_spilled(&self) -> bool {
        matches!(self.0, SsoInner::Spilled(_))
    }

    pub fn len(&self) -> usize {
        match &self.0 {
            SsoInner::Inline { len, .. } => *len,
            SsoInner::Spilled(heap) => heap.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[A] {
        match &self.0 {
            SsoInner::Inline { buf, len } => unsafe {
                std::slice::from_raw_parts(buf.as_ptr().cast::<A>(), *len)
            },
            SsoInner::Spilled(heap) => heap.as_slice(),
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [A] {
        match &mut self.0 {
            SsoInner::Inline { buf, len } => unsafe {
                std::slice::from_raw_parts_mut(buf.as_mut_ptr().cast::<A>(), *len)
            },
            SsoInner::Spilled(heap) => heap.as_mut_slice(),
        }
    }
}

impl<A, const N: usize> Drop for SsoRepr<A, N> {
    fn drop(&mut self) {
        if let SsoInner::Inline { buf, len } = &mut self.0 {
            // the first `len` slots are initialized
            unsafe {
                std::ptr::drop_in_place(std::slice::from_raw_parts_mut(
                    buf.as_mut_ptr().cast::<A>(),
                    *len,
                ));
            }
        }
    }
}

impl<A: Clone, const N: usize> Clone for SsoRepr<A, N> {
    fn clone(&self) -> Self {
        // same length, so the clone freezes into the same mode
        Self::from_vec(self.as_slice().to_vec())
    }
}

unsafe impl<A: Send, const N: usize> Send for SsoRepr<A, N> {}
unsafe impl<A: Sync, const N: usize> Sync for SsoRepr<A, N> {}

unsafe impl<A, const N: usize> Storage for SsoRepr<A, N> {
    type Elem = A;

    fn as_base_ptr(&self) -> *const A {
        self.as_slice().as_ptr()
    }

    fn data(&self) -> &[A] {
        self.as_slice()
    }
}

unsafe impl<A, const N: usize> StorageMut for SsoRepr<A, N> {
    fn as_base_ptr_mut(&mut self) -> *mut A {
        self.as_mut_slice().as_mut_ptr()
    }

    fn data_mut(&mut self) -> &mut [A] {
        self.as_mut_slice()
    }
}

unsafe impl<A, const N: usize> StorageOwned for SsoRepr<A, N> {
    fn from_vec(elements: Vec<A>) -> Self {
        SsoRepr::from_vec(elements)
    }

    fn into_shared(self) -> SharedRepr<A> {
        let mut this = ManuallyDrop::new(self);
        let v = match &mut this.0 {
            SsoInner::Inline { buf, len } => {
                let mut v = Vec::with_capacity(*len);
                for slot in buf.iter().take(*len) {
                    v.push(unsafe { slot.assume_init_read() });
                }
                v
            }
            SsoInner::Spilled(heap) => heap.take_as_vec(),
        };
        HeapRepr::from_vec(v).into_shared()
    }
}

/// Reference-counted shared storage; clones share the buffer, and the
/// refcount updates are thread safe.
pub struct SharedRepr<A>(pub(crate) Arc<HeapRepr<A>>);

impl<A> Clone for SharedRepr<A> {
    fn clone(&self) -> Self {
        SharedRepr(Arc::clone(&self.0))
    }
}

impl<A> SharedRepr<A> {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

unsafe impl<A> Storage for SharedRepr<A> {
    type Elem = A;

    fn as_base_ptr(&self) -> *const A {
        self.0.as_base_ptr()
    }

    fn data(&self) -> &[A] {
        self.0.as_slice()
    }
}

// Mutation detaches the buffer from its other owners first. Arrays address
// elements by offset from the base, so the detach needs no pointer fixup.
unsafe impl<A: Clone> StorageMut for SharedRepr<A> {
    fn as_base_ptr_mut(&mut self) -> *mut A {
        Arc::make_mut(&mut self.0).as_base_ptr_mut()
    }

    fn data_mut(&mut self) -> &mut [A] {
        Arc::make_mut(&mut self.0).as_mut_slice()
    }

    fn ensure_unique(&mut self) {
        if Arc::get_mut(&mut self.0).is_none() {
            Arc::make_mut(&mut self.0);
        }
    }

    fn is_unique(&mut self) -> bool {
        Arc::get_mut(&mut self.0).is_some()
    }
}

unsafe impl<A> StorageOwned for SharedRepr<A> {
    fn from_vec(elements: Vec<A>) -> Self {
        SharedRepr(Arc::new(HeapRepr::from_vec(elements)))
    }

    fn into_shared(self) -> SharedRepr<A> {
        self
    }
}

unsafe impl<A> StorageShared for SharedRepr<A> {}

/// Borrowed raw memory: a pointer, a length and an address-space tag.
///
/// Nothing is owned; the caller guarantees the memory outlives every array
/// built on the handle. Device-tagged handles refuse host dereferences.
#[derive(Copy, Clone)]
pub struct UnownedRepr<A> {
    ptr: *mut A,
    len: usize,
    space: AddressSpace,
}

impl<A> UnownedRepr<A> {
    /// # Safety
    ///
    /// `ptr` must be valid for `len` elements in `space` for as long as
    /// the handle (and anything derived from it) is used.
    pub unsafe fn from_raw_parts(ptr: *mut A, len: usize, space: AddressSpace) -> Self {
        UnownedRepr { ptr, len, space }
    }

    /// A handle pointing at nothing.
    pub fn null() -> Self {
        UnownedRepr {
            ptr: std::ptr::null_mut(),
            len: 0,
            space: AddressSpace::None,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

unsafe impl<A> Storage for UnownedRepr<A> {
    type Elem = A;

    fn as_base_ptr(&self) -> *const A {
        self.ptr
    }

    fn data(&self) -> &[A] {
        self.space
            .expect_host()
            .expect("host access to non-host memory");
        if self.ptr.is_null() {
            &[]
        } else {
            unsafe { std::slice::from_raw_parts(self.ptr, self.len) }
        }
    }

    fn address_space(&self) -> AddressSpace {
        self.space
    }

    fn is_null(&self) -> bool {
        self.ptr.is_null()
    }
}

unsafe impl<A> StorageMut for UnownedRepr<A> {
    fn as_base_ptr_mut(&mut self) -> *mut A {
        self.ptr
    }

    fn data_mut(&mut self) -> &mut [A] {
        self.space
            .expect_host()
            .expect("host access to non-host memory");
        if self.ptr.is_null() {
            &mut []
        } else {
            unsafe { std::slice::from_raw_parts_mut(self.ptr, self.len) }
        }
    }
}

/// Handle of a read-only view: the element pointer plus the borrow it was
/// carved from.
pub struct ViewRepr<'a, A> {
    ptr: NonNull<A>,
    life: PhantomData<&'a A>,
}

impl<'a, A> ViewRepr<'a, A> {
    /// # Safety
    ///
    /// `ptr` must stay valid for reads for the lifetime `'a`.
    pub(crate) unsafe fn new(ptr: NonNull<A>) -> Self {
        ViewRepr {
            ptr,
            life: PhantomData,
        }
    }
}

impl<'a, A> Copy for ViewRepr<'a, A> {}
impl<'a, A> Clone for ViewRepr<'a, A> {
    fn clone(&self) -> Self {
        *self
    }
}

unsafe impl<'a, A: Sync> Send for ViewRepr<'a, A> {}
unsafe impl<'a, A: Sync> Sync for ViewRepr<'a, A> {}

unsafe impl<'a, A> Storage for ViewRepr<'a, A> {
    type Elem = A;

    fn as_base_ptr(&self) -> *const A {
        self.ptr.as_ptr()
    }

    fn data(&self) -> &[A] {
        &[]
    }
}

unsafe impl<'a, A> StorageShared for ViewRepr<'a, A> {}

/// Handle of a mutable view; unlike [`ViewRepr`] it cannot be copied.
pub struct ViewReprMut<'a, A> {
    ptr: NonNull<A>,
    life: PhantomData<&'a mut A>,
}

impl<'a, A> ViewReprMut<'a, A> {
    /// # Safety
    ///
    /// `ptr` must stay valid for reads and writes for the lifetime `'a`,
    /// with no other live alias.
    pub(crate) unsafe fn new(ptr: NonNull<A>) -> Self {
        ViewReprMut {
            ptr,
            life: PhantomData,
        }
    }
}

unsafe impl<'a, A: Send> Send for ViewReprMut<'a, A> {}
unsafe impl<'a, A: Sync> Sync for ViewReprMut<'a, A> {}

unsafe impl<'a, A> Storage for ViewReprMut<'a, A> {
    type Elem = A;

    fn as_base_ptr(&self) -> *const A {
        self.ptr.as_ptr()
    }

    fn data(&self) -> &[A] {
        &[]
    }
}

unsafe impl<'a, A> StorageMut for ViewReprMut<'a, A> {
    fn as_base_ptr_mut(&mut self) -> *mut A {
        self.ptr.as_ptr()
    }

    fn data_mut(&mut self) -> &mut [A] {
        &mut []
    }
}
