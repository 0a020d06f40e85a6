//! The storage-handle traits: how arrays own, share or borrow their buffer.
//!
//! A handle is the second half of an array (the first being its index map).
//! The traits are unsafe to implement because `ArrayBase` trusts the
//! reported base pointer: the array addresses elements at
//! `base + offset + map(index)` without further checks.
//!
//! The base pointer is asked of the handle on every access rather than
//! cached in the array header, so that inline handles (`StackRepr`,
//! `SsoRepr`) stay valid when the array value moves.

use crate::address_space::AddressSpace;
use crate::data_repr::SharedRepr;

/// Read access to a handle's buffer.
pub unsafe trait Storage {
    type Elem;

    /// First element of the buffer. Never dereferenced when the map is
    /// empty; may be null only for null handles.
    fn as_base_ptr(&self) -> *const Self::Elem;

    /// The whole backing buffer, for handles that can expose it; views
    /// report an empty buffer and are reached through the base pointer.
    /// Panics when the memory is not host accessible.
    fn data(&self) -> &[Self::Elem];

    /// Where the buffer lives. Owning handles are always host memory.
    #[inline]
    fn address_space(&self) -> AddressSpace {
        AddressSpace::Host
    }

    /// Whether the handle points at nothing at all.
    #[inline]
    fn is_null(&self) -> bool {
        false
    }
}

/// Write access to a handle's buffer.
pub unsafe trait StorageMut: Storage {
    /// Like [`Storage::as_base_ptr`], mutable. Detaches shared buffers
    /// from their other owners first.
    fn as_base_ptr_mut(&mut self) -> *mut Self::Elem;

    /// The whole backing buffer, mutably. Panics when not host accessible.
    fn data_mut(&mut self) -> &mut [Self::Elem];

    /// Make sure this handle is the only owner of its buffer. No-op for
    /// exclusively owned handles. Element offsets stay valid across the
    /// detach.
    #[inline]
    fn ensure_unique(&mut self) {}

    #[inline]
    fn is_unique(&mut self) -> bool {
        true
    }
}

/// Handles that own their elements and can be built from a `Vec`.
pub unsafe trait StorageOwned: Storage {
    fn from_vec(elements: Vec<Self::Elem>) -> Self;

    /// Move the elements into a reference-counted handle.
    fn into_shared(self) -> SharedRepr<Self::Elem>;
}

/// Handles whose clones share the same buffer.
pub unsafe trait StorageShared: Clone + Storage {}
