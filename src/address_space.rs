// Copyright 2025-2026 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Address spaces of array storage.
//!
//! Owning handles always live on the host; borrowed handles carry a tag so
//! that device-resident buffers can be wrapped without ever being
//! dereferenced by host code. The GPU transfer machinery itself lives
//! outside this crate; the tag discipline is part of the core contract.

use crate::errors::NdError;

/// Where a storage handle's memory lives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum AddressSpace {
    /// No memory at all (a null handle).
    #[default]
    None,
    /// Ordinary CPU-addressable memory.
    Host,
    /// Device-only memory; host dereferences are rejected.
    Device,
    /// Memory addressable from both sides.
    Unified,
}

impl AddressSpace {
    /// The join of two spaces: the space an operation touching both must
    /// target. `Host` and `Device` cannot be combined.
    pub fn combine(self, other: AddressSpace) -> Result<AddressSpace, NdError> {
        use AddressSpace::*;
        match (self, other) {
            (None, x) | (x, None) => Ok(x),
            (Unified, _) | (_, Unified) => Ok(Unified),
            (Host, Host) => Ok(Host),
            (Device, Device) => Ok(Device),
            (Host, Device) | (Device, Host) => Err(NdError::address_space_mismatch(self, other)),
        }
    }

    /// Whether host code may form references into this space.
    #[inline]
    pub fn is_host_accessible(self) -> bool {
        matches!(self, AddressSpace::Host | AddressSpace::Unified)
    }

    /// Error unless host code may dereference this space.
    pub fn expect_host(self) -> Result<(), NdError> {
        if self.is_host_accessible() {
            Ok(())
        } else {
            Err(NdError::address_space_mismatch(AddressSpace::Host, self))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AddressSpace::*;

    #[test]
    fn join_table() {
        assert_eq!(Host.combine(Host).unwrap(), Host);
        assert_eq!(Device.combine(Device).unwrap(), Device);
        assert_eq!(Host.combine(Unified).unwrap(), Unified);
        assert_eq!(Device.combine(Unified).unwrap(), Unified);
        assert_eq!(None.combine(Device).unwrap(), Device);
        assert_eq!(None.combine(None).unwrap(), None);
        assert!(Host.combine(Device).is_err());
        assert!(Device.combine(Host).is_err());
    }
}
