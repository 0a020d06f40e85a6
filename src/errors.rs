// Copyright 2025-2026 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors raised by the array core.
//!
//! Every kind is fail-fast: the library does not recover locally, it hands
//! the violated contract and its operands back to the caller. Shapes are
//! stored inline (rank never exceeds 16) so constructing an error does not
//! allocate.

use std::error::Error;
use std::fmt;

use crate::address_space::AddressSpace;
use crate::layout::LayoutProp;
use crate::permutation::MAX_RANK;

/// Error category.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// An index or slice bound fell outside an axis.
    OutOfBounds,
    /// Two shapes that had to agree did not.
    ShapeMismatch,
    /// Strides incompatible with the layout guarantee an operation needs.
    LayoutMismatch,
    /// A host-only operation targeted device memory (or vice versa).
    AddressSpaceMismatch,
    /// An owning handle failed to allocate.
    OutOfMemory,
}

/// An error from indexing, slicing, shape checks or allocation.
///
/// Carries the offending operands where they are known; the `Display` form
/// includes them.
#[derive(Clone, PartialEq)]
pub struct NdError {
    kind: ErrorKind,
    info: ErrorInfo,
}

/// An array shape captured by value, without allocating.
#[derive(Copy, Clone)]
pub struct ShapeBuf {
    len: u8,
    dims: [usize; MAX_RANK],
}

impl ShapeBuf {
    pub fn from_dims(dims: &[usize]) -> ShapeBuf {
        let mut buf = ShapeBuf {
            len: dims.len().min(MAX_RANK) as u8,
            dims: [0; MAX_RANK],
        };
        buf.dims[..buf.len as usize].copy_from_slice(&dims[..buf.len as usize]);
        buf
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims[..self.len as usize]
    }
}

impl PartialEq for ShapeBuf {
    fn eq(&self, other: &Self) -> bool {
        self.dims() == other.dims()
    }
}

impl fmt::Debug for ShapeBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.dims()).finish()
    }
}

#[derive(Copy, Clone, PartialEq)]
enum ErrorInfo {
    None,
    Axis {
        axis: usize,
        index: isize,
        extent: usize,
    },
    Shapes {
        expected: ShapeBuf,
        actual: ShapeBuf,
    },
    Props {
        required: LayoutProp,
        actual: LayoutProp,
    },
    Spaces {
        expected: AddressSpace,
        actual: AddressSpace,
    },
    Bytes(usize),
}

impl NdError {
    /// Return the `ErrorKind` of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Create an error of the given kind without operand information.
    pub fn from_kind(kind: ErrorKind) -> NdError {
        NdError {
            kind,
            info: ErrorInfo::None,
        }
    }

    pub(crate) fn out_of_bounds(axis: usize, index: isize, extent: usize) -> NdError {
        NdError {
            kind: ErrorKind::OutOfBounds,
            info: ErrorInfo::Axis {
                axis,
                index,
                extent,
            },
        }
    }

    pub(crate) fn shape_mismatch(expected: &[usize], actual: &[usize]) -> NdError {
        NdError {
            kind: ErrorKind::ShapeMismatch,
            info: ErrorInfo::Shapes {
                expected: ShapeBuf::from_dims(expected),
                actual: ShapeBuf::from_dims(actual),
            },
        }
    }

    pub(crate) fn layout_mismatch(required: LayoutProp, actual: LayoutProp) -> NdError {
        NdError {
            kind: ErrorKind::LayoutMismatch,
            info: ErrorInfo::Props { required, actual },
        }
    }

    pub(crate) fn address_space_mismatch(expected: AddressSpace, actual: AddressSpace) -> NdError {
        NdError {
            kind: ErrorKind::AddressSpaceMismatch,
            info: ErrorInfo::Spaces { expected, actual },
        }
    }

    pub(crate) fn out_of_memory(bytes: usize) -> NdError {
        NdError {
            kind: ErrorKind::OutOfMemory,
            info: ErrorInfo::Bytes(bytes),
        }
    }
}

impl fmt::Display for NdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self.kind {
            ErrorKind::OutOfBounds => "index out of bounds",
            ErrorKind::ShapeMismatch => "incompatible shapes",
            ErrorKind::LayoutMismatch => "incompatible memory layout",
            ErrorKind::AddressSpaceMismatch => "incompatible address spaces",
            ErrorKind::OutOfMemory => "allocation failed",
        };
        write!(f, "NdError/{:?}: {}", self.kind, description)?;
        match self.info {
            ErrorInfo::None => Ok(()),
            ErrorInfo::Axis {
                axis,
                index,
                extent,
            } => write!(f, " (axis {}: index {} not in 0..{})", axis, index, extent),
            ErrorInfo::Shapes { expected, actual } => {
                write!(f, " (expected {:?}, got {:?})", expected, actual)
            }
            ErrorInfo::Props { required, actual } => {
                write!(f, " (requires {:?}, strides are {:?})", required, actual)
            }
            ErrorInfo::Spaces { expected, actual } => {
                write!(f, " (expected {:?}, got {:?})", expected, actual)
            }
            ErrorInfo::Bytes(bytes) => write!(f, " ({} bytes)", bytes),
        }
    }
}

impl fmt::Debug for NdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Error for NdError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_compare_by_payload() {
        let a = NdError::out_of_bounds(1, 7, 4);
        assert_eq!(a.kind(), ErrorKind::OutOfBounds);
        assert_eq!(a, NdError::out_of_bounds(1, 7, 4));
        assert_ne!(a, NdError::out_of_bounds(0, 7, 4));
    }

    #[test]
    fn display_carries_operands() {
        let e = NdError::shape_mismatch(&[2, 3], &[2, 4]);
        let s = e.to_string();
        assert!(s.contains("[2, 3]"));
        assert!(s.contains("[2, 4]"));
        let e = NdError::out_of_bounds(0, 5, 3);
        assert!(e.to_string().contains("axis 0"));
    }
}
