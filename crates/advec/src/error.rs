//! Storage error types.

use std::error::Error;
use std::fmt;

/// Errors raised while acquiring a raw storage block.
///
/// Only the fallible entry points ([`RawMemory::try_with_capacity`] and
/// [`Vector::try_reserve`]) return these. Their infallible counterparts
/// panic on overflow and defer to [`std::alloc::handle_alloc_error`] on
/// allocator failure.
///
/// [`RawMemory::try_with_capacity`]: crate::raw::RawMemory::try_with_capacity
/// [`Vector::try_reserve`]: crate::vector::Vector::try_reserve
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// The byte size of the requested slot count exceeds `isize::MAX`.
    CapacityOverflow {
        /// Number of element slots requested.
        requested: usize,
    },
    /// The global allocator could not satisfy the request.
    AllocationFailed {
        /// Size of the failed request in bytes.
        bytes: usize,
        /// Alignment of the failed request in bytes.
        align: usize,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow { requested } => {
                write!(f, "capacity overflow: {requested} slots do not fit in isize::MAX bytes")
            }
            Self::AllocationFailed { bytes, align } => {
                write!(f, "allocation of {bytes} bytes (align {align}) failed")
            }
        }
    }
}

impl Error for StorageError {}
