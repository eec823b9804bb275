//! Owner of a single block of uninitialized element slots.
//!
//! [`RawMemory`] is the only type in the crate that talks to the global
//! allocator. It never constructs or destroys elements: which of its slots
//! hold live values is tracked by the container built on top of it.
//!
//! Copying is deliberately not offered. The raw bytes carry no information
//! about which slots are live, so duplication belongs to [`Vector`].
//!
//! [`Vector`]: crate::vector::Vector

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use crate::error::StorageError;

/// A uniquely owned block of `capacity` uninitialized `T` slots.
///
/// `capacity == 0` means no block is owned and the pointer is dangling.
/// Zero-sized element types never allocate; the slot count is still
/// recorded so that the owning container sees the capacity it asked for.
pub struct RawMemory<T> {
    ptr: NonNull<T>,
    capacity: usize,
    _owns: PhantomData<T>,
}

// SAFETY: `RawMemory` uniquely owns its block, exactly like a
// `Box<[MaybeUninit<T>]>`, so it may cross threads whenever `T` may.
unsafe impl<T: Send> Send for RawMemory<T> {}
// SAFETY: shared access only hands out `*const T`; see `Send` above.
unsafe impl<T: Sync> Sync for RawMemory<T> {}

impl<T> RawMemory<T> {
    /// An empty owner with no block and zero capacity.
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            _owns: PhantomData,
        }
    }

    /// Acquire a block for `capacity` slots.
    ///
    /// Returns [`StorageError::CapacityOverflow`] if the byte size does not
    /// fit in `isize`, or [`StorageError::AllocationFailed`] if the global
    /// allocator refuses the request. No state is created on failure.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, StorageError> {
        let ptr = Self::allocate(capacity)?;
        Ok(Self {
            ptr,
            capacity,
            _owns: PhantomData,
        })
    }

    /// Acquire a block for `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow. Allocator failure is routed to
    /// [`std::alloc::handle_alloc_error`].
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(raw) => raw,
            Err(err @ StorageError::CapacityOverflow { .. }) => panic!("{err}"),
            Err(StorageError::AllocationFailed { .. }) => match Self::layout(capacity) {
                Ok(layout) => alloc::handle_alloc_error(layout),
                Err(err) => panic!("{err}"),
            },
        }
    }

    /// Number of slots in the block.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pointer to slot 0. Dangling (but aligned and non-null) when no block
    /// is owned.
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Mutable pointer to slot 0.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Address of slot `index`.
    ///
    /// `index == capacity` (one past the end) is allowed. Larger indices are
    /// a caller bug, caught only by a debug assertion.
    pub fn slot(&self, index: usize) -> *const T {
        debug_assert!(
            index <= self.capacity,
            "slot {index} out of range for capacity {}",
            self.capacity
        );
        self.ptr.as_ptr().wrapping_add(index)
    }

    /// Mutable address of slot `index`. Same bounds contract as [`slot`].
    ///
    /// [`slot`]: RawMemory::slot
    pub fn slot_mut(&mut self, index: usize) -> *mut T {
        debug_assert!(
            index <= self.capacity,
            "slot {index} out of range for capacity {}",
            self.capacity
        );
        self.ptr.as_ptr().wrapping_add(index)
    }

    /// Exchange blocks and capacities with `other`.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }

    /// Move the block out, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    fn layout(capacity: usize) -> Result<Layout, StorageError> {
        Layout::array::<T>(capacity).map_err(|_| StorageError::CapacityOverflow {
            requested: capacity,
        })
    }

    fn allocate(capacity: usize) -> Result<NonNull<T>, StorageError> {
        let layout = Self::layout(capacity)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        // SAFETY: `layout` has a non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        NonNull::new(raw.cast::<T>()).ok_or(StorageError::AllocationFailed {
            bytes: layout.size(),
            align: layout.align(),
        })
    }
}

impl<T> Default for RawMemory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawMemory<T> {
    fn drop(&mut self) {
        let Ok(layout) = Self::layout(self.capacity) else {
            return;
        };
        if layout.size() != 0 {
            // SAFETY: a non-empty layout means `allocate` obtained this block
            // from the global allocator with exactly this layout.
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), layout) }
        }
    }
}

impl<T> fmt::Debug for RawMemory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawMemory")
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .finish()
    }
}
