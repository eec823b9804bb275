//! Moving and duplicating runs of elements between storage blocks.
//!
//! Relocating into a new block must not disturb the source until the
//! destination is complete. A classic container achieves this by moving
//! when moving cannot fail and copying otherwise. A Rust move is a bitwise
//! copy after which the source is simply forgotten: it cannot unwind, so
//! every relocation takes the move path ([`move_n`]) and the old block stays
//! valid right up to the point where ownership is swapped.
//!
//! Duplication ([`clone_n`]) runs user code that may panic. It writes
//! through a [`PartialInit`] guard, which destroys whatever it already
//! constructed if a clone unwinds.

#![allow(unsafe_code)]

use std::mem;
use std::ptr;

/// Bitwise-move `count` elements from `src` to `dst`.
///
/// # Safety
///
/// `src` must point to `count` live elements and `dst` to `count` writable
/// slots in a different block. Afterwards the source slots must be treated
/// as uninitialized.
pub(crate) unsafe fn move_n<T>(src: *const T, dst: *mut T, count: usize) {
    // SAFETY: upheld by the caller; distinct blocks never overlap.
    unsafe { ptr::copy_nonoverlapping(src, dst, count) }
}

/// Clone every element of `src` into consecutive slots starting at `dst`.
///
/// Returns the number of elements written (always `src.len()`). If a clone
/// panics, the clones already written are dropped before the panic leaves.
///
/// # Safety
///
/// `dst` must be valid for writes of `src.len()` slots that do not overlap
/// `src`.
pub(crate) unsafe fn clone_n<T: Clone>(src: &[T], dst: *mut T) -> usize {
    // SAFETY: forwarded from the caller.
    let mut guard = unsafe { PartialInit::new(dst, src.len()) };
    for item in src {
        guard.push(item.clone());
    }
    guard.finish()
}

/// Drop guard over a run of slots being filled front to back.
///
/// Dropping the guard destroys the elements pushed so far. Call
/// [`finish`](PartialInit::finish) to hand them over instead.
pub(crate) struct PartialInit<T> {
    dst: *mut T,
    limit: usize,
    initialized: usize,
}

impl<T> PartialInit<T> {
    /// # Safety
    ///
    /// `dst` must be valid for writes of `limit` uninitialized slots, and
    /// nothing else may touch those slots while the guard is alive.
    pub(crate) unsafe fn new(dst: *mut T, limit: usize) -> Self {
        Self {
            dst,
            limit,
            initialized: 0,
        }
    }

    pub(crate) fn push(&mut self, value: T) {
        assert!(self.initialized < self.limit, "partial init overrun");
        // SAFETY: the slot is below `limit`, which `new` made writable.
        unsafe { self.dst.add(self.initialized).write(value) };
        self.initialized += 1;
    }

    /// Disarm the guard and return how many slots it filled.
    pub(crate) fn finish(self) -> usize {
        let initialized = self.initialized;
        mem::forget(self);
        initialized
    }
}

impl<T> Drop for PartialInit<T> {
    fn drop(&mut self) {
        // SAFETY: exactly the first `initialized` slots were written.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.dst, self.initialized));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::RawMemory;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::rc::Rc;

    #[test]
    fn move_n_transfers_ownership_without_dropping() {
        let marker = Rc::new(());
        let mut src = RawMemory::<Rc<()>>::with_capacity(3);
        let mut dst = RawMemory::<Rc<()>>::with_capacity(3);
        for i in 0..3 {
            unsafe { src.slot_mut(i).write(Rc::clone(&marker)) };
        }
        unsafe { move_n(src.as_ptr(), dst.as_mut_ptr(), 3) };
        drop(src);
        assert_eq!(Rc::strong_count(&marker), 4);
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(dst.as_mut_ptr(), 3)) };
        assert_eq!(Rc::strong_count(&marker), 1);
    }

    #[test]
    fn clone_n_fills_every_slot() {
        let src = vec![String::from("a"), String::from("b")];
        let mut dst = RawMemory::<String>::with_capacity(2);
        let written = unsafe { clone_n(&src, dst.as_mut_ptr()) };
        assert_eq!(written, 2);
        let back = unsafe { [dst.slot(0).read(), dst.slot(1).read()] };
        assert_eq!(back, [String::from("a"), String::from("b")]);
    }

    #[test]
    fn guard_drops_partial_run_on_unwind() {
        let marker = Rc::new(());
        let mut dst = RawMemory::<Rc<()>>::with_capacity(4);
        let ptr = dst.as_mut_ptr();
        let result = catch_unwind(AssertUnwindSafe(|| {
            let mut guard = unsafe { PartialInit::new(ptr, 4) };
            guard.push(Rc::clone(&marker));
            guard.push(Rc::clone(&marker));
            panic!("constructor failed");
        }));
        assert!(result.is_err());
        assert_eq!(Rc::strong_count(&marker), 1);
    }

    #[test]
    fn finish_hands_over_elements() {
        let marker = Rc::new(());
        let mut dst = RawMemory::<Rc<()>>::with_capacity(2);
        let mut guard = unsafe { PartialInit::new(dst.as_mut_ptr(), 2) };
        guard.push(Rc::clone(&marker));
        assert_eq!(guard.finish(), 1);
        assert_eq!(Rc::strong_count(&marker), 2);
        unsafe { ptr::drop_in_place(dst.slot_mut(0)) };
        assert_eq!(Rc::strong_count(&marker), 1);
    }
}
