//! The lifetime-managing sequence container.
//!
//! [`Vector`] owns one [`RawMemory`] block and counts how many of its
//! leading slots hold live elements. Every construction, relocation and
//! destruction inside that block happens here.
//!
//! # Failure guarantees
//!
//! | Operation | On panic or allocation failure |
//! |---|---|
//! | `reserve`, `try_reserve` | unchanged |
//! | `push_back`, `emplace_back`, `insert`, `emplace` | unchanged |
//! | `resize`, `resize_with` (growing) | length unchanged, grown capacity kept |
//! | `clone` | source unchanged, partial clone destroyed |
//! | `clone_from` (reusing storage) | valid, values may differ |
//! | `erase`, `remove`, `pop_back`, `truncate` | cannot fail |
//!
//! Relocation is a bitwise move, so shifting elements inside the block
//! during a mid-sequence `emplace` or `erase` has no failure point. The
//! new value is always constructed before anything is shifted.

#![allow(unsafe_code)]

use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem::{self, ManuallyDrop};
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::ptr;
use std::slice::{self, SliceIndex};

use crate::error::StorageError;
use crate::iter::IntoIter;
use crate::raw::RawMemory;
use crate::relocate::{self, PartialInit};

/// A contiguous growable sequence with explicit element lifetimes.
///
/// Slots `[0, len)` of the owned block are live, slots `[len, capacity)`
/// are uninitialized, and `len <= capacity` holds before and after every
/// call, including on unwind.
pub struct Vector<T> {
    data: RawMemory<T>,
    len: usize,
}

impl<T> Vector<T> {
    /// An empty vector. Does not allocate.
    pub const fn new() -> Self {
        Self {
            data: RawMemory::new(),
            len: 0,
        }
    }

    /// A vector of `size` default values with capacity exactly `size`.
    pub fn with_size(size: usize) -> Self
    where
        T: Default,
    {
        let mut vector = Self {
            data: RawMemory::with_capacity(size),
            len: 0,
        };
        vector.resize_with(size, T::default);
        vector
    }

    /// A vector holding clones of `items`, with capacity exactly
    /// `items.len()`.
    pub fn from_slice(items: &[T]) -> Self
    where
        T: Clone,
    {
        let mut data = RawMemory::with_capacity(items.len());
        // SAFETY: `data` is a fresh block of `items.len()` slots.
        let len = unsafe { relocate::clone_n(items, data.as_mut_ptr()) };
        Self { data, len }
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the vector holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated slots, live or not.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// The live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots [0, len) are live and contiguous; the pointer is
        // aligned and non-null even when nothing is allocated.
        unsafe { slice::from_raw_parts(self.data.as_ptr(), self.len) }
    }

    /// The live elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: see `as_slice`.
        unsafe { slice::from_raw_parts_mut(self.data.as_mut_ptr(), self.len) }
    }

    /// Exchange contents (storage and length) with `other` in O(1).
    pub fn swap_with(&mut self, other: &mut Self) {
        self.data.swap(&mut other.data);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Move the contents out, leaving `self` empty and usable.
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Grow capacity to exactly `new_capacity` slots if it is smaller.
    ///
    /// Existing elements are relocated into the new block before the old
    /// block is released. Never shrinks.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow; allocator failure goes to
    /// [`std::alloc::handle_alloc_error`]. Either way the vector is left
    /// untouched.
    pub fn reserve(&mut self, new_capacity: usize) {
        if new_capacity <= self.capacity() {
            return;
        }
        self.relocate_into(RawMemory::with_capacity(new_capacity));
    }

    /// Like [`reserve`](Vector::reserve), but reports allocation failure.
    ///
    /// On error the vector is exactly as it was before the call.
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<(), StorageError> {
        if new_capacity <= self.capacity() {
            return Ok(());
        }
        let data: RawMemory<T> = RawMemory::try_with_capacity(new_capacity).inspect_err(|err| {
            log::debug!("reserve of {new_capacity} slots failed: {err}");
        })?;
        self.relocate_into(data);
        Ok(())
    }

    /// Resize to `new_len`, default-constructing new elements.
    pub fn resize(&mut self, new_len: usize)
    where
        T: Default,
    {
        self.resize_with(new_len, T::default);
    }

    /// Resize to `new_len`, filling new slots with values produced by `f`.
    ///
    /// Grows capacity to exactly `new_len` when needed. If `f` panics, the
    /// elements it already produced are dropped and the length is restored;
    /// the larger capacity is kept.
    pub fn resize_with<F>(&mut self, new_len: usize, mut f: F)
    where
        F: FnMut() -> T,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }
        self.reserve(new_len);
        let old_len = self.len;
        // SAFETY: slots [old_len, new_len) lie within capacity and are
        // uninitialized; `self.len` is not touched until the guard finishes.
        let mut guard = unsafe { PartialInit::new(self.data.slot_mut(old_len), new_len - old_len) };
        for _ in old_len..new_len {
            guard.push(f());
        }
        self.len += guard.finish();
    }

    /// Drop every element past `new_len`. No-op if `new_len >= len`.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let tail = ptr::slice_from_raw_parts_mut(self.data.slot_mut(new_len), self.len - new_len);
        self.len = new_len;
        // SAFETY: the tail was live and is no longer counted by `len`.
        unsafe { ptr::drop_in_place(tail) };
    }

    /// Drop every element, keeping the capacity.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Append `value`.
    pub fn push_back(&mut self, value: T) {
        self.emplace_back(|| value);
    }

    /// Append the value produced by `f` and return a reference to it.
    pub fn emplace_back<F>(&mut self, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        self.emplace(self.len, f)
    }

    /// Insert `value` at `index`, shifting later elements right.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) -> &mut T {
        self.emplace(index, || value)
    }

    /// Insert the value produced by `f` at `index`, shifting later elements
    /// right, and return a reference to it.
    ///
    /// When the block is full, a new one of `max(1, 2 * len)` slots is
    /// acquired. `f` always runs before any existing element moves, so a
    /// panicking `f` leaves the vector unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn emplace<F>(&mut self, index: usize, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        let len = self.len;
        assert!(
            index <= len,
            "insertion index (is {index}) should be <= len (is {len})"
        );

        if len < self.capacity() {
            if index == len {
                // SAFETY: slot `len` is within capacity and uninitialized.
                unsafe { self.data.slot_mut(len).write(f()) };
            } else {
                let value = f();
                let at = self.data.slot_mut(index);
                // SAFETY: [index, len) shifts to [index + 1, len + 1), which
                // fits because len < capacity; `ptr::copy` allows overlap.
                unsafe {
                    ptr::copy(at, at.add(1), len - index);
                    at.write(value);
                }
            }
        } else {
            self.grow_and_emplace(index, f);
        }
        self.len = len + 1;

        // SAFETY: slot `index` was just initialized and is live.
        unsafe { &mut *self.data.slot_mut(index) }
    }

    /// Remove and drop the element at `index`, shifting later elements left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn erase(&mut self, index: usize) {
        drop(self.remove(index));
    }

    /// Remove and return the element at `index`, shifting later elements
    /// left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        let len = self.len;
        assert!(
            index < len,
            "removal index (is {index}) should be < len (is {len})"
        );
        let at = self.data.slot_mut(index);
        // SAFETY: `index` is live. After the read its slot is refilled by
        // the shift of [index + 1, len), and the last slot leaves `len`.
        unsafe {
            let value = ptr::read(at);
            ptr::copy(at.add(1), at, len - index - 1);
            self.len = len - 1;
            value
        }
    }

    /// Remove and return the last element, or `None` if empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: slot `len` was live and is no longer counted.
        Some(unsafe { ptr::read(self.data.slot(self.len)) })
    }

    fn relocate_into(&mut self, mut data: RawMemory<T>) {
        log::trace!(
            "relocating {} elements: capacity {} -> {}",
            self.len,
            self.capacity(),
            data.capacity()
        );
        // SAFETY: `data` is a distinct block with at least `len` slots. Once
        // swapped out, the old block only releases memory.
        unsafe { relocate::move_n(self.data.as_ptr(), data.as_mut_ptr(), self.len) };
        self.data.swap(&mut data);
    }

    #[cold]
    fn grow_and_emplace<F>(&mut self, index: usize, f: F)
    where
        F: FnOnce() -> T,
    {
        let len = self.len;
        let new_capacity = if len == 0 {
            1
        } else {
            match len.checked_mul(2) {
                Some(doubled) => doubled,
                None => panic!("capacity overflow: cannot double {len} slots"),
            }
        };
        let mut data: RawMemory<T> = RawMemory::with_capacity(new_capacity);
        log::trace!(
            "growing for insert at {index}: capacity {} -> {new_capacity}",
            self.capacity()
        );

        // A panicking `f` drops `data` before anything was moved into it.
        // SAFETY: index <= len < new_capacity.
        unsafe { data.slot_mut(index).write(f()) };

        // SAFETY: prefix [0, index) and suffix [index, len) land on either
        // side of the new element, all within `new_capacity`.
        unsafe {
            relocate::move_n(self.data.slot(0), data.slot_mut(0), index);
            relocate::move_n(
                self.data.slot(index),
                data.slot_mut(index + 1),
                len - index,
            );
        }
        self.data.swap(&mut data);
    }
}

impl<T> Drop for Vector<T> {
    fn drop(&mut self) {
        // SAFETY: slots [0, len) are live; `data` releases the block after.
        unsafe { ptr::drop_in_place(self.as_mut_slice()) }
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Vector<T> {
    fn clone(&self) -> Self {
        Self::from_slice(self)
    }

    /// Copy-assign from `source`, reusing this vector's block when it is
    /// large enough.
    fn clone_from(&mut self, source: &Self) {
        if source.len > self.capacity() {
            let mut fresh = source.clone();
            self.swap_with(&mut fresh);
            return;
        }
        let common = self.len.min(source.len);
        self.as_mut_slice()[..common].clone_from_slice(&source[..common]);
        if source.len > self.len {
            for item in &source[self.len..] {
                self.push_back(item.clone());
            }
        } else {
            self.truncate(source.len);
        }
    }
}

impl<T> Deref for Vector<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for Vector<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, I: SliceIndex<[T]>> Index<I> for Vector<T> {
    type Output = I::Output;

    fn index(&self, index: I) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<T, I: SliceIndex<[T]>> IndexMut<I> for Vector<T> {
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        &mut self.as_mut_slice()[index]
    }
}

impl<T> AsRef<[T]> for Vector<T> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T> AsMut<[T]> for Vector<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, U> PartialEq<Vector<U>> for Vector<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Vector<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U> PartialEq<[U]> for Vector<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U, const N: usize> PartialEq<[U; N]> for Vector<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for Vector<T> {}

impl<T: Hash> Hash for Vector<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T> Extend<T> for Vector<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        if lower > self.capacity() - self.len {
            let doubled = self.capacity().saturating_mul(2);
            self.reserve(self.len.saturating_add(lower).max(doubled));
        }
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vector = Self::new();
        vector.extend(iter);
        vector
    }
}

impl<T: Clone> From<&[T]> for Vector<T> {
    fn from(items: &[T]) -> Self {
        Self::from_slice(items)
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T> {
    fn from(items: [T; N]) -> Self {
        items.into_iter().collect()
    }
}

impl<T> IntoIterator for Vector<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        let mut this = ManuallyDrop::new(self);
        let len = this.len;
        IntoIter::new(this.data.take(), len)
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> slice::Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Vector<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> slice::IterMut<'a, T> {
        self.iter_mut()
    }
}
