//! Owning iteration over a [`Vector`](crate::vector::Vector).

#![allow(unsafe_code)]

use std::fmt;
use std::iter::FusedIterator;
use std::ptr;
use std::slice;

use crate::raw::RawMemory;

/// Owning iterator returned by `Vector::into_iter`.
///
/// Yields the live slots `[start, end)` of the block it took over.
/// Unconsumed elements are dropped with the iterator, then the block is
/// released.
pub struct IntoIter<T> {
    data: RawMemory<T>,
    start: usize,
    end: usize,
}

impl<T> IntoIter<T> {
    /// `data` must hold `len` live leading slots.
    pub(crate) fn new(data: RawMemory<T>, len: usize) -> Self {
        debug_assert!(len <= data.capacity());
        Self {
            data,
            start: 0,
            end: len,
        }
    }

    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots [start, end) are live.
        unsafe { slice::from_raw_parts(self.data.slot(self.start), self.end - self.start) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        let slot = self.data.slot(self.start);
        self.start += 1;
        // SAFETY: the slot was live and has left [start, end).
        Some(unsafe { ptr::read(slot) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: the slot was live and has left [start, end).
        Some(unsafe { ptr::read(self.data.slot(self.end)) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let rest = ptr::slice_from_raw_parts_mut(self.data.slot_mut(self.start), self.end - self.start);
        // SAFETY: [start, end) are the remaining live slots.
        unsafe { ptr::drop_in_place(rest) }
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::vector::Vector;
    use std::rc::Rc;

    #[test]
    fn yields_in_order_from_both_ends() {
        let v = Vector::from([1, 2, 3, 4]);
        let mut it = v.into_iter();
        assert_eq!(it.len(), 4);
        assert_eq!(it.next(), Some(1));
        assert_eq!(it.next_back(), Some(4));
        assert_eq!(it.as_slice(), &[2, 3]);
        assert_eq!(it.collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn dropping_early_releases_the_rest() {
        let marker = Rc::new(());
        let v: Vector<Rc<()>> = (0..5).map(|_| Rc::clone(&marker)).collect();
        let mut it = v.into_iter();
        let first = it.next();
        assert_eq!(Rc::strong_count(&marker), 6);
        drop(it);
        assert_eq!(Rc::strong_count(&marker), 2);
        drop(first);
        assert_eq!(Rc::strong_count(&marker), 1);
    }

    #[test]
    fn fused_after_exhaustion() {
        let mut it = Vector::from(["only"]).into_iter();
        assert_eq!(it.next(), Some("only"));
        assert_eq!(it.next(), None);
        assert_eq!(it.next_back(), None);
    }
}
