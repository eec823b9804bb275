//! Instrumented element types for advec development.
//!
//! [`Tracked`] counts every construction and destruction on the current
//! thread and can be armed to panic on its N-th clone or default
//! construction. A [`TrackingScope`] resets the counters, owns the armed
//! failures, and reports the live-instance count that leak checks compare
//! against. Counters are thread-local, so parallel tests never observe each
//! other.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cell::Cell;

pub use fixtures::{expect_panic, failing, letters};

thread_local! {
    static CONSTRUCTED: Cell<usize> = const { Cell::new(0) };
    static DROPPED: Cell<usize> = const { Cell::new(0) };
    static CLONES_LEFT: Cell<Option<usize>> = const { Cell::new(None) };
    static DEFAULTS_LEFT: Cell<Option<usize>> = const { Cell::new(None) };
}

/// Consume one unit of an armed fuse, panicking when it is already spent.
fn burn(fuse: &'static std::thread::LocalKey<Cell<Option<usize>>>, what: &str) {
    fuse.with(|left| match left.get() {
        None => {}
        Some(0) => panic!("armed {what} failure"),
        Some(n) => left.set(Some(n - 1)),
    });
}

fn record_construction() {
    CONSTRUCTED.with(|c| c.set(c.get() + 1));
}

/// An `i32` payload whose lifetime is counted.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tracked {
    value: i32,
}

impl Tracked {
    pub fn new(value: i32) -> Self {
        record_construction();
        Self { value }
    }

    pub fn value(&self) -> i32 {
        self.value
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        burn(&CLONES_LEFT, "clone");
        Self::new(self.value)
    }
}

impl Default for Tracked {
    fn default() -> Self {
        burn(&DEFAULTS_LEFT, "default");
        Self::new(0)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        DROPPED.with(|d| d.set(d.get() + 1));
    }
}

impl PartialEq<i32> for Tracked {
    fn eq(&self, other: &i32) -> bool {
        self.value == *other
    }
}

/// Snapshot of the thread's lifetime counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Counters {
    pub constructed: usize,
    pub dropped: usize,
}

impl Counters {
    /// Instances constructed and not yet dropped.
    pub fn live(&self) -> usize {
        self.constructed - self.dropped
    }
}

/// Read the current thread's counters.
pub fn counters() -> Counters {
    Counters {
        constructed: CONSTRUCTED.with(Cell::get),
        dropped: DROPPED.with(Cell::get),
    }
}

/// Resets counters on creation and disarms every fuse on drop.
///
/// Create one at the start of each test (or proptest case) that uses
/// [`Tracked`].
pub struct TrackingScope {
    _private: (),
}

impl TrackingScope {
    pub fn new() -> Self {
        CONSTRUCTED.with(|c| c.set(0));
        DROPPED.with(|d| d.set(0));
        disarm();
        TrackingScope { _private: () }
    }

    /// Let `after` more clones succeed, then panic on the next one.
    pub fn arm_clone_failure(&self, after: usize) {
        CLONES_LEFT.with(|c| c.set(Some(after)));
    }

    /// Let `after` more default constructions succeed, then panic.
    pub fn arm_default_failure(&self, after: usize) {
        DEFAULTS_LEFT.with(|c| c.set(Some(after)));
    }

    /// Disarm all fuses without resetting the counters.
    pub fn disarm(&self) {
        disarm();
    }

    pub fn counters(&self) -> Counters {
        counters()
    }

    pub fn live(&self) -> usize {
        counters().live()
    }
}

impl Default for TrackingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TrackingScope {
    fn drop(&mut self) {
        disarm();
    }
}

fn disarm() {
    CLONES_LEFT.with(|c| c.set(None));
    DEFAULTS_LEFT.with(|c| c.set(None));
}
