//! A contiguous, growable sequence built on manually managed storage.
//!
//! The crate is split into two layers:
//!
//! ```text
//! Vector<T>           (live-element count, construction, relocation, drop)
//! └── RawMemory<T>    (one uninitialized block: pointer + slot count)
//! ```
//!
//! [`RawMemory`] acquires and releases blocks and nothing else.
//! [`Vector`] decides when elements are constructed, moved, cloned and
//! destroyed inside that block, and states for each operation what a panic
//! or allocation failure leaves behind (see the [`vector`] module docs).
//!
//! # Errors and panics
//!
//! Allocation failure is reported as [`StorageError`] by the `try_`
//! entry points. Contract violations (out-of-range positions or indices)
//! panic in every build profile. Panics raised by element code unwind
//! through the container with its invariants restored.
//!
//! # Unsafe code
//!
//! `unsafe` is denied crate-wide and allowed only in [`raw`], `relocate`,
//! [`vector`] and [`iter`]. Every block carries a `// SAFETY:` comment.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod error;
pub mod iter;
pub mod raw;
mod relocate;
pub mod vector;

pub use error::StorageError;
pub use iter::IntoIter;
pub use raw::RawMemory;
pub use vector::Vector;
