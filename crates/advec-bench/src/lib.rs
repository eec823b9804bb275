//! Deterministic workloads for benchmarking [`advec::Vector`].
//!
//! - [`insertion_positions`]: pseudo-random insert positions for a growing vector
//! - [`filled`]: a vector of `n` sequential values built by appending

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use advec::Vector;

/// Generate `n` insertion positions, each valid for a vector that has
/// grown by one element per previous position.
///
/// Uses a fixed LCG so runs are reproducible for a given `seed`.
pub fn insertion_positions(n: usize, seed: u64) -> Vec<usize> {
    let mut state = seed;
    (0..n)
        .map(|len| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 33) % (len as u64 + 1)) as usize
        })
        .collect()
}

/// A vector holding `0..n`, built with `push_back`.
pub fn filled(n: usize) -> Vector<u64> {
    let mut v = Vector::new();
    for i in 0..n as u64 {
        v.push_back(i);
    }
    v
}
