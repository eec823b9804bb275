//! Small helpers shared by container tests.

use std::panic::{catch_unwind, AssertUnwindSafe};

/// Run `f`, assert that it panics, and return the panic message.
///
/// Non-string payloads yield an empty message.
pub fn expect_panic<R>(f: impl FnOnce() -> R) -> String {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(_) => panic!("expected a panic"),
        Err(payload) => {
            if let Some(msg) = payload.downcast_ref::<&str>() {
                (*msg).to_owned()
            } else if let Some(msg) = payload.downcast_ref::<String>() {
                msg.clone()
            } else {
                String::new()
            }
        }
    }
}

/// A constructor closure that always panics, for emplace-style APIs.
pub fn failing<T>() -> impl FnOnce() -> T {
    || -> T { panic!("constructor failed") }
}

/// `n` distinct owned strings: "a", "b", ... "z", "aa", "ab", ...
pub fn letters(n: usize) -> Vec<String> {
    (0..n)
        .map(|mut i| {
            let mut s = Vec::new();
            loop {
                s.push(b'a' + (i % 26) as u8);
                if i < 26 {
                    break;
                }
                i = i / 26 - 1;
            }
            s.reverse();
            String::from_utf8(s).unwrap_or_default()
        })
        .collect()
}
