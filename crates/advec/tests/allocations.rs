//! Block accounting through a counting global allocator.
//!
//! Counts are per thread, so tests in this binary do not see each other's
//! blocks. `realloc` is neutral: it never changes how many blocks are live.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::sync::Once;

use advec::Vector;
use advec_test_utils::{expect_panic, failing, Tracked, TrackingScope};

struct CountingAlloc;

thread_local! {
    static LIVE_BLOCKS: Cell<isize> = const { Cell::new(0) };
}

fn adjust(delta: isize) {
    let _ = LIVE_BLOCKS.try_with(|live| live.set(live.get() + delta));
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        // SAFETY: forwarded unchanged to the system allocator.
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            adjust(1);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        adjust(-1);
        // SAFETY: `ptr` came from `alloc` above with this layout.
        unsafe { System.dealloc(ptr, layout) }
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

fn live_blocks() -> isize {
    LIVE_BLOCKS.with(Cell::get)
}

/// Silence the panic hook and run one throwaway panic, so the panic
/// machinery's lazily created state exists before any baseline is taken.
fn quiet_panics() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| std::panic::set_hook(Box::new(|_| {})));
    drop(expect_panic(failing::<u8>()));
}

fn tracked(values: &[i32]) -> Vector<Tracked> {
    let mut v = Vector::new();
    v.reserve(values.len());
    for &value in values {
        v.push_back(Tracked::new(value));
    }
    v
}

#[test]
fn vector_holds_exactly_one_block() {
    let baseline = live_blocks();
    let mut v = Vector::new();
    assert_eq!(live_blocks(), baseline);
    for i in 0..100u64 {
        v.push_back(i);
        assert_eq!(live_blocks(), baseline + 1);
    }
    v.reserve(1_000);
    assert_eq!(live_blocks(), baseline + 1);
    drop(v);
    assert_eq!(live_blocks(), baseline);
}

#[test]
fn failed_growth_releases_the_new_block() {
    quiet_panics();
    let _scope = TrackingScope::new();
    let mut v = tracked(&[1, 2, 3]);
    let baseline = live_blocks();

    drop(expect_panic(|| {
        v.emplace(1, failing());
    }));
    drop(expect_panic(|| {
        v.emplace_back(failing());
    }));

    assert_eq!(live_blocks(), baseline);
    assert_eq!(v.capacity(), 3);
}

#[test]
fn failed_clone_releases_the_partial_copy() {
    quiet_panics();
    let scope = TrackingScope::new();
    let v = tracked(&[1, 2, 3, 4]);
    let baseline = live_blocks();
    scope.arm_clone_failure(2);

    drop(expect_panic(|| v.clone()));

    assert_eq!(live_blocks(), baseline);
    assert_eq!(scope.live(), 4);
}

#[test]
fn failed_sized_construction_releases_its_block() {
    quiet_panics();
    let scope = TrackingScope::new();
    let baseline = live_blocks();
    scope.arm_default_failure(1);

    drop(expect_panic(|| Vector::<Tracked>::with_size(5)));

    assert_eq!(live_blocks(), baseline);
}

#[test]
fn owning_iterator_releases_the_block_when_dropped_early() {
    let baseline = live_blocks();
    let v: Vector<u32> = (0..16).collect();
    let mut it = v.into_iter();
    assert_eq!(it.next(), Some(0));
    assert_eq!(live_blocks(), baseline + 1);
    drop(it);
    assert_eq!(live_blocks(), baseline);
}

#[test]
fn take_and_swap_never_allocate() {
    let mut a: Vector<u8> = (0..8).collect();
    let mut b: Vector<u8> = (0..3).collect();
    let baseline = live_blocks();
    a.swap_with(&mut b);
    let c = a.take();
    assert_eq!(live_blocks(), baseline);
    drop((a, b, c));
    assert_eq!(live_blocks(), baseline - 2);
}
