//! Criterion micro-benchmarks for append, insert, erase and clone.

use std::hint::black_box;

use advec::Vector;
use advec_bench::{filled, insertion_positions};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

const SIZES: [usize; 3] = [64, 1_024, 16_384];

/// Benchmark: append `n` integers starting from an empty vector.
fn bench_push_back(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_back");
    for n in SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(filled(n)));
        });
    }
    group.finish();
}

/// Benchmark: append owned strings, so every reallocation relocates heap handles.
fn bench_push_back_strings(c: &mut Criterion) {
    c.bench_function("push_back_strings_1024", |b| {
        b.iter(|| {
            let mut v = Vector::new();
            for i in 0..1_024 {
                v.push_back(i.to_string());
            }
            black_box(v)
        });
    });
}

/// Benchmark: insert at pseudo-random positions into a growing vector.
fn bench_random_insert(c: &mut Criterion) {
    let positions = insertion_positions(2_048, 42);
    c.bench_function("random_insert_2048", |b| {
        b.iter(|| {
            let mut v = Vector::new();
            for (i, &pos) in positions.iter().enumerate() {
                v.insert(pos, i);
            }
            black_box(v)
        });
    });
}

/// Benchmark: erase from the front until empty (worst-case shifting).
fn bench_erase_front(c: &mut Criterion) {
    c.bench_function("erase_front_1024", |b| {
        b.iter_batched(
            || filled(1_024),
            |mut v| {
                while !v.is_empty() {
                    v.erase(0);
                }
                v
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

/// Benchmark: clone versus clone_from into reused storage.
fn bench_clone(c: &mut Criterion) {
    let source: Vector<String> = (0..1_024).map(|i| i.to_string()).collect();
    let mut group = c.benchmark_group("clone_1024_strings");
    group.bench_function("clone", |b| b.iter(|| black_box(source.clone())));
    group.bench_function("clone_from", |b| {
        let mut target = source.clone();
        b.iter(|| {
            target.clone_from(black_box(&source));
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_push_back,
    bench_push_back_strings,
    bench_random_insert,
    bench_erase_front,
    bench_clone
);
criterion_main!(benches);
