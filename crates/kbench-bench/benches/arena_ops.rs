//! Criterion micro-benchmarks for arena mapping, ramp fill, and a full
//! functional run of the triad kernel.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use kbench::driver::{Driver, HarnessConfig, RunMode};
use kbench_arena::{Arena, ArenaConfig, HugePages};
use kbench_bench::Triad;

const ARRAY_LEN: usize = 1 << 20;

fn small_pages() -> ArenaConfig {
    ArenaConfig::new(4096, HugePages::Off)
}

/// Benchmark: map + release a 4 MiB arena.
fn bench_acquire_release_4m(c: &mut Criterion) {
    let config = small_pages();
    c.bench_function("arena_acquire_release_4m", |b| {
        b.iter(|| {
            let arena = Arena::acquire(&config, 4 << 20).unwrap();
            black_box(arena.as_ptr());
            arena.release().unwrap();
        });
    });
}

/// Benchmark: ramp-initialise 1M elements.
fn bench_fill_ramp_1m(c: &mut Criterion) {
    let mut arena = Arena::acquire(&small_pages(), ARRAY_LEN * 4).unwrap();
    c.bench_function("arena_fill_ramp_1m", |b| {
        b.iter(|| {
            arena.fill_ramp();
            black_box(arena.as_slice()[ARRAY_LEN - 1]);
        });
    });
    arena.release().unwrap();
}

/// Benchmark: one functional driver run of the triad over 3 x 1M elements.
fn bench_driver_triad_1m(c: &mut Criterion) {
    let kernel = Triad::new(ARRAY_LEN);
    let mut config = HarnessConfig::new(kernel.element_count());
    config.mode = RunMode::Functional;
    config.repetitions = 1;
    config.arena = small_pages();

    c.bench_function("driver_triad_1m", |b| {
        b.iter(|| {
            let mut driver = Driver::new(config.clone(), kernel).unwrap();
            black_box(driver.run(None, &mut std::io::sink()).unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_acquire_release_4m,
    bench_fill_ramp_1m,
    bench_driver_triad_1m
);
criterion_main!(benches);
