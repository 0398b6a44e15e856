//! Counterexample search benchmarks using Criterion.
//!
//! Benchmarks cover:
//! - Scalability of the full search (10K to 1M)
//! - Work-group size at a fixed bound
//! - Each variant on its own
//! - Randomized bounds that force rounding and padding
//!
//! For the CPU backend, use `FASTGOLDBACH_BACKEND=cpu cargo bench` (the default).
//! For the serial reference backend, use `FASTGOLDBACH_BACKEND=serial cargo bench`.
//! For the GPU backend, use `FASTGOLDBACH_BACKEND=gpu cargo bench --features gpu`.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fastGoldbach::prelude::*;
use rand::prelude::*;
use std::env;
use std::hint::black_box;

// ============================================================================
// Helper Functions
// ============================================================================

fn get_config() -> (Backend, &'static str) {
    match env::var("FASTGOLDBACH_BACKEND").ok().as_deref() {
        Some("serial") => (CPU, "serial"),
        Some("gpu") => (GPU, "gpu"),
        _ => (CPU, "parallel"),
    }
}

/// Run a search the way the selected configuration asks for.
fn run(search: &GoldbachSearch, label: &str) -> SearchResult {
    let result = match label {
        "serial" => search.run(&mut ReferenceBackend::new()),
        _ => search.run_parallel(),
    };
    result.expect("benchmark search failed")
}

fn build(bound: u32, backend: Backend) -> GoldbachSearch {
    Goldbach::new()
        .bound(bound)
        .backend(backend)
        .build()
        .expect("valid benchmark configuration")
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_scalability(c: &mut Criterion) {
    let (backend, label) = get_config();
    let mut group = c.benchmark_group(format!("scalability_{label}"));
    group.sample_size(20);

    for bound in [10_000u32, 100_000, 1_000_000] {
        if label == "serial" && bound > 100_000 {
            continue;
        }
        group.throughput(Throughput::Elements(u64::from(bound)));
        let search = build(bound, backend);
        group.bench_with_input(BenchmarkId::new("search", bound), &bound, |b, _| {
            b.iter(|| black_box(run(&search, label)));
        });
    }

    group.finish();
}

fn bench_work_group_size(c: &mut Criterion) {
    let (_, label) = get_config();
    let mut group = c.benchmark_group("work_group_size");
    group.sample_size(30);

    let search = Goldbach::new()
        .bound(100_000)
        .build()
        .expect("valid benchmark configuration");
    for size in [1u32, 16, 64, 256, 1024] {
        if label == "serial" {
            break;
        }
        group.bench_with_input(BenchmarkId::new("cpu", size), &size, |b, &size| {
            b.iter(|| {
                let mut backend = CpuBackend::new().with_work_group_size(size);
                black_box(search.run(&mut backend).expect("benchmark search failed"))
            });
        });
    }

    group.finish();
}

fn bench_variants(c: &mut Criterion) {
    let (backend, label) = get_config();
    let mut group = c.benchmark_group(format!("variants_{label}"));
    group.sample_size(30);

    for variant in [Original, TwoSquare] {
        let search = Goldbach::new()
            .bound(50_000)
            .variant(variant)
            .backend(backend)
            .build()
            .expect("valid benchmark configuration");
        group.bench_function(variant.to_string(), |b| {
            b.iter(|| black_box(run(&search, label)));
        });
    }

    group.finish();
}

fn bench_random_bounds(c: &mut Criterion) {
    let (backend, label) = get_config();
    let mut group = c.benchmark_group(format!("random_bounds_{label}"));
    group.sample_size(20);

    let mut rng = StdRng::seed_from_u64(42);
    let searches: Vec<GoldbachSearch> = (0..8)
        .map(|_| build(rng.random_range(3_000..60_000), backend))
        .collect();

    group.bench_function("eight_bounds", |b| {
        b.iter(|| {
            for search in &searches {
                black_box(run(search, label));
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_scalability,
    bench_work_group_size,
    bench_variants,
    bench_random_bounds,
);
criterion_main!(benches);
