#![cfg(feature = "gpu")]
//! Tests for the `wgpu` backend.
//!
//! Every test returns early when the machine exposes no adapter, so the suite
//! stays green on headless CI runners.
//!
//! ## Test Organization
//!
//! 1. **Known Answers** - Counterexamples on the device
//! 2. **Agreement** - Device against the oracle
//! 3. **Backend Contract** - Buffers and launches

use fastGoldbach::prelude::*;
use goldbach::internals::algorithms::kernels::{Kernel, KernelSource};
use goldbach::internals::evaluation::oracle::{reference_counterexample, reference_primes};
use goldbach::internals::primitives::backend::{Geometry, KernelArg};

// ============================================================================
// Helper Functions
// ============================================================================

fn gpu() -> Option<GpuBackend> {
    if GpuBackend::is_available() {
        Some(GpuBackend::new())
    } else {
        println!("no GPU adapter, skipping");
        None
    }
}

// ============================================================================
// Known Answers
// ============================================================================

/// Test the default search on the device.
#[test]
fn test_gpu_default_search() {
    let Some(mut backend) = gpu() else { return };

    let result = Goldbach::new().build().unwrap().run(&mut backend).unwrap();

    assert!(result.effective_bound >= 10_000);
    assert_eq!(result.effective_bound % result.work_group_size, 0);
    assert_eq!(result.counterexample(Original), Some(Counterexample::Found(5777)));
    assert_eq!(result.counterexample(TwoSquare), Some(Counterexample::NotFound));
}

/// Test the hint-driven entry point with the GPU hint.
#[test]
fn test_gpu_run_parallel() {
    if gpu().is_none() {
        return;
    }

    let result = Goldbach::new()
        .bound(6000)
        .variant(Original)
        .backend(GPU)
        .build()
        .unwrap()
        .run_parallel()
        .unwrap();

    assert_eq!(result.counterexample(Original), Some(Counterexample::Found(5777)));
}

// ============================================================================
// Agreement
// ============================================================================

/// Test several bounds and an explicit work-group size against the oracle.
#[test]
fn test_gpu_matches_oracle() {
    let Some(mut backend) = gpu() else { return };

    for bound in [3u32, 100, 1000, 5777, 20_000] {
        let result = Goldbach::new()
            .bound(bound)
            .work_group_size(32)
            .build()
            .unwrap()
            .run(&mut backend)
            .unwrap();

        let effective = result.effective_bound;
        assert_eq!(result.prime_count, reference_primes(effective).len(), "bound {bound}");
        for variant in Variant::ALL {
            assert_eq!(
                result.counterexample(variant),
                Some(reference_counterexample(effective, variant)),
                "bound {bound}, {variant}"
            );
        }
    }
}

// ============================================================================
// Backend Contract
// ============================================================================

/// Test that buffers start zeroed and accept uploads.
#[test]
fn test_gpu_buffer_round_trip() {
    let Some(mut backend) = gpu() else { return };
    backend.enumerate_devices().unwrap();
    backend.select(0).unwrap();

    let buffer = backend.allocate(5).unwrap();
    assert_eq!(buffer.cells(), 5);
    assert_eq!(backend.read(&buffer).unwrap(), vec![0; 5]);

    backend.write(&buffer, &[2, 3, 5]).unwrap();
    assert_eq!(backend.read(&buffer).unwrap(), vec![2, 3, 5, 0, 0]);
}

/// Test a single prime sieve launch.
#[test]
fn test_gpu_prime_sieve_launch() {
    let Some(mut backend) = gpu() else { return };
    backend.enumerate_devices().unwrap();
    backend.select(0).unwrap();

    let program = backend
        .compile(&KernelSource::render(Kernel::PrimeSieve, 1))
        .unwrap();
    let marks = backend.allocate(30).unwrap();
    let args = [KernelArg::Buffer(&marks), KernelArg::Scalar(30)];

    let completion = backend.dispatch(&program, &args, Geometry::flat(28)).unwrap();
    backend.wait(completion).unwrap();

    let cells = backend.read(&marks).unwrap();
    let unmarked: Vec<usize> = (2..30).filter(|&i| cells[i] == 0).collect();
    assert_eq!(unmarked, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
}
