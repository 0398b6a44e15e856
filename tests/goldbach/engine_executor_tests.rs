#![cfg(feature = "dev")]
//! Tests for the search engine.
//!
//! These tests drive the sieve, verification and full pipeline through the
//! `ComputeBackend` seam:
//! - Device selection policy
//! - Sieve and verification launches on their own
//! - Error propagation from every backend call, tagged with its stage
//! - Agreement with the sequential oracle over randomized bounds
//!
//! ## Test Organization
//!
//! 1. **Device Selection** - Last GPU, else last CPU
//! 2. **Sieve** - Prime sieve launch and compaction
//! 3. **Verification** - Square sieve launch
//! 4. **Failure Propagation** - Injected backend failures
//! 5. **Capacity and Overflow** - Device limits and bound range
//! 6. **Oracle Agreement** - Randomized bounds and work-group sizes

use std::cell::Cell;

use rand::prelude::*;

use goldbach::internals::adapters::reference::ReferenceBackend;
use goldbach::internals::algorithms::kernels::{Kernel, KernelSource};
use goldbach::internals::algorithms::padding::pad;
use goldbach::internals::api::GoldbachBuilder;
use goldbach::internals::engine::backend::ComputeBackend;
use goldbach::internals::engine::executor::select_device;
use goldbach::internals::engine::sieve::{compact, run_sieve};
use goldbach::internals::engine::validator::MAX_BOUND;
use goldbach::internals::engine::verify::run_verification;
use goldbach::internals::evaluation::oracle::{reference_counterexample, reference_primes};
use goldbach::internals::evaluation::scan::{normalize, scan};
use goldbach::internals::primitives::backend::{
    DeviceCaps, DeviceInfo, DeviceKind, Geometry, KernelArg,
};
use goldbach::internals::primitives::buffer::{MarkBuffer, PrimeList};
use goldbach::internals::primitives::conjecture::{Counterexample, Variant};
use goldbach::internals::primitives::errors::{BackendError, GoldbachError, Stage};

// ============================================================================
// Helper Functions
// ============================================================================

fn device(name: &str, kind: DeviceKind) -> DeviceInfo {
    DeviceInfo {
        platform: String::from("test"),
        name: String::from(name),
        kind,
    }
}

fn selected(work_group_size: u32) -> ReferenceBackend {
    let mut backend = ReferenceBackend::new().with_work_group_size(work_group_size);
    backend.select(0).unwrap();
    backend
}

/// Backend call that a [`FaultyBackend`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fault {
    Enumerate,
    NoDevices,
    Select,
    Compile,
    Allocate,
    Write,
    Dispatch,
    Wait,
    ShortRead,
}

/// Reference backend wrapper that fails one kind of call.
///
/// `skip` lets the first few matching calls through so later stages can be hit.
struct FaultyBackend {
    inner: ReferenceBackend,
    fault: Fault,
    skip: Cell<usize>,
}

impl FaultyBackend {
    fn new(fault: Fault) -> Self {
        Self::after(fault, 0)
    }

    fn after(fault: Fault, skip: usize) -> Self {
        Self {
            inner: ReferenceBackend::new().with_work_group_size(4),
            fault,
            skip: Cell::new(skip),
        }
    }

    fn trips(&self, fault: Fault) -> bool {
        if self.fault != fault {
            return false;
        }
        match self.skip.get() {
            0 => true,
            n => {
                self.skip.set(n - 1);
                false
            }
        }
    }
}

impl ComputeBackend for FaultyBackend {
    type Program = Kernel;
    type Buffer = <ReferenceBackend as ComputeBackend>::Buffer;
    type Completion = ();

    fn enumerate_devices(&mut self) -> Result<Vec<DeviceInfo>, BackendError> {
        if self.trips(Fault::Enumerate) {
            return Err(BackendError::Transfer(String::from("platform query failed")));
        }
        if self.trips(Fault::NoDevices) {
            return Ok(Vec::new());
        }
        self.inner.enumerate_devices()
    }

    fn select(&mut self, index: usize) -> Result<DeviceCaps, BackendError> {
        if self.trips(Fault::Select) {
            return Err(BackendError::NoDevice);
        }
        self.inner.select(index)
    }

    fn compile(&self, source: &KernelSource) -> Result<Self::Program, BackendError> {
        if self.trips(Fault::Compile) {
            return Err(BackendError::Compile {
                kernel: source.entry_point(),
                log: String::from("error: unexpected token"),
            });
        }
        self.inner.compile(source)
    }

    fn allocate(&self, cells: usize) -> Result<Self::Buffer, BackendError> {
        if self.trips(Fault::Allocate) {
            return Err(BackendError::Transfer(String::from("out of device memory")));
        }
        self.inner.allocate(cells)
    }

    fn write(&self, buffer: &Self::Buffer, data: &[u32]) -> Result<(), BackendError> {
        if self.trips(Fault::Write) {
            return Err(BackendError::Transfer(String::from("upload failed")));
        }
        self.inner.write(buffer, data)
    }

    fn dispatch(
        &self,
        program: &Self::Program,
        args: &[KernelArg<'_, Self::Buffer>],
        geometry: Geometry,
    ) -> Result<Self::Completion, BackendError> {
        if self.trips(Fault::Dispatch) {
            return Err(BackendError::Dispatch(String::from("launch rejected")));
        }
        self.inner.dispatch(program, args, geometry)
    }

    fn wait(&self, completion: Self::Completion) -> Result<(), BackendError> {
        if self.trips(Fault::Wait) {
            return Err(BackendError::Dispatch(String::from("device lost")));
        }
        self.inner.wait(completion)
    }

    fn read(&self, buffer: &Self::Buffer) -> Result<Vec<u32>, BackendError> {
        let mut cells = self.inner.read(buffer)?;
        if self.trips(Fault::ShortRead) {
            cells.pop();
        }
        Ok(cells)
    }
}

fn run_faulty(backend: &mut FaultyBackend) -> GoldbachError {
    GoldbachBuilder::new()
        .bound(100)
        .variant(Variant::Original)
        .build()
        .unwrap()
        .run(backend)
        .unwrap_err()
}

// ============================================================================
// Device Selection
// ============================================================================

/// Test that the last GPU wins over any CPU.
#[test]
fn test_select_last_gpu() {
    let devices = [
        device("gpu0", DeviceKind::Gpu),
        device("cpu0", DeviceKind::Cpu),
        device("gpu1", DeviceKind::Gpu),
        device("cpu1", DeviceKind::Cpu),
    ];
    assert_eq!(select_device(&devices), Ok(2));
}

/// Test the CPU fallback.
#[test]
fn test_select_last_cpu_without_gpu() {
    let devices = [
        device("cpu0", DeviceKind::Cpu),
        device("accel", DeviceKind::Other),
        device("cpu1", DeviceKind::Cpu),
        device("accel2", DeviceKind::Other),
    ];
    assert_eq!(select_device(&devices), Ok(2));
}

/// Test that unusable enumerations are rejected.
#[test]
fn test_select_nothing_usable() {
    assert_eq!(select_device(&[]), Err(GoldbachError::DeviceUnavailable));
    assert_eq!(
        select_device(&[device("accel", DeviceKind::Other)]),
        Err(GoldbachError::DeviceUnavailable)
    );
}

// ============================================================================
// Sieve
// ============================================================================

/// Test the sieve against the oracle for several bounds.
#[test]
fn test_run_sieve_matches_oracle() {
    let backend = selected(1);
    for bound in [3u32, 4, 10, 100, 1000, 6000] {
        let primes = run_sieve(&backend, 1, bound).unwrap();
        assert_eq!(primes.primes(), reference_primes(bound).as_slice(), "bound {bound}");
        assert_eq!(primes.padding(), 0);
    }
}

/// Test the sieve at the smallest bounds.
#[test]
fn test_run_sieve_smallest_bounds() {
    let backend = selected(1);
    assert_eq!(run_sieve(&backend, 1, 3).unwrap().primes(), &[2]);
    assert_eq!(
        run_sieve(&backend, 1, 2).unwrap_err(),
        GoldbachError::BoundTooSmall { got: 2, min: 3 }
    );
}

/// Test that compaction treats 0 and 1 as non-prime.
#[test]
fn test_compact_excludes_zero_and_one() {
    let primes = compact(MarkBuffer::zeroed(6));
    assert_eq!(primes.primes(), &[2, 3, 4, 5]);

    let primes = compact(MarkBuffer::from(vec![0, 0, 0, 0, 1, 0, 1]));
    assert_eq!(primes.primes(), &[2, 3, 5]);
}

// ============================================================================
// Verification
// ============================================================================

/// Test a verification launch end to end with the host scan.
#[test]
fn test_run_verification_finds_5777() {
    let backend = selected(8);
    let mut primes = run_sieve(&backend, 8, 6000).unwrap();
    pad(&mut primes, 8);

    let verification = run_verification(&backend, &primes, 6000, Variant::Original, 8).unwrap();
    let mut cells = verification.reachability.into_inner();
    assert_eq!(cells.len(), 6000);
    assert!(verification.kernel_time.is_some());

    normalize(&mut cells);
    assert_eq!(scan(&cells), Counterexample::Found(5777));
}

/// Test that an unpadded prime list is rejected before launch.
#[test]
fn test_run_verification_rejects_unpadded_list() {
    let backend = selected(4);
    let primes = PrimeList::from_primes(vec![2, 3, 5]);

    let err = run_verification(&backend, &primes, 10, Variant::TwoSquare, 4).unwrap_err();
    assert!(matches!(err, GoldbachError::DispatchError { .. }));
    assert_eq!(err.stage(), Some(Stage::Verification(Variant::TwoSquare)));
}

/// Test that padding entries do not change the outcome.
#[test]
fn test_padding_does_not_change_marks() {
    let backend = selected(64);
    let primes = run_sieve(&backend, 1, 1000).unwrap();

    let mut padded = primes.clone();
    pad(&mut padded, 64);
    let mut exact = primes;
    pad(&mut exact, 1);

    for variant in Variant::ALL {
        let a = run_verification(&backend, &padded, 1000, variant, 64).unwrap();
        let b = run_verification(&backend, &exact, 1000, variant, 1).unwrap();
        assert_eq!(a.reachability, b.reachability, "{variant}");
    }
}

// ============================================================================
// Failure Propagation
// ============================================================================

/// Test failures during device discovery.
#[test]
fn test_device_selection_failures() {
    let err = run_faulty(&mut FaultyBackend::new(Fault::Enumerate));
    assert_eq!(err.stage(), Some(Stage::DeviceSelection));

    let err = run_faulty(&mut FaultyBackend::new(Fault::NoDevices));
    assert_eq!(err, GoldbachError::DeviceUnavailable);

    let err = run_faulty(&mut FaultyBackend::new(Fault::Select));
    assert_eq!(err, GoldbachError::DeviceUnavailable);
}

/// Test that compile failures carry the kernel and its log.
#[test]
fn test_compile_failures() {
    let err = run_faulty(&mut FaultyBackend::new(Fault::Compile));
    assert_eq!(
        err,
        GoldbachError::CompileError {
            stage: Stage::Sieve,
            kernel: "prime_sieve",
            log: String::from("error: unexpected token"),
        }
    );
    assert!(err.to_string().contains("error: unexpected token"));

    let err = run_faulty(&mut FaultyBackend::after(Fault::Compile, 1));
    assert!(matches!(
        err,
        GoldbachError::CompileError {
            stage: Stage::Verification(Variant::Original),
            kernel: "square_sieve",
            ..
        }
    ));
}

/// Test transfer failures in each stage.
#[test]
fn test_transfer_failures() {
    let err = run_faulty(&mut FaultyBackend::new(Fault::Allocate));
    assert!(matches!(err, GoldbachError::TransferError { stage: Stage::Sieve, .. }));

    // The sieve allocates once; the second allocation is the verification's.
    let err = run_faulty(&mut FaultyBackend::after(Fault::Allocate, 1));
    assert_eq!(err.stage(), Some(Stage::Verification(Variant::Original)));

    let err = run_faulty(&mut FaultyBackend::new(Fault::Write));
    assert!(matches!(
        err,
        GoldbachError::TransferError {
            stage: Stage::Verification(Variant::Original),
            ..
        }
    ));
    assert!(!err.is_usage_error());
}

/// Test that a short read-back is a transfer error.
#[test]
fn test_short_read() {
    let err = run_faulty(&mut FaultyBackend::new(Fault::ShortRead));
    assert!(matches!(err, GoldbachError::TransferError { stage: Stage::Sieve, .. }));

    let err = run_faulty(&mut FaultyBackend::after(Fault::ShortRead, 1));
    assert!(matches!(
        err,
        GoldbachError::TransferError {
            stage: Stage::Verification(Variant::Original),
            ..
        }
    ));
}

/// Test dispatch and completion failures.
#[test]
fn test_dispatch_failures() {
    let err = run_faulty(&mut FaultyBackend::new(Fault::Dispatch));
    assert!(matches!(err, GoldbachError::DispatchError { stage: Stage::Sieve, .. }));

    let err = run_faulty(&mut FaultyBackend::after(Fault::Wait, 1));
    assert_eq!(
        err,
        GoldbachError::DispatchError {
            stage: Stage::Verification(Variant::Original),
            message: String::from("device lost"),
        }
    );
}

/// Test that a later variant's failure aborts the whole run.
#[test]
fn test_second_variant_failure_aborts() {
    // Compiles: sieve, original, two-square.
    let mut backend = FaultyBackend::after(Fault::Compile, 2);
    let err = GoldbachBuilder::new()
        .bound(100)
        .build()
        .unwrap()
        .run(&mut backend)
        .unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Verification(Variant::TwoSquare)));
}

// ============================================================================
// Capacity and Overflow
// ============================================================================

/// Test that a bound larger than the device buffer limit is rejected.
#[test]
fn test_capacity_limit() {
    let err = GoldbachBuilder::new()
        .bound(1000)
        .build()
        .unwrap()
        .run(&mut ReferenceBackend::new().with_max_buffer_cells(999))
        .unwrap_err();

    assert!(matches!(err, GoldbachError::TransferError { stage: Stage::Sieve, .. }));
}

/// Test that rounding past the supported range is rejected.
#[test]
fn test_bound_overflow_after_rounding() {
    let err = GoldbachBuilder::new()
        .bound(MAX_BOUND - 1)
        .build()
        .unwrap()
        .run(&mut ReferenceBackend::new().with_work_group_size(5))
        .unwrap_err();

    assert_eq!(
        err,
        GoldbachError::BoundOverflow {
            bound: MAX_BOUND - 1,
            work_group_size: 5
        }
    );
}

// ============================================================================
// Oracle Agreement
// ============================================================================

/// Test random bounds and work-group sizes against the oracle.
#[test]
fn test_random_bounds_match_oracle() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..12 {
        let bound = rng.random_range(3..4000u32);
        let work_group_size = rng.random_range(1..=32u32);

        let result = GoldbachBuilder::new()
            .bound(bound)
            .build()
            .unwrap()
            .run(&mut ReferenceBackend::new().with_work_group_size(work_group_size))
            .unwrap();

        let effective = bound.next_multiple_of(work_group_size);
        assert_eq!(result.effective_bound, effective);
        assert_eq!(result.prime_count, reference_primes(effective).len());
        assert_eq!(result.padded_len % work_group_size as usize, 0);
        for variant in Variant::ALL {
            assert_eq!(
                result.counterexample(variant),
                Some(reference_counterexample(effective, variant)),
                "bound {bound}, work-group size {work_group_size}, {variant}"
            );
        }
    }
}
