//! Verification stage: one square-sieve launch per conjecture variant.
//!
//! ## Purpose
//!
//! This module uploads the padded prime list, launches the square sieve for
//! one variant with one work item per list entry, and reads back the
//! reachability buffer.
//!
//! ## Design notes
//!
//! * **Fixed groups**: The launch uses the run's work-group size as its local
//!   size; the prime list has already been padded to a multiple of it.
//! * **Fresh buffers**: Every call allocates its own prime and output buffers.
//!   Nothing is shared between variants.
//! * **Timing**: With `std`, the wall-clock time from dispatch to completion is
//!   recorded.
//!
//! ## Invariants
//!
//! * The reachability buffer has exactly `bound` cells, indexed like the sieve's.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::format;
#[cfg(feature = "std")]
use std::time::Instant;

// External dependencies
use core::time::Duration;
use tracing::debug;

// Internal dependencies
use crate::algorithms::kernels::{Kernel, KernelSource};
use crate::engine::backend::ComputeBackend;
use crate::primitives::backend::{Geometry, KernelArg};
use crate::primitives::buffer::{MarkBuffer, PrimeList};
use crate::primitives::conjecture::Variant;
use crate::primitives::errors::{GoldbachError, Stage};

/// Output of a verification launch.
#[derive(Debug, Clone)]
pub struct Verification {
    /// Reachability cells for `[0, bound)`, before normalization.
    pub reachability: MarkBuffer,

    /// Wall-clock time from dispatch to completion.
    pub kernel_time: Option<Duration>,
}

/// Launch the square sieve for `variant` over a padded prime list.
pub fn run_verification<B: ComputeBackend>(
    backend: &B,
    primes: &PrimeList,
    bound: u32,
    variant: Variant,
    work_group_size: u32,
) -> Result<Verification, GoldbachError> {
    let stage = Stage::Verification(variant);
    let global = primes.len() as u32;
    if primes.is_empty() || global % work_group_size != 0 {
        return Err(GoldbachError::DispatchError {
            stage,
            message: format!(
                "global size {global} is not a nonzero multiple of work-group size {work_group_size}"
            ),
        });
    }

    let source = KernelSource::render(Kernel::SquareSieve(variant), work_group_size);
    let program = backend.compile(&source).map_err(|e| e.at(stage))?;

    let prime_buffer = backend.allocate(primes.len()).map_err(|e| e.at(stage))?;
    backend
        .write(&prime_buffer, primes)
        .map_err(|e| e.at(stage))?;
    let outputs = backend
        .allocate(bound as usize)
        .map_err(|e| e.at(stage))?;

    let geometry = Geometry::grouped(global, work_group_size);
    debug!(
        %variant,
        global,
        local = work_group_size,
        groups = geometry.groups(work_group_size),
        "launching square sieve"
    );

    let args = [
        KernelArg::Buffer(&prime_buffer),
        KernelArg::Buffer(&outputs),
        KernelArg::Scalar(bound),
    ];

    #[cfg(feature = "std")]
    let started = Instant::now();

    let completion = backend
        .dispatch(&program, &args, geometry)
        .map_err(|e| e.at(stage))?;
    backend.wait(completion).map_err(|e| e.at(stage))?;

    #[cfg(feature = "std")]
    let kernel_time = Some(started.elapsed());
    #[cfg(not(feature = "std"))]
    let kernel_time = None;

    let cells = backend.read(&outputs).map_err(|e| e.at(stage))?;
    if cells.len() != bound as usize {
        return Err(GoldbachError::TransferError {
            stage,
            message: format!("read back {} cells, expected {}", cells.len(), bound),
        });
    }

    Ok(Verification {
        reachability: MarkBuffer::from(cells),
        kernel_time,
    })
}
