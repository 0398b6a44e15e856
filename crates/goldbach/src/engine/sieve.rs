//! Sieve stage: parallel marking and host-side compaction.
//!
//! ## Purpose
//!
//! This module runs the prime sieve kernel over `[0, N)` on the selected
//! backend and compacts the returned mark buffer into an ordered prime list.
//!
//! ## Design notes
//!
//! * **One launch**: `N - 2` work items, one per factor `2..N`, no fixed group size.
//! * **Blocking**: The host waits on the single completion before reading back.
//! * **Sequential compaction**: A forward scan yields primes in increasing order
//!   without any sorting.
//!
//! ## Invariants
//!
//! * The returned list is strictly increasing and every entry is in `[2, N)`.
//! * Bounds below [`MIN_BOUND`] are rejected before any backend call.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{format, vec::Vec};
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use tracing::{debug, info};

// Internal dependencies
use crate::algorithms::kernels::{Kernel, KernelSource};
use crate::engine::backend::ComputeBackend;
use crate::primitives::backend::{Geometry, KernelArg};
use crate::primitives::buffer::{MarkBuffer, PrimeList};
use crate::primitives::errors::{GoldbachError, Stage};

/// Smallest bound for which the sieve launch is nonempty.
pub const MIN_BOUND: u32 = 3;

/// Run the prime sieve on `backend` and return every prime below `bound`.
pub fn run_sieve<B: ComputeBackend>(
    backend: &B,
    work_group_size: u32,
    bound: u32,
) -> Result<PrimeList, GoldbachError> {
    if bound < MIN_BOUND {
        return Err(GoldbachError::BoundTooSmall {
            got: bound,
            min: MIN_BOUND,
        });
    }

    let stage = Stage::Sieve;
    let source = KernelSource::render(Kernel::PrimeSieve, work_group_size);
    let program = backend.compile(&source).map_err(|e| e.at(stage))?;
    let marks = backend
        .allocate(bound as usize)
        .map_err(|e| e.at(stage))?;

    let geometry = Geometry::flat(bound - 2);
    debug!(
        global = geometry.global,
        kernel = source.entry_point(),
        "launching prime sieve"
    );

    let args = [KernelArg::Buffer(&marks), KernelArg::Scalar(bound)];
    let completion = backend
        .dispatch(&program, &args, geometry)
        .map_err(|e| e.at(stage))?;
    backend.wait(completion).map_err(|e| e.at(stage))?;

    let cells = backend.read(&marks).map_err(|e| e.at(stage))?;
    if cells.len() != bound as usize {
        return Err(GoldbachError::TransferError {
            stage,
            message: format!(
                "read back {} cells, expected {}",
                cells.len(),
                bound
            ),
        });
    }

    let primes = compact(MarkBuffer::from(cells));
    info!(count = primes.count(), bound, "sieve finished");
    Ok(primes)
}

/// Collect every unmarked index into an ordered prime list.
///
/// 0 and 1 are non-prime by convention; the kernel never visits them.
pub fn compact(mut marks: MarkBuffer) -> PrimeList {
    for cell in marks.as_mut_slice().iter_mut().take(2) {
        *cell = 1;
    }

    let primes: Vec<u32> = marks
        .iter()
        .enumerate()
        .filter(|&(_, &cell)| cell == 0)
        .map(|(i, _)| i as u32)
        .collect();

    PrimeList::from_primes(primes)
}
