//! Search execution engine.
//!
//! ## Purpose
//!
//! This module drives a complete search on any [`ComputeBackend`]: device
//! discovery and selection, the sieve, padding, one verification launch per
//! variant, normalization and the counterexample scan.
//!
//! ## Design notes
//!
//! * **Strictly sequential stages**: Each stage blocks on its launch before the
//!   next starts. Verification never begins before the prime list is compacted.
//! * **Explicit capabilities**: The work-group size chosen at device selection
//!   is threaded through padding and dispatch as an ordinary value.
//! * **Fail-fast**: The first error from any stage aborts the run.
//!
//! ## Key concepts
//!
//! * **Device policy**: the last GPU enumerated wins, then the last CPU.
//! * **Effective bound**: the requested bound rounded up to the work-group size.
//!
//! ## Invariants
//!
//! * Every variant gets its own freshly allocated buffers.
//! * The prime count reported excludes padding.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use tracing::{debug, info, warn};

// Internal dependencies
use crate::algorithms::padding::pad;
use crate::engine::backend::ComputeBackend;
use crate::engine::output::{SearchResult, VariantOutcome};
use crate::engine::sieve::run_sieve;
use crate::engine::validator::Validator;
use crate::engine::verify::run_verification;
use crate::evaluation::scan::{normalize, scan};
use crate::primitives::backend::{Backend, DeviceInfo, DeviceKind};
use crate::primitives::conjecture::Variant;
use crate::primitives::errors::{GoldbachError, Stage};

// ============================================================================
// Configuration
// ============================================================================

/// Validated search configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Requested exclusive upper bound.
    pub bound: u32,

    /// Variants to check, in order.
    pub variants: Vec<Variant>,

    /// Work-group size override; `None` uses the device's.
    pub work_group_size: Option<u32>,

    /// Keep the prime list in the result.
    pub return_primes: bool,

    /// Backend hint for extension crates.
    pub backend: Backend,
}

// ============================================================================
// Device Selection
// ============================================================================

/// Pick the last GPU, or failing that the last CPU, from an enumeration.
pub fn select_device(devices: &[DeviceInfo]) -> Result<usize, GoldbachError> {
    let last_of = |kind: DeviceKind| devices.iter().rposition(|d| d.kind == kind);
    last_of(DeviceKind::Gpu)
        .or_else(|| last_of(DeviceKind::Cpu))
        .ok_or(GoldbachError::DeviceUnavailable)
}

// ============================================================================
// Search
// ============================================================================

/// A configured, validated search ready to run on a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoldbachSearch {
    config: SearchConfig,
}

impl GoldbachSearch {
    /// Wrap an already validated configuration.
    pub(crate) fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// The search configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Backend hint set on the builder.
    pub fn backend(&self) -> Backend {
        self.config.backend
    }

    /// Run the full pipeline on `backend`.
    pub fn run<B: ComputeBackend>(&self, backend: &mut B) -> Result<SearchResult, GoldbachError> {
        let config = &self.config;

        // Device discovery and selection
        let devices = backend
            .enumerate_devices()
            .map_err(|e| e.at(Stage::DeviceSelection))?;
        for device in &devices {
            info!(platform = %device.platform, name = %device.name, kind = %device.kind, "found device");
        }
        let selected = select_device(&devices)?;
        let caps = backend
            .select(selected)
            .map_err(|e| e.at(Stage::DeviceSelection))?;
        info!(
            device = %devices[selected].name,
            work_group_size = caps.work_group_size,
            "selected device"
        );

        let work_group_size = Validator::resolve_work_group_size(config.work_group_size, &caps)?;
        let bound = Validator::effective_bound(config.bound, work_group_size)?;
        if bound != config.bound {
            warn!(
                requested = config.bound,
                effective = bound,
                work_group_size,
                "bound rounded up to a work-group multiple"
            );
        }
        Validator::validate_capacity(bound, &caps)?;

        // Sieve and padding
        let mut primes = run_sieve(backend, work_group_size, bound)?;
        let prime_count = primes.count();
        pad(&mut primes, work_group_size);
        debug!(
            primes = prime_count,
            padding = primes.padding(),
            padded_len = primes.len(),
            "padded prime list"
        );

        // Verification, normalization and scan per variant
        let mut outcomes = Vec::with_capacity(config.variants.len());
        for &variant in &config.variants {
            let verification = run_verification(backend, &primes, bound, variant, work_group_size)?;
            let mut reachability = verification.reachability;
            normalize(reachability.as_mut_slice());
            let counterexample = scan(&reachability);
            info!(
                %variant,
                counterexample = counterexample.as_i64(),
                kernel_time = ?verification.kernel_time,
                "verification finished"
            );
            outcomes.push(VariantOutcome {
                variant,
                counterexample,
                kernel_time: verification.kernel_time,
            });
        }

        let padded_len = primes.len();
        Ok(SearchResult {
            bound: config.bound,
            effective_bound: bound,
            devices,
            selected,
            work_group_size,
            prime_count,
            padded_len,
            primes: config.return_primes.then(|| primes.primes().to_vec()),
            outcomes,
        })
    }
}
