//! Output types for a completed search.
//!
//! ## Purpose
//!
//! This module defines `SearchResult`, which gathers everything a run
//! produces: the devices seen, the device used, the prime count, and one
//! outcome per conjecture variant.
//!
//! ## Design notes
//!
//! * **Ergonomics**: Implements `Display` for the console report.
//! * **Optional outputs**: The prime list itself is only kept when requested.
//!
//! ## Invariants
//!
//! * `selected` indexes into `devices`.
//! * `effective_bound` is a multiple of `work_group_size` and `>= bound`.
//! * `padded_len` is a multiple of `work_group_size` and `>= prime_count`.
//!
//! ## Non-goals
//!
//! * This module does not persist results.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::fmt::{Display, Formatter, Result};
use core::time::Duration;

// Internal dependencies
use crate::primitives::backend::DeviceInfo;
use crate::primitives::conjecture::{Counterexample, Variant};

// ============================================================================
// Result Structures
// ============================================================================

/// Outcome of one conjecture variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantOutcome {
    /// Variant that was checked.
    pub variant: Variant,

    /// Smallest counterexample below the effective bound, if any.
    pub counterexample: Counterexample,

    /// Wall-clock time of the verification launch.
    pub kernel_time: Option<Duration>,
}

/// Everything produced by a search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Bound as requested.
    pub bound: u32,

    /// Bound after rounding up to the work-group size.
    pub effective_bound: u32,

    /// Every device the backend reported.
    pub devices: Vec<DeviceInfo>,

    /// Index of the device that ran the kernels.
    pub selected: usize,

    /// Work-group size used for padding and verification.
    pub work_group_size: u32,

    /// Number of primes below the effective bound.
    pub prime_count: usize,

    /// Length of the prime list after work-group padding.
    pub padded_len: usize,

    /// The primes themselves, when requested.
    pub primes: Option<Vec<u32>>,

    /// One outcome per requested variant, in request order.
    pub outcomes: Vec<VariantOutcome>,
}

impl SearchResult {
    // ========================================================================
    // Query Methods
    // ========================================================================

    /// The device that ran the kernels.
    pub fn device(&self) -> &DeviceInfo {
        &self.devices[self.selected]
    }

    /// Outcome for a given variant, if it was requested.
    pub fn outcome(&self, variant: Variant) -> Option<&VariantOutcome> {
        self.outcomes.iter().find(|o| o.variant == variant)
    }

    /// Counterexample for a given variant, if it was requested.
    pub fn counterexample(&self, variant: Variant) -> Option<Counterexample> {
        self.outcome(variant).map(|o| o.counterexample)
    }

    /// Total verification kernel time across variants.
    pub fn total_kernel_time(&self) -> Option<Duration> {
        self.outcomes
            .iter()
            .map(|o| o.kernel_time)
            .sum::<Option<Duration>>()
    }
}

// ============================================================================
// Display Implementation
// ============================================================================

impl Display for SearchResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let mut platform: Option<&str> = None;
        for device in &self.devices {
            if platform != Some(device.platform.as_str()) {
                writeln!(f, "Platform \"{}\" found! Devices:", device.platform)?;
                platform = Some(device.platform.as_str());
            }
            writeln!(f, "  {device}")?;
        }

        let device = self.device();
        writeln!(f, "Using last {} device \"{}\"!", device.kind, device.name)?;
        writeln!(f, "Work-group size: {}", self.work_group_size)?;
        if self.effective_bound != self.bound {
            writeln!(
                f,
                "Bound {} rounded up to {}",
                self.bound, self.effective_bound
            )?;
        }
        writeln!(
            f,
            "Found {} primes below {}",
            self.prime_count, self.effective_bound
        )?;

        for outcome in &self.outcomes {
            writeln!(
                f,
                "Smallest number not representable by {}: {}",
                outcome.variant.description(),
                outcome.counterexample
            )?;
            if let Some(elapsed) = outcome.kernel_time {
                writeln!(f, "  Kernel time: {elapsed:?}")?;
            }
        }

        if let Some(primes) = &self.primes {
            writeln!(f)?;
            writeln!(f, "Primes:")?;
            for chunk in primes.chunks(10) {
                write!(f, " ")?;
                for prime in chunk {
                    write!(f, " {prime:>8}")?;
                }
                writeln!(f)?;
            }
        }

        Ok(())
    }
}
