//! High-level API for the counterexample search.
//!
//! ## Purpose
//!
//! This module provides the user-facing entry point: a fluent builder that
//! collects the search bound, the variants to check and the optional
//! work-group override, and validates them into a runnable search.
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builder with sensible defaults for all parameters.
//! * **Validated**: Parameters are checked by `build()`; device-dependent checks
//!   happen when the search runs.
//! * **Strict**: Setting a parameter twice is an error, not an override.
//!
//! ### Configuration Flow
//!
//! 1. Create a [`GoldbachBuilder`] via `Goldbach::new()`.
//! 2. Chain configuration methods (`.bound()`, `.variant()`, etc.).
//! 3. Call `.build()` and run the search on a backend.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// Internal dependencies
use crate::engine::executor::SearchConfig;
use crate::engine::validator::Validator;
use crate::primitives::backend::Backend;

// Publicly re-exported types
pub use crate::engine::executor::GoldbachSearch;
pub use crate::engine::output::{SearchResult, VariantOutcome};
pub use crate::primitives::conjecture::{Counterexample, Variant};
pub use crate::primitives::errors::GoldbachError;

/// Bound used when none is given.
pub const DEFAULT_BOUND: u32 = 10_000;

/// Fluent builder for configuring a search.
#[derive(Debug, Clone, Default)]
pub struct GoldbachBuilder {
    /// Exclusive upper bound of the search.
    pub bound: Option<u32>,

    /// Variants to check, in request order.
    pub variants: Vec<Variant>,

    /// Work-group size override.
    pub work_group_size: Option<u32>,

    /// Keep the prime list in the result.
    pub return_primes: Option<bool>,

    // ======================================
    // DEV
    // ======================================
    /// Execution backend hint.
    #[doc(hidden)]
    pub backend: Option<Backend>,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl GoldbachBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the exclusive upper bound of the search.
    pub fn bound(mut self, bound: u32) -> Self {
        if self.bound.is_some() {
            self.duplicate_param = Some("bound");
        }
        self.bound = Some(bound);
        self
    }

    /// Add a variant to check. Without any, both variants are checked.
    pub fn variant(mut self, variant: Variant) -> Self {
        if self.variants.contains(&variant) {
            self.duplicate_param = Some("variant");
        } else {
            self.variants.push(variant);
        }
        self
    }

    /// Override the device's work-group size.
    pub fn work_group_size(mut self, size: u32) -> Self {
        if self.work_group_size.is_some() {
            self.duplicate_param = Some("work_group_size");
        }
        self.work_group_size = Some(size);
        self
    }

    /// Include the list of primes in the result.
    pub fn return_primes(mut self) -> Self {
        self.return_primes = Some(true);
        self
    }

    // ==========================
    // Development Options
    // ==========================

    /// Set the execution backend hint (only for dev)
    #[doc(hidden)]
    pub fn backend(mut self, backend: Backend) -> Self {
        if self.backend.is_some() {
            self.duplicate_param = Some("backend");
        }
        self.backend = Some(backend);
        self
    }

    /// Validate the configuration and produce a runnable search.
    pub fn build(self) -> Result<GoldbachSearch, GoldbachError> {
        // Check for duplicate parameter configuration
        Validator::validate_no_duplicates(self.duplicate_param)?;

        let bound = self.bound.unwrap_or(DEFAULT_BOUND);
        Validator::validate_bound(bound)?;

        if let Some(size) = self.work_group_size {
            Validator::validate_work_group_size(size)?;
        }

        let variants = if self.variants.is_empty() {
            Variant::ALL.to_vec()
        } else {
            self.variants
        };

        Ok(GoldbachSearch::new(SearchConfig {
            bound,
            variants,
            work_group_size: self.work_group_size,
            return_primes: self.return_primes.unwrap_or(false),
            backend: self.backend.unwrap_or_default(),
        }))
    }
}
