//! High-level API for the search with parallel execution support.
//!
//! ## Purpose
//!
//! This module extends the `goldbach` API so a configured search can run on
//! all CPU cores or on GPU hardware without the caller constructing a backend.
//!
//! ## Design notes
//!
//! * **Fluent Integration**: Re-uses the base `goldbach` builder unchanged.
//! * **Hint-driven**: The builder's backend hint picks the implementation.
//! * **Feature-Gated**: A backend whose feature is disabled reports
//!   `DeviceUnavailable` instead of failing to compile.
//!
//! ### Configuration Flow
//!
//! 1. Create a builder via `Goldbach::new()`.
//! 2. Chain configuration methods (`.bound()`, `.variant()`, `.backend(GPU)`).
//! 3. Call `.build()` and then `.run_parallel()`.

// Feature-gated imports
#[cfg(feature = "cpu")]
use crate::engine::executor::CpuBackend;
#[cfg(feature = "gpu")]
use crate::engine::gpu::GpuBackend;

// External dependencies
use tracing::info;

// Publicly re-exported types
pub use goldbach::internals::api::{
    Counterexample, GoldbachBuilder, GoldbachError, GoldbachSearch, SearchResult, Variant,
    VariantOutcome,
};
pub use goldbach::internals::primitives::backend::Backend;

// ============================================================================
// Parallel Execution
// ============================================================================

/// Run a configured search on the backend selected by its hint.
pub trait ParallelSearch {
    /// Run on the CPU pool or the GPU, as requested on the builder.
    fn run_parallel(&self) -> Result<SearchResult, GoldbachError>;
}

impl ParallelSearch for GoldbachSearch {
    fn run_parallel(&self) -> Result<SearchResult, GoldbachError> {
        let backend = self.backend();
        info!(?backend, bound = self.config().bound, "starting parallel search");

        match backend {
            #[cfg(feature = "cpu")]
            Backend::CPU => self.run(&mut CpuBackend::new()),
            #[cfg(feature = "gpu")]
            Backend::GPU => self.run(&mut GpuBackend::new()),
            #[allow(unreachable_patterns)]
            _ => Err(GoldbachError::DeviceUnavailable),
        }
    }
}
