//! # goldbach: data-parallel search for counterexamples to Goldbach's other conjecture
//!
//! Goldbach's other conjecture states that every odd composite number can be
//! written as the sum of a prime and twice a square. It is false; the smallest
//! counterexample is 5777. This crate finds such counterexamples with two
//! data-parallel marking kernels: a prime sieve over `[0, N)`, followed by a
//! "square sieve" that marks every odd number reachable from a prime. The
//! first unmarked odd number is the answer.
//!
//! Two representability properties are supported:
//!
//! | Variant     | Property checked                  |
//! |-------------|-----------------------------------|
//! | `Original`  | `k = p + 2·s²`, `s ≥ 1`           |
//! | `TwoSquare` | `k = p + s1² + s2²`, `s1, s2 ≥ 1` |
//!
//! ## Quick Start
//!
//! ```rust
//! use goldbach::prelude::*;
//!
//! // Configure the search
//! let search = Goldbach::new()
//!     .bound(6000)           // Search odd numbers below 6000
//!     .variant(Original)     // Only the prime + 2·s² property
//!     .build()?;
//!
//! // Run it on the serial reference backend
//! let result = search.run(&mut ReferenceBackend::new())?;
//!
//! assert_eq!(result.counterexample(Original), Some(Counterexample::Found(5777)));
//! println!("{}", result);
//! # Result::<(), GoldbachError>::Ok(())
//! ```
//!
//! ```text
//! Platform "Host" found! Devices:
//!   serial reference (CPU)
//! Using last CPU device "serial reference"!
//! Work-group size: 1
//! Found 783 primes below 6000
//! Smallest number not representable by sum of a prime and double of a square number: 5777
//!   Kernel time: 1.2ms
//! ```
//!
//! ## Backends
//!
//! The search engine runs against any [`ComputeBackend`](prelude::ComputeBackend).
//! This crate ships only the serial [`ReferenceBackend`](prelude::ReferenceBackend);
//! the `fastGoldbach` crate adds a multi-threaded `rayon` backend and a `wgpu`
//! compute-shader backend.
//!
//! ## Result and Error Handling
//!
//! `run` returns a `Result<SearchResult, GoldbachError>`. Configuration
//! mistakes (`GoldbachError::is_usage_error`) are reported by `build()` or at
//! the start of a run, before any kernel work. Backend failures carry the
//! pipeline stage in which they occurred.
//!
//! ## Minimal Usage (no_std)
//!
//! Disable default features to remove the standard library dependency:
//!
//! ```toml
//! [dependencies]
//! goldbach = { version = "0.3", default-features = false }
//! ```
//!
//! Without `std`, kernel timings are not recorded.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
#[macro_use]
extern crate alloc;

// Layer 1: Primitives - data structures and basic utilities.
mod primitives;

// Layer 2: Algorithms - marking kernels and padding.
mod algorithms;

// Layer 3: Evaluation - normalization, scan and oracle.
mod evaluation;

// Layer 4: Engine - orchestration and execution control.
mod engine;

// Layer 5: Adapters - bundled backends.
mod adapters;

// High-level fluent API.
mod api;

// Standard goldbach prelude.
pub mod prelude {
    pub use crate::adapters::reference::ReferenceBackend;
    pub use crate::api::{
        Counterexample, GoldbachBuilder as Goldbach, GoldbachError, GoldbachSearch, SearchResult,
        Variant, Variant::Original, Variant::TwoSquare, VariantOutcome,
    };
    pub use crate::engine::backend::ComputeBackend;
}

// Internal modules for development and testing.
//
// This module re-exports internal modules for development and testing purposes.
// It is only available with the `dev` feature enabled.
#[cfg(feature = "dev")]
pub mod internals {
    pub mod primitives {
        pub use crate::primitives::*;
    }
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    pub mod evaluation {
        pub use crate::evaluation::*;
    }
    pub mod engine {
        pub use crate::engine::*;
    }
    pub mod adapters {
        pub use crate::adapters::*;
    }
    pub mod api {
        pub use crate::api::*;
    }
}
