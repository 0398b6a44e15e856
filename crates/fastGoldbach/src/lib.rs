//! # fastGoldbach: parallel backends for the goldbach counterexample search
//!
//! This crate runs the `goldbach` search engine on real parallel hardware:
//!
//! - **`cpu`** (default): work groups scheduled on the `rayon` thread pool.
//! - **`gpu`**: the marking kernels as `wgpu` compute shaders.
//!
//! ## Quick Start
//!
//! ```rust
//! use fastGoldbach::prelude::*;
//!
//! let result = Goldbach::new()
//!     .bound(10_000)
//!     .backend(CPU)
//!     .build()?
//!     .run_parallel()?;
//!
//! assert_eq!(result.counterexample(Original), Some(Counterexample::Found(5777)));
//! assert_eq!(result.counterexample(TwoSquare), Some(Counterexample::NotFound));
//! # Result::<(), GoldbachError>::Ok(())
//! ```
//!
//! A backend can also be constructed directly and handed to `run`, which is
//! how a non-default work-group size is chosen:
//!
//! ```rust
//! use fastGoldbach::prelude::*;
//!
//! let search = Goldbach::new().bound(6000).build()?;
//! let result = search.run(&mut CpuBackend::new().with_work_group_size(64))?;
//!
//! assert_eq!(result.effective_bound, 6016);
//! # Result::<(), GoldbachError>::Ok(())
//! ```

#![allow(non_snake_case)]

/// GPU-accelerated execution backend.
#[cfg(feature = "gpu")]
pub mod gpu {
    pub use crate::engine::gpu::{GpuBackend, GpuBuffer, GpuProgram};
}

/// Multi-threaded CPU execution backend.
#[cfg(feature = "cpu")]
pub mod cpu {
    pub use crate::engine::executor::{CpuBackend, CpuBuffer, CpuCompletion, DEFAULT_WORK_GROUP_SIZE};
}

// Layer 4: Engine - parallel backends.
mod engine;

// High-level fluent API with parallel execution.
mod api;

// Standard fastGoldbach prelude.
pub mod prelude {
    pub use crate::api::{
        Backend,
        Backend::{CPU, GPU},
        Counterexample, GoldbachBuilder as Goldbach, GoldbachError, GoldbachSearch,
        ParallelSearch, SearchResult, Variant,
        Variant::{Original, TwoSquare},
        VariantOutcome,
    };
    #[cfg(feature = "cpu")]
    pub use crate::engine::executor::CpuBackend;
    #[cfg(feature = "gpu")]
    pub use crate::engine::gpu::GpuBackend;
    pub use goldbach::prelude::{ComputeBackend, ReferenceBackend};
}

// Internal modules for development and testing.
//
// This module re-exports internal modules for development and testing purposes.
// It is only available with the `dev` feature enabled.
#[cfg(feature = "dev")]
pub mod internals {
    pub mod engine {
        pub use crate::engine::*;
    }
    pub mod api {
        pub use crate::api::*;
    }
}
