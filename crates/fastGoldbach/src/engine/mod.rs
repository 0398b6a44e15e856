//! Layer 4: Engine
//!
//! This layer provides the parallel compute backends for the search. It
//! handles the distribution of work groups across CPU cores or GPU hardware.

// Parallel execution backend using CPU threads
#[cfg(feature = "cpu")]
pub mod executor;

// GPU-accelerated execution backend using wgpu
#[cfg(feature = "gpu")]
pub mod gpu;
