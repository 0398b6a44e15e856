//! Layer 2: Algorithms
//!
//! # Purpose
//!
//! This layer provides the marking kernels (device templates and their host
//! equivalents) and the work-group padding of the prime list.
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Adapters
//!   ↓
//! Layer 4: Engine
//!   ↓
//! Layer 3: Evaluation
//!   ↓
//! Layer 2: Algorithms ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

/// Marking kernels.
pub mod kernels;

/// Work-group padding.
pub mod padding;
