//! Layer 5: Adapters
//!
//! # Purpose
//!
//! This layer provides backends that ship with the core crate. Parallel
//! backends live in `fastGoldbach`.
//!
//! - **Reference**: serial, one work item at a time
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Adapters ← You are here
//!   ↓
//! Layer 4: Engine
//!   ↓
//! Layer 3: Evaluation
//!   ↓
//! Layer 2: Algorithms
//!   ↓
//! Layer 1: Primitives
//! ```

/// Serial reference backend.
pub mod reference;
