//! Layer 1: Primitives
//!
//! # Purpose
//!
//! This layer provides the data model shared by every other layer: errors,
//! conjecture variants, device descriptors and host buffers. It has zero
//! internal dependencies within the crate.
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
//! Layer 2: Algorithms
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Shared error types.
pub mod errors;

/// Conjecture variants and counterexample outcomes.
pub mod conjecture;

/// Device descriptors and backend configuration.
pub mod backend;

/// Host buffers.
pub mod buffer;
