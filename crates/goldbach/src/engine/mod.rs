//! Layer 4: Engine
//!
//! # Purpose
//!
//! This layer orchestrates a search: it defines the backend contract, runs
//! the sieve and verification stages on a backend, validates configuration
//! against device capabilities and collects the results.
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Adapters
//!   ↓
//! Layer 4: Engine ← You are here
//!   ↓
//! Layer 3: Evaluation
//!   ↓
//! Layer 2: Algorithms
//!   ↓
//! Layer 1: Primitives
//! ```

/// The compute backend contract.
pub mod backend;

/// Prime sieve stage.
pub mod sieve;

/// Verification stage.
pub mod verify;

/// Search orchestration.
pub mod executor;

/// Validation utilities.
pub mod validator;

/// Output types for a search.
pub mod output;
