//! Layer 3: Evaluation
//!
//! # Purpose
//!
//! This layer turns a reachability buffer into an answer (normalization and
//! counterexample scan) and provides the sequential oracle the parallel
//! results are checked against.
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
//! Layer 3: Evaluation ← You are here
//!   ↓
//! Layer 2: Algorithms
//!   ↓
//! Layer 1: Primitives
//! ```

/// Edge-case normalization and counterexample scan.
pub mod scan;

/// Sequential reference computations.
pub mod oracle;
