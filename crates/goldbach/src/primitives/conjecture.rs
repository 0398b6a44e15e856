//! Conjecture variants and search outcomes.
//!
//! ## Purpose
//!
//! This module names the two representability properties under test and the
//! value a search reports for each of them.
//!
//! ## Key concepts
//!
//! * **Original**: every odd composite is a prime plus twice a square.
//! * **TwoSquare**: every odd number is a prime plus the sum of two positive squares.
//! * **Counterexample**: the smallest odd number in range for which the property fails.

// External dependencies
use core::fmt::{Display, Formatter, Result};

// ============================================================================
// Variant
// ============================================================================

/// Representability property checked by the verification kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variant {
    /// `prime + 2·s²`.
    #[default]
    Original,

    /// `prime + s1² + s2²`.
    TwoSquare,
}

impl Variant {
    /// Both variants, in reporting order.
    pub const ALL: [Variant; 2] = [Variant::Original, Variant::TwoSquare];

    /// Human-readable description used in reports.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Original => "sum of a prime and double of a square number",
            Self::TwoSquare => "sum of a prime and two square numbers",
        }
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::Original => f.pad("original"),
            Self::TwoSquare => f.pad("twosquare"),
        }
    }
}

// ============================================================================
// Counterexample
// ============================================================================

/// Outcome of a counterexample scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counterexample {
    /// Smallest index whose reachability cell was never marked.
    Found(u32),

    /// Every cell was marked; the property held over the whole range.
    NotFound,
}

impl Counterexample {
    /// Index as a signed integer, `-1` when nothing was found.
    pub fn as_i64(&self) -> i64 {
        match self {
            Self::Found(index) => i64::from(*index),
            Self::NotFound => -1,
        }
    }

    /// Returns the index if a counterexample was found.
    pub fn index(&self) -> Option<u32> {
        match self {
            Self::Found(index) => Some(*index),
            Self::NotFound => None,
        }
    }

    /// Check whether a counterexample was found.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

impl Display for Counterexample {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::Found(index) => write!(f, "{index}"),
            Self::NotFound => write!(f, "not found!"),
        }
    }
}
