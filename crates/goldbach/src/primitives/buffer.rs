//! Host-side buffers produced and consumed by the pipeline stages.
//!
//! ## Purpose
//!
//! This module provides the two host data structures of a search: the dense
//! mark buffer read back from a kernel launch, and the ordered prime list the
//! sieve compacts it into.
//!
//! ## Design notes
//!
//! * **Ownership**: Each buffer is owned by the stage that produced it and
//!   handed to the next stage by value or shared reference.
//! * **Padding-aware**: `PrimeList` remembers how many entries are real primes,
//!   so trailing work-group padding never leaks into reported counts.
//!
//! ## Key concepts
//!
//! * **MarkBuffer**: one `u32` cell per integer in `[0, N)`; 0 = candidate, nonzero = marked.
//! * **PrimeList**: strictly increasing primes below `N`, optionally followed by padding sentinels.
//!
//! ## Invariants
//!
//! * `PrimeList::primes()` is strictly increasing and every element is below the bound.
//! * `PrimeList::len()` is never smaller than `PrimeList::count()`.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::ops::Deref;

// ============================================================================
// Mark Buffer
// ============================================================================

/// Dense per-index marker array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkBuffer(Vec<u32>);

impl MarkBuffer {
    /// Create a zero-initialized buffer covering `[0, len)`.
    pub fn zeroed(len: usize) -> Self {
        Self(vec![0; len])
    }

    /// Mark a single index.
    #[inline]
    pub fn mark(&mut self, index: usize) {
        self.0[index] = 1;
    }

    /// Check whether an index has been marked.
    #[inline]
    pub fn is_marked(&self, index: usize) -> bool {
        self.0[index] != 0
    }

    /// Mutable access to the cells.
    pub fn as_mut_slice(&mut self) -> &mut [u32] {
        &mut self.0
    }

    /// Consume the buffer, returning the raw cells.
    pub fn into_inner(self) -> Vec<u32> {
        self.0
    }
}

impl Deref for MarkBuffer {
    type Target = [u32];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<u32>> for MarkBuffer {
    fn from(cells: Vec<u32>) -> Self {
        Self(cells)
    }
}

// ============================================================================
// Prime List
// ============================================================================

/// Ordered primes below the search bound, plus optional trailing padding.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrimeList {
    values: Vec<u32>,
    count: usize,
}

impl PrimeList {
    /// Build from already-ordered primes.
    pub fn from_primes(primes: Vec<u32>) -> Self {
        let count = primes.len();
        Self {
            values: primes,
            count,
        }
    }

    /// Number of primes found, excluding padding.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Total length including padding.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether the list holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The real primes, without padding.
    pub fn primes(&self) -> &[u32] {
        &self.values[..self.count]
    }

    /// Number of padding entries appended after the primes.
    pub fn padding(&self) -> usize {
        self.values.len() - self.count
    }

    /// Append copies of `value` until the list holds `len` entries.
    pub(crate) fn extend_to(&mut self, len: usize, value: u32) {
        if len > self.values.len() {
            self.values.resize(len, value);
        }
    }
}

impl Deref for PrimeList {
    type Target = [u32];

    fn deref(&self) -> &Self::Target {
        &self.values
    }
}
