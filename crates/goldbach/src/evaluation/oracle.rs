//! Sequential reference computations.
//!
//! ## Purpose
//!
//! This module computes the same answers as the parallel pipeline by the most
//! direct sequential route: a classical sieve of Eratosthenes, and a
//! per-number check of each representability property. Tests and the
//! validation runner use it as the oracle for whatever bound they choose.
//!
//! ## Design notes
//!
//! * **Independent**: Shares no code with the kernels, so a mistake in one does
//!   not hide a mistake in the other.
//! * **Not an execution path**: The search engine never falls back to this module.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// Internal dependencies
use crate::primitives::conjecture::{Counterexample, Variant};

/// Primality table for `[0, bound)` via the classical sieve of Eratosthenes.
pub fn primality_table(bound: u32) -> Vec<bool> {
    let n = bound as usize;
    let mut is_prime = vec![true; n];
    for cell in is_prime.iter_mut().take(2) {
        *cell = false;
    }

    let mut p = 2usize;
    while p * p < n {
        if is_prime[p] {
            let mut multiple = p * p;
            while multiple < n {
                is_prime[multiple] = false;
                multiple += p;
            }
        }
        p += 1;
    }
    is_prime
}

/// All primes below `bound`, in increasing order.
pub fn reference_primes(bound: u32) -> Vec<u32> {
    primality_table(bound)
        .iter()
        .enumerate()
        .filter(|&(_, &prime)| prime)
        .map(|(i, _)| i as u32)
        .collect()
}

/// Check whether odd `k` is representable under `variant`, given a primality table covering `k`.
pub fn is_representable(k: u32, variant: Variant, is_prime: &[bool]) -> bool {
    let k = k as usize;
    if is_prime[k] {
        return true;
    }

    match variant {
        Variant::Original => (1..)
            .map(|s: usize| 2 * s * s)
            .take_while(|&twice_square| twice_square < k)
            .any(|twice_square| is_prime[k - twice_square]),
        Variant::TwoSquare => (1..)
            .map(|s1: usize| s1 * s1)
            .take_while(|&a| a + 1 < k)
            .any(|a| {
                (1..)
                    .map(|s2: usize| s2 * s2)
                    .take_while(|&b| a + b < k)
                    .any(|b| is_prime[k - a - b])
            }),
    }
}

/// Smallest odd number in `[3, bound)` that is not representable under `variant`.
pub fn reference_counterexample(bound: u32, variant: Variant) -> Counterexample {
    let is_prime = primality_table(bound);
    (3..bound)
        .step_by(2)
        .find(|&k| !is_representable(k, variant, &is_prime))
        .map_or(Counterexample::NotFound, Counterexample::Found)
}
