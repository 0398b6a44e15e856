//! Edge-case normalization and the counterexample scan.
//!
//! ## Purpose
//!
//! After the verification kernel has marked every reachable integer, the host
//! excludes integers outside the property's domain and then looks for the
//! first integer that is still unmarked.
//!
//! ## Design notes
//!
//! * **Parity by marking**: Even indices are marked reachable instead of being
//!   skipped, so the scan itself stays a plain linear search.
//!
//! ## Invariants
//!
//! * After `normalize`, index 1 and every even index are nonzero.
//! * `scan` returns the smallest zero index, or `NotFound` if there is none.

// Internal dependencies
use crate::primitives::conjecture::Counterexample;

/// Mark indices outside the conjecture's domain as reachable.
///
/// 1 is neither even nor usefully representable; the conjectures are stated
/// over odd integers only.
pub fn normalize(cells: &mut [u32]) {
    if let Some(one) = cells.get_mut(1) {
        *one = 1;
    }
    for cell in cells.iter_mut().step_by(2) {
        *cell = 1;
    }
}

/// Return the first unmarked index.
pub fn scan(cells: &[u32]) -> Counterexample {
    match cells.iter().position(|&cell| cell == 0) {
        Some(index) => Counterexample::Found(index as u32),
        None => Counterexample::NotFound,
    }
}
