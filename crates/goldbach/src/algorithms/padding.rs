//! Work-group padding for the prime list.
//!
//! ## Purpose
//!
//! The verification launch uses a fixed group size, and device APIs require
//! the global size to be a multiple of it. Rather than bounds-check a partial
//! final group inside the kernel, the prime list is extended with sentinel
//! entries until its length is a multiple of the work-group size.
//!
//! ## Design notes
//!
//! * **Harmless sentinel**: The sentinel is 2, the smallest prime. Every mark it
//!   produces is already produced by the real 2 at the head of the list.
//!
//! ## Invariants
//!
//! * The padded length is the smallest multiple of the group size that is `>=` the input length.
//! * A list whose length is already a multiple is left untouched.
//! * The first `count()` entries are never modified.

// Internal dependencies
use crate::primitives::buffer::PrimeList;

/// Value appended to fill the last work group.
pub const PADDING_SENTINEL: u32 = 2;

/// Smallest multiple of `work_group_size` that is at least `len`.
///
/// A zero-length input still occupies one group so the launch is never empty.
pub fn padded_len(len: usize, work_group_size: u32) -> usize {
    let group = work_group_size.max(1) as usize;
    len.max(1).div_ceil(group) * group
}

/// Append sentinels until the list length is a multiple of `work_group_size`.
pub fn pad(primes: &mut PrimeList, work_group_size: u32) {
    let target = padded_len(primes.len(), work_group_size);
    primes.extend_to(target, PADDING_SENTINEL);
}
