//! Validation of search configuration against device capabilities.
//!
//! ## Purpose
//!
//! This module checks the user-supplied bound and work-group size, and derives
//! the effective bound once the device's capabilities are known.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Two phases**: Parameter checks run at `build()`; checks that need the
//!   selected device run at the start of a search, before any kernel work.
//!
//! ## Invariants
//!
//! * An effective bound is a multiple of the work-group size, at least
//!   [`MIN_BOUND`] and at most [`MAX_BOUND`].
//!
//! ## Non-goals
//!
//! * This module does not correct invalid inputs.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::format;

// Internal dependencies
use crate::engine::sieve::MIN_BOUND;
use crate::primitives::backend::DeviceCaps;
use crate::primitives::errors::{GoldbachError, Stage};

/// Largest supported bound.
///
/// Kernel arithmetic stays in `u32`; the two-square variant computes
/// `p + s1² + s2²`, which stays below `3·N`.
pub const MAX_BOUND: u32 = 1 << 30;

/// Validation utility for search configuration.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Parameter Validation
    // ========================================================================

    /// Validate the requested search bound.
    pub fn validate_bound(bound: u32) -> Result<(), GoldbachError> {
        if bound == 0 {
            return Err(GoldbachError::InvalidBound(bound));
        }
        if bound > MAX_BOUND {
            return Err(GoldbachError::BoundOverflow {
                bound,
                work_group_size: 1,
            });
        }
        Ok(())
    }

    /// Reject a builder on which some parameter was set more than once.
    pub fn validate_no_duplicates(duplicate: Option<&'static str>) -> Result<(), GoldbachError> {
        match duplicate {
            Some(parameter) => Err(GoldbachError::DuplicateParameter { parameter }),
            None => Ok(()),
        }
    }

    /// Validate a work-group size override before a device is known.
    pub fn validate_work_group_size(size: u32) -> Result<(), GoldbachError> {
        if size == 0 {
            return Err(GoldbachError::InvalidWorkGroupSize {
                got: size,
                max: u32::MAX,
            });
        }
        Ok(())
    }

    // ========================================================================
    // Device-Dependent Validation
    // ========================================================================

    /// Choose the work-group size for a run.
    ///
    /// An override must fit within the device's preferred size; otherwise the
    /// device preference is used.
    pub fn resolve_work_group_size(
        requested: Option<u32>,
        caps: &DeviceCaps,
    ) -> Result<u32, GoldbachError> {
        let preferred = caps.work_group_size.max(1);
        match requested {
            None => Ok(preferred),
            Some(size) if size == 0 || size > preferred => {
                Err(GoldbachError::InvalidWorkGroupSize {
                    got: size,
                    max: preferred,
                })
            }
            Some(size) => Ok(size),
        }
    }

    /// Round `bound` up to the next multiple of `work_group_size`.
    ///
    /// A bound that is already a multiple is returned unchanged.
    pub fn effective_bound(bound: u32, work_group_size: u32) -> Result<u32, GoldbachError> {
        let overflow = GoldbachError::BoundOverflow {
            bound,
            work_group_size,
        };
        let rounded = bound
            .checked_next_multiple_of(work_group_size.max(1))
            .ok_or_else(|| overflow.clone())?;

        if rounded > MAX_BOUND {
            return Err(overflow);
        }
        if rounded < MIN_BOUND {
            return Err(GoldbachError::BoundTooSmall {
                got: rounded,
                min: MIN_BOUND,
            });
        }
        Ok(rounded)
    }

    /// Check that a mark buffer for `bound` fits the device.
    pub fn validate_capacity(bound: u32, caps: &DeviceCaps) -> Result<(), GoldbachError> {
        if u64::from(bound) > caps.max_buffer_cells {
            return Err(GoldbachError::TransferError {
                stage: Stage::Sieve,
                message: format!(
                    "{} cells exceed the device buffer limit of {} cells",
                    bound, caps.max_buffer_cells
                ),
            });
        }
        Ok(())
    }
}
