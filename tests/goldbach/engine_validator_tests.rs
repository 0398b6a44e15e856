#![cfg(feature = "dev")]
//! Tests for parameter validation.
//!
//! These tests verify the checks applied to a search:
//! - Bound range before a device is known
//! - Work-group size overrides against device capabilities
//! - Rounding of the bound to the work-group size
//! - Device buffer capacity
//!
//! ## Test Organization
//!
//! 1. **Parameter Validation** - Bound, duplicates, work-group size
//! 2. **Work-Group Resolution** - Overrides against the device
//! 3. **Effective Bound** - Rounding, overflow, minimum
//! 4. **Capacity** - Device buffer limits
//! 5. **Error Messages** - Display output and classification

use goldbach::internals::engine::sieve::MIN_BOUND;
use goldbach::internals::engine::validator::{MAX_BOUND, Validator};
use goldbach::internals::primitives::backend::DeviceCaps;
use goldbach::internals::primitives::conjecture::Variant;
use goldbach::internals::primitives::errors::{BackendError, GoldbachError, Stage};

// ============================================================================
// Helper Functions
// ============================================================================

fn caps(work_group_size: u32) -> DeviceCaps {
    DeviceCaps {
        work_group_size,
        max_buffer_cells: u64::from(u32::MAX),
    }
}

// ============================================================================
// Parameter Validation
// ============================================================================

/// Test that zero is not a valid bound.
#[test]
fn test_validate_bound_zero() {
    assert_eq!(Validator::validate_bound(0), Err(GoldbachError::InvalidBound(0)));
}

/// Test the accepted bound range.
#[test]
fn test_validate_bound_range() {
    for bound in [1, 2, 3, 10_000, MAX_BOUND] {
        assert!(Validator::validate_bound(bound).is_ok(), "bound {bound}");
    }
    assert!(matches!(
        Validator::validate_bound(MAX_BOUND + 1),
        Err(GoldbachError::BoundOverflow { .. })
    ));
}

/// Test duplicate parameter reporting.
#[test]
fn test_validate_no_duplicates() {
    assert!(Validator::validate_no_duplicates(None).is_ok());
    assert_eq!(
        Validator::validate_no_duplicates(Some("bound")),
        Err(GoldbachError::DuplicateParameter { parameter: "bound" })
    );
}

/// Test that a zero work-group size is rejected up front.
#[test]
fn test_validate_work_group_size() {
    assert!(Validator::validate_work_group_size(1).is_ok());
    assert!(Validator::validate_work_group_size(1024).is_ok());
    assert!(matches!(
        Validator::validate_work_group_size(0),
        Err(GoldbachError::InvalidWorkGroupSize { got: 0, .. })
    ));
}

// ============================================================================
// Work-Group Resolution
// ============================================================================

/// Test that the device's size is used without an override.
#[test]
fn test_resolve_device_default() {
    assert_eq!(Validator::resolve_work_group_size(None, &caps(256)), Ok(256));
}

/// Test overrides within and beyond the device's size.
#[test]
fn test_resolve_override() {
    assert_eq!(Validator::resolve_work_group_size(Some(64), &caps(256)), Ok(64));
    assert_eq!(Validator::resolve_work_group_size(Some(256), &caps(256)), Ok(256));
    assert_eq!(
        Validator::resolve_work_group_size(Some(512), &caps(256)),
        Err(GoldbachError::InvalidWorkGroupSize { got: 512, max: 256 })
    );
}

/// Test that a device reporting zero is treated as size one.
#[test]
fn test_resolve_zero_device_size() {
    assert_eq!(Validator::resolve_work_group_size(None, &caps(0)), Ok(1));
}

// ============================================================================
// Effective Bound
// ============================================================================

/// Test rounding up to the work-group size.
#[test]
fn test_effective_bound_rounding() {
    assert_eq!(Validator::effective_bound(6000, 64), Ok(6016));
    assert_eq!(Validator::effective_bound(10_000, 256), Ok(10_240));
    assert_eq!(Validator::effective_bound(100, 3), Ok(102));
}

/// Test that multiples are unchanged.
#[test]
fn test_effective_bound_exact_multiple() {
    assert_eq!(Validator::effective_bound(1024, 256), Ok(1024));
    assert_eq!(Validator::effective_bound(10, 1), Ok(10));
}

/// Test the minimum after rounding.
#[test]
fn test_effective_bound_minimum() {
    assert_eq!(
        Validator::effective_bound(2, 1),
        Err(GoldbachError::BoundTooSmall {
            got: 2,
            min: MIN_BOUND
        })
    );
    assert_eq!(Validator::effective_bound(2, 4), Ok(4));
    assert_eq!(Validator::effective_bound(1, 3), Ok(3));
}

/// Test overflow past the supported range.
#[test]
fn test_effective_bound_overflow() {
    assert_eq!(Validator::effective_bound(MAX_BOUND, 1), Ok(MAX_BOUND));
    assert_eq!(
        Validator::effective_bound(MAX_BOUND - 1, 5),
        Err(GoldbachError::BoundOverflow {
            bound: MAX_BOUND - 1,
            work_group_size: 5
        })
    );
    assert!(matches!(
        Validator::effective_bound(u32::MAX - 1, 1024),
        Err(GoldbachError::BoundOverflow { .. })
    ));
}

// ============================================================================
// Capacity
// ============================================================================

/// Test device buffer limits.
#[test]
fn test_validate_capacity() {
    let limited = DeviceCaps {
        work_group_size: 64,
        max_buffer_cells: 1000,
    };
    assert!(Validator::validate_capacity(1000, &limited).is_ok());

    let err = Validator::validate_capacity(1001, &limited).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Sieve));
    assert!(err.to_string().contains("1001"));
}

// ============================================================================
// Error Messages
// ============================================================================

/// Test usage-error classification.
#[test]
fn test_usage_errors() {
    assert!(GoldbachError::InvalidBound(0).is_usage_error());
    assert!(GoldbachError::InvalidWorkGroupSize { got: 9, max: 8 }.is_usage_error());
    assert!(!GoldbachError::DeviceUnavailable.is_usage_error());
    assert!(
        !BackendError::Dispatch(String::from("x"))
            .at(Stage::Sieve)
            .is_usage_error()
    );
}

/// Test that backend errors are lifted with their stage.
#[test]
fn test_backend_error_stage() {
    let stage = Stage::Verification(Variant::TwoSquare);
    assert_eq!(
        BackendError::Transfer(String::from("lost")).at(stage),
        GoldbachError::TransferError {
            stage,
            message: String::from("lost")
        }
    );
    assert_eq!(BackendError::NoDevice.at(stage), GoldbachError::DeviceUnavailable);
}

/// Test the console messages.
#[test]
fn test_error_messages() {
    assert_eq!(
        GoldbachError::DeviceUnavailable.to_string(),
        "No compute device found"
    );

    let compile = GoldbachError::CompileError {
        stage: Stage::Sieve,
        kernel: "prime_sieve",
        log: String::from("line 3: bad"),
    };
    let text = compile.to_string();
    assert!(text.starts_with("Error building kernel 'prime_sieve' (prime sieve):"));
    assert!(text.ends_with("line 3: bad"));

    let dispatch = BackendError::Dispatch(String::from("queue full"))
        .at(Stage::Verification(Variant::Original));
    assert!(dispatch.to_string().contains("queue full"));
    assert!(dispatch.to_string().contains("verification"));
}
