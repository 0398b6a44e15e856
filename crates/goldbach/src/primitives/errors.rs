//! Error types for the prime sieve and counterexample search.
//!
//! ## Purpose
//!
//! This module defines every failure a search can report: configuration
//! mistakes caught before any device work, and backend failures raised while
//! compiling, dispatching or transferring data for a kernel launch.
//!
//! ## Design notes
//!
//! * **Two levels**: Backends return [`BackendError`], which knows nothing about
//!   pipeline stages. The engine attaches the failing [`Stage`] and turns it
//!   into a [`GoldbachError`].
//! * **Fail-fast**: No variant is recovered locally. Every error travels to the
//!   single top-level handler, which maps it to a diagnostic and an exit code.
//! * **No-std**: Uses `alloc` strings when the `std` feature is disabled.
//!
//! ## Key concepts
//!
//! 1. **Usage errors**: Invalid bound, work-group size or duplicated builder parameters.
//! 2. **Device errors**: No compute device could be found.
//! 3. **Kernel errors**: Compilation failed (carries the compiler log) or a launch failed.
//! 4. **Transfer errors**: Allocation, upload or read-back of device memory failed.
//!
//! ## Non-goals
//!
//! * This module does not retry or distinguish transient from permanent failures.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(feature = "std")]
use std::error::Error;
#[cfg(feature = "std")]
use std::string::String;

// External dependencies
use core::fmt::{Display, Formatter, Result};

// Internal dependencies
use crate::primitives::conjecture::Variant;

// ============================================================================
// Pipeline Stage
// ============================================================================

/// Pipeline stage in which a backend failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Platform/device discovery and selection.
    DeviceSelection,

    /// Parallel prime sieve and host-side compaction.
    Sieve,

    /// Conjecture verification for one variant.
    Verification(Variant),
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::DeviceSelection => write!(f, "device selection"),
            Self::Sieve => write!(f, "prime sieve"),
            Self::Verification(variant) => write!(f, "{variant} verification"),
        }
    }
}

// ============================================================================
// Backend Error
// ============================================================================

/// Error reported by a [`ComputeBackend`](crate::engine::backend::ComputeBackend).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend has no device to offer.
    NoDevice,

    /// Kernel source failed to build; carries the compiler diagnostics.
    Compile {
        /// Entry point of the kernel that failed.
        kernel: &'static str,
        /// Build log as produced by the backend.
        log: String,
    },

    /// Kernel instantiation or launch failed.
    Dispatch(String),

    /// Buffer allocation, upload or read-back failed.
    Transfer(String),
}

impl BackendError {
    /// Attach the pipeline stage and lift into a [`GoldbachError`].
    pub fn at(self, stage: Stage) -> GoldbachError {
        match self {
            Self::NoDevice => GoldbachError::DeviceUnavailable,
            Self::Compile { kernel, log } => GoldbachError::CompileError { stage, kernel, log },
            Self::Dispatch(message) => GoldbachError::DispatchError { stage, message },
            Self::Transfer(message) => GoldbachError::TransferError { stage, message },
        }
    }
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::NoDevice => write!(f, "No compute device available"),
            Self::Compile { kernel, log } => write!(f, "Error building kernel '{kernel}': {log}"),
            Self::Dispatch(msg) => write!(f, "Kernel dispatch failed: {msg}"),
            Self::Transfer(msg) => write!(f, "Device memory transfer failed: {msg}"),
        }
    }
}

#[cfg(feature = "std")]
impl Error for BackendError {}

// ============================================================================
// Error Type
// ============================================================================

/// Error type for sieve and counterexample search operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoldbachError {
    /// No compute device was found on any platform.
    DeviceUnavailable,

    /// Kernel source failed to compile.
    CompileError {
        /// Stage that requested the kernel.
        stage: Stage,
        /// Kernel entry point.
        kernel: &'static str,
        /// Compiler diagnostics.
        log: String,
    },

    /// Kernel instantiation or launch failed.
    DispatchError {
        /// Stage that launched the kernel.
        stage: Stage,
        /// Backend diagnostic.
        message: String,
    },

    /// Device memory allocation, upload or read-back failed.
    TransferError {
        /// Stage that owned the buffer.
        stage: Stage,
        /// Backend diagnostic.
        message: String,
    },

    /// The search bound must be a positive integer.
    InvalidBound(u32),

    /// The effective bound leaves no factor to sieve with.
    BoundTooSmall {
        /// Effective bound after work-group rounding.
        got: u32,
        /// Smallest supported bound.
        min: u32,
    },

    /// The bound exceeds the supported range once rounded to the work-group size.
    BoundOverflow {
        /// Requested bound.
        bound: u32,
        /// Work-group size used for rounding.
        work_group_size: u32,
    },

    /// Work-group size must be nonzero and within what the device supports.
    InvalidWorkGroupSize {
        /// Requested work-group size.
        got: u32,
        /// Largest size the device accepts.
        max: u32,
    },

    /// Parameter was set multiple times in the builder.
    DuplicateParameter {
        /// Name of the parameter that was set multiple times.
        parameter: &'static str,
    },
}

impl GoldbachError {
    /// Whether this error stems from user input rather than the compute backend.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidBound(_)
                | Self::BoundTooSmall { .. }
                | Self::BoundOverflow { .. }
                | Self::InvalidWorkGroupSize { .. }
                | Self::DuplicateParameter { .. }
        )
    }

    /// Stage in which a backend failure occurred, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::CompileError { stage, .. }
            | Self::DispatchError { stage, .. }
            | Self::TransferError { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

// ============================================================================
// Display Implementation
// ============================================================================

impl Display for GoldbachError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::DeviceUnavailable => write!(f, "No compute device found"),
            Self::CompileError { stage, kernel, log } => {
                write!(f, "Error building kernel '{kernel}' ({stage}):\n{log}")
            }
            Self::DispatchError { stage, message } => {
                write!(f, "Kernel launch failed during {stage}: {message}")
            }
            Self::TransferError { stage, message } => {
                write!(f, "Device memory transfer failed during {stage}: {message}")
            }
            Self::InvalidBound(bound) => {
                write!(f, "Invalid bound: {bound} (must be a positive integer)")
            }
            Self::BoundTooSmall { got, min } => {
                write!(f, "Bound too small: got {got}, need at least {min}")
            }
            Self::BoundOverflow {
                bound,
                work_group_size,
            } => write!(
                f,
                "Bound {bound} exceeds the supported range when rounded to work-group size {work_group_size}"
            ),
            Self::InvalidWorkGroupSize { got, max } => {
                write!(f, "Invalid work_group_size: {got} (must be between 1 and {max})")
            }
            Self::DuplicateParameter { parameter } => write!(
                f,
                "Parameter '{parameter}' was set multiple times. Each parameter can only be configured once."
            ),
        }
    }
}

// ============================================================================
// Standard Error Trait
// ============================================================================

#[cfg(feature = "std")]
impl Error for GoldbachError {}
