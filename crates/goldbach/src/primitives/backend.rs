//! Device descriptors and execution backend configuration.
//!
//! ## Purpose
//!
//! This module defines the plain data exchanged between the search engine and
//! a compute backend: what a device is, what it can do, how a launch is
//! shaped, and how kernel arguments are passed. It also defines the `Backend`
//! hint used by extension crates (like `fastGoldbach`) to pick an
//! implementation at runtime.
//!
//! ## Design notes
//!
//! * **Explicit capabilities**: The preferred work-group size travels as part of
//!   [`DeviceCaps`] from device selection to padding and dispatch. Nothing is
//!   stored in process-wide state.
//! * **Positional arguments**: Kernel arguments are bound in declaration order,
//!   mirroring how device APIs set kernel arguments by index.
//!
//! ## Invariants
//!
//! * `DeviceCaps::work_group_size` is at least 1.
//! * The default backend is always `CPU`.
//!
//! ## Non-goals
//!
//! * This module does not implement any backend (see `adapters` and `fastGoldbach`).

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(feature = "std")]
use std::string::String;

// External dependencies
use core::fmt::{Display, Formatter, Result};

// ============================================================================
// Backend Hint
// ============================================================================

/// Execution backend hint for extension crates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::upper_case_acronyms)]
pub enum Backend {
    /// Multi-threaded CPU execution (work groups scheduled on rayon).
    #[default]
    CPU,

    /// GPU execution through compute shaders.
    GPU,
}

// ============================================================================
// Devices
// ============================================================================

/// Broad class of a compute device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// Discrete, integrated or virtual GPU.
    Gpu,

    /// CPU device (native threads or a software rasterizer).
    Cpu,

    /// Anything the backend cannot classify.
    Other,
}

impl Display for DeviceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::Gpu => write!(f, "GPU"),
            Self::Cpu => write!(f, "CPU"),
            Self::Other => write!(f, "unknown"),
        }
    }
}

/// A device as reported by backend enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Platform (driver stack or API) exposing the device.
    pub platform: String,

    /// Device name.
    pub name: String,

    /// Device class.
    pub kind: DeviceKind,
}

impl Display for DeviceInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// Capabilities of the selected device, fixed for the duration of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCaps {
    /// Preferred number of work items per work group.
    pub work_group_size: u32,

    /// Largest number of `u32` cells a single buffer may hold.
    pub max_buffer_cells: u64,
}

// ============================================================================
// Launch Description
// ============================================================================

/// Shape of a kernel launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Total number of work items.
    pub global: u32,

    /// Work items per group; `None` lets the backend choose.
    pub local: Option<u32>,
}

impl Geometry {
    /// Launch without a fixed group size.
    pub fn flat(global: u32) -> Self {
        Self {
            global,
            local: None,
        }
    }

    /// Launch with a fixed group size.
    pub fn grouped(global: u32, local: u32) -> Self {
        Self {
            global,
            local: Some(local),
        }
    }

    /// Number of work groups needed when using `local` items per group.
    pub fn groups(&self, local: u32) -> u32 {
        self.global.div_ceil(local)
    }
}

/// A positional kernel argument.
#[derive(Debug)]
pub enum KernelArg<'a, B> {
    /// Device buffer.
    Buffer(&'a B),

    /// Unsigned scalar passed by value.
    Scalar(u32),
}

impl<B> Clone for KernelArg<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B> Copy for KernelArg<'_, B> {}
