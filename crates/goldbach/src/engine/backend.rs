//! The compute backend contract.
//!
//! ## Purpose
//!
//! This module defines [`ComputeBackend`], the seam between the search engine
//! and whatever executes kernels: a device API, a thread pool, or the serial
//! reference implementation. The engine only ever talks to this trait, which
//! is what lets it run unchanged against a fake backend in tests.
//!
//! ## Design notes
//!
//! * **Explicit results**: Every call returns a `Result`. The engine propagates
//!   failures with `?`; no backend is expected to abort the process.
//! * **Asynchronous dispatch**: `dispatch` may return before the work is done.
//!   The host observes completion only through `wait`.
//! * **Zeroed buffers**: `allocate` returns buffers whose cells are all zero.
//!
//! ## Key concepts
//!
//! * **Program**: a compiled kernel, reusable across launches.
//! * **Buffer**: device memory holding `u32` cells.
//! * **Completion**: handle for one outstanding launch.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// Internal dependencies
use crate::algorithms::kernels::KernelSource;
use crate::primitives::backend::{DeviceCaps, DeviceInfo, Geometry, KernelArg};
use crate::primitives::errors::BackendError;

/// A kernel execution backend.
pub trait ComputeBackend {
    /// Compiled kernel.
    type Program;

    /// Device buffer of `u32` cells.
    type Buffer;

    /// Handle to an in-flight launch.
    type Completion;

    /// List every device the backend can run on.
    fn enumerate_devices(&mut self) -> Result<Vec<DeviceInfo>, BackendError>;

    /// Select the device at `index` in the enumeration order and report its capabilities.
    fn select(&mut self, index: usize) -> Result<DeviceCaps, BackendError>;

    /// Compile kernel source for the selected device.
    fn compile(&self, source: &KernelSource) -> Result<Self::Program, BackendError>;

    /// Allocate a zero-initialized buffer of `cells` entries.
    fn allocate(&self, cells: usize) -> Result<Self::Buffer, BackendError>;

    /// Upload host data into the start of a buffer.
    fn write(&self, buffer: &Self::Buffer, data: &[u32]) -> Result<(), BackendError>;

    /// Launch a kernel.
    fn dispatch(
        &self,
        program: &Self::Program,
        args: &[KernelArg<'_, Self::Buffer>],
        geometry: Geometry,
    ) -> Result<Self::Completion, BackendError>;

    /// Block until a launch has finished.
    fn wait(&self, completion: Self::Completion) -> Result<(), BackendError>;

    /// Read a whole buffer back into host memory.
    fn read(&self, buffer: &Self::Buffer) -> Result<Vec<u32>, BackendError>;
}
