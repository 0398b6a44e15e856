//! Serial reference backend.
//!
//! ## Purpose
//!
//! This module provides [`ReferenceBackend`], a [`ComputeBackend`] that runs
//! every work item of a launch one after the other on the calling thread. It
//! exposes a single CPU device and never reorders or overlaps work.
//!
//! ## Design notes
//!
//! * **Same semantics**: Work items are executed with the host kernel
//!   functions shared by every CPU backend, so its answers are the answers
//!   the parallel backends must reproduce.
//! * **Synchronous**: `dispatch` finishes the launch before returning;
//!   `wait` has nothing left to do.
//! * **Strict**: Launch shapes a device API would reject (a global size that
//!   is not a multiple of the group size, a write past the end of a buffer)
//!   are reported as dispatch errors instead of being ignored.
//!
//! ## Non-goals
//!
//! * This backend is not chosen by the parallel runner; it exists for tests,
//!   examples and `no_std` targets.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{format, string::String, vec::Vec};
#[cfg(feature = "std")]
use std::{string::String, vec::Vec};

// External dependencies
use core::cell::RefCell;
use core::ptr;

// Internal dependencies
use crate::algorithms::kernels::{Kernel, KernelSource};
use crate::engine::backend::ComputeBackend;
use crate::primitives::backend::{DeviceCaps, DeviceInfo, DeviceKind, Geometry, KernelArg};
use crate::primitives::errors::BackendError;

/// Serial backend with a single CPU device.
#[derive(Debug, Clone)]
pub struct ReferenceBackend {
    work_group_size: u32,
    max_buffer_cells: u64,
    selected: Option<usize>,
}

impl Default for ReferenceBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceBackend {
    /// Platform name reported for the device.
    pub const PLATFORM: &'static str = "Host";

    /// Device name reported for the device.
    pub const DEVICE: &'static str = "serial reference";

    /// Create a backend reporting a work-group size of 1.
    pub fn new() -> Self {
        Self {
            work_group_size: 1,
            max_buffer_cells: u64::from(u32::MAX),
            selected: None,
        }
    }

    /// Report a different work-group size from the device.
    pub fn with_work_group_size(mut self, size: u32) -> Self {
        self.work_group_size = size.max(1);
        self
    }

    /// Limit the size of a single buffer.
    pub fn with_max_buffer_cells(mut self, cells: u64) -> Self {
        self.max_buffer_cells = cells;
        self
    }

    fn require_selected(&self) -> Result<(), BackendError> {
        match self.selected {
            Some(_) => Ok(()),
            None => Err(BackendError::NoDevice),
        }
    }
}

impl ComputeBackend for ReferenceBackend {
    type Program = Kernel;
    type Buffer = RefCell<Vec<u32>>;
    type Completion = ();

    fn enumerate_devices(&mut self) -> Result<Vec<DeviceInfo>, BackendError> {
        Ok(vec![DeviceInfo {
            platform: String::from(Self::PLATFORM),
            name: String::from(Self::DEVICE),
            kind: DeviceKind::Cpu,
        }])
    }

    fn select(&mut self, index: usize) -> Result<DeviceCaps, BackendError> {
        if index != 0 {
            return Err(BackendError::NoDevice);
        }
        self.selected = Some(index);
        Ok(DeviceCaps {
            work_group_size: self.work_group_size,
            max_buffer_cells: self.max_buffer_cells,
        })
    }

    fn compile(&self, source: &KernelSource) -> Result<Self::Program, BackendError> {
        self.require_selected()?;
        if source.work_group_size == 0 || source.work_group_size > self.work_group_size {
            return Err(BackendError::Compile {
                kernel: source.entry_point(),
                log: format!(
                    "work-group size {} not supported (max {})",
                    source.work_group_size, self.work_group_size
                ),
            });
        }
        Ok(source.kernel)
    }

    fn allocate(&self, cells: usize) -> Result<Self::Buffer, BackendError> {
        self.require_selected()?;
        if cells as u64 > self.max_buffer_cells {
            return Err(BackendError::Transfer(format!(
                "cannot allocate {cells} cells (max {})",
                self.max_buffer_cells
            )));
        }
        Ok(RefCell::new(vec![0; cells]))
    }

    fn write(&self, buffer: &Self::Buffer, data: &[u32]) -> Result<(), BackendError> {
        let mut cells = buffer.borrow_mut();
        let capacity = cells.len();
        let target = cells.get_mut(..data.len()).ok_or_else(|| {
            BackendError::Transfer(format!(
                "write of {} cells into a buffer of {capacity}",
                data.len()
            ))
        })?;
        target.copy_from_slice(data);
        Ok(())
    }

    fn dispatch(
        &self,
        program: &Self::Program,
        args: &[KernelArg<'_, Self::Buffer>],
        geometry: Geometry,
    ) -> Result<Self::Completion, BackendError> {
        self.require_selected()?;
        if let Some(local) = geometry.local {
            if local == 0 || geometry.global % local != 0 {
                return Err(BackendError::Dispatch(format!(
                    "global size {} is not a multiple of local size {local}",
                    geometry.global
                )));
            }
        }

        let bound_args = program.bind(args)?;
        if let Some(primes) = bound_args.primes {
            if ptr::eq(primes, bound_args.marks) {
                return Err(BackendError::Dispatch(String::from(
                    "input and output must be distinct buffers",
                )));
            }
        }

        let primes = bound_args.primes.map(|b| b.borrow());
        let primes: &[u32] = primes.as_deref().map(Vec::as_slice).unwrap_or(&[]);
        let mut marks = bound_args.marks.borrow_mut();
        let len = marks.len();
        let bound = bound_args.bound;

        let mut overrun = None;
        for id in 0..geometry.global {
            program.run_item(id, primes, bound, |index| {
                match marks.get_mut(index as usize) {
                    Some(cell) => *cell = 1,
                    None => overrun = Some(index),
                }
            });
        }

        match overrun {
            Some(index) => Err(BackendError::Dispatch(format!(
                "kernel '{}' wrote index {index} past the end of a {len}-cell buffer",
                program.entry_point()
            ))),
            None => Ok(()),
        }
    }

    fn wait(&self, _completion: Self::Completion) -> Result<(), BackendError> {
        Ok(())
    }

    fn read(&self, buffer: &Self::Buffer) -> Result<Vec<u32>, BackendError> {
        Ok(buffer.borrow().clone())
    }
}
