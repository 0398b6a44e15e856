//! Multi-threaded CPU backend for the search engine.
//!
//! ## Purpose
//!
//! This module provides [`CpuBackend`], a `ComputeBackend` that executes each
//! kernel launch as a set of work groups scheduled on the `rayon` thread pool.
//! It plugs into the `goldbach` search engine unchanged.
//!
//! ## Design notes
//!
//! * **Parallelism**: One rayon task per work group; items inside a group run
//!   in order on the same thread.
//! * **Race-free marking**: Cells are `AtomicU32` and every mark is a relaxed
//!   store of the constant 1. Kernels only ever write 1, so the store order
//!   does not matter.
//! * **Asynchronous dispatch**: `dispatch` hands the launch to the pool and
//!   returns a oneshot receiver; `wait` blocks on it.
//!
//! ## Key concepts
//!
//! * **Flat launches**: A launch without a fixed group size is split into
//!   groups of the backend's work-group size, the last one partial.
//! * **Buffers**: Shared, reference-counted atomic cells, so a launch can own
//!   its arguments while the host keeps its handles.
//!
//! ## Invariants
//!
//! * A buffer's contents are only read by the host after `wait` has returned.
//! * Indices at or past the end of the marked buffer are never written.
//!
//! ## Non-goals
//!
//! * This module does not pin threads or manage its own pool.

// External dependencies
use futures_intrusive::channel::shared::{OneshotReceiver, oneshot_channel};
use rayon::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use tracing::debug;

// Export dependencies from goldbach crate
use goldbach::internals::algorithms::kernels::{Kernel, KernelSource};
use goldbach::internals::engine::backend::ComputeBackend;
use goldbach::internals::primitives::backend::{
    DeviceCaps, DeviceInfo, DeviceKind, Geometry, KernelArg,
};
use goldbach::internals::primitives::errors::BackendError;

/// Work-group size used unless overridden.
pub const DEFAULT_WORK_GROUP_SIZE: u32 = 256;

/// Shared buffer of atomic cells.
pub type CpuBuffer = Arc<[AtomicU32]>;

/// Outcome of a launch running on the pool.
pub type CpuCompletion = OneshotReceiver<Result<(), BackendError>>;

// ============================================================================
// Backend
// ============================================================================

/// Backend running work groups on the rayon thread pool.
#[derive(Debug, Clone)]
pub struct CpuBackend {
    work_group_size: u32,
    selected: bool,
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuBackend {
    /// Platform name reported for the device.
    pub const PLATFORM: &'static str = "rayon";

    /// Create a backend with the default work-group size.
    pub fn new() -> Self {
        Self {
            work_group_size: DEFAULT_WORK_GROUP_SIZE,
            selected: false,
        }
    }

    /// Use a different work-group size.
    pub fn with_work_group_size(mut self, size: u32) -> Self {
        self.work_group_size = size.max(1);
        self
    }

    fn require_selected(&self) -> Result<(), BackendError> {
        if self.selected {
            Ok(())
        } else {
            Err(BackendError::NoDevice)
        }
    }
}

impl ComputeBackend for CpuBackend {
    type Program = Kernel;
    type Buffer = CpuBuffer;
    type Completion = CpuCompletion;

    fn enumerate_devices(&mut self) -> Result<Vec<DeviceInfo>, BackendError> {
        Ok(vec![DeviceInfo {
            platform: String::from(Self::PLATFORM),
            name: format!("{} worker threads", rayon::current_num_threads()),
            kind: DeviceKind::Cpu,
        }])
    }

    fn select(&mut self, index: usize) -> Result<DeviceCaps, BackendError> {
        if index != 0 {
            return Err(BackendError::NoDevice);
        }
        self.selected = true;
        Ok(DeviceCaps {
            work_group_size: self.work_group_size,
            max_buffer_cells: (isize::MAX as u64) / size_of::<AtomicU32>() as u64,
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
        Ok((0..cells).map(|_| AtomicU32::new(0)).collect())
    }

    fn write(&self, buffer: &Self::Buffer, data: &[u32]) -> Result<(), BackendError> {
        if data.len() > buffer.len() {
            return Err(BackendError::Transfer(format!(
                "write of {} cells into a buffer of {}",
                data.len(),
                buffer.len()
            )));
        }
        for (cell, &value) in buffer.iter().zip(data) {
            cell.store(value, Ordering::Relaxed);
        }
        Ok(())
    }

    fn dispatch(
        &self,
        program: &Self::Program,
        args: &[KernelArg<'_, Self::Buffer>],
        geometry: Geometry,
    ) -> Result<Self::Completion, BackendError> {
        self.require_selected()?;
        let local = match geometry.local {
            Some(local) if local == 0 || geometry.global % local != 0 => {
                return Err(BackendError::Dispatch(format!(
                    "global size {} is not a multiple of local size {local}",
                    geometry.global
                )));
            }
            Some(local) => local,
            None => self.work_group_size,
        };

        let bound_args = program.bind(args)?;
        let launch = Launch {
            kernel: *program,
            primes: bound_args.primes.cloned(),
            marks: Arc::clone(bound_args.marks),
            bound: bound_args.bound,
            global: geometry.global,
            local,
        };
        debug!(
            kernel = program.entry_point(),
            global = launch.global,
            local,
            groups = geometry.groups(local),
            "spawning launch on rayon"
        );

        let (sender, receiver) = oneshot_channel();
        rayon::spawn(move || {
            // The receiver may already be gone if the caller gave up waiting.
            let _ = sender.send(launch.run());
        });
        Ok(receiver)
    }

    fn wait(&self, completion: Self::Completion) -> Result<(), BackendError> {
        pollster::block_on(completion.receive()).unwrap_or_else(|| {
            Err(BackendError::Dispatch(String::from(
                "launch ended without reporting completion",
            )))
        })
    }

    fn read(&self, buffer: &Self::Buffer) -> Result<Vec<u32>, BackendError> {
        Ok(buffer
            .iter()
            .map(|cell| cell.load(Ordering::Relaxed))
            .collect())
    }
}

// ============================================================================
// Launch Execution
// ============================================================================

/// A launch with its arguments, owned by the task that runs it.
struct Launch {
    kernel: Kernel,
    primes: Option<CpuBuffer>,
    marks: CpuBuffer,
    bound: u32,
    global: u32,
    local: u32,
}

impl Launch {
    /// Run every work group in parallel and report out-of-range writes.
    fn run(self) -> Result<(), BackendError> {
        let primes: Vec<u32> = self
            .primes
            .as_deref()
            .map(|cells| cells.iter().map(|c| c.load(Ordering::Relaxed)).collect())
            .unwrap_or_default();
        let overrun = AtomicBool::new(false);

        let groups = self.global.div_ceil(self.local);
        (0..groups).into_par_iter().for_each(|group| {
            let start = group * self.local;
            let end = start.saturating_add(self.local).min(self.global);
            for id in start..end {
                self.kernel.run_item(id, &primes, self.bound, |index| {
                    match self.marks.get(index as usize) {
                        Some(cell) => cell.store(1, Ordering::Relaxed),
                        None => overrun.store(true, Ordering::Relaxed),
                    }
                });
            }
        });

        if overrun.load(Ordering::Relaxed) {
            return Err(BackendError::Dispatch(format!(
                "kernel '{}' wrote past the end of a {}-cell buffer",
                self.kernel.entry_point(),
                self.marks.len()
            )));
        }
        Ok(())
    }
}
