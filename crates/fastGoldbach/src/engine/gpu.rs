//! GPU compute backend for the search engine.
//!
//! ## Purpose
//!
//! This module provides [`GpuBackend`], a `ComputeBackend` that runs the
//! marking kernels as `wgpu` compute shaders. Every adapter `wgpu` can see is
//! a device; the graphics API behind it (Vulkan, Metal, DX12, GL) is its
//! platform.
//!
//! ## Design notes
//!
//! * **Compile errors are values**: Shader modules and pipelines are created
//!   inside a validation error scope; a failure becomes `BackendError::Compile`
//!   carrying the diagnostic text.
//! * **Blocking waits**: `dispatch` submits one compute pass and returns the
//!   submission index; `wait` polls the device until that submission is done.
//! * **Readback**: Results are copied into a staging buffer and mapped.
//! * **Large launches**: Dispatches that exceed the per-dimension work-group
//!   limit fold into a 2-D grid; the shaders linearize the id again.
//!
//! ## Key concepts
//!
//! * **Scalars**: Kernel scalars are passed as 16-byte uniform buffers.
//! * **Work-group size**: the smaller of the device's maximum invocations per
//!   work group and maximum work-group size along x.
//!
//! ## Invariants
//!
//! * Buffers are created zero-initialized and are never smaller than one cell.
//! * A program only runs with the work-group size it was rendered for.

// External dependencies
use bytemuck::{Pod, Zeroable};
use futures_intrusive::channel::shared::oneshot_channel;
use pollster::block_on;
use tracing::debug;
use wgpu::util::{BufferInitDescriptor, DeviceExt};
use wgpu::{
    Adapter, BindGroupDescriptor, BindGroupEntry, Backends, Buffer, BufferDescriptor,
    BufferUsages, CommandEncoderDescriptor, ComputePassDescriptor, ComputePipeline,
    ComputePipelineDescriptor, Device, DeviceDescriptor, DeviceType, ErrorFilter, Instance,
    InstanceDescriptor, MapMode, PollType, Queue, ShaderModuleDescriptor, ShaderSource,
    SubmissionIndex,
};

// Export dependencies from goldbach crate
use goldbach::internals::algorithms::kernels::{Kernel, KernelSource};
use goldbach::internals::engine::backend::ComputeBackend;
use goldbach::internals::primitives::backend::{
    DeviceCaps, DeviceInfo, DeviceKind, Geometry, KernelArg,
};
use goldbach::internals::primitives::errors::BackendError;

const CELL_BYTES: u64 = size_of::<u32>() as u64;

/// Uniform layout of a kernel scalar.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct Scalar {
    value: u32,
    padding: [u32; 3],
}

// ============================================================================
// Handles
// ============================================================================

/// Compiled compute pipeline.
#[derive(Debug)]
pub struct GpuProgram {
    kernel: Kernel,
    work_group_size: u32,
    pipeline: ComputePipeline,
}

/// Storage buffer of `u32` cells.
#[derive(Debug)]
pub struct GpuBuffer {
    buffer: Buffer,
    cells: usize,
}

impl GpuBuffer {
    /// Number of cells.
    pub fn cells(&self) -> usize {
        self.cells
    }
}

struct GpuDevice {
    device: Device,
    queue: Queue,
    work_group_size: u32,
    max_groups_per_dimension: u32,
    max_buffer_cells: u64,
}

// ============================================================================
// Backend
// ============================================================================

/// Backend running kernels as `wgpu` compute shaders.
pub struct GpuBackend {
    instance: Instance,
    adapters: Vec<Adapter>,
    device: Option<GpuDevice>,
}

impl Default for GpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuBackend {
    /// Create a backend over every graphics API `wgpu` was built with.
    pub fn new() -> Self {
        Self {
            instance: Instance::new(&InstanceDescriptor::default()),
            adapters: Vec::new(),
            device: None,
        }
    }

    /// Check whether any adapter exists, without opening a device.
    pub fn is_available() -> bool {
        !Self::new().instance.enumerate_adapters(Backends::all()).is_empty()
    }

    fn device(&self) -> Result<&GpuDevice, BackendError> {
        self.device.as_ref().ok_or(BackendError::NoDevice)
    }
}

fn device_kind(device_type: DeviceType) -> DeviceKind {
    match device_type {
        DeviceType::DiscreteGpu | DeviceType::IntegratedGpu | DeviceType::VirtualGpu => {
            DeviceKind::Gpu
        }
        DeviceType::Cpu => DeviceKind::Cpu,
        DeviceType::Other => DeviceKind::Other,
    }
}

impl ComputeBackend for GpuBackend {
    type Program = GpuProgram;
    type Buffer = GpuBuffer;
    type Completion = SubmissionIndex;

    fn enumerate_devices(&mut self) -> Result<Vec<DeviceInfo>, BackendError> {
        self.adapters = self.instance.enumerate_adapters(Backends::all());
        Ok(self
            .adapters
            .iter()
            .map(|adapter| {
                let info = adapter.get_info();
                DeviceInfo {
                    platform: format!("{:?}", info.backend),
                    name: info.name,
                    kind: device_kind(info.device_type),
                }
            })
            .collect())
    }

    fn select(&mut self, index: usize) -> Result<DeviceCaps, BackendError> {
        let adapter = self.adapters.get(index).ok_or(BackendError::NoDevice)?;
        let limits = adapter.limits();

        let (device, queue) = block_on(adapter.request_device(&DeviceDescriptor {
            label: Some("goldbach"),
            required_limits: limits.clone(),
            ..Default::default()
        }))
        .map_err(|e| BackendError::Dispatch(format!("device request failed: {e}")))?;

        let work_group_size = limits
            .max_compute_invocations_per_workgroup
            .min(limits.max_compute_workgroup_size_x)
            .max(1);
        let max_bytes = u64::from(limits.max_storage_buffer_binding_size).min(limits.max_buffer_size);
        let caps = DeviceCaps {
            work_group_size,
            max_buffer_cells: max_bytes / CELL_BYTES,
        };

        self.device = Some(GpuDevice {
            device,
            queue,
            work_group_size,
            max_groups_per_dimension: limits.max_compute_workgroups_per_dimension.max(1),
            max_buffer_cells: caps.max_buffer_cells,
        });
        Ok(caps)
    }

    fn compile(&self, source: &KernelSource) -> Result<Self::Program, BackendError> {
        let gpu = self.device()?;
        let kernel = source.entry_point();
        if source.work_group_size == 0 || source.work_group_size > gpu.work_group_size {
            return Err(BackendError::Compile {
                kernel,
                log: format!(
                    "work-group size {} not supported (max {})",
                    source.work_group_size, gpu.work_group_size
                ),
            });
        }

        gpu.device.push_error_scope(ErrorFilter::Validation);
        let module = gpu.device.create_shader_module(ShaderModuleDescriptor {
            label: Some(kernel),
            source: ShaderSource::Wgsl(source.text.as_str().into()),
        });
        let pipeline = gpu
            .device
            .create_compute_pipeline(&ComputePipelineDescriptor {
                label: Some(kernel),
                layout: None,
                module: &module,
                entry_point: Some(kernel),
                compilation_options: Default::default(),
                cache: None,
            });
        if let Some(error) = block_on(gpu.device.pop_error_scope()) {
            return Err(BackendError::Compile {
                kernel,
                log: error.to_string(),
            });
        }

        Ok(GpuProgram {
            kernel: source.kernel,
            work_group_size: source.work_group_size,
            pipeline,
        })
    }

    fn allocate(&self, cells: usize) -> Result<Self::Buffer, BackendError> {
        let gpu = self.device()?;
        if cells as u64 > gpu.max_buffer_cells {
            return Err(BackendError::Transfer(format!(
                "cannot allocate {cells} cells (max {})",
                gpu.max_buffer_cells
            )));
        }
        let buffer = gpu.device.create_buffer(&BufferDescriptor {
            label: Some("cells"),
            size: cells.max(1) as u64 * CELL_BYTES,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_DST | BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        Ok(GpuBuffer { buffer, cells })
    }

    fn write(&self, buffer: &Self::Buffer, data: &[u32]) -> Result<(), BackendError> {
        let gpu = self.device()?;
        if data.len() > buffer.cells {
            return Err(BackendError::Transfer(format!(
                "write of {} cells into a buffer of {}",
                data.len(),
                buffer.cells
            )));
        }
        if !data.is_empty() {
            gpu.queue
                .write_buffer(&buffer.buffer, 0, bytemuck::cast_slice(data));
        }
        Ok(())
    }

    fn dispatch(
        &self,
        program: &Self::Program,
        args: &[KernelArg<'_, Self::Buffer>],
        geometry: Geometry,
    ) -> Result<Self::Completion, BackendError> {
        let gpu = self.device()?;
        let local = program.work_group_size;
        if let Some(requested) = geometry.local {
            if requested != local || geometry.global % local != 0 {
                return Err(BackendError::Dispatch(format!(
                    "global size {} with local size {requested} does not fit a program built for {local}",
                    geometry.global
                )));
            }
        }

        let bound_args = program.kernel.bind(args)?;
        let scalar = gpu.device.create_buffer_init(&BufferInitDescriptor {
            label: Some("bound"),
            contents: bytemuck::bytes_of(&Scalar {
                value: bound_args.bound,
                padding: [0; 3],
            }),
            usage: BufferUsages::UNIFORM,
        });

        let mut entries = Vec::with_capacity(program.kernel.arity());
        if let Some(primes) = bound_args.primes {
            entries.push(primes.buffer.as_entire_binding());
        }
        entries.push(bound_args.marks.buffer.as_entire_binding());
        entries.push(scalar.as_entire_binding());
        let entries: Vec<BindGroupEntry<'_>> = entries
            .into_iter()
            .enumerate()
            .map(|(binding, resource)| BindGroupEntry {
                binding: binding as u32,
                resource,
            })
            .collect();

        let layout = program.pipeline.get_bind_group_layout(0);
        let bind_group = gpu.device.create_bind_group(&BindGroupDescriptor {
            label: Some(program.kernel.entry_point()),
            layout: &layout,
            entries: &entries,
        });

        // Fold into two dimensions past the per-dimension limit.
        let groups = geometry.groups(local).max(1);
        let (x, y) = if groups > gpu.max_groups_per_dimension {
            let x = gpu.max_groups_per_dimension;
            (x, groups.div_ceil(x))
        } else {
            (groups, 1)
        };
        debug!(
            kernel = program.kernel.entry_point(),
            global = geometry.global,
            local,
            grid_x = x,
            grid_y = y,
            "submitting compute pass"
        );

        let mut encoder = gpu
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some(program.kernel.entry_point()),
            });
        {
            let mut pass = encoder.begin_compute_pass(&ComputePassDescriptor::default());
            pass.set_pipeline(&program.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(x, y, 1);
        }
        Ok(gpu.queue.submit(Some(encoder.finish())))
    }

    fn wait(&self, completion: Self::Completion) -> Result<(), BackendError> {
        let gpu = self.device()?;
        gpu.device
            .poll(PollType::Wait {
                submission_index: Some(completion),
                timeout: None,
            })
            .map(|_| ())
            .map_err(|e| BackendError::Dispatch(e.to_string()))
    }

    fn read(&self, buffer: &Self::Buffer) -> Result<Vec<u32>, BackendError> {
        let gpu = self.device()?;
        let size = buffer.buffer.size();
        let staging = gpu.device.create_buffer(&BufferDescriptor {
            label: Some("staging"),
            size,
            usage: BufferUsages::MAP_READ | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = gpu.device.create_command_encoder(&Default::default());
        encoder.copy_buffer_to_buffer(&buffer.buffer, 0, &staging, 0, size);
        gpu.queue.submit(Some(encoder.finish()));

        let slice = staging.slice(..);
        let (sender, receiver) = oneshot_channel();
        slice.map_async(MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        gpu.device
            .poll(PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .map_err(|e| BackendError::Transfer(e.to_string()))?;

        match block_on(receiver.receive()) {
            Some(Ok(())) => {}
            Some(Err(e)) => return Err(BackendError::Transfer(e.to_string())),
            None => {
                return Err(BackendError::Transfer(String::from(
                    "staging buffer was never mapped",
                )));
            }
        }

        let mut cells: Vec<u32> = {
            let data = slice.get_mapped_range();
            bytemuck::cast_slice::<u8, u32>(&data).to_vec()
        };
        staging.unmap();
        cells.truncate(buffer.cells);
        Ok(cells)
    }
}
