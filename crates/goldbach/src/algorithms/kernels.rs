//! Marking kernels: device source templates and host work-item semantics.
//!
//! ## Purpose
//!
//! This module defines the two kernels of a search. The prime sieve marks
//! multiples of every factor in `[2, N)`; the square sieve marks every integer
//! reachable from a prime under one of the conjecture variants. Each kernel
//! exists twice, with identical behaviour: as a WGSL template rendered for
//! device backends, and as a host function executed per work item by the CPU
//! backends.
//!
//! ## Design notes
//!
//! * **Idempotent writes**: Every work item only ever writes the value 1. Any
//!   number of items may write the same cell in any order without
//!   synchronization and the result is identical.
//! * **Embarrassingly parallel sieve**: Every integer drives its own pass, not
//!   only primes. Knowing in advance which factors are prime would introduce a
//!   sequential dependency between work items.
//! * **Template variants**: The square sieve variants differ only in the inner
//!   loop, so both share one template with an `{{INNER_LOOP}}` slot.
//!
//! ## Key concepts
//!
//! * **Work item id**: prime sieve item `id` handles factor `id + 2`; square sieve
//!   item `id` handles `primes[id]`.
//! * **Linear id on device**: launches larger than the per-dimension group limit
//!   fold into two dimensions; the shader linearizes the id again.
//!
//! ## Invariants
//!
//! * Only indices strictly below the bound are ever marked.
//! * Items whose id falls past the end of their input mark nothing.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{format, string::String};
#[cfg(feature = "std")]
use std::string::String;

// Internal dependencies
use crate::primitives::backend::KernelArg;
use crate::primitives::conjecture::Variant;
use crate::primitives::errors::BackendError;

/// Version of the kernel templates; bumped whenever marking semantics change.
pub const KERNEL_VERSION: u32 = 2;

// ============================================================================
// WGSL Templates
// ============================================================================

const PRELUDE: &str = r#"// goldbach kernels v{{VERSION}}
struct Scalar {
    value: u32,
    pad0: u32,
    pad1: u32,
    pad2: u32,
}

fn linear_id(workgroup_id: vec3<u32>, num_workgroups: vec3<u32>, local_index: u32) -> u32 {
    return (workgroup_id.y * num_workgroups.x + workgroup_id.x) * {{WORKGROUP_SIZE}}u + local_index;
}
"#;

const PRIME_SIEVE_TEMPLATE: &str = r#"
@group(0) @binding(0) var<storage, read_write> marks: array<u32>;
@group(0) @binding(1) var<uniform> bound: Scalar;

@compute @workgroup_size({{WORKGROUP_SIZE}})
fn prime_sieve(
    @builtin(workgroup_id) workgroup_id: vec3<u32>,
    @builtin(num_workgroups) num_workgroups: vec3<u32>,
    @builtin(local_invocation_index) local_index: u32,
) {
    let id = linear_id(workgroup_id, num_workgroups, local_index);
    let n = bound.value;
    if (id + 2u >= n) {
        return;
    }
    let factor = id + 2u;
    for (var offset = 2u * factor; offset < n; offset += factor) {
        marks[offset] = 1u;
    }
}
"#;

const SQUARE_SIEVE_TEMPLATE: &str = r#"
@group(0) @binding(0) var<storage, read> primes: array<u32>;
@group(0) @binding(1) var<storage, read_write> outputs: array<u32>;
@group(0) @binding(2) var<uniform> bound: Scalar;

@compute @workgroup_size({{WORKGROUP_SIZE}})
fn square_sieve(
    @builtin(workgroup_id) workgroup_id: vec3<u32>,
    @builtin(num_workgroups) num_workgroups: vec3<u32>,
    @builtin(local_invocation_index) local_index: u32,
) {
    let id = linear_id(workgroup_id, num_workgroups, local_index);
    if (id >= arrayLength(&primes)) {
        return;
    }
    let n = bound.value;
    let prime = primes[id];
    if (prime >= n) {
        return;
    }
    outputs[prime] = 1u;
{{INNER_LOOP}}
}
"#;

const ORIGINAL_INNER_LOOP: &str = r#"    for (var s = 1u; s < n; s += 1u) {
        let candidate = prime + 2u * s * s;
        if (candidate >= n) {
            break;
        }
        outputs[candidate] = 1u;
    }"#;

const TWO_SQUARE_INNER_LOOP: &str = r#"    let room = n - prime;
    for (var s1 = 1u; s1 * s1 + 1u < room; s1 += 1u) {
        for (var s2 = 1u; s2 < n; s2 += 1u) {
            let candidate = prime + s1 * s1 + s2 * s2;
            if (candidate >= n) {
                break;
            }
            outputs[candidate] = 1u;
        }
    }"#;

// ============================================================================
// Kernel
// ============================================================================

/// A marking kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kernel {
    /// Marks every multiple `k·f` (`k ≥ 2`) of every factor `f` in `[2, N)`.
    PrimeSieve,

    /// Marks every integer reachable from a prime under the given variant.
    SquareSieve(Variant),
}

impl Kernel {
    /// Device entry point name.
    pub fn entry_point(&self) -> &'static str {
        match self {
            Self::PrimeSieve => "prime_sieve",
            Self::SquareSieve(_) => "square_sieve",
        }
    }

    /// Number of positional arguments the kernel expects.
    pub fn arity(&self) -> usize {
        match self {
            Self::PrimeSieve => 2,
            Self::SquareSieve(_) => 3,
        }
    }

    /// Resolve positional arguments into named roles.
    ///
    /// The prime sieve takes `[marks, bound]`; the square sieve takes
    /// `[primes, outputs, bound]`.
    pub fn bind<'a, B>(&self, args: &[KernelArg<'a, B>]) -> Result<BoundArgs<'a, B>, BackendError> {
        let mismatch = || {
            BackendError::Dispatch(format!(
                "kernel '{}' expects {} arguments ({}), got {}",
                self.entry_point(),
                self.arity(),
                self.signature(),
                args.len()
            ))
        };

        match (self, args) {
            (Self::PrimeSieve, [KernelArg::Buffer(marks), KernelArg::Scalar(bound)]) => {
                Ok(BoundArgs {
                    primes: None,
                    marks: *marks,
                    bound: *bound,
                })
            }
            (
                Self::SquareSieve(_),
                [
                    KernelArg::Buffer(primes),
                    KernelArg::Buffer(outputs),
                    KernelArg::Scalar(bound),
                ],
            ) => Ok(BoundArgs {
                primes: Some(*primes),
                marks: *outputs,
                bound: *bound,
            }),
            _ => Err(mismatch()),
        }
    }

    fn signature(&self) -> &'static str {
        match self {
            Self::PrimeSieve => "buffer marks, uint bound",
            Self::SquareSieve(_) => "buffer primes, buffer outputs, uint bound",
        }
    }

    /// Execute one work item on the host, reporting every marked index.
    ///
    /// `primes` is ignored by the prime sieve.
    #[inline]
    pub fn run_item(&self, id: u32, primes: &[u32], bound: u32, mark: impl FnMut(u32)) {
        match self {
            Self::PrimeSieve => prime_sieve_item(id, bound, mark),
            Self::SquareSieve(variant) => {
                if let Some(&prime) = primes.get(id as usize) {
                    square_sieve_item(*variant, prime, bound, mark);
                }
            }
        }
    }
}

/// Kernel arguments resolved into their roles.
#[derive(Debug)]
pub struct BoundArgs<'a, B> {
    /// Input prime list (square sieve only).
    pub primes: Option<&'a B>,

    /// Buffer the kernel marks.
    pub marks: &'a B,

    /// Exclusive upper bound of the marked range.
    pub bound: u32,
}

// ============================================================================
// Host Work Items
// ============================================================================

/// Prime sieve work item: factor `id + 2` marks `2f, 3f, 4f, …` below `bound`.
#[inline]
pub fn prime_sieve_item(id: u32, bound: u32, mut mark: impl FnMut(u32)) {
    let factor = id.saturating_add(2);
    if factor >= bound {
        return;
    }
    let mut offset = 2 * factor;
    while offset < bound {
        mark(offset);
        offset += factor;
    }
}

/// Square sieve work item for a single prime.
#[inline]
pub fn square_sieve_item(variant: Variant, prime: u32, bound: u32, mut mark: impl FnMut(u32)) {
    if prime >= bound {
        return;
    }
    // A prime is trivially itself plus zero.
    mark(prime);

    match variant {
        Variant::Original => {
            let mut s = 1u32;
            loop {
                let candidate = prime + 2 * s * s;
                if candidate >= bound {
                    break;
                }
                mark(candidate);
                s += 1;
            }
        }
        Variant::TwoSquare => {
            // Stop once even `s2 = 1` would leave the range.
            let room = bound - prime;
            let mut s1 = 1u32;
            while s1 * s1 + 1 < room {
                let mut s2 = 1u32;
                loop {
                    let candidate = prime + s1 * s1 + s2 * s2;
                    if candidate >= bound {
                        break;
                    }
                    mark(candidate);
                    s2 += 1;
                }
                s1 += 1;
            }
        }
    }
}

// ============================================================================
// Kernel Source
// ============================================================================

/// Rendered kernel source, ready to hand to a backend compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelSource {
    /// Kernel this source implements.
    pub kernel: Kernel,

    /// Work-group size baked into the source.
    pub work_group_size: u32,

    /// Template version.
    pub version: u32,

    /// WGSL text.
    pub text: String,
}

impl KernelSource {
    /// Render the template for `kernel` with a fixed work-group size.
    pub fn render(kernel: Kernel, work_group_size: u32) -> Self {
        let body = match kernel {
            Kernel::PrimeSieve => String::from(PRIME_SIEVE_TEMPLATE),
            Kernel::SquareSieve(variant) => {
                let inner = match variant {
                    Variant::Original => ORIGINAL_INNER_LOOP,
                    Variant::TwoSquare => TWO_SQUARE_INNER_LOOP,
                };
                SQUARE_SIEVE_TEMPLATE.replace("{{INNER_LOOP}}", inner)
            }
        };

        let mut text = String::with_capacity(PRELUDE.len() + body.len());
        text.push_str(PRELUDE);
        text.push_str(&body);

        let text = text
            .replace("{{VERSION}}", &format!("{KERNEL_VERSION}"))
            .replace("{{WORKGROUP_SIZE}}", &format!("{work_group_size}"));

        Self {
            kernel,
            work_group_size,
            version: KERNEL_VERSION,
            text,
        }
    }

    /// Device entry point name.
    pub fn entry_point(&self) -> &'static str {
        self.kernel.entry_point()
    }
}
