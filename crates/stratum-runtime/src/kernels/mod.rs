//! Elementwise device kernels
//!
//! The dispatch contract: each call is a stateless transaction that either
//! completes or terminates the process through [`crate::fault`]. There is no
//! degraded state in between, so none of these methods return errors.

use std::fmt::Write as _;

pub mod cpu;
#[cfg(feature = "cuda")]
pub mod cuda;

pub use cpu::CpuKernels;
#[cfg(feature = "cuda")]
pub use cuda::CudaKernels;

/// Elementwise kernel surface shared by every backend.
///
/// `Buffer` is the backend's device-resident storage for `f32` elements.
/// All operations cover the first `n` elements of their buffers.
pub trait KernelBackend {
    type Buffer;

    /// `buf[i] = value`
    fn fill(&self, buf: &mut Self::Buffer, n: usize, value: f32);

    /// `buf[i] = 1.0`
    fn ones(&self, buf: &mut Self::Buffer, n: usize);

    /// Affine rescale: `buf[i] = buf[i] * (hi - lo) + lo`, mapping values in
    /// `[0, 1]` into `[lo, hi]`.
    fn scale(&self, buf: &mut Self::Buffer, n: usize, lo: f32, hi: f32);

    /// Zero the gradient wherever the forward activation was not positive:
    /// `grad[i] = activations[i] > 0 ? grad[i] : 0`
    fn relu_backward(&self, grad: &mut Self::Buffer, activations: &Self::Buffer, n: usize);

    /// `data[i] += grad[i] * scale`
    fn accumulate_scaled(&self, data: &mut Self::Buffer, grad: &Self::Buffer, n: usize, scale: f32);

    /// Average the replica gradients and apply them:
    /// `params[i] += lr * mean over r of grads[r * replica_size + i]`
    fn gradient_average_update(
        &self,
        params: &mut Self::Buffer,
        grads: &Self::Buffer,
        replica_size: usize,
        num_replica: usize,
        lr: f32,
    );

    /// Diagnostics-only verification primitive: drain all outstanding device
    /// work, copy `buf` to the host, and print it in row-major order with
    /// `label` as prefix. Stalls the calling thread until the device is idle;
    /// never put this on a hot path.
    fn dump_tensor(&self, buf: &Self::Buffer, shape: &[usize], label: &str);
}

/// Row-major rendering shared by every backend's `dump_tensor`.
pub fn format_tensor(values: &[f32], label: &str) -> String {
    let mut out = String::with_capacity(label.len() + values.len() * 8 + 2);
    out.push_str(label);
    for value in values {
        let _ = write!(out, " {:.4}", value);
    }
    out.push('\n');
    out
}

// ============================================================================
// Tests
// ============================================================================
