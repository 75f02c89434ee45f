//! Host reference backend
//!
//! Defines the numeric contract each kernel must satisfy; the CUDA backend
//! matches these semantics exactly. This is also what the test suite runs
//! against on hosts without a GPU.

use crate::kernels::{format_tensor, KernelBackend};

/// Elementwise kernels over host memory.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpuKernels;

impl CpuKernels {
    pub fn new() -> Self {
        Self
    }
}

impl KernelBackend for CpuKernels {
    type Buffer = Vec<f32>;

    fn fill(&self, buf: &mut Vec<f32>, n: usize, value: f32) {
        for slot in &mut buf[..n] {
            *slot = value;
        }
    }

    fn ones(&self, buf: &mut Vec<f32>, n: usize) {
        self.fill(buf, n, 1.0);
    }

    fn scale(&self, buf: &mut Vec<f32>, n: usize, lo: f32, hi: f32) {
        for slot in &mut buf[..n] {
            *slot = *slot * (hi - lo) + lo;
        }
    }

    fn relu_backward(&self, grad: &mut Vec<f32>, activations: &Vec<f32>, n: usize) {
        for (g, &a) in grad[..n].iter_mut().zip(&activations[..n]) {
            if a <= 0.0 {
                *g = 0.0;
            }
        }
    }

    fn accumulate_scaled(&self, data: &mut Vec<f32>, grad: &Vec<f32>, n: usize, scale: f32) {
        for (d, &g) in data[..n].iter_mut().zip(&grad[..n]) {
            *d += g * scale;
        }
    }

    fn gradient_average_update(
        &self,
        params: &mut Vec<f32>,
        grads: &Vec<f32>,
        replica_size: usize,
        num_replica: usize,
        lr: f32,
    ) {
        for i in 0..replica_size {
            let mut sum = 0.0f32;
            for replica in 0..num_replica {
                sum += grads[replica * replica_size + i];
            }
            params[i] += lr * sum / num_replica as f32;
        }
    }

    fn dump_tensor(&self, buf: &Vec<f32>, shape: &[usize], label: &str) {
        let volume: usize = shape.iter().product();
        print!("{}", format_tensor(&buf[..volume], label));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_covers_only_first_n() {
        let kernels = CpuKernels::new();
        let mut buf = vec![0.0; 4];
        kernels.fill(&mut buf, 3, 2.5);
        assert_eq!(buf, vec![2.5, 2.5, 2.5, 0.0]);
    }

    #[test]
    fn test_ones() {
        let kernels = CpuKernels::new();
        let mut buf = vec![0.0; 3];
        kernels.ones(&mut buf, 3);
        assert_eq!(buf, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_scale_maps_unit_interval() {
        let kernels = CpuKernels::new();
        let mut buf = vec![0.0, 0.5, 1.0];
        kernels.scale(&mut buf, 3, -2.0, 2.0);
        assert_eq!(buf, vec![-2.0, 0.0, 2.0]);
    }

    #[test]
    fn test_relu_backward_zeroes_inactive_lanes() {
        let kernels = CpuKernels::new();
        let mut grad = vec![0.3, 0.4, 0.5, 0.6];
        let activations = vec![1.0, 0.0, -1.0, 2.0];
        kernels.relu_backward(&mut grad, &activations, 4);
        assert_eq!(grad, vec![0.3, 0.0, 0.0, 0.6]);
    }

    #[test]
    fn test_accumulate_scaled() {
        let kernels = CpuKernels::new();
        let mut data = vec![1.0, 2.0];
        let grad = vec![10.0, 20.0];
        kernels.accumulate_scaled(&mut data, &grad, 2, 0.1);
        assert_eq!(data, vec![2.0, 4.0]);
    }

    #[test]
    fn test_dump_tensor_covers_the_shape_volume_only() {
        let kernels = CpuKernels::new();
        // buffer longer than the described shape; only the first 4 print
        let buf = vec![1.0, 2.0, 3.0, 4.0, 9.0];
        kernels.dump_tensor(&buf, &[2, 2], "dump:");
    }

    #[test]
    fn test_gradient_average_update_averages_replicas() {
        let kernels = CpuKernels::new();
        let mut params = vec![1.0, 1.0];
        // two replicas of size two: [2, 4] and [6, 8]; means are [4, 6]
        let grads = vec![2.0, 4.0, 6.0, 8.0];
        kernels.gradient_average_update(&mut params, &grads, 2, 2, 0.5);
        assert_eq!(params, vec![3.0, 4.0]);
    }
}
