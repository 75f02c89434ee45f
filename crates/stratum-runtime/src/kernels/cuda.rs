//! CUDA backend
//!
//! Kernels are embedded as CUDA C, compiled with NVRTC when the context is
//! created, and launched over a clamped 1-D grid. Every kernel body uses a
//! grid-stride loop, so the [`crate::launch`] clamp never loses elements.
//!
//! Context creation and module compilation are setup-phase calls and report
//! recoverable [`StratumError::Device`] errors; once dispatch begins, every
//! driver status goes through [`crate::fault`] and a non-success status
//! terminates the process.

use crate::fault::{check_device, unrecoverable};
use crate::kernels::{format_tensor, KernelBackend};
use crate::launch::LaunchDims;
use cudarc::driver::{CudaDevice, CudaFunction, CudaSlice, LaunchAsync, LaunchConfig};
use cudarc::nvrtc::compile_ptx;
use std::sync::Arc;
use stratum_types::{Result, StratumError};
use tracing::info;

const MODULE_NAME: &str = "stratum_kernels";

const KERNEL_NAMES: &[&str] = &[
    "fill_kernel",
    "ones_kernel",
    "scale_kernel",
    "relu_backward_kernel",
    "accumulate_scaled_kernel",
    "gradient_average_update_kernel",
];

const KERNEL_SOURCE: &str = r#"
#define GRID_STRIDE_LOOP(i, n) \
    for (int i = blockIdx.x * blockDim.x + threadIdx.x; i < (n); \
         i += blockDim.x * gridDim.x)

extern "C" {

__global__ void fill_kernel(float* __restrict__ buf, int n, float value) {
    GRID_STRIDE_LOOP(i, n) {
        buf[i] = value;
    }
}

__global__ void ones_kernel(float* __restrict__ buf, int n) {
    GRID_STRIDE_LOOP(i, n) {
        buf[i] = 1.0f;
    }
}

__global__ void scale_kernel(float* __restrict__ buf, int n, float lo, float hi) {
    GRID_STRIDE_LOOP(i, n) {
        buf[i] = buf[i] * (hi - lo) + lo;
    }
}

__global__ void relu_backward_kernel(float* __restrict__ grad,
                                     const float* __restrict__ activations, int n) {
    GRID_STRIDE_LOOP(i, n) {
        if (activations[i] <= 0.0f) {
            grad[i] = 0.0f;
        }
    }
}

__global__ void accumulate_scaled_kernel(float* __restrict__ data,
                                         const float* __restrict__ grad,
                                         int n, float scale) {
    GRID_STRIDE_LOOP(i, n) {
        data[i] += grad[i] * scale;
    }
}

__global__ void gradient_average_update_kernel(float* __restrict__ params,
                                               const float* __restrict__ grads,
                                               int replica_size, int num_replica,
                                               float lr) {
    GRID_STRIDE_LOOP(i, replica_size) {
        float sum = 0.0f;
        for (int r = 0; r < num_replica; r++) {
            sum += grads[r * replica_size + i];
        }
        params[i] += lr * sum / (float)num_replica;
    }
}

}
"#;

/// Elementwise kernels on one CUDA device.
pub struct CudaKernels {
    device: Arc<CudaDevice>,
}

impl CudaKernels {
    /// Create a context on device `ordinal` and compile the kernel module.
    pub fn new(ordinal: usize) -> Result<Self> {
        let device = CudaDevice::new(ordinal).map_err(|err| {
            StratumError::device(format!(
                "context creation on device {} failed: {}",
                ordinal, err
            ))
        })?;
        let ptx = compile_ptx(KERNEL_SOURCE)
            .map_err(|err| StratumError::device(format!("kernel compilation failed: {}", err)))?;
        device.load_ptx(ptx, MODULE_NAME, KERNEL_NAMES).map_err(|err| {
            StratumError::device(format!("kernel module load failed: {}", err))
        })?;
        info!(ordinal, "CUDA kernel module loaded");
        Ok(Self { device })
    }

    pub fn device(&self) -> &Arc<CudaDevice> {
        &self.device
    }

    /// Allocate a zeroed device buffer. Setup-phase call, recoverable.
    pub fn alloc_zeros(&self, len: usize) -> Result<CudaSlice<f32>> {
        self.device
            .alloc_zeros::<f32>(len)
            .map_err(|err| StratumError::device(format!("device allocation failed: {}", err)))
    }

    /// Copy host data into a new device buffer. Setup-phase call, recoverable.
    pub fn upload(&self, host: &[f32]) -> Result<CudaSlice<f32>> {
        self.device
            .htod_sync_copy(host)
            .map_err(|err| StratumError::device(format!("host-to-device copy failed: {}", err)))
    }

    fn func(&self, name: &str) -> CudaFunction {
        match self.device.get_func(MODULE_NAME, name) {
            Some(func) => func,
            // the module was validated at load; a missing function is
            // corruption of the loaded context
            None => unrecoverable(name, "device API", &"kernel missing from loaded module"),
        }
    }
}

impl KernelBackend for CudaKernels {
    type Buffer = CudaSlice<f32>;

    fn fill(&self, buf: &mut CudaSlice<f32>, n: usize, value: f32) {
        let cfg: LaunchConfig = LaunchDims::for_elements(n).into();
        let func = self.func("fill_kernel");
        unsafe {
            check_device(func.launch(cfg, (&mut *buf, n as i32, value)));
        }
    }

    fn ones(&self, buf: &mut CudaSlice<f32>, n: usize) {
        let cfg: LaunchConfig = LaunchDims::for_elements(n).into();
        let func = self.func("ones_kernel");
        unsafe {
            check_device(func.launch(cfg, (&mut *buf, n as i32)));
        }
    }

    fn scale(&self, buf: &mut CudaSlice<f32>, n: usize, lo: f32, hi: f32) {
        let cfg: LaunchConfig = LaunchDims::for_elements(n).into();
        let func = self.func("scale_kernel");
        unsafe {
            check_device(func.launch(cfg, (&mut *buf, n as i32, lo, hi)));
        }
    }

    fn relu_backward(&self, grad: &mut CudaSlice<f32>, activations: &CudaSlice<f32>, n: usize) {
        let cfg: LaunchConfig = LaunchDims::for_elements(n).into();
        let func = self.func("relu_backward_kernel");
        unsafe {
            check_device(func.launch(cfg, (&mut *grad, activations, n as i32)));
        }
    }

    fn accumulate_scaled(
        &self,
        data: &mut CudaSlice<f32>,
        grad: &CudaSlice<f32>,
        n: usize,
        scale: f32,
    ) {
        let cfg: LaunchConfig = LaunchDims::for_elements(n).into();
        let func = self.func("accumulate_scaled_kernel");
        unsafe {
            check_device(func.launch(cfg, (&mut *data, grad, n as i32, scale)));
        }
    }

    fn gradient_average_update(
        &self,
        params: &mut CudaSlice<f32>,
        grads: &CudaSlice<f32>,
        replica_size: usize,
        num_replica: usize,
        lr: f32,
    ) {
        let cfg: LaunchConfig = LaunchDims::for_elements(replica_size).into();
        let func = self.func("gradient_average_update_kernel");
        unsafe {
            check_device(func.launch(
                cfg,
                (
                    &mut *params,
                    grads,
                    replica_size as i32,
                    num_replica as i32,
                    lr,
                ),
            ));
        }
    }

    fn dump_tensor(&self, buf: &CudaSlice<f32>, shape: &[usize], label: &str) {
        let volume: usize = shape.iter().product();
        // full device barrier so the staged values reflect all issued work
        check_device(self.device.synchronize());
        let host: Vec<f32> = check_device(self.device.dtoh_sync_copy(buf));
        print!("{}", format_tensor(&host[..volume], label));
    }
}
