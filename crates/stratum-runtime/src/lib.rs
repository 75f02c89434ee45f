//! Runtime configuration and device kernel dispatch for Stratum
//!
//! This crate aggregates the process-wide [`RuntimeConfig`], computes kernel
//! launch geometry, and dispatches elementwise device kernels under a strict
//! fail-fast contract: a device command-stream fault terminates the process
//! rather than risking silently corrupt results.

pub mod config;
pub mod context;
pub mod fault;
pub mod kernels;
pub mod launch;

pub use config::RuntimeConfig;
pub use context::HostContext;
#[cfg(feature = "cuda")]
pub use kernels::cuda::CudaKernels;
pub use kernels::{CpuKernels, KernelBackend};
pub use launch::{block_count, LaunchDims};
