//! Per-operator parallelization descriptors
//!
//! A [`ParallelConfig`] records how one operator's work is spread across the
//! device pool: the number of partitions along each tensor axis, and the
//! device assigned to each resulting partition. Configs are built when a
//! strategy file is parsed or when a single-axis default is synthesized, and
//! are immutable once bound to an operator name.

use crate::limits::{MAX_DIM, MAX_NUM_WORKERS};
use crate::{DeviceId, Result, StratumError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Placement descriptor for one operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// Partition count along each tensor axis; at most [`MAX_DIM`] entries,
    /// each positive. The bound is enforced by [`validate`](Self::validate),
    /// never by silent truncation.
    pub dims: Vec<usize>,
    /// Device assigned to each partition, in row-major partition order. The
    /// length must equal the product of `dims`.
    pub devices: Vec<DeviceId>,
}

impl ParallelConfig {
    pub fn new(dims: Vec<usize>, devices: Vec<DeviceId>) -> Self {
        Self { dims, devices }
    }

    /// The deterministic single-axis default: `device_count` partitions along
    /// one axis, assigned to devices `0..device_count` in order.
    ///
    /// Pure function of its argument, so identical inputs always produce
    /// identical configs (required for reproducible runs).
    pub fn data_parallel(device_count: usize) -> Self {
        Self {
            dims: vec![device_count],
            devices: (0..device_count).map(DeviceId::new).collect(),
        }
    }

    /// Total number of partitions, i.e. the product of all axis counts.
    pub fn degree(&self) -> usize {
        self.dims.iter().product()
    }

    /// Check every placement invariant against a device pool of
    /// `device_pool` ids.
    ///
    /// Violations are reported, never coerced: the config is valid iff the
    /// axis count is within `1..=MAX_DIM`, every axis count is positive, the
    /// partition count equals the number of listed devices and does not
    /// exceed [`MAX_NUM_WORKERS`], and the listed device ids are pairwise
    /// distinct and all below `device_pool`.
    pub fn validate(&self, device_pool: usize) -> Result<()> {
        if self.dims.is_empty() || self.dims.len() > MAX_DIM {
            return Err(StratumError::validation(format!(
                "dimension count {} outside 1..={}",
                self.dims.len(),
                MAX_DIM
            )));
        }
        for (axis, &dim) in self.dims.iter().enumerate() {
            if dim == 0 {
                return Err(StratumError::validation(format!(
                    "partition count along axis {} must be positive",
                    axis
                )));
            }
        }
        let degree = self
            .dims
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
            .ok_or_else(|| StratumError::validation("dimension product overflows"))?;
        if degree != self.devices.len() {
            return Err(StratumError::validation(format!(
                "{} partitions but {} device ids listed",
                degree,
                self.devices.len()
            )));
        }
        if degree > MAX_NUM_WORKERS {
            return Err(StratumError::validation(format!(
                "config spans {} devices, limit is {}",
                degree, MAX_NUM_WORKERS
            )));
        }
        for (slot, &id) in self.devices.iter().enumerate() {
            if id.get() >= device_pool {
                return Err(StratumError::validation(format!(
                    "device {} outside pool of size {}",
                    id, device_pool
                )));
            }
            if self.devices[..slot].contains(&id) {
                return Err(StratumError::validation(format!(
                    "device {} assigned more than once",
                    id
                )));
            }
        }
        Ok(())
    }

    /// Strict weak ordering over configs: fewer axes sort earlier, then axis
    /// counts compare lexicographically. Device assignment is *not* part of
    /// the key, so `Equal` means equivalent under this order, not identical —
    /// which is why this is a named comparison rather than an `Ord` impl.
    pub fn partition_cmp(&self, other: &Self) -> Ordering {
        self.dims
            .len()
            .cmp(&other.dims.len())
            .then_with(|| self.dims.cmp(&other.dims))
    }
}

// ============================================================================
// Tests
// ============================================================================
