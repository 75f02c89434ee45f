//! Kernel launch geometry
//!
//! Elementwise kernels dispatch over a 1-D grid computed here. Kernel bodies
//! iterate with a grid-stride loop, so clamping the grid at
//! [`BLOCK_SIZE_LIMIT`] affects throughput only, never coverage.

use serde::{Deserialize, Serialize};
use stratum_types::{BLOCK_SIZE_LIMIT, THREADS_PER_BLOCK};

/// Number of thread blocks needed to cover `element_count` elements, clamped
/// to [`BLOCK_SIZE_LIMIT`].
///
/// Zero elements still dispatch one block whose grid-stride loop does no
/// iterations; a zero-sized grid is not a valid launch.
pub fn block_count(element_count: usize) -> u32 {
    let blocks = element_count
        .div_ceil(THREADS_PER_BLOCK as usize)
        .max(1);
    blocks.min(BLOCK_SIZE_LIMIT as usize) as u32
}

/// 1-D launch geometry for an elementwise kernel.
///
/// Plain data, independent of any driver crate, so geometry is testable on
/// hosts without a GPU; the CUDA backend converts it at the launch site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchDims {
    /// Blocks in the grid
    pub grid: u32,
    /// Threads per block
    pub block: u32,
}

impl LaunchDims {
    pub fn for_elements(element_count: usize) -> Self {
        Self {
            grid: block_count(element_count),
            block: THREADS_PER_BLOCK,
        }
    }
}

#[cfg(feature = "cuda")]
impl From<LaunchDims> for cudarc::driver::LaunchConfig {
    fn from(dims: LaunchDims) -> Self {
        Self {
            grid_dim: (dims.grid, 1, 1),
            block_dim: (dims.block, 1, 1),
            shared_mem_bytes: 0,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_count_rounds_up() {
        assert_eq!(block_count(0), 1);
        assert_eq!(block_count(1), 1);
        assert_eq!(block_count(1024), 1);
        assert_eq!(block_count(1025), 2);
        assert_eq!(block_count(2_000_000), 1954);
    }

    #[test]
    fn test_block_count_clamps_at_grid_limit() {
        let full = BLOCK_SIZE_LIMIT as usize * THREADS_PER_BLOCK as usize;
        assert_eq!(block_count(full), BLOCK_SIZE_LIMIT);
        // one element past the boundary still clamps
        assert_eq!(block_count(full + 1), BLOCK_SIZE_LIMIT);
    }

    #[test]
    fn test_launch_dims_use_fixed_block_size() {
        let dims = LaunchDims::for_elements(4096);
        assert_eq!(dims.block, THREADS_PER_BLOCK);
        assert_eq!(dims.grid, 4);
    }
}
