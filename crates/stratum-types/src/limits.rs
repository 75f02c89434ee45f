//! Process-wide runtime limits
//!
//! Compile-time configuration constants shared by every Stratum crate. None
//! of these are mutable at runtime.

/// Maximum number of partition axes in a [`crate::ParallelConfig`]
pub const MAX_DIM: usize = 4;

/// Maximum number of devices a single operator may span
pub const MAX_NUM_WORKERS: usize = 16;

/// Maximum length of an operator name in a strategy file
pub const MAX_OPNAME: usize = 64;

/// Threads per block for elementwise kernel launches (requires sm_2x or above)
pub const THREADS_PER_BLOCK: u32 = 1024;

/// Upper bound on the 1-D launch grid; grid-stride loops cover the remainder
pub const BLOCK_SIZE_LIMIT: u32 = 32768;
