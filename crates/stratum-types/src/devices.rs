//! Device identifier type

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a single worker device (GPU) in the cluster pool.
///
/// This is a thin newtype wrapper around `usize`. Device ids are dense,
/// start at 0, and are bounded by `num_nodes * workers_per_node` for the
/// running cluster; a strategy referencing an id at or beyond that bound
/// fails validation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeviceId(pub usize);

impl DeviceId {
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

impl From<usize> for DeviceId {
    fn from(value: usize) -> Self {
        DeviceId(value)
    }
}

impl From<DeviceId> for usize {
    fn from(value: DeviceId) -> Self {
        value.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
