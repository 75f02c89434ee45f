//! Operator-name to placement mapping

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use stratum_types::ParallelConfig;

/// Ordered mapping from operator name to its placement.
///
/// Populated once during single-threaded startup — either from a strategy
/// file or by the scheduler registering defaults — and read-only for the
/// remainder of the run, which makes unsynchronized concurrent lookups safe.
/// Iteration order is deterministic (sorted by name); the canonical file
/// order is applied at serialization time, see [`crate::file`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyStore {
    entries: BTreeMap<String, ParallelConfig>,
}

impl StrategyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Placement for `name`, if one was registered. Absence is not an error;
    /// the caller substitutes a default.
    pub fn lookup(&self, name: &str) -> Option<&ParallelConfig> {
        self.entries.get(name)
    }

    /// Register a placement, returning the previous one for `name` if any.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        config: ParallelConfig,
    ) -> Option<ParallelConfig> {
        self.entries.insert(name.into(), config)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParallelConfig)> {
        self.entries.iter().map(|(name, config)| (name.as_str(), config))
    }
}

// ============================================================================
// Tests
// ============================================================================
