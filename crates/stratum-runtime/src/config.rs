//! Process-wide runtime configuration

use crate::context::HostContext;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stratum_strategy::{file, StrategyStore};
use stratum_types::{ParallelConfig, Result};
use tracing::debug;

/// Aggregated configuration for one run.
///
/// Constructed once at process startup. The strategy store is mutated only
/// during the single-threaded load phase ([`Self::load_strategy_file`]);
/// afterwards the whole struct is read-only, which makes unsynchronized
/// concurrent [`Self::resolve_config`] calls safe. Reloading strategies
/// while concurrent readers exist is the caller's bug, not supported here.
#[derive(Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Number of training epochs (consumed by the external scheduler)
    pub epochs: usize,
    /// Global batch size (consumed by the external scheduler)
    pub batch_size: usize,
    /// Iterations per epoch (consumed by the external scheduler)
    pub num_iterations: usize,
    /// Metric print frequency in iterations
    pub print_freq: usize,
    /// Input image height
    pub input_height: usize,
    /// Input image width
    pub input_width: usize,
    /// Number of nodes in the cluster
    pub num_nodes: usize,
    /// Worker devices per node
    pub workers_per_node: usize,
    /// Dataset loader processes per node
    pub loaders_per_node: usize,
    /// Optimizer learning rate
    pub learning_rate: f32,
    /// Optimizer weight decay
    pub weight_decay: f32,
    /// Per-device scratch workspace budget in bytes
    pub workspace_size: usize,
    /// Use synthetic input instead of the dataset
    pub synthetic_input: bool,
    /// Enable per-operator profiling
    pub profiling: bool,
    /// Dataset location, if any
    pub dataset_path: Option<PathBuf>,
    /// Strategy file to load at startup, if any
    pub strategy_file: Option<PathBuf>,
    /// Per-operator placement strategies
    pub strategies: StrategyStore,
    /// Handle to the externally-owned host execution context
    #[serde(skip)]
    pub context: Option<Arc<dyn HostContext>>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            epochs: 1,
            batch_size: 64,
            num_iterations: 1,
            print_freq: 10,
            input_height: 224,
            input_width: 224,
            num_nodes: 1,
            workers_per_node: 1,
            loaders_per_node: 1,
            learning_rate: 0.01,
            weight_decay: 0.0001,
            workspace_size: 1024 * 1024 * 1024, // 1 GiB
            synthetic_input: false,
            profiling: false,
            dataset_path: None,
            strategy_file: None,
            strategies: StrategyStore::new(),
            context: None,
        }
    }
}

impl RuntimeConfig {
    /// Size of the device id pool: every id referenced by a stored placement
    /// must be below this.
    pub fn device_pool(&self) -> usize {
        self.num_nodes * self.workers_per_node
    }

    /// Load the strategy file configured at construction, if one was set.
    pub fn init_strategies(&mut self) -> Result<()> {
        match self.strategy_file.clone() {
            Some(path) => self.load_strategy_file(path),
            None => Ok(()),
        }
    }

    /// Replace the strategy store with the contents of `path`.
    ///
    /// Transactional: on any I/O, parse, or validation failure the existing
    /// store is left untouched and the error is returned, so the caller can
    /// keep running on the previous (or default) strategies.
    pub fn load_strategy_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let loaded = file::load(path, self.device_pool())?;
        self.strategies = loaded;
        Ok(())
    }

    /// Persist the current store in canonical order.
    pub fn save_strategy_file(&self, path: impl AsRef<Path>) -> Result<()> {
        file::save(&self.strategies, path)
    }

    /// Placement for `name`, falling back to the 1-D data-parallel default
    /// over devices `0..default_device_count`.
    ///
    /// Pure: with an unchanged store, identical inputs always return
    /// identical configs.
    pub fn resolve_config(&self, name: &str, default_device_count: usize) -> ParallelConfig {
        match self.strategies.lookup(name) {
            Some(config) => config.clone(),
            None => {
                debug!(
                    operator = name,
                    devices = default_device_count,
                    "no stored strategy, synthesizing data-parallel default"
                );
                ParallelConfig::data_parallel(default_device_count)
            }
        }
    }
}

impl fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("epochs", &self.epochs)
            .field("batch_size", &self.batch_size)
            .field("num_nodes", &self.num_nodes)
            .field("workers_per_node", &self.workers_per_node)
            .field("strategies", &self.strategies.len())
            .field("context", &self.context.as_deref().map(|ctx| ctx.name()))
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
