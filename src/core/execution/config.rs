//! Configuration for simulation runs
//!
//! A [`SimulationConfig`] is threaded into every event processor at
//! construction. Nothing here is global, so sequential or parallel runs never
//! contend over shared settings.

use crate::core::errors::{SimResult, SimulationError};
use crate::core::types::SimTime;
use serde::{Deserialize, Serialize};

/// One simulated day, in seconds
pub const DEFAULT_MAX_RUNTIME: SimTime = 24.0 * 60.0 * 60.0;

/// Settings consumed by the event processor for a single run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Hard simulation-time ceiling; the automatic stop event fires here
    pub max_runtime: SimTime,
    /// Report unconsumed events when a run stops
    pub debug: bool,
}

impl SimulationConfig {
    /// Create a configuration with one simulated day and diagnostics off
    pub fn new() -> Self {
        Self {
            max_runtime: DEFAULT_MAX_RUNTIME,
            debug: false,
        }
    }

    pub fn with_max_runtime(mut self, max_runtime: SimTime) -> Self {
        self.max_runtime = max_runtime;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        if !self.max_runtime.is_finite() || self.max_runtime <= 0.0 {
            return Err(SimulationError::InvalidConfig(format!(
                "max runtime must be a positive, finite time, got {}",
                self.max_runtime
            )));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Enumeration of supported concurrency modes for replicated runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConcurrencyMode {
    /// Runs execute one after another on the calling thread
    #[default]
    Sequential,
    /// Runs are spread over a Rayon thread pool
    Rayon,
}

/// Configuration for a batch of independent runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplicationConfig {
    /// Number of independent runs
    pub runs: usize,
    /// Seed of run 0; run `i` is seeded with `base_seed + i`
    pub base_seed: u64,
    pub concurrency_mode: ConcurrencyMode,
    /// The size of the thread pool for parallel execution
    /// Only relevant when concurrency_mode is Rayon
    pub thread_pool_size: Option<usize>,
}

impl ReplicationConfig {
    pub fn new(runs: usize) -> Self {
        Self {
            runs,
            base_seed: 0,
            concurrency_mode: ConcurrencyMode::default(),
            thread_pool_size: None,
        }
    }

    pub fn with_base_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    /// # Note
    /// This setting only affects execution when concurrency_mode is Rayon
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }

    pub fn seed_for(&self, run_index: usize) -> u64 {
        self.base_seed.wrapping_add(run_index as u64)
    }
}

impl Default for ReplicationConfig {
    fn default() -> Self {
        Self::new(1)
    }
}
