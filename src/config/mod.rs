//! Runner configuration.
//!
//! Values come from three layers, later layers winning:
//!
//! 1. built-in defaults,
//! 2. a TOML file (`--config <FILE>` or `./batchmap.toml`),
//! 3. command line flags.
//!
//! ```toml
//! batch_size = 500
//! jobs = 8
//! parallel = true
//! compression_level = 6
//! ```

mod loader;

pub use loader::{load_config, parse_config, DEFAULT_CONFIG_FILE};

use crate::errors::{Result, RunError};
use serde::{Deserialize, Serialize};

/// Default number of identifiers per batch
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Default gzip level (flate2's `Compression::default()`)
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_parallel() -> bool {
    true
}

fn default_compression_level() -> u32 {
    DEFAULT_COMPRESSION_LEVEL
}

/// Configuration shared by the runner and the executor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    /// Identifiers per batch (default: 1000)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Worker threads for the parallel executor (0 = one per core)
    #[serde(default)]
    pub jobs: usize,

    /// Map batches on a rayon pool; when false the batch is mapped in-thread
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// gzip level, 0 (store) to 9 (best)
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            jobs: 0,
            parallel: default_parallel(),
            compression_level: default_compression_level(),
        }
    }
}

impl RunnerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level;
        self
    }

    /// Config that maps every batch on the calling thread.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Default::default()
        }
    }

    /// Effective worker count, resolving `jobs = 0` to the core count.
    pub fn effective_jobs(&self) -> usize {
        if self.jobs == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        } else {
            self.jobs
        }
    }

    /// Reject values the runner cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(RunError::config("batch_size must be greater than zero"));
        }
        if self.compression_level > 9 {
            return Err(RunError::config(format!(
                "compression_level must be between 0 and 9, got {}",
                self.compression_level
            )));
        }
        Ok(())
    }
}
