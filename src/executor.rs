//! Parallel-apply capability.
//!
//! The runner never spawns threads itself. It hands each batch to a
//! [`ParallelApply`] implementation, which applies a function to every
//! identifier and blocks until the whole batch is done. Results always come
//! back in input order.
//!
//! - [`RayonApply`]: dedicated rayon thread pool
//! - [`SequentialApply`]: calling thread only
//! - [`Executor`]: either of the above, chosen from [`RunnerConfig`]

use crate::config::RunnerConfig;
use crate::errors::Result;
use rayon::prelude::*;
use std::fmt;

/// A failed application, paired with the batch-relative position of the
/// identifier it failed on.
#[derive(Debug)]
pub struct MapFailure {
    pub position: usize,
    pub source: anyhow::Error,
}

impl fmt::Display for MapFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item {} failed: {:#}", self.position, self.source)
    }
}

/// Apply a function to every identifier of a batch.
///
/// Implementations must call `f` exactly once per identifier unless a
/// failure stops the batch early, and return the results in batch order.
pub trait ParallelApply: Send + Sync {
    fn apply<I, T, F>(&self, batch: &[I], f: F) -> std::result::Result<Vec<T>, MapFailure>
    where
        I: Sync,
        T: Send,
        F: Fn(&I) -> anyhow::Result<T> + Sync + Send;
}

/// Maps a batch on the calling thread, stopping at the first failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialApply;

impl ParallelApply for SequentialApply {
    fn apply<I, T, F>(&self, batch: &[I], f: F) -> std::result::Result<Vec<T>, MapFailure>
    where
        I: Sync,
        T: Send,
        F: Fn(&I) -> anyhow::Result<T> + Sync + Send,
    {
        batch
            .iter()
            .enumerate()
            .map(|(position, item)| f(item).map_err(|source| MapFailure { position, source }))
            .collect()
    }
}

/// Maps a batch across a dedicated rayon thread pool.
pub struct RayonApply {
    pool: rayon::ThreadPool,
}

impl RayonApply {
    /// Build a pool with `threads` workers (0 lets rayon pick one per core).
    pub fn new(threads: usize) -> Result<Self> {
        let mut builder =
            rayon::ThreadPoolBuilder::new().thread_name(|i| format!("batchmap-worker-{i}"));
        if threads > 0 {
            builder = builder.num_threads(threads);
        }
        Ok(Self {
            pool: builder.build()?,
        })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl fmt::Debug for RayonApply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RayonApply")
            .field("threads", &self.threads())
            .finish()
    }
}

impl ParallelApply for RayonApply {
    fn apply<I, T, F>(&self, batch: &[I], f: F) -> std::result::Result<Vec<T>, MapFailure>
    where
        I: Sync,
        T: Send,
        F: Fn(&I) -> anyhow::Result<T> + Sync + Send,
    {
        // Indexed collect keeps input order; on failure rayon stops handing
        // out new items and returns one of the errors.
        self.pool.install(|| {
            batch
                .par_iter()
                .enumerate()
                .map(|(position, item)| f(item).map_err(|source| MapFailure { position, source }))
                .collect()
        })
    }
}

/// Executor selected at runtime from configuration.
#[derive(Debug)]
pub enum Executor {
    Sequential(SequentialApply),
    Rayon(RayonApply),
}

impl Executor {
    pub fn from_config(config: &RunnerConfig) -> Result<Self> {
        if config.parallel {
            Ok(Self::Rayon(RayonApply::new(config.effective_jobs())?))
        } else {
            Ok(Self::Sequential(SequentialApply))
        }
    }

    /// Worker count the executor maps with.
    pub fn threads(&self) -> usize {
        match self {
            Self::Sequential(_) => 1,
            Self::Rayon(pool) => pool.threads(),
        }
    }
}

impl ParallelApply for Executor {
    fn apply<I, T, F>(&self, batch: &[I], f: F) -> std::result::Result<Vec<T>, MapFailure>
    where
        I: Sync,
        T: Send,
        F: Fn(&I) -> anyhow::Result<T> + Sync + Send,
    {
        match self {
            Self::Sequential(inner) => inner.apply(batch, f),
            Self::Rayon(inner) => inner.apply(batch, f),
        }
    }
}
