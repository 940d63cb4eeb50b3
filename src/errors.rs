//! Error types for batch runs.
//!
//! Every variant is fatal to the run: the runner performs no local recovery,
//! so whatever reaches the caller is the first thing that went wrong.
//! User callbacks (resolver, mapping function, reducer) return
//! [`anyhow::Error`], which is carried as the `source` of the matching variant.
//! Messages never repeat their source; walk [`std::error::Error::source`] (or
//! print with `{:#}` through `anyhow`) for the full chain.
//!
//! # Example
//!
//! ```rust
//! use batchmap::errors::RunError;
//!
//! let err = RunError::config("batch_size must be greater than zero");
//! assert!(err.is_config());
//! assert_eq!(
//!     err.to_string(),
//!     "Configuration error: batch_size must be greater than zero"
//! );
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error returned by [`BatchRunner::run`](crate::runner::BatchRunner::run)
/// and the supporting collaborators.
#[derive(Debug, Error)]
pub enum RunError {
    /// Invalid runner configuration (batch size, compression level, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The identifier list was empty
    #[error("Configuration error: identifier list is empty")]
    EmptyInput,

    /// A configuration file could not be read or parsed
    #[error("Failed to load config file {}: {message}", path.display())]
    ConfigFile { path: PathBuf, message: String },

    /// Resolving or mapping a single identifier failed
    #[error("Batch {batch} failed at input #{offset} ({identifier})")]
    Map {
        /// 1-based batch index
        batch: usize,
        /// 0-based position of the identifier in the full input list
        offset: usize,
        identifier: String,
        source: anyhow::Error,
    },

    /// The reducer returned an error
    #[error("Reducer failed on batch {batch}")]
    Reduce { batch: usize, source: anyhow::Error },

    /// Creating, flushing or finishing the output sink failed
    #[error("Output sink error for {}", path.display())]
    Sink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The worker thread pool could not be built
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl RunError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a sink error for `path`.
    pub fn sink(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Sink {
            path: path.into(),
            source,
        }
    }

    /// True for errors raised before any output was produced because the
    /// run was misconfigured.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::EmptyInput | Self::ConfigFile { .. }
        )
    }

    /// Batch index the error occurred in, if it happened during processing.
    pub fn batch(&self) -> Option<usize> {
        match self {
            Self::Map { batch, .. } | Self::Reduce { batch, .. } => Some(*batch),
            _ => None,
        }
    }
}

/// Result type alias using [`RunError`]
pub type Result<T> = std::result::Result<T, RunError>;
