//! Observer trait and the events a run emits.
//!
//! The runner has no ambient logging. Every line of progress goes through a
//! [`RunObserver`] handed to it, on one of two channels:
//!
//! - **info**: run start/end, batch start, batch elapsed time
//! - **debug**: cumulative output size after each batch
//!
//! # Example
//!
//! ```rust
//! use batchmap::observer::{RunEvent, RunObserver};
//!
//! struct PrintObserver;
//!
//! impl RunObserver for PrintObserver {
//!     fn info(&self, event: &RunEvent) {
//!         println!("{event}");
//!     }
//!
//!     fn debug(&self, _event: &RunEvent) {}
//! }
//! ```

use crate::sink::gibibytes;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Severity channel an event was reported on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Info,
    Debug,
}

/// Something that happened during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    RunStarted {
        identifiers: usize,
        batches: usize,
        batch_size: usize,
        output: PathBuf,
    },
    BatchStarted {
        index: usize,
        total: usize,
        size: usize,
    },
    BatchFinished {
        index: usize,
        total: usize,
        /// Inputs in the batch
        size: usize,
        elapsed: Duration,
    },
    /// On-disk size of the output after a batch was flushed
    OutputSize { index: usize, bytes: u64 },
    RunFinished {
        batches: usize,
        identifiers: usize,
        output_bytes: u64,
        elapsed: Duration,
    },
}

impl fmt::Display for RunEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RunStarted {
                identifiers,
                batches,
                batch_size,
                output,
            } => write!(
                f,
                "Processing {identifiers} inputs in {batches} batches of up to {batch_size} into {}",
                output.display()
            ),
            Self::BatchStarted { index, total, size } => {
                write!(f, "Batch {index}/{total}: mapping {size} inputs")
            }
            Self::BatchFinished {
                index,
                total,
                size,
                elapsed,
            } => write!(
                f,
                "Batch {index}/{total} of {size} inputs done in {:.2}s",
                elapsed.as_secs_f64()
            ),
            Self::OutputSize { index, bytes } => write!(
                f,
                "Output size after batch {index}: {:.4} GiB",
                gibibytes(*bytes)
            ),
            Self::RunFinished {
                batches,
                identifiers,
                output_bytes,
                elapsed,
            } => write!(
                f,
                "Finished {identifiers} inputs in {batches} batches ({output_bytes} bytes) in {:.2}s",
                elapsed.as_secs_f64()
            ),
        }
    }
}

/// Receives run events.
///
/// Called only from the thread driving the run, but implementations must be
/// `Send + Sync` so one observer can be shared across runs.
pub trait RunObserver: Send + Sync {
    fn info(&self, event: &RunEvent);

    fn debug(&self, event: &RunEvent);
}

impl<O: RunObserver + ?Sized> RunObserver for std::sync::Arc<O> {
    fn info(&self, event: &RunEvent) {
        (**self).info(event)
    }

    fn debug(&self, event: &RunEvent) {
        (**self).debug(event)
    }
}

impl<O: RunObserver + ?Sized> RunObserver for &O {
    fn info(&self, event: &RunEvent) {
        (**self).info(event)
    }

    fn debug(&self, event: &RunEvent) {
        (**self).debug(event)
    }
}
