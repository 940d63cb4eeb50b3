//! Batch runner.
//!
//! Drives a run end to end: plan the batches, open the sink, then for every
//! batch in order map it through the executor, reduce the results into the
//! sink, flush, and report. A batch is never dispatched before the previous
//! batch's reduction and flush have completed.
//!
//! # Example
//!
//! ```rust,no_run
//! use batchmap::{BatchRunner, IdentityResolver, RunnerConfig, SequentialApply};
//! use std::io::Write;
//!
//! let runner = BatchRunner::new(RunnerConfig::new().with_batch_size(2), SequentialApply)?;
//! let numbers: Vec<u64> = (1..=5).collect();
//!
//! let summary = runner.run(
//!     &IdentityResolver::<u64>::new(),
//!     |n: u64| Ok(n * n),
//!     |squares, sink| {
//!         for s in squares {
//!             writeln!(sink, "{s}")?;
//!         }
//!         Ok(())
//!     },
//!     "squares.txt.gz",
//!     &numbers,
//! )?;
//! assert_eq!(summary.batches, 3);
//! # Ok::<(), batchmap::RunError>(())
//! ```

use crate::batch::BatchPlan;
use crate::config::RunnerConfig;
use crate::errors::{Result, RunError};
use crate::executor::ParallelApply;
use crate::observer::{RunEvent, RunObserver, TracingObserver};
use crate::resolver::RecordResolver;
use crate::sink::CompressedSink;
use std::path::Path;
use std::time::{Duration, Instant};

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub batches: usize,
    pub identifiers: usize,
    /// Final compressed size of the output file
    pub output_bytes: u64,
    /// Uncompressed bytes the reducer wrote
    pub payload_bytes: u64,
    pub elapsed: Duration,
}

/// Batches identifiers, maps them through `E` and reduces into a gzip sink.
#[derive(Debug)]
pub struct BatchRunner<E, O = TracingObserver> {
    config: RunnerConfig,
    executor: E,
    observer: O,
}

impl<E: ParallelApply> BatchRunner<E> {
    /// Build a runner reporting through [`TracingObserver`].
    ///
    /// Fails with [`RunError::Config`] if `config` does not validate.
    pub fn new(config: RunnerConfig, executor: E) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            executor,
            observer: TracingObserver,
        })
    }
}

impl<E: ParallelApply, O: RunObserver> BatchRunner<E, O> {
    /// Replace the observer.
    pub fn with_observer<P: RunObserver>(self, observer: P) -> BatchRunner<E, P> {
        BatchRunner {
            config: self.config,
            executor: self.executor,
            observer,
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Process `identifiers` in contiguous batches of `config.batch_size`.
    ///
    /// Each identifier is resolved and mapped on the executor; `reduce`
    /// receives every batch's results in input order together with the open
    /// sink. The sink is flushed after every batch and finished after the
    /// last one.
    ///
    /// # Errors
    ///
    /// - [`RunError::EmptyInput`] before anything is created
    /// - [`RunError::Sink`] if the output cannot be created, flushed or finished
    /// - [`RunError::Map`] for the first resolve/map failure in a batch
    /// - [`RunError::Reduce`] if the reducer fails
    ///
    /// On a failure in batch `k`, the file holds the flushed output of
    /// batches `1..k`. Nothing is retried or rolled back.
    pub fn run<S, T, M, R>(
        &self,
        resolver: &S,
        map: M,
        mut reduce: R,
        output: impl AsRef<Path>,
        identifiers: &[S::Id],
    ) -> Result<RunSummary>
    where
        S: RecordResolver,
        T: Send,
        M: Fn(S::Record) -> anyhow::Result<T> + Sync + Send,
        R: FnMut(Vec<T>, &mut CompressedSink) -> anyhow::Result<()>,
    {
        let output = output.as_ref();
        let plan = BatchPlan::new(identifiers.len(), self.config.batch_size)?;
        let started = Instant::now();

        self.observer.info(&RunEvent::RunStarted {
            identifiers: plan.len(),
            batches: plan.total_batches(),
            batch_size: plan.batch_size(),
            output: output.to_path_buf(),
        });

        let mut sink = CompressedSink::create(output, self.config.compression_level)
            .map_err(|e| RunError::sink(output, e))?;

        let map_one = |id: &S::Id| -> anyhow::Result<T> { map(resolver.resolve(id)?) };

        for span in plan.spans() {
            self.observer.info(&RunEvent::BatchStarted {
                index: span.index,
                total: span.total,
                size: span.len(),
            });
            let batch_started = Instant::now();

            let batch = &identifiers[span.range()];
            let results = self
                .executor
                .apply(batch, &map_one)
                .map_err(|failure| RunError::Map {
                    batch: span.index,
                    offset: span.start + failure.position,
                    identifier: format!("{:?}", batch[failure.position]),
                    source: failure.source,
                })?;

            reduce(results, &mut sink).map_err(|source| RunError::Reduce {
                batch: span.index,
                source,
            })?;

            let bytes = sink
                .flush_and_measure()
                .map_err(|e| RunError::sink(output, e))?;

            self.observer.info(&RunEvent::BatchFinished {
                index: span.index,
                total: span.total,
                size: span.len(),
                elapsed: batch_started.elapsed(),
            });
            self.observer.debug(&RunEvent::OutputSize {
                index: span.index,
                bytes,
            });
        }

        let payload_bytes = sink.bytes_in();
        let output_bytes = sink.finish().map_err(|e| RunError::sink(output, e))?;

        let summary = RunSummary {
            batches: plan.total_batches(),
            identifiers: plan.len(),
            output_bytes,
            payload_bytes,
            elapsed: started.elapsed(),
        };
        self.observer.info(&RunEvent::RunFinished {
            batches: summary.batches,
            identifiers: summary.identifiers,
            output_bytes,
            elapsed: summary.elapsed,
        });
        Ok(summary)
    }
}
