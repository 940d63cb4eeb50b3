//! Observer implementations.
//!
//! | Use Case | Implementation |
//! |----------|----------------|
//! | CLI / services | [`TracingObserver`] |
//! | Interactive terminal | [`ProgressBarObserver`] wrapping [`TracingObserver`] |
//! | Tests, benchmarks | [`SilentObserver`] or [`RecordingObserver`] |

use super::traits::{EventLevel, RunEvent, RunObserver};
use crate::sink::gibibytes;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Arc, Mutex};

/// Emits events as `tracing` records with structured fields.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl RunObserver for TracingObserver {
    fn info(&self, event: &RunEvent) {
        match event {
            RunEvent::RunStarted {
                identifiers,
                batches,
                batch_size,
                output,
            } => tracing::info!(
                identifiers,
                batches,
                batch_size,
                output = %output.display(),
                "{event}"
            ),
            RunEvent::BatchStarted { index, total, size } => {
                tracing::info!(batch = index, total, size, "{event}")
            }
            RunEvent::BatchFinished {
                index,
                total,
                size,
                elapsed,
            } => tracing::info!(
                batch = index,
                total,
                size,
                elapsed_ms = elapsed.as_millis() as u64,
                "{event}"
            ),
            _ => tracing::info!("{event}"),
        }
    }

    fn debug(&self, event: &RunEvent) {
        match event {
            RunEvent::OutputSize { index, bytes } => tracing::debug!(
                batch = index,
                bytes,
                gib = gibibytes(*bytes),
                "{event}"
            ),
            _ => tracing::debug!("{event}"),
        }
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentObserver;

impl RunObserver for SilentObserver {
    #[inline]
    fn info(&self, _event: &RunEvent) {}

    #[inline]
    fn debug(&self, _event: &RunEvent) {}
}

/// Terminal progress bar, advanced once per finished batch.
///
/// Every event is also forwarded to `inner` with the bar suspended, so log
/// lines do not tear the bar.
pub struct ProgressBarObserver<O> {
    bar: ProgressBar,
    inner: O,
}

impl<O: RunObserver> ProgressBarObserver<O> {
    pub fn new(inner: O) -> Self {
        Self::with_bar(ProgressBar::new(0), inner)
    }

    /// Use a caller-supplied bar, e.g. `ProgressBar::hidden()` in tests.
    pub fn with_bar(bar: ProgressBar, inner: O) -> Self {
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40}] {pos}/{len} batches ({elapsed_precise})")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar, inner }
    }

    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }
}

impl<O: RunObserver> RunObserver for ProgressBarObserver<O> {
    fn info(&self, event: &RunEvent) {
        match event {
            RunEvent::RunStarted { batches, .. } => {
                self.bar.set_length(*batches as u64);
                self.bar.set_position(0);
                self.bar.set_message("mapping");
            }
            RunEvent::BatchFinished { .. } => self.bar.inc(1),
            RunEvent::RunFinished { .. } => self.bar.finish_with_message("done"),
            _ => {}
        }
        self.bar.suspend(|| self.inner.info(event));
    }

    fn debug(&self, event: &RunEvent) {
        self.bar.suspend(|| self.inner.debug(event));
    }
}

/// Captures events for assertions in tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<(EventLevel, RunEvent)>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, in the order they were reported.
    pub fn events(&self) -> Vec<(EventLevel, RunEvent)> {
        self.events.lock().unwrap().clone()
    }

    /// Events reported on one channel.
    pub fn at_level(&self, level: EventLevel) -> Vec<RunEvent> {
        self.events()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, e)| e)
            .collect()
    }

    /// Indices of the batches that started, in order.
    pub fn started_batches(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|(_, e)| match e {
                RunEvent::BatchStarted { index, .. } => Some(index),
                _ => None,
            })
            .collect()
    }

    /// Indices of the batches that finished, in order.
    pub fn finished_batches(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|(_, e)| match e {
                RunEvent::BatchFinished { index, .. } => Some(index),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl RunObserver for RecordingObserver {
    fn info(&self, event: &RunEvent) {
        self.events
            .lock()
            .unwrap()
            .push((EventLevel::Info, event.clone()));
    }

    fn debug(&self, event: &RunEvent) {
        self.events
            .lock()
            .unwrap()
            .push((EventLevel::Debug, event.clone()));
    }
}
