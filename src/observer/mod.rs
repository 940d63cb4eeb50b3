//! Run observation.
//!
//! The runner reports through an explicit [`RunObserver`] handle instead of
//! process-wide logger state. [`TracingObserver`] bridges to `tracing` for
//! the CLI; tests use [`RecordingObserver`].

pub mod implementations;
pub mod traits;

pub use implementations::{ProgressBarObserver, RecordingObserver, SilentObserver, TracingObserver};
pub use traits::{EventLevel, RunEvent, RunObserver};
