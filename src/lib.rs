// Export modules for library usage
pub mod batch;
pub mod cli;
pub mod config;
pub mod errors;
pub mod executor;
pub mod io;
pub mod jobs;
pub mod observer;
pub mod resolver;
pub mod runner;
pub mod sink;

// Re-export commonly used types
pub use crate::batch::{BatchPlan, BatchSpan};
pub use crate::config::{RunnerConfig, DEFAULT_BATCH_SIZE};
pub use crate::errors::RunError;
pub use crate::executor::{Executor, MapFailure, ParallelApply, RayonApply, SequentialApply};
pub use crate::observer::{
    EventLevel, ProgressBarObserver, RecordingObserver, RunEvent, RunObserver, SilentObserver,
    TracingObserver,
};
pub use crate::resolver::{FileRecord, FileResolver, IdentityResolver, RecordResolver};
pub use crate::runner::{BatchRunner, RunSummary};
pub use crate::sink::{gibibytes, CompressedSink};
