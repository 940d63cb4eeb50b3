use crate::config::{load_config, RunnerConfig};
use crate::executor::Executor;
use crate::io::{read_list_file, InputWalker};
use crate::jobs::{digest_file, write_json_lines};
use crate::observer::{ProgressBarObserver, RunObserver, TracingObserver};
use crate::resolver::FileResolver;
use crate::runner::{BatchRunner, RunSummary};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Everything the `digest` subcommand needs, decoupled from clap.
#[derive(Debug, Clone, Default)]
pub struct DigestConfig {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub list: Option<PathBuf>,
    pub extensions: Vec<String>,
    pub exclude: Vec<String>,
    pub batch_size: Option<usize>,
    pub jobs: Option<usize>,
    pub sequential: bool,
    pub level: Option<u32>,
    pub config: Option<PathBuf>,
    pub progress: bool,
}

impl DigestConfig {
    /// Layer command line overrides on top of the loaded config.
    fn runner_config(&self, base: RunnerConfig) -> RunnerConfig {
        RunnerConfig {
            batch_size: self.batch_size.unwrap_or(base.batch_size),
            jobs: self.jobs.unwrap_or(base.jobs),
            parallel: base.parallel && !self.sequential,
            compression_level: self.level.unwrap_or(base.compression_level),
        }
    }

    /// Listed paths first, then walked inputs, minus the output file itself.
    fn collect_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut identifiers = match &self.list {
            Some(list) => read_list_file(list)?,
            None => Vec::new(),
        };
        if !self.inputs.is_empty() {
            let walked = InputWalker::new(self.inputs.clone())
                .with_extensions(self.extensions.clone())
                .with_exclude_patterns(&self.exclude)?
                .walk()?;
            identifiers.extend(walked);
        }

        if let Some(output) = canonical_output(&self.output) {
            identifiers.retain(|path| {
                let is_output = path.canonicalize().is_ok_and(|p| p == output);
                if is_output {
                    tracing::debug!(path = %path.display(), "Skipping output file");
                }
                !is_output
            });
        }
        Ok(identifiers)
    }
}

/// Absolute form of `output`, resolved through its parent so it works before
/// the file exists. `None` if the parent directory cannot be resolved.
fn canonical_output(output: &Path) -> Option<PathBuf> {
    let name = output.file_name()?;
    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    parent.canonicalize().ok().map(|dir| dir.join(name))
}

/// Run the digest job end to end.
pub fn handle_digest_command(config: DigestConfig) -> Result<RunSummary> {
    let cwd = std::env::current_dir().context("Failed to resolve working directory")?;
    let base = load_config(config.config.as_deref(), &cwd)?;
    let runner_config = config.runner_config(base);
    runner_config.validate()?;

    let identifiers = config.collect_inputs()?;
    tracing::debug!(
        inputs = identifiers.len(),
        batch_size = runner_config.batch_size,
        parallel = runner_config.parallel,
        "Collected inputs"
    );

    let executor = Executor::from_config(&runner_config)?;
    tracing::debug!(threads = executor.threads(), "Executor ready");
    let runner = BatchRunner::new(runner_config, executor)?;

    let summary = if config.progress {
        execute(
            runner.with_observer(ProgressBarObserver::new(TracingObserver)),
            &config.output,
            &identifiers,
        )?
    } else {
        execute(runner, &config.output, &identifiers)?
    };
    Ok(summary)
}

fn execute<O: RunObserver>(
    runner: BatchRunner<Executor, O>,
    output: &Path,
    identifiers: &[PathBuf],
) -> Result<RunSummary> {
    let summary = runner.run(
        &FileResolver,
        digest_file,
        write_json_lines,
        output,
        identifiers,
    )?;
    Ok(summary)
}
