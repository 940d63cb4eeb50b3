//! Integration tests for the batch runner.
//!
//! These cover the end-to-end scenarios: batch partitioning, ordering,
//! failure mid-run, repeatability, and configuration errors raised before
//! any output is written.

mod common;

use batchmap::jobs::{digest_file, write_json_lines, FileDigest};
use batchmap::{
    BatchRunner, CompressedSink, EventLevel, FileResolver, IdentityResolver, RayonApply,
    RecordingObserver, RunError, RunEvent, RunObserver, RunnerConfig, SequentialApply,
};
use common::{create_input_files, read_gz};
use pretty_assertions::assert_eq;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn write_numbers(results: Vec<u64>, sink: &mut CompressedSink) -> anyhow::Result<()> {
    for n in results {
        writeln!(sink, "{n}")?;
    }
    Ok(())
}

fn recording_runner(batch_size: usize) -> BatchRunner<RayonApply, RecordingObserver> {
    BatchRunner::new(
        RunnerConfig::new().with_batch_size(batch_size),
        RayonApply::new(4).expect("pool"),
    )
    .expect("valid config")
    .with_observer(RecordingObserver::new())
}

// ============================================================================
// Partitioning
// ============================================================================

#[test]
fn test_2500_inputs_in_batches_of_1000() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.gz");
    let runner = recording_runner(1000);
    let ids: Vec<u64> = (1..=2500).collect();
    let mut reduced_sizes = Vec::new();

    let summary = runner
        .run(
            &IdentityResolver::<u64>::new(),
            |n: u64| Ok(n),
            |results: Vec<u64>, sink: &mut CompressedSink| {
                reduced_sizes.push(results.len());
                write_numbers(results, sink)
            },
            &output,
            &ids,
        )
        .expect("run should succeed");

    assert_eq!(reduced_sizes, vec![1000, 1000, 500]);
    assert_eq!(summary.batches, 3);
    assert_eq!(summary.identifiers, 2500);

    let lines: Vec<u64> = read_gz(&output)
        .lines()
        .map(|l| l.parse().unwrap())
        .collect();
    assert_eq!(lines, ids);

    let sizes: Vec<usize> = runner
        .observer()
        .events()
        .into_iter()
        .filter_map(|(_, e)| match e {
            RunEvent::BatchStarted { size, .. } => Some(size),
            _ => None,
        })
        .collect();
    assert_eq!(sizes, vec![1000, 1000, 500]);
}

#[test]
fn test_exact_multiple_ends_with_full_batch() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.gz");
    let runner = recording_runner(250);
    let ids: Vec<u64> = (0..1000).collect();
    let mut reduced_sizes = Vec::new();

    runner
        .run(
            &IdentityResolver::<u64>::new(),
            |n: u64| Ok(n),
            |results: Vec<u64>, sink: &mut CompressedSink| {
                reduced_sizes.push(results.len());
                write_numbers(results, sink)
            },
            &output,
            &ids,
        )
        .unwrap();

    assert_eq!(reduced_sizes, vec![250, 250, 250, 250]);
    assert_eq!(runner.observer().finished_batches(), vec![1, 2, 3, 4]);
}

#[test]
fn test_output_size_reported_at_debug_after_every_batch() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.gz");
    let runner = recording_runner(10);
    let ids: Vec<u64> = (0..35).collect();

    let summary = runner
        .run(
            &IdentityResolver::<u64>::new(),
            |n: u64| Ok(n),
            write_numbers,
            &output,
            &ids,
        )
        .unwrap();

    let sizes: Vec<u64> = runner
        .observer()
        .at_level(EventLevel::Debug)
        .into_iter()
        .filter_map(|e| match e {
            RunEvent::OutputSize { bytes, .. } => Some(bytes),
            _ => None,
        })
        .collect();
    assert_eq!(sizes.len(), 4);
    assert!(sizes.windows(2).all(|w| w[0] < w[1]));
    assert!(summary.output_bytes >= *sizes.last().unwrap());
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_failure_in_second_batch_keeps_first_batch_output() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.gz");
    let runner = recording_runner(1000);
    let ids: Vec<u64> = (1..=2500).collect();
    let mut reduce_calls = 0;

    let err = runner
        .run(
            &IdentityResolver::<u64>::new(),
            |n: u64| {
                if n == 1501 {
                    anyhow::bail!("record {n} is corrupt");
                }
                Ok(n)
            },
            |results: Vec<u64>, sink: &mut CompressedSink| {
                reduce_calls += 1;
                write_numbers(results, sink)
            },
            &output,
            &ids,
        )
        .unwrap_err();

    match &err {
        RunError::Map {
            batch,
            offset,
            identifier,
            source,
        } => {
            assert_eq!(*batch, 2);
            assert_eq!(*offset, 1500);
            assert_eq!(identifier, "1501");
            assert_eq!(source.to_string(), "record 1501 is corrupt");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(reduce_calls, 1);
    assert_eq!(runner.observer().started_batches(), vec![1, 2]);
    assert_eq!(runner.observer().finished_batches(), vec![1]);

    let expected: String = (1..=1000).map(|n| format!("{n}\n")).collect();
    assert_eq!(read_gz(&output), expected);
}

#[test]
fn test_unreadable_file_aborts_with_its_path() {
    let (dir, mut paths) = create_input_files(&[("a.txt", "a\n"), ("b.txt", "b\n")]);
    paths.insert(1, dir.path().join("missing.txt"));
    let output = dir.path().join("digest.jsonl.gz");

    let err = BatchRunner::new(RunnerConfig::new().with_batch_size(2), SequentialApply)
        .unwrap()
        .with_observer(RecordingObserver::new())
        .run(&FileResolver, digest_file, write_json_lines, &output, &paths)
        .unwrap_err();

    assert_eq!(err.batch(), Some(1));
    let message = err.to_string();
    assert!(message.contains("missing.txt"), "{message}");
}

#[test]
fn test_empty_input_is_a_config_error_and_creates_nothing() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.gz");
    let ids: Vec<u64> = Vec::new();

    let err = recording_runner(10)
        .run(
            &IdentityResolver::<u64>::new(),
            |n: u64| Ok(n),
            write_numbers,
            &output,
            &ids,
        )
        .unwrap_err();

    assert!(err.is_config());
    assert!(!output.exists());
}

#[test]
fn test_unwritable_output_is_a_sink_error() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("no-such-dir").join("out.gz");
    let ids: Vec<u64> = vec![1, 2, 3];

    let err = recording_runner(10)
        .run(
            &IdentityResolver::<u64>::new(),
            |n: u64| Ok(n),
            write_numbers,
            &output,
            &ids,
        )
        .unwrap_err();

    assert!(matches!(err, RunError::Sink { .. }));
}

// ============================================================================
// Repeatability
// ============================================================================

#[test]
fn test_two_runs_produce_identical_output() {
    let files: Vec<(String, String)> = (0..40)
        .map(|i| (format!("dir{}/file{i:02}.txt", i % 3), "line\n".repeat(i)))
        .collect();
    let borrowed: Vec<(&str, &str)> = files
        .iter()
        .map(|(n, c)| (n.as_str(), c.as_str()))
        .collect();
    let (dir, paths) = create_input_files(&borrowed);

    let runner = BatchRunner::new(
        RunnerConfig::new().with_batch_size(7),
        RayonApply::new(3).unwrap(),
    )
    .unwrap()
    .with_observer(RecordingObserver::new());

    let first = dir.path().join("first.jsonl.gz");
    let second = dir.path().join("second.jsonl.gz");
    runner
        .run(&FileResolver, digest_file, write_json_lines, &first, &paths)
        .unwrap();
    runner
        .run(&FileResolver, digest_file, write_json_lines, &second, &paths)
        .unwrap();

    let first_text = read_gz(&first);
    assert_eq!(first_text, read_gz(&second));

    let digests: Vec<FileDigest> = first_text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(digests.len(), 40);
    for (digest, path) in digests.iter().zip(&paths) {
        assert_eq!(digest.path, path.to_string_lossy());
    }
    assert_eq!(digests[5].lines, 5);
    assert_eq!(digests[5].bytes, 25);
}

// ============================================================================
// Batch barrier
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Map(usize),
    Reduce(usize),
    Flush(usize),
}

/// Logs every flushed batch into a shared step log.
struct FlushLog(Arc<Mutex<Vec<Step>>>);

impl RunObserver for FlushLog {
    fn info(&self, _event: &RunEvent) {}

    fn debug(&self, event: &RunEvent) {
        if let RunEvent::OutputSize { index, .. } = event {
            self.0.lock().unwrap().push(Step::Flush(*index));
        }
    }
}

#[test]
fn test_next_batch_waits_for_reduce_and_flush() {
    const BATCH: u64 = 50;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.gz");
    let ids: Vec<u64> = (0..4 * BATCH).collect();
    let log = Arc::new(Mutex::new(Vec::new()));

    let runner = BatchRunner::new(
        RunnerConfig::new().with_batch_size(BATCH as usize),
        RayonApply::new(4).unwrap(),
    )
    .unwrap()
    .with_observer(FlushLog(Arc::clone(&log)));

    runner
        .run(
            &IdentityResolver::<u64>::new(),
            |n: u64| {
                log.lock().unwrap().push(Step::Map((n / BATCH) as usize + 1));
                Ok(n)
            },
            |results: Vec<u64>, sink: &mut CompressedSink| {
                let batch = (results[0] / BATCH) as usize + 1;
                log.lock().unwrap().push(Step::Reduce(batch));
                write_numbers(results, sink)
            },
            &output,
            &ids,
        )
        .unwrap();

    let steps = log.lock().unwrap().clone();
    let position = |step: Step| steps.iter().position(|s| *s == step).unwrap();
    let map_positions = |batch: usize| {
        steps
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == Step::Map(batch))
            .map(|(i, _)| i)
            .collect::<Vec<_>>()
    };

    for batch in 1..=4 {
        let maps = map_positions(batch);
        assert_eq!(maps.len(), BATCH as usize);
        let reduce = position(Step::Reduce(batch));
        let flush = position(Step::Flush(batch));

        assert!(maps.iter().all(|&m| m < reduce), "batch {batch} reduced early");
        assert!(reduce < flush, "batch {batch} flushed before reduce");
        if batch < 4 {
            let next_maps = map_positions(batch + 1);
            assert!(
                next_maps.iter().all(|&m| m > flush),
                "batch {} mapped before batch {batch} was flushed",
                batch + 1
            );
        }
    }
    assert_eq!(steps.len(), 4 * BATCH as usize + 8);
}
