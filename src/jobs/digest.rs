//! File digest job: size, line count and xxh64 of every input file, written
//! as JSON lines.

use crate::resolver::FileRecord;
use crate::sink::CompressedSink;
use serde::{Deserialize, Serialize};
use std::io::Write;
use xxhash_rust::xxh64::xxh64;

/// One output line of the digest job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDigest {
    pub path: String,
    pub bytes: u64,
    pub lines: u64,
    /// xxh64 (seed 0) of the contents, lowercase hex
    pub xxh64: String,
}

/// Mapping function: digest one file record.
pub fn digest_file(record: FileRecord) -> anyhow::Result<FileDigest> {
    let FileRecord { path, bytes } = record;
    let mut lines = count_newlines(&bytes);
    if bytes.last().is_some_and(|b| *b != b'\n') {
        lines += 1;
    }

    Ok(FileDigest {
        path: path.to_string_lossy().into_owned(),
        bytes: bytes.len() as u64,
        lines,
        xxh64: format!("{:016x}", xxh64(&bytes, 0)),
    })
}

fn count_newlines(bytes: &[u8]) -> u64 {
    bytes.iter().filter(|b| **b == b'\n').count() as u64
}

/// Reducer: write each result as one JSON object per line.
pub fn write_json_lines<T: Serialize>(
    results: Vec<T>,
    sink: &mut CompressedSink,
) -> anyhow::Result<()> {
    for result in &results {
        serde_json::to_writer(&mut *sink, result)?;
        sink.write_all(b"\n")?;
    }
    Ok(())
}
