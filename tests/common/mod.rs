// Test utility module for batchmap integration tests
#![allow(dead_code)]

use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temp directory holding `files`, returning their paths in order.
pub fn create_input_files(files: &[(&str, &str)]) -> (TempDir, Vec<PathBuf>) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let mut paths = Vec::with_capacity(files.len());

    for (name, content) in files {
        let file_path = temp_dir.path().join(name);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        paths.push(file_path);
    }

    (temp_dir, paths)
}

/// Decompress a gzip file into a string.
pub fn read_gz(path: &Path) -> String {
    let mut out = String::new();
    GzDecoder::new(File::open(path).expect("Failed to open output"))
        .read_to_string(&mut out)
        .expect("Output should be valid gzip");
    out
}
