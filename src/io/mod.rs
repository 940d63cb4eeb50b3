//! Input discovery for the command line.

pub mod walker;

pub use walker::InputWalker;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Read newline-separated paths, skipping blank lines and `#` comments.
pub fn read_list_file(path: &Path) -> Result<Vec<PathBuf>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input list {}", path.display()))?;
    Ok(parse_list(&contents))
}

fn parse_list(contents: &str) -> Vec<PathBuf> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(PathBuf::from)
        .collect()
}
