//! Built-in jobs: mapping functions and reducers the CLI can run.

pub mod digest;

pub use digest::{digest_file, write_json_lines, FileDigest};
