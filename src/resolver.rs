//! Identifier → record resolution.
//!
//! Resolution runs on the worker threads, right before the mapping function,
//! so a resolver must be `Sync` and must not touch the output sink.

use anyhow::Context;
use std::fmt::Debug;
use std::fs;
use std::marker::PhantomData;
use std::path::PathBuf;

/// Turns an identifier into the record the mapping function consumes.
pub trait RecordResolver: Sync {
    /// Opaque reference to one input record
    type Id: Sync + Debug;
    /// What the mapping function receives
    type Record;

    fn resolve(&self, id: &Self::Id) -> anyhow::Result<Self::Record>;
}

/// Raw contents of one file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Reads each identifier as a path on the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileResolver;

impl RecordResolver for FileResolver {
    type Id = PathBuf;
    type Record = FileRecord;

    fn resolve(&self, path: &PathBuf) -> anyhow::Result<FileRecord> {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(FileRecord {
            path: path.clone(),
            bytes,
        })
    }
}

/// Hands the identifier itself to the mapping function.
///
/// Useful when the inputs are already in memory.
#[derive(Debug, Clone, Copy)]
pub struct IdentityResolver<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> IdentityResolver<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for IdentityResolver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Sync + Debug> RecordResolver for IdentityResolver<T> {
    type Id = T;
    type Record = T;

    fn resolve(&self, id: &T) -> anyhow::Result<T> {
        Ok(id.clone())
    }
}
