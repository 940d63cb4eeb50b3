//! Compressed output sink.
//!
//! A single gzip stream opened in write/truncate mode. The runner flushes it
//! after every batch so that the bytes on disk always cover every completed
//! reduction, then finishes it once after the last batch.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

const BYTES_PER_GIB: f64 = (1u64 << 30) as f64;

/// Convert a byte count to gibibytes (`bytes / 1024^3`).
pub fn gibibytes(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GIB
}

/// gzip-compressed file the reducer writes into.
///
/// Reducers receive `&mut CompressedSink` and write through [`Write`]; they
/// cannot close it.
pub struct CompressedSink {
    path: PathBuf,
    encoder: GzEncoder<BufWriter<File>>,
    bytes_in: u64,
}

impl CompressedSink {
    /// Create or truncate `path` and start a gzip stream at `level` (0-9).
    pub fn create(path: impl AsRef<Path>, level: u32) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        let encoder = GzEncoder::new(BufWriter::new(file), Compression::new(level));
        Ok(Self {
            path,
            encoder,
            bytes_in: 0,
        })
    }

    /// Uncompressed bytes accepted so far.
    pub fn bytes_in(&self) -> u64 {
        self.bytes_in
    }

    /// Push everything written so far to disk and return the file length.
    pub fn flush_and_measure(&mut self) -> io::Result<u64> {
        self.encoder.flush()?;
        Ok(self.encoder.get_ref().get_ref().metadata()?.len())
    }

    /// Write the gzip trailer, close the file and return its final length.
    pub fn finish(self) -> io::Result<u64> {
        let mut writer = self.encoder.finish()?;
        writer.flush()?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        Ok(file.metadata()?.len())
    }
}

impl Write for CompressedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.encoder.write(buf)?;
        self.bytes_in += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.encoder.flush()
    }
}

impl std::fmt::Debug for CompressedSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompressedSink")
            .field("path", &self.path)
            .field("bytes_in", &self.bytes_in)
            .finish()
    }
}
