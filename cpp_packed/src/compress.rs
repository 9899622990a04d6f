//! Gzip compression of whole files.
use std::{fs, io::Write, path::Path};

use flate2::{Compression, GzBuilder};

use crate::error::{Error, Result, Stage};

/// The default gzip level, matching `gzip -9`.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 9;

/// Validates a gzip level (0-9).
///
/// # Errors
/// Returns [`Error::InvalidLevel`] for levels above 9.
pub fn level(level: u32) -> Result<Compression> {
    if level > 9 {
        return Err(Error::InvalidLevel(level));
    }
    Ok(Compression::new(level))
}

/// Compresses `data` into a single gzip member.
///
/// The header carries no file name and a zero timestamp, so identical input
/// always produces identical output.
///
/// # Errors
/// Only fails if the in-memory encoder reports an I/O error.
pub fn compress(data: &[u8], level: Compression) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzBuilder::new()
        .mtime(0)
        .write(Vec::with_capacity(data.len() / 2 + 32), level);
    encoder.write_all(data)?;
    encoder.finish()
}

/// Reads `path` in full and returns its compressed bytes.
///
/// # Errors
/// Returns [`Error::FileAccess`] tagged with the failing stage.
pub fn compress_path(path: &Path, level: Compression) -> Result<Vec<u8>> {
    let data = fs::read(path).map_err(|e| Error::file_access(Stage::AssetRead, path, e))?;
    compress(&data, level).map_err(|e| Error::file_access(Stage::Compression, path, e))
}

/// Compresses `input` and writes the result to `output`.
///
/// # Errors
/// Returns [`Error::FileAccess`] if reading, compressing or writing fails.
pub fn compress_file(input: &Path, output: &Path, level: Compression) -> Result<()> {
    let compressed = compress_path(input, level)?;
    fs::write(output, &compressed).map_err(|e| Error::file_access(Stage::OutputWrite, output, e))?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        bytes = compressed.len(),
        "compressed file"
    );
    Ok(())
}
