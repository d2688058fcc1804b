//! File-level compress/decompress with the conventional output names.
//!
//! `notes.txt` compresses to `notes.txt.huf`; `notes.txt.huf` decompresses
//! to `notes_unc.txt`. The extension and suffix come from
//! [`CompressionConfig`].

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::CompressionConfig;
use crate::error::{CompressError, Result};
use crate::pipeline;

/// Where a file-level operation wrote its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome<T> {
    pub output: PathBuf,
    pub value: T,
}

pub fn compressed_path(path: &Path, config: &CompressionConfig) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(&config.compressed_extension);
    PathBuf::from(name)
}

pub fn decompressed_path(path: &Path, config: &CompressionConfig) -> PathBuf {
    let name = path.to_string_lossy();
    let stem = name
        .strip_suffix(config.compressed_extension.as_str())
        .unwrap_or(&*name);
    let stem = stem.strip_suffix(".txt").unwrap_or(stem);
    PathBuf::from(format!("{}{}.txt", stem, config.decompressed_suffix))
}

/// Compress `path` next to itself and return the payload bit string.
pub fn compress_file(path: &Path, config: &CompressionConfig) -> Result<FileOutcome<String>> {
    let data = fs::read(path)?;
    if data.len() > config.max_input_size {
        return Err(CompressError::InputTooLarge {
            size: data.len(),
            limit: config.max_input_size,
        });
    }
    let compressed = pipeline::compress(&data)?;
    let output = compressed_path(path, config);
    fs::write(&output, &compressed.container)?;
    info!(
        input = %path.display(),
        output = %output.display(),
        bytes = compressed.container.len(),
        "compressed file"
    );
    Ok(FileOutcome {
        output,
        value: compressed.bits,
    })
}

/// Decompress `path` and return the decoded bytes.
///
/// The output file is only created once the whole payload has decoded.
pub fn decompress_file(path: &Path, config: &CompressionConfig) -> Result<FileOutcome<Vec<u8>>> {
    let container = fs::read(path)?;
    let decoded = pipeline::decompress(&container)?;
    let output = decompressed_path(path, config);
    fs::write(&output, &decoded)?;
    info!(
        input = %path.display(),
        output = %output.display(),
        bytes = decoded.len(),
        "decompressed file"
    );
    Ok(FileOutcome {
        output,
        value: decoded,
    })
}
