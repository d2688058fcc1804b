//! Configuration for huffpack

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CompressError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Largest input `Compressor::compress` accepts, in bytes.
    pub max_input_size: usize,
    /// Decompress every container right after producing it and compare.
    pub verify_roundtrip: bool,
    /// Appended to a file name to name its compressed form.
    pub compressed_extension: String,
    /// Appended to the stem of a decompressed file, before `.txt`.
    pub decompressed_suffix: String,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            max_input_size: 100 * 1024 * 1024, // 100 MB
            verify_roundtrip: false,
            compressed_extension: ".huf".to_string(),
            decompressed_suffix: "_unc".to_string(),
        }
    }
}

impl CompressionConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| CompressError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<()> {
        if self.max_input_size == 0 {
            return Err(CompressError::Config("max_input_size must be non-zero".into()));
        }
        if self.compressed_extension.is_empty() {
            return Err(CompressError::Config(
                "compressed_extension must not be empty".into(),
            ));
        }
        Ok(())
    }
}
