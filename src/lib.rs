//! huffpack: static Huffman compression of a single byte stream.
//!
//! The pipeline, leaves first:
//! - [`frequency`] counts every byte plus an end-of-stream sentinel
//! - [`tree`] merges the two lightest nodes until one root remains
//! - [`code_table`] reads each symbol's bit path off the tree
//! - [`encoder`] / [`decoder`] pack and unpack the bit payload
//! - [`container`] frames the frequency table as the payload's header
//! - [`pipeline`] ties these into `compress` / `decompress`
//!
//! [`Compressor`] wraps the pipeline with configuration and statistics.

pub mod code_table;
pub mod config;
pub mod container;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod files;
pub mod frequency;
pub mod pipeline;
pub mod symbol;
pub mod tree;

pub use crate::code_table::{Code, CodeTable};
pub use crate::config::CompressionConfig;
pub use crate::error::{CompressError, Result};
pub use crate::frequency::{FrequencyCounter, FrequencyTable, SourceMode};
pub use crate::pipeline::{compress, decompress, Compressed};
pub use crate::symbol::Symbol;
pub use crate::tree::CodeTree;

use tracing::warn;

/// Compressed output container
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CompressedOutput {
    pub original_size: usize,
    pub compressed_size: usize,
    pub bit_count: u64,
    pub data: Vec<u8>,
    pub ratio: f64,
    pub metadata: CompressionMetadata,
}

/// Metadata about the compression process
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CompressionMetadata {
    /// Shannon entropy of the input in bits per byte.
    pub entropy_bits: f64,
    /// Average payload bits spent per input byte, sentinel included.
    pub bits_per_byte: f64,
    pub distinct_symbols: usize,
    pub header_size: usize,
}

/// The main compressor engine
#[derive(Debug, Clone, Default)]
pub struct Compressor {
    config: CompressionConfig,
}

impl Compressor {
    /// Create a new compressor with the given configuration
    pub fn new(config: CompressionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    /// Compress data, enforcing the size limit and optional verification
    pub fn compress(&self, data: &[u8]) -> Result<CompressedOutput> {
        if data.len() > self.config.max_input_size {
            return Err(CompressError::InputTooLarge {
                size: data.len(),
                limit: self.config.max_input_size,
            });
        }

        let compressed = pipeline::compress(data)?;

        if self.config.verify_roundtrip {
            let restored = pipeline::decompress(&compressed.container)?;
            if restored != data {
                warn!(expected = data.len(), actual = restored.len(), "round-trip mismatch");
                return Err(CompressError::VerificationFailed {
                    expected: data.len(),
                    actual: restored.len(),
                });
            }
        }

        let ratio = if data.is_empty() {
            1.0
        } else {
            compressed.container.len() as f64 / data.len() as f64
        };
        let bits_per_byte = if data.is_empty() {
            0.0
        } else {
            compressed.bit_count as f64 / data.len() as f64
        };

        Ok(CompressedOutput {
            original_size: data.len(),
            compressed_size: compressed.container.len(),
            bit_count: compressed.bit_count,
            ratio,
            metadata: CompressionMetadata {
                entropy_bits: compute_entropy(data),
                bits_per_byte,
                distinct_symbols: compressed.table.len(),
                header_size: container::header_len(&compressed.table),
            },
            data: compressed.container,
        })
    }

    /// Decompress data
    pub fn decompress(&self, output: &CompressedOutput) -> Result<Vec<u8>> {
        pipeline::decompress(&output.data)
    }
}

/// Compute Shannon entropy of data in bits per byte
pub fn compute_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut freq = [0u64; 256];
    for &b in data {
        freq[b as usize] += 1;
    }
    let len = data.len() as f64;
    let mut entropy = 0.0;
    for &f in &freq {
        if f > 0 {
            let p = f as f64 / len;
            entropy -= p * p.log2();
        }
    }
    entropy
}
