//! Error types for huffpack

use thiserror::Error;

use crate::symbol::Symbol;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CompressError>;

#[derive(Error, Debug)]
pub enum CompressError {
    /// A symbol reached the encoder that the code table has no code for.
    #[error("malformed input: no code for {symbol} at offset {offset}")]
    MalformedInput { symbol: Symbol, offset: u64 },

    /// The bit payload ran out before the end-of-stream code was read.
    #[error("truncated payload: bits exhausted after {decoded} decoded bytes")]
    TruncatedPayload { decoded: usize },

    #[error("cannot build a code tree from an empty frequency table")]
    EmptyFrequencyTable,

    #[error("corrupt header: {0}")]
    CorruptHeader(String),

    #[error("invalid bit character {0:?}: expected '0' or '1'")]
    InvalidBit(char),

    #[error("input too large: {size} bytes exceeds limit of {limit}")]
    InputTooLarge { size: usize, limit: usize },

    #[error("round-trip verification failed: expected {expected} bytes, got {actual}")]
    VerificationFailed { expected: usize, actual: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
