//! Compress and decompress entry points.
//!
//! compress: bytes → frequency table → code tree → code table → header + payload.
//! decompress: header → frequency table → code tree (rebuilt) → payload → bytes.
//! The tree is never stored; both sides derive the same one from the table.

use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};

use tracing::debug;

use crate::code_table::CodeTable;
use crate::container;
use crate::decoder;
use crate::encoder;
use crate::error::Result;
use crate::frequency::FrequencyTable;
use crate::tree::CodeTree;

/// A finished container plus the payload bits in text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compressed {
    pub container: Vec<u8>,
    /// The table written as the container's header.
    pub table: FrequencyTable,
    pub bits: String,
    pub bit_count: u64,
}

/// Sizes reported by the streaming entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSummary {
    pub input_len: u64,
    pub header_len: u64,
    pub bit_count: u64,
}

pub fn compress(source: &[u8]) -> Result<Compressed> {
    let table = FrequencyTable::from_bytes(source);
    let tree = CodeTree::build(&table)?;
    let codes = CodeTable::from_tree(&tree);
    drop(tree);

    let mut container = Vec::with_capacity(container::header_len(&table) + source.len() / 2);
    container::write_header(&table, &mut container)?;
    let encoded = encoder::encode(source, &codes, &mut container)?;
    debug!(
        input = source.len(),
        output = container.len(),
        bits = encoded.bit_count,
        "compressed"
    );

    Ok(Compressed {
        container,
        table,
        bits: encoded.bits,
        bit_count: encoded.bit_count,
    })
}

pub fn decompress(container: &[u8]) -> Result<Vec<u8>> {
    let mut input = container;
    let table = container::read_header(&mut input)?;
    let tree = CodeTree::build(&table)?;
    let output = decoder::decode(input, &tree, std::io::sink())?;
    debug!(input = container.len(), output = output.len(), "decompressed");
    Ok(output)
}

/// Two-pass streaming compression: count `input`, rewind it, then encode.
pub fn compress_reader<R, W>(input: R, output: W) -> Result<StreamSummary>
where
    R: Read + Seek,
    W: Write,
{
    let mut input = BufReader::new(input);
    let start = input.stream_position()?;
    let table = FrequencyTable::from_reader(&mut input)?;
    input.seek(SeekFrom::Start(start))?;

    let tree = CodeTree::build(&table)?;
    let codes = CodeTable::from_tree(&tree);
    drop(tree);

    let mut output = BufWriter::new(output);
    container::write_header(&table, &mut output)?;
    let bit_count = encoder::encode_to(&mut input, &codes, &mut output)?;
    output.flush()?;

    let summary = StreamSummary {
        // the sentinel's count is not input
        input_len: table.total() - 1,
        header_len: container::header_len(&table) as u64,
        bit_count,
    };
    debug!(?summary, "compressed stream");
    Ok(summary)
}

/// Streaming decompression; returns the number of bytes written.
pub fn decompress_reader<R, W>(input: R, output: W) -> Result<u64>
where
    R: Read,
    W: Write,
{
    let mut input = BufReader::new(input);
    let table = container::read_header(&mut input)?;
    let tree = CodeTree::build(&table)?;
    let written = decoder::decode_to(&mut input, &tree, BufWriter::new(output))?;
    debug!(bytes = written, "decompressed stream");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompressError;
    use std::io::Cursor;

    #[test]
    fn test_roundtrip() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let compressed = compress(data).unwrap();
        assert_eq!(decompress(&compressed.container).unwrap(), data);
    }

    #[test]
    fn test_aab_scenario() {
        let compressed = compress(b"aab").unwrap();
        assert_eq!(compressed.bits, "001011");
        assert_eq!(compressed.bit_count, 6);
        assert_eq!(compressed.table, FrequencyTable::from_bytes(b"aab"));
        assert_eq!(decompress(&compressed.container).unwrap(), b"aab");
    }

    #[test]
    fn test_empty_source() {
        let compressed = compress(b"").unwrap();
        assert_eq!(compressed.bits, "0");
        assert!(decompress(&compressed.container).unwrap().is_empty());
    }

    #[test]
    fn test_single_repeated_byte() {
        let data = vec![b'z'; 1000];
        let compressed = compress(&data).unwrap();
        assert!(compressed.container.len() < data.len());
        assert_eq!(decompress(&compressed.container).unwrap(), data);
    }

    #[test]
    fn test_truncated_container() {
        let compressed = compress(b"some text to be truncated").unwrap();
        let cut = &compressed.container[..compressed.container.len() - 1];
        assert!(matches!(
            decompress(cut),
            Err(CompressError::TruncatedPayload { .. })
        ));
    }

    #[test]
    fn test_streaming_matches_in_memory() {
        let data = b"streams and slices agree".repeat(100);
        let mut streamed = Vec::new();
        let summary = compress_reader(Cursor::new(&data), &mut streamed).unwrap();
        let compressed = compress(&data).unwrap();
        assert_eq!(streamed, compressed.container);
        assert_eq!(summary.input_len, data.len() as u64);
        assert_eq!(summary.bit_count, compressed.bit_count);

        let mut restored = Vec::new();
        let n = decompress_reader(&streamed[..], &mut restored).unwrap();
        assert_eq!(n, data.len() as u64);
        assert_eq!(restored, data);
    }
}
