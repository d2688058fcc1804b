//! Bit-level decoding by walking a [`CodeTree`].

use std::io::{self, Read, Write};

use bitstream_io::{BigEndian, BitRead, BitReader};
use tracing::trace;

use crate::error::{CompressError, Result};
use crate::symbol::Symbol;
use crate::tree::{CodeTree, Node};

const FLUSH_AT: usize = 64 * 1024;

/// Decode until the sentinel and return the bytes, also writing them to `output`.
///
/// Nothing is written unless the sentinel is reached.
pub fn decode<R: Read, W: Write>(input: R, tree: &CodeTree, mut output: W) -> Result<Vec<u8>> {
    let mut decoded = Vec::new();
    walk(input, tree, |byte| {
        decoded.push(byte);
        Ok(())
    })?;
    output.write_all(&decoded)?;
    output.flush()?;
    Ok(decoded)
}

/// Streaming form of [`decode`]: bytes are written in batches as they are
/// decoded and only the count is returned. On a truncated payload part of the
/// output may already have been written.
pub fn decode_to<R: Read, W: Write>(input: R, tree: &CodeTree, mut output: W) -> Result<u64> {
    let mut pending = Vec::with_capacity(FLUSH_AT);
    let mut total = 0u64;
    walk(input, tree, |byte| {
        pending.push(byte);
        total += 1;
        if pending.len() == FLUSH_AT {
            output.write_all(&pending)?;
            pending.clear();
        }
        Ok(())
    })?;
    output.write_all(&pending)?;
    output.flush()?;
    Ok(total)
}

/// Feed each decoded byte to `emit`; returns once the sentinel leaf is hit.
///
/// Reaching the sentinel is the only way out short of an error. Running out
/// of bits first is a truncated payload.
fn walk<R, F>(input: R, tree: &CodeTree, mut emit: F) -> Result<()>
where
    R: Read,
    F: FnMut(u8) -> io::Result<()>,
{
    let mut reader = BitReader::endian(input, BigEndian);
    let root = tree.root();
    let mut cursor = root;
    let mut decoded = 0usize;

    loop {
        let bit = match reader.read_bit() {
            Ok(bit) => bit,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(CompressError::TruncatedPayload { decoded });
            }
            Err(e) => return Err(e.into()),
        };

        cursor = match cursor {
            Node::Internal { zero, one, .. } => {
                if bit {
                    &**one
                } else {
                    &**zero
                }
            }
            // a single-leaf tree: every code is one bit long
            Node::Leaf { .. } => cursor,
        };

        if let Node::Leaf { symbol, .. } = cursor {
            match symbol {
                Symbol::Eof => break,
                Symbol::Byte(b) => {
                    emit(*b)?;
                    decoded += 1;
                    cursor = root;
                }
            }
        }
    }

    trace!(bytes = decoded, "decoded payload");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code_table::CodeTable;
    use crate::encoder::{encode, write_bit_string};
    use crate::frequency::FrequencyTable;

    fn tree_for(data: &[u8]) -> CodeTree {
        CodeTree::build(&FrequencyTable::from_bytes(data)).unwrap()
    }

    #[test]
    fn test_aab_decodes() {
        let tree = tree_for(b"aab");
        let mut payload = Vec::new();
        write_bit_string("001011", &mut payload).unwrap();
        let mut out = Vec::new();
        let decoded = decode(&payload[..], &tree, &mut out).unwrap();
        assert_eq!(decoded, b"aab");
        assert_eq!(out, b"aab");
    }

    #[test]
    fn test_stops_at_sentinel_ignoring_trailing_bits() {
        let tree = tree_for(b"aab");
        let mut payload = Vec::new();
        // a, EOF, then a trailing 'b' that must never be emitted
        write_bit_string("01110", &mut payload).unwrap();
        let decoded = decode(&payload[..], &tree, Vec::new()).unwrap();
        assert_eq!(decoded, b"a");
    }

    #[test]
    fn test_sentinel_only_payload_is_empty() {
        let tree = tree_for(b"aab");
        let mut payload = Vec::new();
        write_bit_string("11", &mut payload).unwrap();
        let decoded = decode(&payload[..], &tree, Vec::new()).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_single_leaf_tree() {
        let tree = tree_for(b"");
        let mut payload = Vec::new();
        write_bit_string("0", &mut payload).unwrap();
        let decoded = decode(&payload[..], &tree, Vec::new()).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_truncated_payload() {
        let data = b"the quick brown fox";
        let tree = tree_for(data);
        let codes = CodeTable::from_tree(&tree);
        let encoded = encode(&data[..], &codes, Vec::new()).unwrap();

        let mut payload = Vec::new();
        write_bit_string(&encoded.bits, &mut payload).unwrap();
        // the sentinel's last bit always lives in the final byte
        let payload = &payload[..payload.len() - 1];

        let mut out = Vec::new();
        let result = decode(payload, &tree, &mut out);
        assert!(matches!(
            result,
            Err(CompressError::TruncatedPayload { .. })
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_empty_payload_is_truncated() {
        let tree = tree_for(b"abc");
        let result = decode(&[][..], &tree, Vec::new());
        assert!(matches!(
            result,
            Err(CompressError::TruncatedPayload { decoded: 0 })
        ));
    }

    #[test]
    fn test_decode_to_streams() {
        let data: Vec<u8> = b"streaming output ".repeat(10_000);
        let tree = tree_for(&data);
        let codes = CodeTable::from_tree(&tree);
        let mut payload = Vec::new();
        crate::encoder::encode_to(&data[..], &codes, &mut payload).unwrap();

        let mut out = Vec::new();
        let n = decode_to(&payload[..], &tree, &mut out).unwrap();
        assert_eq!(n, data.len() as u64);
        assert_eq!(out, data);
    }
}
