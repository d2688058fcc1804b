//! Bit-level encoding of a byte stream with a [`CodeTable`].
//!
//! Bits are packed most-significant-first. After the input the sentinel's
//! code is written, then the last byte is padded with zero bits; the padding
//! carries no meaning because decoders stop at the sentinel.

use std::io::{Read, Write};

use bitstream_io::{BigEndian, BitWrite, BitWriter};
use tracing::trace;

use crate::code_table::{Code, CodeTable};
use crate::error::{CompressError, Result};
use crate::symbol::Symbol;

const READ_CHUNK: usize = 64 * 1024;

/// What [`encode`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    /// Every bit written, as `'0'`/`'1'` characters, sentinel code included.
    pub bits: String,
    /// Number of meaningful bits, excluding byte padding.
    pub bit_count: u64,
}

/// Encode everything `input` yields and return the bit string as well.
pub fn encode<R: Read, W: Write>(input: R, table: &CodeTable, output: W) -> Result<Encoded> {
    let mut bits = String::new();
    let bit_count = encode_inner(input, table, output, Some(&mut bits))?;
    Ok(Encoded { bits, bit_count })
}

/// Like [`encode`] but only counts bits, for inputs too large to mirror as text.
pub fn encode_to<R: Read, W: Write>(input: R, table: &CodeTable, output: W) -> Result<u64> {
    encode_inner(input, table, output, None)
}

/// Pack a textual bit string into bytes, zero-padding the last byte.
///
/// Any character other than `'0'` or `'1'` is rejected before anything is
/// written.
pub fn write_bit_string<W: Write>(bits: &str, output: W) -> Result<u64> {
    let code: Code = bits.parse()?;
    let mut writer = BitWriter::endian(output, BigEndian);
    write_code(&mut writer, &code, None)?;
    finish(writer)?;
    Ok(code.len() as u64)
}

fn encode_inner<R: Read, W: Write>(
    mut input: R,
    table: &CodeTable,
    output: W,
    mut record: Option<&mut String>,
) -> Result<u64> {
    let mut writer = BitWriter::endian(output, BigEndian);
    let mut bit_count = 0u64;
    let mut offset = 0u64;
    let mut buf = vec![0u8; READ_CHUNK];

    loop {
        let n = input.read(&mut buf)?;
        if n == 0 {
            break;
        }
        for &byte in &buf[..n] {
            let symbol = Symbol::Byte(byte);
            let code = table
                .get(symbol)
                .ok_or(CompressError::MalformedInput { symbol, offset })?;
            write_code(&mut writer, code, record.as_deref_mut())?;
            bit_count += code.len() as u64;
            offset += 1;
        }
    }

    let eof = table.get(Symbol::Eof).ok_or(CompressError::MalformedInput {
        symbol: Symbol::Eof,
        offset,
    })?;
    write_code(&mut writer, eof, record.as_deref_mut())?;
    bit_count += eof.len() as u64;

    finish(writer)?;
    trace!(bytes = offset, bits = bit_count, "encoded payload");
    Ok(bit_count)
}

fn write_code<W: Write>(
    writer: &mut BitWriter<W, BigEndian>,
    code: &Code,
    record: Option<&mut String>,
) -> Result<()> {
    for &bit in code.bits() {
        writer.write_bit(bit)?;
    }
    if let Some(text) = record {
        text.push_str(&code.to_string());
    }
    Ok(())
}

fn finish<W: Write>(mut writer: BitWriter<W, BigEndian>) -> Result<()> {
    writer.byte_align()?;
    writer.into_writer().flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;
    use crate::tree::CodeTree;

    fn codes_for(data: &[u8]) -> CodeTable {
        let tree = CodeTree::build(&FrequencyTable::from_bytes(data)).unwrap();
        CodeTable::from_tree(&tree)
    }

    #[test]
    fn test_aab_bit_string() {
        let codes = codes_for(b"aab");
        let mut out = Vec::new();
        let encoded = encode(&b"aab"[..], &codes, &mut out).unwrap();
        // a=0 a=0 b=10 EOF=11
        assert_eq!(encoded.bits, "001011");
        assert_eq!(encoded.bit_count, 6);
        assert_eq!(out, vec![0b0010_1100]);
    }

    #[test]
    fn test_empty_input_is_just_sentinel() {
        let codes = codes_for(b"xy");
        let mut out = Vec::new();
        let encoded = encode(&b""[..], &codes, &mut out).unwrap();
        assert_eq!(encoded.bits, codes.get(Symbol::Eof).unwrap().to_string());
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_unknown_byte_fails() {
        let codes = codes_for(b"aab");
        let result = encode(&b"abc"[..], &codes, Vec::new());
        match result {
            Err(CompressError::MalformedInput { symbol, offset }) => {
                assert_eq!(symbol, Symbol::Byte(b'c'));
                assert_eq!(offset, 2);
            }
            other => panic!("expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_to_matches_encode() {
        let data = b"hello world hello world";
        let codes = codes_for(data);
        let mut a = Vec::new();
        let mut b = Vec::new();
        let encoded = encode(&data[..], &codes, &mut a).unwrap();
        let count = encode_to(&data[..], &codes, &mut b).unwrap();
        assert_eq!(a, b);
        assert_eq!(encoded.bit_count, count);
        assert_eq!(encoded.bits.len() as u64, count);
    }

    #[test]
    fn test_write_bit_string() {
        let mut out = Vec::new();
        let n = write_bit_string("101000001", &mut out).unwrap();
        assert_eq!(n, 9);
        assert_eq!(out, vec![0b1010_0000, 0b1000_0000]);
    }

    #[test]
    fn test_write_bit_string_rejects_non_bits() {
        let mut out = Vec::new();
        let result = write_bit_string("10x1", &mut out);
        assert!(matches!(result, Err(CompressError::InvalidBit('x'))));
        assert!(out.is_empty());
    }
}
