//! Container header: the serialized frequency table that precedes the payload.
//!
//! Layout, little-endian:
//! `[version:u8][entries:u16]` then per entry `[symbol:u16][count:u64]`,
//! entries in ascending symbol order, symbol 256 being the sentinel. The
//! packed bit payload follows the last entry directly.

use std::io::{self, Read, Write};

use tracing::debug;

use crate::error::{CompressError, Result};
use crate::frequency::FrequencyTable;
use crate::symbol::{Symbol, EOF_VALUE};

pub const FORMAT_VERSION: u8 = 1;

const MAX_ENTRIES: usize = EOF_VALUE as usize + 1;
const ENTRY_LEN: usize = 2 + 8;

/// Bytes the header for `table` occupies.
pub fn header_len(table: &FrequencyTable) -> usize {
    1 + 2 + table.len() * ENTRY_LEN
}

pub fn write_header<W: Write>(table: &FrequencyTable, mut output: W) -> Result<()> {
    let mut header = Vec::with_capacity(header_len(table));
    header.push(FORMAT_VERSION);
    header.extend_from_slice(&(table.len() as u16).to_le_bytes());
    for (symbol, count) in table.iter() {
        header.extend_from_slice(&symbol.to_wire().to_le_bytes());
        header.extend_from_slice(&count.to_le_bytes());
    }
    output.write_all(&header)?;
    Ok(())
}

/// Read a header and leave `input` positioned at the first payload byte.
pub fn read_header<R: Read>(mut input: R) -> Result<FrequencyTable> {
    let mut version = [0u8; 1];
    read_field(&mut input, &mut version, "version")?;
    if version[0] != FORMAT_VERSION {
        return Err(CompressError::CorruptHeader(format!(
            "unsupported version {}",
            version[0]
        )));
    }

    let mut len_bytes = [0u8; 2];
    read_field(&mut input, &mut len_bytes, "entry count")?;
    let entries = u16::from_le_bytes(len_bytes) as usize;
    if entries == 0 || entries > MAX_ENTRIES {
        return Err(CompressError::CorruptHeader(format!(
            "entry count {} out of range 1..={}",
            entries, MAX_ENTRIES
        )));
    }

    let mut pairs = Vec::with_capacity(entries);
    let mut previous: Option<Symbol> = None;
    for i in 0..entries {
        let mut entry = [0u8; ENTRY_LEN];
        read_field(&mut input, &mut entry, "entry")?;
        let wire = u16::from_le_bytes([entry[0], entry[1]]);
        let symbol = Symbol::from_wire(wire).ok_or_else(|| {
            CompressError::CorruptHeader(format!("entry {} has invalid symbol {}", i, wire))
        })?;
        if previous.is_some_and(|p| p >= symbol) {
            return Err(CompressError::CorruptHeader(format!(
                "entry {} ({}) is out of order",
                i, symbol
            )));
        }
        previous = Some(symbol);

        let mut count = [0u8; 8];
        count.copy_from_slice(&entry[2..]);
        pairs.push((symbol, u64::from_le_bytes(count)));
    }

    let table = FrequencyTable::from_counts(pairs)?;
    if !table.contains(Symbol::Eof) {
        return Err(CompressError::CorruptHeader(
            "missing end-of-stream entry".into(),
        ));
    }
    debug!(symbols = table.len(), "read container header");
    Ok(table)
}

fn read_field<R: Read>(input: &mut R, buf: &mut [u8], what: &str) -> Result<()> {
    input.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => {
            CompressError::CorruptHeader(format!("header truncated in {}", what))
        }
        _ => CompressError::Io(e),
    })
}
