//! Symbol frequency counting.
//!
//! A [`FrequencyTable`] maps every symbol seen in a source to its occurrence
//! count, plus one [`Symbol::Eof`] entry that is always present. Counts drive
//! the shape of the code tree, so they are exact: counting in chunks through
//! a [`FrequencyCounter`] yields the same table as a single pass.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{CompressError, Result};
use crate::symbol::Symbol;

const READ_CHUNK: usize = 64 * 1024;

/// How [`FrequencyTable::build`] interprets its `source` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    /// `source` names a file whose bytes are counted.
    File,
    /// `source` is itself the text to count.
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<Symbol, u64>,
}

impl FrequencyTable {
    /// Count the bytes of `data`. The sentinel is added with count 1.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counter = FrequencyCounter::new();
        counter.update(data);
        counter.finish()
    }

    /// Count the bytes of a file (`SourceMode::File`) or of the string itself.
    pub fn build(source: &str, mode: SourceMode) -> Result<Self> {
        match mode {
            SourceMode::File => {
                let file = std::fs::File::open(Path::new(source))?;
                Self::from_reader(file)
            }
            SourceMode::Text => Ok(Self::from_bytes(source.as_bytes())),
        }
    }

    /// Count everything `reader` yields, chunk by chunk.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut counter = FrequencyCounter::new();
        let mut buf = vec![0u8; READ_CHUNK];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            counter.update(&buf[..n]);
        }
        Ok(counter.finish())
    }

    /// Build a table from explicit entries, as when it arrives from a header.
    ///
    /// Every count must be positive and the counts must sum without
    /// overflowing `u64`, so tree merges never overflow. The sentinel is not
    /// added here; callers that need it present check
    /// [`FrequencyTable::contains`].
    pub fn from_counts<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Symbol, u64)>,
    {
        let mut counts = BTreeMap::new();
        let mut total = 0u64;
        for (symbol, count) in entries {
            if count == 0 {
                return Err(CompressError::CorruptHeader(format!(
                    "non-positive count for {}",
                    symbol
                )));
            }
            if counts.insert(symbol, count).is_some() {
                return Err(CompressError::CorruptHeader(format!(
                    "duplicate entry for {}",
                    symbol
                )));
            }
            total = total.checked_add(count).ok_or_else(|| {
                CompressError::CorruptHeader("total count overflows u64".into())
            })?;
        }
        Ok(Self { counts })
    }

    pub fn get(&self, symbol: Symbol) -> Option<u64> {
        self.counts.get(&symbol).copied()
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.counts.contains_key(&symbol)
    }

    /// Number of distinct symbols, sentinel included.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, sentinel included.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Entries in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts.iter().map(|(&s, &c)| (s, c))
    }
}

impl fmt::Display for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (symbol, count)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", symbol, count)?;
        }
        write!(f, "}}")
    }
}

/// Incremental byte counter.
///
/// Partial counters built over disjoint chunks can be combined with
/// [`FrequencyCounter::merge`] in any grouping or order.
#[derive(Debug, Clone)]
pub struct FrequencyCounter {
    bytes: [u64; 256],
}

impl Default for FrequencyCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self { bytes: [0; 256] }
    }

    pub fn update(&mut self, data: &[u8]) {
        for &b in data {
            self.bytes[b as usize] += 1;
        }
    }

    pub fn merge(&mut self, other: &FrequencyCounter) {
        for (mine, theirs) in self.bytes.iter_mut().zip(other.bytes.iter()) {
            *mine += *theirs;
        }
    }

    /// Freeze the counts into a table and add the sentinel.
    pub fn finish(self) -> FrequencyTable {
        let mut counts: BTreeMap<Symbol, u64> = self
            .bytes
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(b, &c)| (Symbol::Byte(b as u8), c))
            .collect();
        counts.insert(Symbol::Eof, 1);
        debug!(symbols = counts.len(), "built frequency table");
        FrequencyTable { counts }
    }
}
