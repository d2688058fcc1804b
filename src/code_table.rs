//! Symbol → bit-path lookup derived from a [`CodeTree`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CompressError;
use crate::frequency::FrequencyTable;
use crate::symbol::Symbol;
use crate::tree::{CodeTree, Node};

/// A root-to-leaf path: `false` for the zero-child, `true` for the one-child.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }

    fn with(&self, bit: bool) -> Code {
        let mut bits = Vec::with_capacity(self.bits.len() + 1);
        bits.extend_from_slice(&self.bits);
        bits.push(bit);
        Code { bits }
    }
}

impl From<Vec<bool>> for Code {
    fn from(bits: Vec<bool>) -> Self {
        Code { bits }
    }
}

impl FromStr for Code {
    type Err = CompressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(CompressError::InvalidBit(other)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Code::from)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeTable {
    codes: BTreeMap<Symbol, Code>,
}

impl CodeTable {
    /// Walk the tree zero-child first and record each leaf's path.
    ///
    /// A tree that is a single leaf gives that symbol the code `0`, so every
    /// symbol still costs at least one bit.
    pub fn from_tree(tree: &CodeTree) -> Self {
        let mut codes = BTreeMap::new();
        if let Node::Leaf { symbol, .. } = tree.root() {
            codes.insert(*symbol, Code::from(vec![false]));
            return Self { codes };
        }

        // explicit stack: skewed inputs can make the tree deep
        let mut stack = vec![(tree.root(), Code::default())];
        while let Some((node, path)) = stack.pop() {
            match node {
                Node::Leaf { symbol, .. } => {
                    codes.insert(*symbol, path);
                }
                Node::Internal { zero, one, .. } => {
                    stack.push((&**one, path.with(true)));
                    stack.push((&**zero, path.with(false)));
                }
            }
        }
        Self { codes }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> + '_ {
        self.codes.iter().map(|(&s, c)| (s, c))
    }

    /// True when no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<&Code> = self.codes.values().collect();
        codes.sort_by(|a, b| a.bits.cmp(&b.bits));
        // in sorted order a prefix always sits directly before some extension of it
        codes.windows(2).all(|w| !w[0].is_prefix_of(w[1]))
    }

    /// Payload length in bits when encoding data with these frequencies.
    pub fn weighted_bits(&self, table: &FrequencyTable) -> u64 {
        table
            .iter()
            .filter_map(|(symbol, count)| self.get(symbol).map(|c| c.len() as u64 * count))
            .sum()
    }
}

impl fmt::Display for CodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (symbol, code) in self.iter() {
            writeln!(f, "{}: {}", symbol, code)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_for(data: &[u8]) -> (FrequencyTable, CodeTable) {
        let freq = FrequencyTable::from_bytes(data);
        let tree = CodeTree::build(&freq).unwrap();
        (freq, CodeTable::from_tree(&tree))
    }

    #[test]
    fn test_aab_codes() {
        let (_, codes) = table_for(b"aab");
        let a = codes.get(Symbol::Byte(b'a')).unwrap();
        let b = codes.get(Symbol::Byte(b'b')).unwrap();
        let eof = codes.get(Symbol::Eof).unwrap();
        assert!(a.len() < b.len());
        assert!(a.len() < eof.len());
        assert_eq!(a.to_string(), "0");
        assert_eq!(b.to_string(), "10");
        assert_eq!(eof.to_string(), "11");
    }

    #[test]
    fn test_prefix_free() {
        let text = b"it was the best of times, it was the worst of times";
        let (freq, codes) = table_for(text);
        assert_eq!(codes.len(), freq.len());
        assert!(codes.is_prefix_free());

        let all: Vec<&Code> = codes.iter().map(|(_, c)| c).collect();
        for (i, a) in all.iter().enumerate() {
            for (j, b) in all.iter().enumerate() {
                if i != j {
                    assert!(!a.is_prefix_of(b), "{} is a prefix of {}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_detects_prefix_violation() {
        let mut codes = BTreeMap::new();
        codes.insert(Symbol::Byte(1), "01".parse::<Code>().unwrap());
        codes.insert(Symbol::Byte(2), "011".parse::<Code>().unwrap());
        codes.insert(Symbol::Eof, "1".parse::<Code>().unwrap());
        assert!(!CodeTable { codes }.is_prefix_free());
    }

    #[test]
    fn test_single_leaf_gets_one_bit() {
        let (_, codes) = table_for(b"");
        assert_eq!(codes.get(Symbol::Eof).unwrap().to_string(), "0");
    }

    #[test]
    fn test_deterministic() {
        let (_, a) = table_for(b"abracadabra");
        let (_, b) = table_for(b"abracadabra");
        assert_eq!(a, b);
    }

    #[test]
    fn test_weighted_bits() {
        let (freq, codes) = table_for(b"aab");
        // a:2*1 + b:1*2 + EOF:1*2
        assert_eq!(codes.weighted_bits(&freq), 6);
    }

    #[test]
    fn test_code_parse_rejects_other_characters() {
        assert!(matches!(
            "0120".parse::<Code>(),
            Err(CompressError::InvalidBit('2'))
        ));
        assert_eq!("0110".parse::<Code>().unwrap().to_string(), "0110");
    }
}
