//! Symbols of the code alphabet: the 256 byte values plus an end-of-stream marker.

use std::fmt;

/// Wire value of [`Symbol::Eof`], one past the last byte value.
pub const EOF_VALUE: u16 = 256;

/// A leaf symbol. Variant order gives the total order used everywhere a
/// deterministic ordering is needed: bytes ascending, then `Eof`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Byte(u8),
    Eof,
}

impl Symbol {
    pub fn to_wire(self) -> u16 {
        match self {
            Symbol::Byte(b) => b as u16,
            Symbol::Eof => EOF_VALUE,
        }
    }

    pub fn from_wire(value: u16) -> Option<Self> {
        match value {
            0..=255 => Some(Symbol::Byte(value as u8)),
            EOF_VALUE => Some(Symbol::Eof),
            _ => None,
        }
    }

    pub fn is_eof(self) -> bool {
        self == Symbol::Eof
    }
}

impl From<u8> for Symbol {
    fn from(byte: u8) -> Self {
        Symbol::Byte(byte)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Symbol::Byte(b) if b.is_ascii_graphic() => write!(f, "'{}'", b as char),
            Symbol::Byte(b' ') => write!(f, "' '"),
            Symbol::Byte(b) => write!(f, "0x{:02x}", b),
            Symbol::Eof => write!(f, "EOF"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eof_sorts_after_every_byte() {
        assert!(Symbol::Byte(255) < Symbol::Eof);
        assert!(Symbol::Byte(0) < Symbol::Byte(1));
    }

    #[test]
    fn test_wire_values() {
        assert_eq!(Symbol::Eof.to_wire(), 256);
        assert_eq!(Symbol::from_wire(97), Some(Symbol::Byte(b'a')));
        assert_eq!(Symbol::from_wire(256), Some(Symbol::Eof));
        assert_eq!(Symbol::from_wire(257), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Symbol::Byte(b'a').to_string(), "'a'");
        assert_eq!(Symbol::Byte(b'\n').to_string(), "0x0a");
        assert_eq!(Symbol::Eof.to_string(), "EOF");
    }
}
