use std::collections::BTreeSet;
use std::fmt;

use crate::error::{HuffmanError, Result};

/// One unit of input. Symbols are serialized in a fixed number of bits.
pub type Symbol = u8;

/// Lowercase letters plus a handful of punctuation marks.
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz-!.+";

/// The closed set of symbols a codec accepts, kept in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: BTreeSet<Symbol>,
}

impl Alphabet {
    pub fn new<I: IntoIterator<Item = Symbol>>(symbols: I) -> Result<Self> {
        let symbols: BTreeSet<Symbol> = symbols.into_iter().collect();
        if symbols.is_empty() {
            return Err(HuffmanError::EmptyAlphabet);
        }
        Ok(Alphabet { symbols })
    }

    /// Builds an alphabet from the bytes of `chars`. Duplicates collapse.
    pub fn from_chars(chars: &str) -> Result<Self> {
        Self::new(chars.bytes())
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.symbols.contains(&symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Smallest symbol of the alphabet.
    pub fn first(&self) -> Symbol {
        // never empty, checked in `new`
        self.symbols.first().copied().unwrap_or_default()
    }

    pub fn largest(&self) -> Symbol {
        self.symbols.last().copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.symbols.iter().copied()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Alphabet {
            symbols: DEFAULT_ALPHABET.bytes().collect(),
        }
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in self.iter() {
            write!(f, "{}", symbol as char)?;
        }
        Ok(())
    }
}
