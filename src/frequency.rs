use std::collections::BTreeMap;
use std::fmt;

use crate::alphabet::{Alphabet, Symbol};

/// Occurrence counts for every symbol of an alphabet.
///
/// Symbols that never occur keep a zero entry, so the table always covers
/// the whole alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<Symbol, usize>,
}

impl FrequencyTable {
    /// Counts `symbols` against `alphabet`. Anything outside the alphabet is
    /// skipped.
    pub fn count(symbols: &[Symbol], alphabet: &Alphabet) -> Self {
        let counts = symbols.iter().copied().fold(
            alphabet.iter().map(|symbol| (symbol, 0)).collect::<BTreeMap<_, _>>(),
            |mut acc, symbol| {
                if let Some(count) = acc.get_mut(&symbol) {
                    *count += 1;
                }
                acc
            },
        );

        FrequencyTable { counts }
    }

    /// Count for `symbol`, or `None` if it is not part of the alphabet.
    pub fn get(&self, symbol: Symbol) -> Option<usize> {
        self.counts.get(&symbol).copied()
    }

    /// Total number of counted symbols.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, usize)> + '_ {
        self.counts.iter().map(|(&symbol, &count)| (symbol, count))
    }

    /// Symbols with a nonzero count, ascending.
    pub fn present(&self) -> impl Iterator<Item = (Symbol, usize)> + '_ {
        self.iter().filter(|&(_, count)| count > 0)
    }
}

impl fmt::Display for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (symbol, count)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", symbol as char, count)?;
        }
        write!(f, "}}")
    }
}
