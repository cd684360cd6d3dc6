use std::collections::BTreeMap;
use std::fmt;

use bitvec::prelude::*;

use crate::alphabet::Symbol;
use crate::frequency::FrequencyTable;
use crate::hufftree::{HuffNode, HuffmanTree};

pub type CodeWord = BitVec<u8, Msb0>;

/// Symbol to code word mapping derived from a [`HuffmanTree`].
///
/// Left edges contribute a `0`, right edges a `1`. A tree made of a single
/// leaf gives that symbol the empty code word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<Symbol, CodeWord>,
}

impl CodeTable {
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        fn walk(node: &HuffNode, path: &mut CodeWord, codes: &mut BTreeMap<Symbol, CodeWord>) {
            match node {
                HuffNode::Leaf { symbol, .. } => {
                    codes.insert(*symbol, path.clone());
                }
                HuffNode::Internal { left, right, .. } => {
                    path.push(false);
                    walk(left, path, codes);
                    path.pop();

                    path.push(true);
                    walk(right, path, codes);
                    path.pop();
                }
            }
        }

        let mut codes = BTreeMap::new();
        walk(&tree.root, &mut CodeWord::new(), &mut codes);
        CodeTable { codes }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&BitSlice<u8, Msb0>> {
        self.codes.get(&symbol).map(|code| code.as_bitslice())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &BitSlice<u8, Msb0>)> + '_ {
        self.codes
            .iter()
            .map(|(&symbol, code)| (symbol, code.as_bitslice()))
    }

    /// Size in bits of the message body for input counted by `frequencies`.
    pub fn encoded_bits(&self, frequencies: &FrequencyTable) -> usize {
        frequencies
            .present()
            .map(|(symbol, count)| count * self.codes.get(&symbol).map_or(0, |code| code.len()))
            .sum()
    }

    /// True when no code word starts with another one.
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<&CodeWord> = self.codes.values().collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !b.starts_with(a.as_bitslice()))
        })
    }
}

impl fmt::Display for CodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (symbol, code) in self.iter() {
            write!(f, "'{}': ", symbol as char)?;
            for bit in code.iter().by_vals() {
                write!(f, "{}", u8::from(bit))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
