use std::cmp::Ordering;
use std::fmt;

use log::trace;

use crate::alphabet::{Alphabet, Symbol};
use crate::bit_io::{BitSink, BitSource};
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::min_heap::MinHeap;

/// A Huffman trie. The root is a lone leaf when only one symbol occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    pub root: HuffNode,
}

impl HuffmanTree {
    /// Counts `symbols` against `alphabet` and builds the tree.
    pub fn from_symbols(symbols: &[Symbol], alphabet: &Alphabet) -> Result<Self> {
        Self::from_frequencies(&FrequencyTable::count(symbols, alphabet))
    }

    /// Builds the optimal prefix-code tree for the nonzero entries of
    /// `frequencies`.
    ///
    /// The two lightest nodes are merged until one remains, the first
    /// extracted becoming the left child. Equal weights are ordered by
    /// insertion: leaves in ascending symbol order, then merged nodes in the
    /// order they were created. Returns [`HuffmanError::EmptyInput`] when
    /// every count is zero.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
        let leaves: Vec<Queued> = frequencies
            .present()
            .enumerate()
            .map(|(seq, (symbol, count))| Queued {
                node: HuffNode::new(symbol, count),
                seq,
            })
            .collect();

        let mut next_seq = leaves.len();
        let mut heap = MinHeap::build(leaves);

        loop {
            let first = heap.extract_min().ok_or(HuffmanError::EmptyInput)?;
            let Some(second) = heap.extract_min() else {
                let tree = HuffmanTree { root: first.node };
                trace!(
                    "built tree: {} leaves, depth {}",
                    tree.leaf_count(),
                    tree.depth()
                );
                return Ok(tree);
            };

            heap.insert(Queued {
                node: HuffNode::merge(first.node, second.node),
                seq: next_seq,
            });
            next_seq += 1;
        }
    }

    /// A single-leaf tree, used to give an empty message a well-formed trie.
    pub fn single(symbol: Symbol) -> Self {
        HuffmanTree {
            root: HuffNode::new(symbol, 0),
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Leaf symbols in pre-order.
    pub fn symbols(&self) -> Vec<Symbol> {
        fn collect(node: &HuffNode, out: &mut Vec<Symbol>) {
            match node {
                HuffNode::Leaf { symbol, .. } => out.push(*symbol),
                HuffNode::Internal { left, right, .. } => {
                    collect(left, out);
                    collect(right, out);
                }
            }
        }

        let mut out = Vec::with_capacity(self.leaf_count());
        collect(&self.root, &mut out);
        out
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Writes the tree in pre-order: `1` plus the `width`-bit symbol for a
    /// leaf, `0` followed by both subtrees for an internal node.
    pub fn serialize<S: BitSink>(&self, sink: &mut S, width: u8) -> Result<()> {
        fn write_node<S: BitSink>(node: &HuffNode, sink: &mut S, width: u8) -> Result<()> {
            match node {
                HuffNode::Leaf { symbol, .. } => {
                    if width < 8 && *symbol >> width != 0 {
                        return Err(HuffmanError::SymbolOutOfRange {
                            symbol: *symbol,
                            width,
                        });
                    }
                    sink.write_bit(true)?;
                    sink.write_byte(*symbol, width)
                }
                HuffNode::Internal { left, right, .. } => {
                    sink.write_bit(false)?;
                    write_node(left, sink, width)?;
                    write_node(right, sink, width)
                }
            }
        }

        write_node(&self.root, sink, width)
    }

    /// Reads back a tree written by [`HuffmanTree::serialize`]. Weights of
    /// the rebuilt nodes are zero.
    ///
    /// Walks the pre-order stream with an explicit stack. Each entry is an
    /// internal node still waiting for children, holding its left subtree
    /// once that is complete.
    pub fn deserialize<S: BitSource>(source: &mut S, width: u8) -> Result<Self> {
        let max_depth = (1usize << width.min(8)) - 1;
        let mut pending: Vec<Option<HuffNode>> = Vec::new();

        loop {
            let is_leaf = source
                .read_bit()
                .map_err(|e| e.while_reading("trie"))?;

            if !is_leaf {
                if pending.len() >= max_depth {
                    return Err(HuffmanError::TrieTooDeep { max_depth });
                }
                pending.push(None);
                continue;
            }

            let symbol = source
                .read_byte(width)
                .map_err(|e| e.while_reading("trie"))?;
            let mut node = HuffNode::new(symbol, 0);

            // fold completed subtrees upward
            loop {
                match pending.pop() {
                    None => return Ok(HuffmanTree { root: node }),
                    Some(None) => {
                        pending.push(Some(node));
                        break;
                    }
                    Some(Some(left)) => node = HuffNode::merge(left, node),
                }
            }
        }
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_node(
            f: &mut fmt::Formatter<'_>,
            node: &HuffNode,
            depth: usize,
            label: &str,
        ) -> fmt::Result {
            let indent = "  ".repeat(depth);
            match node {
                HuffNode::Leaf { symbol, weight } => {
                    writeln!(
                        f,
                        "{}{}-> Leaf: '{}' ({}) [weight: {}]",
                        indent, label, *symbol as char, symbol, weight
                    )
                }
                HuffNode::Internal {
                    weight,
                    left,
                    right,
                } => {
                    writeln!(f, "{}{}-> Internal [weight: {}]", indent, label, weight)?;
                    write_node(f, left, depth + 1, "L")?;
                    write_node(f, right, depth + 1, "R")
                }
            }
        }

        write_node(f, &self.root, 0, "root")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: usize,
        symbol: Symbol,
    },
    Internal {
        weight: usize,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn new(symbol: Symbol, weight: usize) -> Self {
        HuffNode::Leaf { weight, symbol }
    }

    pub fn weight(&self) -> usize {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn merge(left: Self, right: Self) -> Self {
        let weight = left.weight() + right.weight();
        HuffNode::Internal {
            weight,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    fn leaf_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// Heap entry ordering nodes by weight, then by insertion sequence.
#[derive(Debug)]
struct Queued {
    node: HuffNode,
    seq: usize,
}

impl Queued {
    fn key(&self) -> (usize, usize) {
        (self.node.weight(), self.seq)
    }
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bit_io::{BitReader, BitWriter};

    fn abracadabra() -> HuffmanTree {
        let alphabet = Alphabet::from_chars("abcdr").unwrap();
        HuffmanTree::from_symbols(b"abracadabra", &alphabet).unwrap()
    }

    #[test]
    fn merges_lightest_nodes_first() {
        let tree = abracadabra();

        assert_eq!(tree.root.weight(), 11);
        assert_eq!(tree.leaf_count(), 5);

        // c(1)+d(1)=2, b(2)+r(2)=4, cd(2)+br(4)=6, a(5)+6=11
        let HuffNode::Internal { left, right, .. } = &tree.root else {
            panic!("expected an internal root");
        };
        assert_eq!(**left, HuffNode::new(b'a', 5));
        assert_eq!(right.weight(), 6);
        assert!(!right.is_leaf());
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.symbols(), b"acdbr".to_vec());
    }

    #[test]
    fn construction_is_deterministic() {
        let alphabet = Alphabet::default();
        let text = b"she sells sea shells by the sea shore";
        let a = HuffmanTree::from_symbols(text, &alphabet).unwrap();
        let b = HuffmanTree::from_symbols(text, &alphabet).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn single_symbol_is_a_lone_leaf() {
        let tree = HuffmanTree::from_symbols(b"zzzz", &Alphabet::default()).unwrap();
        assert_eq!(tree.root, HuffNode::new(b'z', 4));
        assert!(tree.root.is_leaf());
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.symbols(), vec![b'z']);
    }

    #[test]
    fn all_zero_frequencies_are_empty_input() {
        let result = HuffmanTree::from_symbols(b"", &Alphabet::default());
        assert!(matches!(result, Err(HuffmanError::EmptyInput)));
    }

    #[test]
    fn serialized_layout_is_preorder() {
        let alphabet = Alphabet::from_chars("ab").unwrap();
        let tree = HuffmanTree::from_symbols(b"abb", &alphabet).unwrap();

        let mut writer = BitWriter::new();
        tree.serialize(&mut writer, 8).unwrap();
        assert_eq!(writer.bit_count(), 19);

        // 0 | 1 'a' | 1 'b'
        let bytes = writer.into_bytes();
        assert_eq!(bytes, vec![0b0101_1000, 0b0110_1100, 0b0100_0000]);
    }

    #[test]
    fn deserialize_restores_shape() {
        let tree = abracadabra();
        let mut writer = BitWriter::new();
        tree.serialize(&mut writer, 8).unwrap();
        let bytes = writer.into_bytes();

        let mut reader = BitReader::new(&bytes);
        let restored = HuffmanTree::deserialize(&mut reader, 8).unwrap();

        assert_eq!(restored.leaf_count(), tree.leaf_count());
        assert_eq!(restored.depth(), tree.depth());
        assert_eq!(restored.to_string().lines().count(), 9);
        // 4 internal nodes + 5 leaves of 9 bits
        assert_eq!(reader.position(), 4 + 5 * 9);
    }

    #[test]
    fn narrow_symbol_width() {
        let alphabet = Alphabet::new([1, 2, 3]).unwrap();
        let tree = HuffmanTree::from_symbols(&[1, 2, 2, 3, 3, 3], &alphabet).unwrap();

        let mut writer = BitWriter::new();
        tree.serialize(&mut writer, 2).unwrap();
        assert_eq!(writer.bit_count(), 2 + 3 * 3);
        let bytes = writer.into_bytes();

        let restored = HuffmanTree::deserialize(&mut BitReader::new(&bytes), 2).unwrap();
        assert_eq!(restored.leaf_count(), 3);
    }

    #[test]
    fn symbol_wider_than_width_is_rejected() {
        let tree = HuffmanTree::single(b'a');
        let result = tree.serialize(&mut BitWriter::new(), 5);
        assert!(matches!(
            result,
            Err(HuffmanError::SymbolOutOfRange { symbol: b'a', width: 5 })
        ));
    }

    #[test]
    fn truncated_trie_is_a_format_error() {
        // 0 | 1 'a' | <nothing>
        let bytes = [0b0101_1000, 0b0100_0000];
        let result = HuffmanTree::deserialize(&mut BitReader::new(&bytes), 8);
        assert!(matches!(
            result,
            Err(HuffmanError::Truncated { while_reading: "trie" })
        ));
    }

    #[test]
    fn runaway_internal_nodes_are_rejected() {
        let bytes = [0u8; 64];
        let result = HuffmanTree::deserialize(&mut BitReader::new(&bytes), 8);
        assert!(matches!(
            result,
            Err(HuffmanError::TrieTooDeep { max_depth: 255 })
        ));
    }

    #[test]
    fn display_shows_structure() {
        let alphabet = Alphabet::from_chars("ab").unwrap();
        let tree = HuffmanTree::from_symbols(b"abb", &alphabet).unwrap();
        assert_eq!(
            tree.to_string(),
            "root-> Internal [weight: 3]\n  L-> Leaf: 'a' (97) [weight: 1]\n  R-> Leaf: 'b' (98) [weight: 2]\n"
        );
    }
}
