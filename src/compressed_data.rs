use std::collections::BTreeSet;

use crate::bit_io::{BitReader, BitSource};
use crate::code_table::CodeTable;
use crate::error::{HuffmanError, Result};
use crate::huffman_codec::CodecConfig;
use crate::hufftree::HuffmanTree;

/// Header of an artifact: the trie, the declared length and the bit counts.
#[derive(Debug, Clone)]
pub struct CompressedData {
    pub tree: HuffmanTree,
    pub original_length: usize,
    /// Bits taken by the trie and the length field.
    pub header_bits: usize,
    /// Bits after the header, padding included.
    pub payload_bits: usize,
}

impl CompressedData {
    /// Reads the trie and length field of `bytes` without decoding the
    /// message.
    pub fn parse(bytes: &[u8], config: &CodecConfig) -> Result<Self> {
        let mut reader = BitReader::new(bytes);
        let (tree, original_length) = read_header(&mut reader, config)?;
        Ok(CompressedData {
            tree,
            original_length,
            header_bits: reader.position(),
            payload_bits: reader.remaining(),
        })
    }

    pub fn code_table(&self) -> CodeTable {
        CodeTable::from_tree(&self.tree)
    }

    pub fn total_bits(&self) -> usize {
        self.header_bits + self.payload_bits
    }

    /// Upper bound on the message body, every symbol at the deepest leaf.
    pub fn max_message_bits(&self) -> usize {
        self.original_length * self.tree.depth()
    }
}

/// Reads the trie and the length field, checking every leaf against the
/// alphabet of `config`.
pub(crate) fn read_header<S: BitSource>(
    source: &mut S,
    config: &CodecConfig,
) -> Result<(HuffmanTree, usize)> {
    let tree = HuffmanTree::deserialize(source, config.symbol_width)?;

    let symbols = tree.symbols();
    if symbols.len() > config.alphabet.len() {
        return Err(HuffmanError::TooManyLeaves {
            leaves: symbols.len(),
            alphabet: config.alphabet.len(),
        });
    }
    let mut seen = BTreeSet::new();
    for symbol in symbols {
        if !config.alphabet.contains(symbol) {
            return Err(HuffmanError::SymbolNotInAlphabet { symbol });
        }
        if !seen.insert(symbol) {
            return Err(HuffmanError::DuplicateLeaf { symbol });
        }
    }

    let length = source
        .read_int()
        .map_err(|e| e.while_reading("length"))?;
    let length = usize::try_from(length).map_err(|_| HuffmanError::NegativeLength(length))?;
    Ok((tree, length))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::alphabet::Alphabet;
    use crate::bit_io::{BitSink, BitWriter};
    use crate::huffman_codec::HuffmanCodec;
    use crate::hufftree::HuffNode;

    fn artifact(tree: &HuffmanTree, length: i32) -> Vec<u8> {
        let mut writer = BitWriter::new();
        tree.serialize(&mut writer, 8).unwrap();
        writer.write_int(length).unwrap();
        writer.into_bytes()
    }

    #[test]
    fn header_of_abracadabra() {
        let alphabet = Alphabet::from_chars("abcdr").unwrap();
        let codec = HuffmanCodec::new(CodecConfig::default().with_alphabet(alphabet)).unwrap();
        let compressed = codec.compress(b"abracadabra").unwrap();

        let header = codec.inspect(&compressed).unwrap();
        assert_eq!(header.original_length, 11);
        assert_eq!(header.total_bits(), compressed.len() * 8);
        assert_eq!(header.max_message_bits(), 33);

        let table = header.code_table();
        assert_eq!(table.get(b'a').unwrap().len(), 1);
        assert!(header.payload_bits >= 23);
    }

    #[test]
    fn parse_matches_inspect() {
        let config = CodecConfig::default();
        let compressed = HuffmanCodec::default().compress(b"hello-world").unwrap();

        let parsed = CompressedData::parse(&compressed, &config).unwrap();
        assert_eq!(parsed.original_length, 11);
        assert_eq!(parsed.tree.leaf_count(), 8);
        assert_eq!(parsed.total_bits(), compressed.len() * 8);
    }

    #[test]
    fn leaf_outside_alphabet_is_rejected() {
        let config = CodecConfig::default().with_alphabet(Alphabet::from_chars("ab").unwrap());
        let tree = HuffmanTree {
            root: HuffNode::merge(HuffNode::new(b'a', 0), HuffNode::new(b'q', 0)),
        };

        let err = CompressedData::parse(&artifact(&tree, 2), &config).unwrap_err();
        assert!(matches!(err, HuffmanError::SymbolNotInAlphabet { symbol: b'q' }));
    }

    #[test]
    fn repeated_leaf_is_rejected() {
        let config = CodecConfig::default();
        let tree = HuffmanTree {
            root: HuffNode::merge(HuffNode::new(b'a', 0), HuffNode::new(b'a', 0)),
        };

        let err = CompressedData::parse(&artifact(&tree, 2), &config).unwrap_err();
        assert!(matches!(err, HuffmanError::DuplicateLeaf { symbol: b'a' }));
    }

    #[test]
    fn more_leaves_than_alphabet_is_rejected() {
        let config = CodecConfig::default().with_alphabet(Alphabet::from_chars("ab").unwrap());
        let tree = HuffmanTree {
            root: HuffNode::merge(
                HuffNode::new(b'a', 0),
                HuffNode::merge(HuffNode::new(b'b', 0), HuffNode::new(b'a', 0)),
            ),
        };

        let err = CompressedData::parse(&artifact(&tree, 3), &config).unwrap_err();
        assert!(matches!(
            err,
            HuffmanError::TooManyLeaves {
                leaves: 3,
                alphabet: 2
            }
        ));
    }
}
