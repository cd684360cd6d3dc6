use std::io::{Read, Write};

use log::{debug, trace};

use crate::alphabet::{Alphabet, Symbol};
use crate::bit_io::{BitReader, BitSink, BitSource, BitWriter, StreamBitReader, StreamBitWriter};
use crate::code_table::CodeTable;
use crate::compressed_data::{self, CompressedData};
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::hufftree::{HuffNode, HuffmanTree};

/// Settings shared by the compressing and the decompressing side.
///
/// The artifact does not record them, so both sides must agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Symbols that may be encoded.
    pub alphabet: Alphabet,
    /// Bits used for each symbol stored in the serialized trie.
    pub symbol_width: u8,
    /// Whether an empty message compresses to a trivial artifact or fails
    /// with [`HuffmanError::EmptyInput`].
    pub allow_empty: bool,
}

impl CodecConfig {
    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    pub fn with_symbol_width(mut self, symbol_width: u8) -> Self {
        self.symbol_width = symbol_width;
        self
    }

    pub fn with_allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = allow_empty;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=8).contains(&self.symbol_width) {
            return Err(HuffmanError::InvalidSymbolWidth(self.symbol_width));
        }
        if self.alphabet.is_empty() {
            return Err(HuffmanError::EmptyAlphabet);
        }
        let largest = self.alphabet.largest();
        if self.symbol_width < 8 && largest >> self.symbol_width != 0 {
            return Err(HuffmanError::SymbolOutOfRange {
                symbol: largest,
                width: self.symbol_width,
            });
        }
        Ok(())
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            alphabet: Alphabet::default(),
            symbol_width: 8,
            allow_empty: true,
        }
    }
}

/// Writes the code word of every symbol, in order.
pub fn encode_message<S: BitSink>(symbols: &[Symbol], table: &CodeTable, sink: &mut S) -> Result<()> {
    for &symbol in symbols {
        let code = table
            .get(symbol)
            .ok_or(HuffmanError::UnknownSymbol { symbol })?;
        sink.write_bits(code)?;
    }
    Ok(())
}

/// Reads `length` symbols by walking `tree` from the root, one bit per edge.
///
/// A tree that is a single leaf consumes no bits at all.
pub fn decode_message<S: BitSource>(
    tree: &HuffmanTree,
    length: usize,
    source: &mut S,
) -> Result<Vec<Symbol>> {
    let mut result = Vec::with_capacity(length.min(1 << 16));

    for _ in 0..length {
        let mut current_node = &tree.root;

        // walk the tree until we hit a leaf
        loop {
            match current_node {
                HuffNode::Leaf { symbol, .. } => {
                    result.push(*symbol);
                    break;
                }
                HuffNode::Internal { left, right, .. } => {
                    let bit = source
                        .read_bit()
                        .map_err(|e| e.while_reading("message"))?;
                    current_node = if bit { right } else { left };
                }
            }
        }
    }

    Ok(result)
}

/// Compressor and decompressor for one [`CodecConfig`].
///
/// An artifact is the pre-order trie, the message length as a 32-bit signed
/// integer, and the concatenated code words, padded to a whole byte.
#[derive(Debug, Clone, Default)]
pub struct HuffmanCodec {
    config: CodecConfig,
}

impl HuffmanCodec {
    pub fn new(config: CodecConfig) -> Result<Self> {
        config.validate()?;
        Ok(HuffmanCodec { config })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn compress(&self, symbols: &[Symbol]) -> Result<Vec<u8>> {
        let mut writer = BitWriter::new();
        self.compress_into(symbols, &mut writer)?;
        Ok(writer.into_bytes())
    }

    /// Writes the artifact for `symbols` to `sink`, then closes it. The sink
    /// is closed on failure too.
    pub fn compress_into<S: BitSink>(&self, symbols: &[Symbol], sink: &mut S) -> Result<()> {
        let written = self.write_artifact(symbols, sink);
        let closed = sink.close();
        written.and(closed)
    }

    pub fn compress_to_writer<W: Write>(&self, symbols: &[Symbol], writer: W) -> Result<()> {
        let mut sink = StreamBitWriter::new(writer);
        self.compress_into(symbols, &mut sink)
    }

    /// Decodes an artifact. Every trie leaf must belong to the configured
    /// alphabet.
    ///
    /// The output size is bounded only by the length field: a single-leaf
    /// trie spends zero bits per symbol, so a few bytes may declare up to
    /// `i32::MAX` symbols. Check [`HuffmanCodec::inspect`] first when the
    /// artifact is untrusted.
    pub fn decompress(&self, bytes: &[u8]) -> Result<Vec<Symbol>> {
        self.decompress_from(&mut BitReader::new(bytes))
    }

    pub fn decompress_from<S: BitSource>(&self, source: &mut S) -> Result<Vec<Symbol>> {
        let (tree, length) = compressed_data::read_header(source, &self.config)?;
        debug!(
            "decoding {} symbols with a {}-leaf trie",
            length,
            tree.leaf_count()
        );
        decode_message(&tree, length, source)
    }

    pub fn decompress_from_reader<R: Read>(&self, reader: R) -> Result<Vec<Symbol>> {
        self.decompress_from(&mut StreamBitReader::new(reader))
    }

    /// Reads the trie and length of an artifact without decoding the message.
    pub fn inspect(&self, bytes: &[u8]) -> Result<CompressedData> {
        CompressedData::parse(bytes, &self.config)
    }

    fn write_artifact<S: BitSink>(&self, symbols: &[Symbol], sink: &mut S) -> Result<()> {
        let length =
            i32::try_from(symbols.len()).map_err(|_| HuffmanError::MessageTooLong(symbols.len()))?;

        let frequencies = FrequencyTable::count(symbols, &self.config.alphabet);
        debug!("frequencies: {}", frequencies);

        let tree = match HuffmanTree::from_frequencies(&frequencies) {
            Ok(tree) => tree,
            Err(HuffmanError::EmptyInput) if self.config.allow_empty => {
                HuffmanTree::single(self.config.alphabet.first())
            }
            Err(e) => return Err(e),
        };
        let table = CodeTable::from_tree(&tree);
        trace!("code table:\n{}", table);

        tree.serialize(sink, self.config.symbol_width)?;
        sink.write_int(length)?;
        encode_message(symbols, &table, sink)?;

        debug!(
            "encoded {} symbols into {} message bits",
            symbols.len(),
            table.encoded_bits(&frequencies)
        );
        Ok(())
    }
}

/// Compresses `symbols` with the default configuration.
pub fn compress(symbols: &[Symbol]) -> Result<Vec<u8>> {
    HuffmanCodec::default().compress(symbols)
}

/// Decompresses an artifact written with the default configuration. See
/// [`HuffmanCodec::decompress`] for the output size bound.
pub fn decompress(bytes: &[u8]) -> Result<Vec<Symbol>> {
    HuffmanCodec::default().decompress(bytes)
}
