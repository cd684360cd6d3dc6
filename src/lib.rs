//! # huffpack
//!
//! Huffman compression for text drawn from a small, fixed alphabet.
//!
//! An artifact holds the code trie in pre-order, the message length as a
//! 32-bit signed integer, and the encoded message, all MSB first and padded
//! to a whole byte.
//!
//! ## Quick Start
//!
//! ```rust
//! use huffpack::{compress, decompress};
//!
//! let compressed = compress(b"abracadabra")?;
//! assert_eq!(decompress(&compressed)?, b"abracadabra");
//! # Ok::<(), huffpack::HuffmanError>(())
//! ```
//!
//! Custom alphabets and symbol widths go through [`CodecConfig`]:
//!
//! ```rust
//! use huffpack::{Alphabet, CodecConfig, HuffmanCodec};
//!
//! let config = CodecConfig::default().with_alphabet(Alphabet::from_chars("acgt")?);
//! let codec = HuffmanCodec::new(config)?;
//! let compressed = codec.compress(b"gattaca")?;
//! assert_eq!(codec.inspect(&compressed)?.original_length, 7);
//! # Ok::<(), huffpack::HuffmanError>(())
//! ```

pub mod alphabet;
pub mod bit_io;
pub mod code_table;
pub mod compressed_data;
pub mod error;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;

// Internal modules - not part of public API
mod min_heap;

// Re-export main types for convenience
pub use alphabet::{Alphabet, Symbol, DEFAULT_ALPHABET};
pub use bit_io::{BitReader, BitSink, BitSource, BitWriter, StreamBitReader, StreamBitWriter};
pub use code_table::CodeTable;
pub use compressed_data::CompressedData;
pub use error::{ErrorKind, HuffmanError, Result};
pub use frequency::FrequencyTable;
pub use huffman_codec::{compress, decompress, decode_message, encode_message, CodecConfig, HuffmanCodec};
pub use hufftree::{HuffNode, HuffmanTree};
