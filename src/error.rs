use thiserror::Error;

pub type Result<T> = std::result::Result<T, HuffmanError>;

/// Coarse classification of a [`HuffmanError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input handed to `compress` cannot be encoded.
    Input,
    /// The artifact handed to `decompress` is malformed or truncated.
    Format,
    /// A symbol has no code word, compress and decompress disagree on the alphabet.
    Encoding,
    /// The codec configuration itself is unusable.
    Config,
    /// The underlying byte stream failed.
    Io,
}

#[derive(Error, Debug)]
pub enum HuffmanError {
    #[error("no symbols to compress")]
    EmptyInput,

    #[error("message of {0} symbols does not fit the 32-bit length field")]
    MessageTooLong(usize),

    #[error("artifact truncated while reading {while_reading}")]
    Truncated { while_reading: &'static str },

    #[error("artifact declares a negative message length ({0})")]
    NegativeLength(i32),

    #[error("serialized trie is deeper than {max_depth} levels")]
    TrieTooDeep { max_depth: usize },

    #[error("trie leaf {symbol:#04x} is not in the alphabet")]
    SymbolNotInAlphabet { symbol: u8 },

    #[error("trie holds {leaves} leaves but the alphabet has {alphabet} symbols")]
    TooManyLeaves { leaves: usize, alphabet: usize },

    #[error("trie holds symbol {symbol:#04x} more than once")]
    DuplicateLeaf { symbol: u8 },

    #[error("symbol {symbol:#04x} has no code word")]
    UnknownSymbol { symbol: u8 },

    #[error("symbol {symbol:#04x} does not fit in {width} bits")]
    SymbolOutOfRange { symbol: u8, width: u8 },

    #[error("symbol width must be between 1 and 8 bits, got {0}")]
    InvalidSymbolWidth(u8),

    #[error("alphabet is empty")]
    EmptyAlphabet,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HuffmanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HuffmanError::EmptyInput | HuffmanError::MessageTooLong(_) => ErrorKind::Input,
            HuffmanError::Truncated { .. }
            | HuffmanError::NegativeLength(_)
            | HuffmanError::TrieTooDeep { .. }
            | HuffmanError::SymbolNotInAlphabet { .. }
            | HuffmanError::TooManyLeaves { .. }
            | HuffmanError::DuplicateLeaf { .. } => ErrorKind::Format,
            HuffmanError::UnknownSymbol { .. } => ErrorKind::Encoding,
            HuffmanError::SymbolOutOfRange { .. }
            | HuffmanError::InvalidSymbolWidth(_)
            | HuffmanError::EmptyAlphabet => ErrorKind::Config,
            HuffmanError::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn truncated(while_reading: &'static str) -> Self {
        HuffmanError::Truncated { while_reading }
    }

    /// Re-labels a truncation with the artifact section being read.
    pub(crate) fn while_reading(self, section: &'static str) -> Self {
        match self {
            HuffmanError::Truncated { .. } => HuffmanError::truncated(section),
            other => other,
        }
    }
}
