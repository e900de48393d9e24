//! Token counting.
//!
//! Counts are logged next to every rendered memory so prompt growth is
//! visible. They are never used to truncate anything.

use std::fmt;

use tiktoken_rs::CoreBPE;

use crate::error::MemoryError;

/// Encoding used when none is configured.
pub const DEFAULT_ENCODING: &str = "cl100k_base";

/// Counts tokens in one named BPE encoding.
pub struct TokenCounter {
    encoding: &'static str,
    bpe: CoreBPE,
}

impl fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCounter")
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}

impl TokenCounter {
    /// Build a counter for a named encoding.
    ///
    /// Supported names: `cl100k_base`, `o200k_base`, `p50k_base`,
    /// `r50k_base`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::Tokenizer`] for an unknown name or if the
    /// encoding tables fail to load.
    pub fn new(encoding: &str) -> Result<Self, MemoryError> {
        let (encoding, bpe) = match encoding {
            "cl100k_base" => ("cl100k_base", tiktoken_rs::cl100k_base()),
            "o200k_base" => ("o200k_base", tiktoken_rs::o200k_base()),
            "p50k_base" => ("p50k_base", tiktoken_rs::p50k_base()),
            "r50k_base" => ("r50k_base", tiktoken_rs::r50k_base()),
            other => {
                return Err(MemoryError::Tokenizer(format!("unknown encoding: {other}")));
            }
        };
        let bpe = bpe.map_err(|e| MemoryError::Tokenizer(format!("{encoding}: {e}")))?;
        Ok(Self { encoding, bpe })
    }

    /// Counter for the default `cl100k_base` encoding.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::Tokenizer`] if the encoding tables fail to load.
    pub fn cl100k() -> Result<Self, MemoryError> {
        Self::new(DEFAULT_ENCODING)
    }

    /// Name of the encoding in use.
    pub const fn encoding(&self) -> &'static str {
        self.encoding
    }

    /// Number of tokens in `text`. Special tokens are treated as text.
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}
