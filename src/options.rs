//! Validated, immutable configuration for the lexer, assembler, and
//! separator indexer. Options are rejected eagerly at construction time;
//! none of them are read from ambient or global state.

use crate::error::Error;

const DEFAULT_MAX_BUFFER_SIZE: usize = 10 * 1024 * 1024;
const DEFAULT_MAX_FIELD_COUNT: usize = 1000;

fn validate_char(name: &str, value: char) -> Result<(), Error> {
    if value == '\n' || value == '\r' {
        return Err(Error::InvalidOption {
            reason: format!("{name} must not be a line terminator"),
        });
    }
    Ok(())
}

/// Options accepted by [`crate::lexer::Lexer::new`].
#[derive(Debug, Clone)]
pub struct LexerOptions {
    pub delimiter: char,
    pub quotation: char,
    /// Upper bound, in bytes, on the in-progress field buffer. Guards
    /// against an unbounded quoted field fed through streaming chunks.
    pub max_buffer_size: usize,
    pub source: Option<String>,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quotation: '"',
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
            source: None,
        }
    }
}

impl LexerOptions {
    pub fn validate(mut self) -> Result<Self, Error> {
        validate_char("delimiter", self.delimiter)?;
        validate_char("quotation", self.quotation)?;
        if self.delimiter == self.quotation {
            return Err(Error::InvalidOption {
                reason: "delimiter and quotation must differ".to_string(),
            });
        }
        if self.max_buffer_size == 0 {
            self.max_buffer_size = DEFAULT_MAX_BUFFER_SIZE;
        }
        Ok(self)
    }
}

/// Options accepted by [`crate::assembler::Assembler::new`].
#[derive(Debug, Clone, Default)]
pub struct AssemblerOptions {
    /// When set, the first row of tokens is treated as data, not a header.
    pub header: Option<Vec<String>>,
    pub max_field_count: usize,
    pub source: Option<String>,
}

impl AssemblerOptions {
    pub fn validate(mut self) -> Result<Self, Error> {
        if self.max_field_count == 0 {
            self.max_field_count = DEFAULT_MAX_FIELD_COUNT;
        }
        Ok(self)
    }
}

/// Options accepted by [`crate::indexer::Indexer::new`].
#[derive(Debug, Clone)]
pub struct IndexerOptions {
    pub delimiter: u8,
    pub quotation: u8,
    pub max_buffer_size: usize,
    pub source: Option<String>,
}

impl Default for IndexerOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quotation: b'"',
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
            source: None,
        }
    }
}

impl IndexerOptions {
    pub fn validate(self) -> Result<Self, Error> {
        if !self.delimiter.is_ascii() || !self.quotation.is_ascii() {
            return Err(Error::InvalidOption {
                reason: "delimiter and quotation must be ASCII for the separator indexer"
                    .to_string(),
            });
        }
        if self.delimiter == b'\n' || self.delimiter == b'\r' {
            return Err(Error::InvalidOption {
                reason: "delimiter must not be a line terminator".to_string(),
            });
        }
        if self.delimiter == self.quotation {
            return Err(Error::InvalidOption {
                reason: "delimiter and quotation must differ".to_string(),
            });
        }
        Ok(self)
    }
}
