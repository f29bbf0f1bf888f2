//! The Separator Indexer: a byte-level front-end to the same token shape
//! the [`crate::lexer::Lexer`] produces, built around a pluggable
//! [`ScanBackend`] and a small streaming wrapper that tracks `leftover`
//! bytes and quote parity across chunks.

pub mod scanner;

pub use scanner::{
    pack_separator, unpack_is_quoted, unpack_kind, unpack_offset, MemchrBackend, ScalarBackend,
    ScanBackend, ScanResult, SEP_DELIMITER, SEP_LF,
};

use std::borrow::Cow;

use crate::error::Error;
use crate::options::IndexerOptions;
use crate::token::{Location, Position, Token};

/// Strip a surrounding pair of quotation bytes and collapse doubled
/// quotation bytes within. Returns the input unchanged if it is not
/// actually quoted.
fn unescape(field: &[u8], quotation: u8) -> Cow<[u8]> {
    if field.len() < 2 || field[0] != quotation || field[field.len() - 1] != quotation {
        return Cow::Borrowed(field);
    }
    let inner = &field[1..field.len() - 1];
    if !inner.contains(&quotation) {
        return Cow::Borrowed(inner);
    }
    let mut out = Vec::with_capacity(inner.len());
    let mut i = 0;
    while i < inner.len() {
        out.push(inner[i]);
        if inner[i] == quotation && i + 1 < inner.len() && inner[i + 1] == quotation {
            i += 2;
        } else {
            i += 1;
        }
    }
    Cow::Owned(out)
}

/// A streaming wrapper around a [`ScanBackend`], producing the same
/// [`Token`] stream the Lexer produces for ASCII-delimiter, `"`-quoted,
/// valid-UTF-8 input.
pub struct Indexer<B: ScanBackend = ScalarBackend> {
    backend: B,
    delimiter: u8,
    quotation: u8,
    max_buffer_size: usize,
    source: Option<String>,
    leftover: Vec<u8>,
    prev_in_quote: bool,
    position: Position,
    row_number: usize,
}

impl Indexer<ScalarBackend> {
    pub fn new(options: IndexerOptions) -> Result<Self, Error> {
        Self::with_backend(options, ScalarBackend)
    }
}

impl Indexer<MemchrBackend> {
    pub fn accelerated(options: IndexerOptions) -> Result<Self, Error> {
        Self::with_backend(options, MemchrBackend)
    }
}

impl<B: ScanBackend> Indexer<B> {
    pub fn with_backend(options: IndexerOptions, backend: B) -> Result<Self, Error> {
        let options = options.validate()?;
        Ok(Self {
            backend,
            delimiter: options.delimiter,
            quotation: options.quotation,
            max_buffer_size: options.max_buffer_size,
            source: options.source,
            leftover: Vec::new(),
            prev_in_quote: false,
            position: Position::start(),
            row_number: 1,
        })
    }

    /// Feed one chunk of bytes. `streaming = true` holds back any trailing
    /// partial row as `leftover`; pass `false` on the final chunk (or call
    /// [`Indexer::flush`] afterward) to materialize it.
    pub fn index(&mut self, chunk: &[u8], streaming: bool) -> Result<Vec<Token>, Error> {
        let mut combined = std::mem::take(&mut self.leftover);
        combined.extend_from_slice(chunk);

        if combined.len() > self.max_buffer_size {
            return Err(Error::BufferLimitExceeded {
                limit: self.max_buffer_size,
                source: self.source.clone(),
            });
        }

        let result = self.backend.scan(&combined, self.prev_in_quote, self.delimiter, self.quotation);

        if streaming {
            let boundary = result.processed_bytes;
            let separators: Vec<u32> = result
                .separators
                .iter()
                .copied()
                .filter(|&p| (unpack_offset(p) as usize) < boundary)
                .collect();
            let tokens = self.materialize(&combined[..boundary], &separators, false)?;
            self.leftover = combined[boundary..].to_vec();
            self.prev_in_quote = false;
            Ok(tokens)
        } else {
            if result.end_in_quote {
                return Err(Error::UnexpectedEofInQuotedField {
                    position: self.position,
                    source: self.source.clone(),
                });
            }
            self.prev_in_quote = false;
            self.materialize(&combined, &result.separators, true)
        }
    }

    /// Finalize: treat any held-back `leftover` as the final bytes.
    pub fn flush(&mut self) -> Result<Vec<Token>, Error> {
        let combined = std::mem::take(&mut self.leftover);
        if combined.is_empty() {
            return Ok(Vec::new());
        }
        let result = self.backend.scan(&combined, self.prev_in_quote, self.delimiter, self.quotation);
        if result.end_in_quote {
            return Err(Error::UnexpectedEofInQuotedField {
                position: self.position,
                source: self.source.clone(),
            });
        }
        self.prev_in_quote = false;
        self.materialize(&combined, &result.separators, true)
    }

    fn materialize(&mut self, bytes: &[u8], separators: &[u32], emit_trailing_field: bool) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();
        let mut field_start_byte = 0usize;

        for &packed in separators {
            let offset = unpack_offset(packed) as usize;
            let kind = unpack_kind(packed);
            let is_quoted = unpack_is_quoted(packed);

            let mut field_end_byte = offset;
            let is_lf = kind == SEP_LF;
            let had_cr = is_lf && field_end_byte > field_start_byte && bytes[field_end_byte - 1] == b'\r';
            if had_cr {
                field_end_byte -= 1;
            }

            let raw = &bytes[field_start_byte..field_end_byte];
            // The scan backend's `is_quoted` hint lets a known-unquoted
            // field skip the unescape scan entirely.
            let value = if is_quoted {
                let unescaped = unescape(raw, self.quotation);
                String::from_utf8_lossy(&unescaped).into_owned()
            } else {
                String::from_utf8_lossy(raw).into_owned()
            };

            let start = self.position;
            for ch in value.chars() {
                self.position.advance(ch);
            }
            let field_location = Location {
                start,
                end: self.position,
                row_number: self.row_number,
            };
            tokens.push(Token::field(value, field_location));

            if had_cr {
                self.position.advance('\r');
            }

            if is_lf {
                let delim_start = self.position;
                self.position.advance_row(1);
                let value = if had_cr { "\r\n" } else { "\n" };
                tokens.push(Token::record_delimiter(
                    value.to_string(),
                    Location {
                        start: delim_start,
                        end: self.position,
                        row_number: self.row_number,
                    },
                ));
                self.row_number += 1;
            } else {
                let delim_start = self.position;
                self.position.advance(self.delimiter as char);
                tokens.push(Token::field_delimiter(
                    (self.delimiter as char).to_string(),
                    Location {
                        start: delim_start,
                        end: self.position,
                        row_number: self.row_number,
                    },
                ));
            }

            field_start_byte = offset + 1;
        }

        if emit_trailing_field && field_start_byte < bytes.len() {
            let raw = &bytes[field_start_byte..];
            let unescaped = unescape(raw, self.quotation);
            let value = String::from_utf8_lossy(&unescaped).into_owned();
            let start = self.position;
            for ch in value.chars() {
                self.position.advance(ch);
            }
            tokens.push(Token::field(
                value,
                Location {
                    start,
                    end: self.position,
                    row_number: self.row_number,
                },
            ));
        }

        Ok(tokens)
    }
}
