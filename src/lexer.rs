//! Character-granularity tokenizer turning a chunked character stream into
//! [`Token`]s, with precise source locations and a resumable state machine.

use crate::error::Error;
use crate::options::LexerOptions;
use crate::token::{Location, Position, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// At the start of a field: a quote opens a quoted field, a delimiter
    /// or newline ends an empty field, anything else starts an unquoted one.
    Start,
    Unquoted,
    Quoted,
    /// Just saw a quote while inside a quoted field: either an escape
    /// (followed by another quote) or the field's terminator.
    QuoteInQuoted,
}

/// A resumable CSV tokenizer.
///
/// Feed it chunks with [`Lexer::lex`]; call [`Lexer::flush`] once the
/// source is exhausted to emit any trailing field/record.
pub struct Lexer {
    delimiter: char,
    quotation: char,
    max_buffer_size: usize,
    source: Option<String>,
    mode: Mode,
    position: Position,
    token_start: Position,
    field: String,
    row_number: usize,
    /// A `\r` observed at the end of the previous chunk, not yet resolved
    /// into a record delimiter because the next chunk might start with `\n`.
    pending_cr: bool,
    /// The position of that deferred `\r`, used as the eventual record
    /// delimiter token's start once it is resolved.
    pending_cr_start: Position,
}

impl Lexer {
    pub fn new(options: LexerOptions) -> Result<Self, Error> {
        let options = options.validate()?;
        Ok(Self {
            delimiter: options.delimiter,
            quotation: options.quotation,
            max_buffer_size: options.max_buffer_size,
            source: options.source,
            mode: Mode::Start,
            position: Position::start(),
            token_start: Position::start(),
            field: String::new(),
            row_number: 1,
            pending_cr: false,
            pending_cr_start: Position::start(),
        })
    }

    /// Feed one chunk of input. `streaming` signals whether more chunks may
    /// follow; pass `false` on the final chunk to also flush.
    pub fn lex(&mut self, chunk: &str, streaming: bool) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();
        self.process(chunk, &mut tokens)?;
        if !streaming {
            self.flush_into(&mut tokens)?;
        }
        Ok(tokens)
    }

    /// Finalize the stream: resolve any deferred `\r` and emit a trailing
    /// field if one was in progress.
    pub fn flush(&mut self) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();
        self.flush_into(&mut tokens)?;
        Ok(tokens)
    }

    fn flush_into(&mut self, tokens: &mut Vec<Token>) -> Result<(), Error> {
        if self.pending_cr {
            let delim_start = self.pending_cr_start;
            self.position.line += 1;
            self.position.column = 1;
            self.emit_record_delimiter(tokens, "\n", delim_start);
            self.pending_cr = false;
            return Ok(());
        }
        if self.mode == Mode::Quoted {
            return Err(Error::UnexpectedEofInQuotedField {
                position: self.token_start,
                source: self.source.clone(),
            });
        }
        if self.mode != Mode::Start || !self.field.is_empty() {
            self.emit_field(tokens);
        }
        Ok(())
    }

    fn process(&mut self, chunk: &str, tokens: &mut Vec<Token>) -> Result<(), Error> {
        let mut chars = chunk.chars().peekable();
        while let Some(ch) = chars.next() {
            if self.pending_cr {
                self.pending_cr = false;
                let delim_start = self.pending_cr_start;
                if ch == '\n' {
                    self.advance_row();
                    self.emit_record_delimiter(tokens, "\r\n", delim_start);
                    continue;
                } else {
                    self.position.line += 1;
                    self.position.column = 1;
                    self.emit_record_delimiter(tokens, "\n", delim_start);
                }
            }

            match self.mode {
                Mode::Start => {
                    self.token_start = self.position;
                    if ch == self.quotation {
                        self.mode = Mode::Quoted;
                        self.advance_char(ch);
                    } else if ch == self.delimiter {
                        self.emit_field(tokens);
                        let delim_start = self.position;
                        self.advance_char(ch);
                        self.emit_field_delimiter(tokens, delim_start);
                    } else if ch == '\r' {
                        self.defer_cr(&mut chars, tokens);
                    } else if ch == '\n' {
                        self.emit_field(tokens);
                        let delim_start = self.position;
                        self.advance_row();
                        self.emit_record_delimiter(tokens, "\n", delim_start);
                    } else {
                        self.push_field_char(ch)?;
                        self.mode = Mode::Unquoted;
                        self.advance_char(ch);
                    }
                }
                Mode::Unquoted => {
                    if ch == self.delimiter {
                        self.emit_field(tokens);
                        let delim_start = self.position;
                        self.advance_char(ch);
                        self.emit_field_delimiter(tokens, delim_start);
                        self.mode = Mode::Start;
                    } else if ch == '\r' {
                        self.defer_cr(&mut chars, tokens);
                    } else if ch == '\n' {
                        self.emit_field(tokens);
                        let delim_start = self.position;
                        self.advance_row();
                        self.emit_record_delimiter(tokens, "\n", delim_start);
                        self.mode = Mode::Start;
                    } else {
                        // An unescaped quotation inside an unquoted field is
                        // appended literally (lenient mode).
                        self.push_field_char(ch)?;
                        self.advance_char(ch);
                    }
                }
                Mode::Quoted => {
                    if ch == self.quotation {
                        self.mode = Mode::QuoteInQuoted;
                        self.advance_char(ch);
                    } else {
                        self.push_field_char(ch)?;
                        self.advance_char(ch);
                    }
                }
                Mode::QuoteInQuoted => {
                    if ch == self.quotation {
                        self.push_field_char(ch)?;
                        self.mode = Mode::Quoted;
                        self.advance_char(ch);
                    } else if ch == self.delimiter {
                        self.emit_field(tokens);
                        let delim_start = self.position;
                        self.advance_char(ch);
                        self.emit_field_delimiter(tokens, delim_start);
                        self.mode = Mode::Start;
                    } else if ch == '\r' {
                        self.defer_cr(&mut chars, tokens);
                    } else if ch == '\n' {
                        self.emit_field(tokens);
                        let delim_start = self.position;
                        self.advance_row();
                        self.emit_record_delimiter(tokens, "\n", delim_start);
                        self.mode = Mode::Start;
                    } else {
                        return Err(Error::MalformedQuotedField {
                            position: self.position,
                            source: self.source.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Seen a `\r`: resolve immediately if the next character in this same
    /// chunk is available, otherwise defer across the chunk boundary.
    fn defer_cr(&mut self, chars: &mut std::iter::Peekable<std::str::Chars<'_>>, tokens: &mut Vec<Token>) {
        let delim_start = self.position;
        self.position.advance('\r');
        if chars.peek() == Some(&'\n') {
            chars.next();
            self.emit_field(tokens);
            self.advance_row();
            self.emit_record_delimiter(tokens, "\r\n", delim_start);
            self.mode = Mode::Start;
        } else if chars.peek().is_none() {
            self.emit_field(tokens);
            self.pending_cr = true;
            self.pending_cr_start = delim_start;
            self.mode = Mode::Start;
        } else {
            self.emit_field(tokens);
            self.position.line += 1;
            self.position.column = 1;
            self.emit_record_delimiter(tokens, "\n", delim_start);
            self.mode = Mode::Start;
        }
    }

    /// Append a character to the in-progress field, rejecting growth past
    /// the configured buffer limit.
    fn push_field_char(&mut self, ch: char) -> Result<(), Error> {
        if self.field.len() + ch.len_utf8() > self.max_buffer_size {
            return Err(Error::BufferLimitExceeded {
                limit: self.max_buffer_size,
                source: self.source.clone(),
            });
        }
        self.field.push(ch);
        Ok(())
    }

    fn advance_char(&mut self, ch: char) {
        self.position.advance(ch);
    }

    /// Advance past a one-byte `\n`. For `\r\n`, the `\r` is accounted for
    /// separately (see [`Lexer::defer_cr`]) so this only ever adds one byte.
    fn advance_row(&mut self) {
        self.position.advance_row(1);
    }

    fn location(&self) -> Location {
        Location {
            start: self.token_start,
            end: self.position,
            row_number: self.row_number,
        }
    }

    fn emit_field(&mut self, tokens: &mut Vec<Token>) {
        let value = std::mem::take(&mut self.field);
        tokens.push(Token::field(value, self.location()));
    }

    fn emit_field_delimiter(&mut self, tokens: &mut Vec<Token>, start: Position) {
        let location = Location {
            start,
            end: self.position,
            row_number: self.row_number,
        };
        tokens.push(Token::field_delimiter(self.delimiter.to_string(), location));
    }

    fn emit_record_delimiter(&mut self, tokens: &mut Vec<Token>, value: &str, start: Position) {
        let location = Location {
            start,
            end: self.position,
            row_number: self.row_number,
        };
        tokens.push(Token::record_delimiter(value.to_string(), location));
        self.row_number += 1;
    }
}
