//! Token and source-location types shared by the [`crate::lexer::Lexer`] and
//! the separator indexer's token materializer.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single point in the source stream.
///
/// `line` and `column` are 1-based; `offset` is a 0-based character count
/// from the start of the logical stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn start() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }

    /// Advance the position past one logical character.
    pub(crate) fn advance(&mut self, ch: char) {
        self.offset += ch.len_utf8();
        self.column += 1;
    }

    /// Advance the position past a record delimiter, moving to the next row.
    pub(crate) fn advance_row(&mut self, delimiter_len: usize) {
        self.offset += delimiter_len;
        self.line += 1;
        self.column = 1;
    }
}

/// The span a token occupies, plus the row it begins in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Location {
    pub start: Position,
    pub end: Position,
    pub row_number: usize,
}

/// The kind of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum TokenKind {
    Field,
    FieldDelimiter,
    RecordDelimiter,
}

/// A single lexical unit produced by the Lexer or the Separator Indexer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub location: Location,
}

impl Token {
    pub(crate) fn field(value: String, location: Location) -> Self {
        Self {
            kind: TokenKind::Field,
            value,
            location,
        }
    }

    pub(crate) fn field_delimiter(value: String, location: Location) -> Self {
        Self {
            kind: TokenKind::FieldDelimiter,
            value,
            location,
        }
    }

    pub(crate) fn record_delimiter(value: String, location: Location) -> Self {
        Self {
            kind: TokenKind::RecordDelimiter,
            value,
            location,
        }
    }
}
