//! Error taxonomy for the lexer, assembler, and separator indexer.

use crate::token::Position;
use thiserror::Error;

/// Where an [`Error::Aborted`]/[`Error::Timeout`] originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortOrigin {
    /// The caller's signal was fired directly.
    Signal,
    /// The signal fired because a configured deadline elapsed.
    Timeout,
}

/// All failure modes the core pipeline can surface.
///
/// Fatal syntactic and resource-limit errors discard the producing
/// component; option-validation errors are raised eagerly at construction.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unexpected EOF while parsing quoted field{}", source_suffix(.source.as_deref()))]
    UnexpectedEofInQuotedField {
        position: Position,
        source: Option<String>,
    },

    #[error("Malformed quoted field at line {}, column {}{}", .position.line, .position.column, source_suffix(.source.as_deref()))]
    MalformedQuotedField {
        position: Position,
        source: Option<String>,
    },

    #[error("Buffer limit exceeded: maximum {limit} bytes allowed{}", source_suffix(.source.as_deref()))]
    BufferLimitExceeded {
        limit: usize,
        source: Option<String>,
    },

    #[error("Field count limit exceeded: maximum {limit} fields allowed per record{}", source_suffix(.source.as_deref()))]
    FieldCountExceeded {
        limit: usize,
        source: Option<String>,
    },

    #[error("Invalid option: {reason}")]
    InvalidOption { reason: String },

    #[error("Operation aborted")]
    Aborted,

    #[error("Operation timed out")]
    Timeout,
}

impl Error {
    /// Map an abort origin tag onto the corresponding variant.
    pub(crate) fn from_abort(origin: AbortOrigin) -> Self {
        match origin {
            AbortOrigin::Signal => Error::Aborted,
            AbortOrigin::Timeout => Error::Timeout,
        }
    }
}

fn source_suffix(source: Option<&str>) -> String {
    match source {
        Some(src) => format!(" in \"{src}\""),
        None => String::new(),
    }
}
