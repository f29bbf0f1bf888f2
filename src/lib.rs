//! A streaming CSV tokenizer, record assembler, and byte-level separator
//! indexer.
//!
//! The pipeline has two stages:
//!
//! 1. [`lexer::Lexer`] turns a chunked character stream into a sequence of
//!    [`token::Token`]s (fields and delimiters) with precise source
//!    locations.
//! 2. [`assembler::Assembler`] groups that token sequence into
//!    [`record::Record`]s keyed by a header row, discovered from the input
//!    or supplied up front.
//!
//! [`indexer::Indexer`] is an alternative byte-level front-end: it scans
//! raw UTF-8 bytes for delimiter/newline separators (optionally through a
//! `memchr`-accelerated backend) and materializes the same token shape the
//! Lexer produces, for callers who can restrict themselves to an
//! ASCII delimiter and `"` quotation.
//!
//! [`transform::LexerTransformer`] and [`transform::AssemblerTransformer`]
//! wrap both stages as `Consume`/`Flush` adapters for callers without a
//! built-in stream type.

pub mod abort;
pub mod assembler;
pub mod error;
pub mod indexer;
pub mod lexer;
pub mod options;
pub mod record;
pub mod token;
pub mod transform;

#[cfg(test)]
mod tests;

pub use abort::AbortSignal;
pub use assembler::Assembler;
pub use error::Error;
pub use indexer::Indexer;
pub use lexer::Lexer;
pub use options::{AssemblerOptions, IndexerOptions, LexerOptions};
pub use record::Record;
pub use token::{Location, Position, Token, TokenKind};
