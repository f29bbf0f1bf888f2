//! Stream transformer adapters: `Consume(chunk) -> Vec<Out>` plus
//! `Flush() -> Vec<Out>`, the shape used to wrap the Lexer and Assembler
//! for platforms without a built-in stream/channel type. Each adapter also
//! cooperates with an [`AbortSignal`] at a configurable check interval so a
//! long-running transform can be cancelled promptly.

use crate::abort::AbortSignal;
use crate::assembler::Assembler;
use crate::error::Error;
use crate::lexer::Lexer;
use crate::record::Record;
use crate::token::Token;

/// How often (in emitted items) a transformer re-checks its abort signal.
/// Smaller values are more responsive to cancellation; larger values incur
/// less per-item overhead.
#[derive(Debug, Clone, Copy)]
pub struct CheckInterval(pub usize);

impl Default for CheckInterval {
    fn default() -> Self {
        Self(64)
    }
}

/// Wraps a [`Lexer`] as a chunk-in, token-batch-out transform.
pub struct LexerTransformer {
    lexer: Lexer,
    signal: Option<AbortSignal>,
    check_interval: CheckInterval,
    produced_since_check: usize,
}

impl LexerTransformer {
    pub fn new(lexer: Lexer) -> Self {
        Self {
            lexer,
            signal: None,
            check_interval: CheckInterval::default(),
            produced_since_check: 0,
        }
    }

    pub fn with_abort_signal(mut self, signal: AbortSignal) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn with_check_interval(mut self, interval: CheckInterval) -> Self {
        self.check_interval = interval;
        self
    }

    /// Consume one chunk, returning the tokens it produced.
    pub fn consume(&mut self, chunk: &str) -> Result<Vec<Token>, Error> {
        let tokens = self.lexer.lex(chunk, true)?;
        self.check_abort(tokens.len())?;
        Ok(tokens)
    }

    /// Finalize the stream, returning any trailing tokens.
    pub fn flush(&mut self) -> Result<Vec<Token>, Error> {
        self.lexer.flush()
    }

    fn check_abort(&mut self, produced: usize) -> Result<(), Error> {
        let Some(signal) = &self.signal else {
            return Ok(());
        };
        self.produced_since_check += produced;
        if self.produced_since_check < self.check_interval.0.max(1) {
            return Ok(());
        }
        self.produced_since_check = 0;
        if let Some(origin) = signal.origin() {
            return Err(Error::from_abort(origin));
        }
        Ok(())
    }
}

/// Wraps an [`Assembler`] as a token-batch-in, record-batch-out transform.
pub struct AssemblerTransformer {
    assembler: Assembler,
    signal: Option<AbortSignal>,
}

impl AssemblerTransformer {
    pub fn new(assembler: Assembler) -> Self {
        Self {
            assembler,
            signal: None,
        }
    }

    pub fn with_abort_signal(mut self, signal: AbortSignal) -> Self {
        self.signal = Some(signal.clone());
        self.assembler = self.assembler.with_abort_signal(signal);
        self
    }

    /// Consume one batch of tokens, returning the records it completed.
    pub fn consume(&mut self, tokens: &[Token]) -> Result<Vec<Record>, Error> {
        if let Some(signal) = &self.signal {
            if let Some(origin) = signal.origin() {
                return Err(Error::from_abort(origin));
            }
        }
        self.assembler.assemble(tokens)
    }

    /// Finalize the stream, returning any trailing partial record.
    pub fn flush(&mut self) -> Result<Vec<Record>, Error> {
        self.assembler.flush()
    }
}
