//! Stateful aggregation of a [`Token`] stream into [`Record`]s.

use crate::abort::AbortSignal;
use crate::error::Error;
use crate::options::AssemblerOptions;
use crate::record::Record;
use crate::token::{Token, TokenKind};

enum Header {
    Pending,
    Fixed(Vec<String>),
}

/// Turns a token stream into records, acquiring the header from the first
/// row unless one was supplied up front.
pub struct Assembler {
    header: Header,
    max_field_count: usize,
    source: Option<String>,
    current: Vec<String>,
    field_index: usize,
    signal: Option<AbortSignal>,
}

impl Assembler {
    pub fn new(options: AssemblerOptions) -> Result<Self, Error> {
        let options = options.validate()?;
        let header = match options.header {
            Some(h) => Header::Fixed(h),
            None => Header::Pending,
        };
        Ok(Self {
            header,
            max_field_count: options.max_field_count,
            source: options.source,
            current: Vec::new(),
            field_index: 0,
            signal: None,
        })
    }

    /// Attach a cancellation signal checked between records.
    pub fn with_abort_signal(mut self, signal: AbortSignal) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Feed a batch of tokens, returning any records completed by them.
    pub fn assemble(&mut self, tokens: &[Token]) -> Result<Vec<Record>, Error> {
        let mut records = Vec::new();
        for token in tokens {
            if let Err(err) = self.check_abort() {
                self.discard_partial_row();
                return Err(err);
            }
            self.process_token(token, &mut records)?;
        }
        Ok(records)
    }

    /// Finalize: emit the current partial row if it has any content.
    pub fn flush(&mut self) -> Result<Vec<Record>, Error> {
        let mut records = Vec::new();
        if self.field_index > 0 || !self.current.is_empty() {
            self.ensure_slot(self.field_index);
            if let Some(record) = self.finish_row()? {
                records.push(record);
            }
        }
        Ok(records)
    }

    fn check_abort(&self) -> Result<(), Error> {
        if let Some(signal) = &self.signal {
            if let Some(origin) = signal.origin() {
                return Err(Error::from_abort(origin));
            }
        }
        Ok(())
    }

    /// A fired abort signal discards whatever row was in progress, so the
    /// next `assemble` call starts clean instead of resuming mid-row.
    fn discard_partial_row(&mut self) {
        self.current.clear();
        self.field_index = 0;
    }

    fn ensure_slot(&mut self, index: usize) {
        if index >= self.current.len() {
            self.current.resize(index + 1, String::new());
        }
    }

    fn process_token(&mut self, token: &Token, records: &mut Vec<Record>) -> Result<(), Error> {
        match token.kind {
            TokenKind::Field => {
                if self.field_index >= self.max_field_count {
                    return Err(Error::FieldCountExceeded {
                        limit: self.max_field_count,
                        source: self.source.clone(),
                    });
                }
                self.ensure_slot(self.field_index);
                self.current[self.field_index] = token.value.clone();
            }
            TokenKind::FieldDelimiter => {
                self.ensure_slot(self.field_index);
                self.field_index += 1;
                self.ensure_slot(self.field_index);
            }
            TokenKind::RecordDelimiter => {
                if let Some(record) = self.finish_row()? {
                    records.push(record);
                }
            }
        }
        Ok(())
    }

    fn finish_row(&mut self) -> Result<Option<Record>, Error> {
        let row = std::mem::take(&mut self.current);
        self.field_index = 0;
        match &self.header {
            Header::Pending => {
                self.header = Header::Fixed(row);
                Ok(None)
            }
            Header::Fixed(headers) => Ok(Some(Record::new(headers, row))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::options::LexerOptions;

    fn tokens_for(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(LexerOptions::default()).unwrap();
        let mut tokens = lexer.lex(input, true).unwrap();
        tokens.extend(lexer.flush().unwrap());
        tokens
    }

    #[test]
    fn auto_discovers_header_from_first_row() {
        let tokens = tokens_for("name,age\nAlice,20\nBob,25\n");
        let mut assembler = Assembler::new(AssemblerOptions::default()).unwrap();
        let records = assembler.assemble(&tokens).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("name"), Some("Alice"));
        assert_eq!(records[1].get("age"), Some("25"));
    }

    #[test]
    fn user_supplied_header_treats_first_row_as_data() {
        let tokens = tokens_for("Alice,20\n");
        let options = AssemblerOptions {
            header: Some(vec!["name".to_string(), "age".to_string()]),
            ..Default::default()
        };
        let mut assembler = Assembler::new(options).unwrap();
        let records = assembler.assemble(&tokens).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("name"), Some("Alice"));
    }

    #[test]
    fn arity_law_pads_short_rows_and_drops_extra_fields() {
        let tokens = tokens_for("a,b,c\n1\n2,3,4,5\n");
        let mut assembler = Assembler::new(AssemblerOptions::default()).unwrap();
        let records = assembler.assemble(&tokens).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].len(), 3);
        assert_eq!(records[0].get("b"), Some(""));
        assert_eq!(records[1].len(), 3);
        assert_eq!(records[1].get("c"), Some("4"));
    }

    #[test]
    fn flush_emits_trailing_partial_row() {
        let tokens = tokens_for("a,b\n1,2");
        let mut assembler = Assembler::new(AssemblerOptions::default()).unwrap();
        let mut records = assembler.assemble(&tokens).unwrap();
        records.extend(assembler.flush().unwrap());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("a"), Some("1"));
        assert_eq!(records[0].get("b"), Some("2"));
    }

    #[test]
    fn header_only_input_emits_no_records() {
        let tokens = tokens_for("a,b,c\n");
        let mut assembler = Assembler::new(AssemblerOptions::default()).unwrap();
        let records = assembler.assemble(&tokens).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn field_count_limit_is_enforced() {
        let tokens = tokens_for("a,b,c\n");
        let options = AssemblerOptions {
            max_field_count: 2,
            ..Default::default()
        };
        let mut assembler = Assembler::new(options).unwrap();
        let err = assembler.assemble(&tokens).unwrap_err();
        assert!(matches!(err, Error::FieldCountExceeded { .. }));
    }

    #[test]
    fn abort_signal_fails_fast_between_records() {
        let tokens = tokens_for("a,b\n1,2\n3,4\n");
        let signal = AbortSignal::new();
        signal.abort();
        let mut assembler =
            Assembler::new(AssemblerOptions::default()).unwrap().with_abort_signal(signal);
        let err = assembler.assemble(&tokens).unwrap_err();
        assert!(matches!(err, Error::Aborted));
    }

    #[test]
    fn abort_mid_row_discards_partial_state() {
        let header_tokens = tokens_for("a,b,c\n");
        let signal = AbortSignal::new();
        let mut assembler =
            Assembler::new(AssemblerOptions::default()).unwrap().with_abort_signal(signal.clone());
        assembler.assemble(&header_tokens).unwrap();

        // Feed a partial row ("1,2") with no terminating newline yet.
        let partial_tokens = tokens_for("1,2");
        assembler.assemble(&partial_tokens).unwrap();
        assert_eq!(assembler.current, vec!["1".to_string(), "2".to_string()]);
        assert_eq!(assembler.field_index, 1);

        signal.abort();
        let more_tokens = tokens_for("3");
        let err = assembler.assemble(&more_tokens).unwrap_err();
        assert!(matches!(err, Error::Aborted));
        assert!(assembler.current.is_empty());
        assert_eq!(assembler.field_index, 0);
    }
}
