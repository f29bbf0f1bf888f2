//! End-to-end tests driving the Lexer and Assembler together, covering the
//! concrete scenarios the pipeline is expected to handle.

use csv_stream_toolbox::{AssemblerOptions, Error, Lexer, LexerOptions};

#[test]
fn s1_simple_csv_with_auto_header() {
    let mut lexer = Lexer::new(LexerOptions::default()).unwrap();
    let mut assembler = csv_stream_toolbox::Assembler::new(AssemblerOptions::default()).unwrap();

    let tokens = lexer.lex("name,age\nAlice,20\nBob,25", true).unwrap();
    let mut records = assembler.assemble(&tokens).unwrap();
    let tokens = lexer.flush().unwrap();
    records.extend(assembler.assemble(&tokens).unwrap());
    records.extend(assembler.flush().unwrap());

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("name"), Some("Alice"));
    assert_eq!(records[0].get("age"), Some("20"));
    assert_eq!(records[1].get("name"), Some("Bob"));
    assert_eq!(records[1].get("age"), Some("25"));
}

#[test]
fn s2_semicolon_delimiter() {
    let options = LexerOptions {
        delimiter: ';',
        ..Default::default()
    };
    let mut lexer = Lexer::new(options).unwrap();
    let mut assembler = csv_stream_toolbox::Assembler::new(AssemblerOptions::default()).unwrap();

    let tokens = lexer.lex("name;age\nAlice;20", true).unwrap();
    let mut records = assembler.assemble(&tokens).unwrap();
    let tokens = lexer.flush().unwrap();
    records.extend(assembler.assemble(&tokens).unwrap());
    records.extend(assembler.flush().unwrap());

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("name"), Some("Alice"));
    assert_eq!(records[0].get("age"), Some("20"));
}

#[test]
fn s3_crlf_record_delimiter_value() {
    use csv_stream_toolbox::TokenKind;

    let mut lexer = Lexer::new(LexerOptions::default()).unwrap();
    let mut assembler = csv_stream_toolbox::Assembler::new(AssemblerOptions::default()).unwrap();

    let input = "a,b\r\n1,2\r\n3,4\r\n";
    let tokens = lexer.lex(input, true).unwrap();
    let mut all_tokens = tokens.clone();
    let mut records = assembler.assemble(&tokens).unwrap();
    let flushed = lexer.flush().unwrap();
    all_tokens.extend(flushed.clone());
    records.extend(assembler.assemble(&flushed).unwrap());
    records.extend(assembler.flush().unwrap());

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("a"), Some("1"));
    assert_eq!(records[0].get("b"), Some("2"));
    assert_eq!(records[1].get("a"), Some("3"));
    assert_eq!(records[1].get("b"), Some("4"));

    for token in all_tokens.iter().filter(|t| t.kind == TokenKind::RecordDelimiter) {
        assert_eq!(token.value, "\r\n");
    }
}

#[test]
fn s4_quoted_comma_and_escaped_quote() {
    let mut lexer = Lexer::new(LexerOptions::default()).unwrap();
    let mut assembler = csv_stream_toolbox::Assembler::new(AssemblerOptions::default()).unwrap();

    let input = "name,description\n\"Smith, John\",\"He said \"\"hello\"\"\"";
    let tokens = lexer.lex(input, true).unwrap();
    let mut records = assembler.assemble(&tokens).unwrap();
    let tokens = lexer.flush().unwrap();
    records.extend(assembler.assemble(&tokens).unwrap());
    records.extend(assembler.flush().unwrap());

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("name"), Some("Smith, John"));
    assert_eq!(records[0].get("description"), Some("He said \"hello\""));
}

#[test]
fn s5_streaming_chunks_with_mid_field_split() {
    let mut lexer = Lexer::new(LexerOptions::default()).unwrap();
    let mut assembler = csv_stream_toolbox::Assembler::new(AssemblerOptions::default()).unwrap();

    let mut records = Vec::new();
    for chunk in ["name,age\n", "Al", "ice,3", "0"] {
        let tokens = lexer.lex(chunk, true).unwrap();
        records.extend(assembler.assemble(&tokens).unwrap());
    }
    let tokens = lexer.flush().unwrap();
    records.extend(assembler.assemble(&tokens).unwrap());
    records.extend(assembler.flush().unwrap());

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("name"), Some("Alice"));
    assert_eq!(records[0].get("age"), Some("30"));
}

#[test]
fn s6_unterminated_quoted_field_is_fatal() {
    let mut lexer = Lexer::new(LexerOptions::default()).unwrap();
    lexer.lex("a\n\"", true).unwrap();

    let err = lexer.flush().unwrap_err();
    match err {
        Error::UnexpectedEofInQuotedField { position, .. } => {
            assert_eq!(position.line, 2);
            assert_eq!(position.column, 1);
        }
        other => panic!("expected UnexpectedEofInQuotedField, got {other:?}"),
    }
}
