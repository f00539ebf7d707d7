// tests/lexer_tests.rs

use sieve_lang::ast::Token;
use sieve_lang::lexer::{LexError, Lexer};

fn tokens(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut out = Vec::new();
    loop {
        let token = lexer.next_token().unwrap();
        if token == Token::Eof {
            return out;
        }
        out.push(token);
    }
}

fn word(s: &str) -> Token {
    Token::Word(s.to_string())
}

// ============================================================================
// Symbolic Tokens
// ============================================================================

#[test]
fn test_symbol_tokens() {
    let test_cases = vec![
        ("(", Token::LParen),
        (")", Token::RParen),
        ("=", Token::Eq),
        ("==", Token::Eq),
        ("!=", Token::NotEq),
        ("<", Token::Lt),
        ("<=", Token::LtEq),
        (">", Token::Gt),
        (">=", Token::GtEq),
        ("&&", Token::AndAnd),
        ("||", Token::OrOr),
        ("!", Token::Bang),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(token, expected, "Failed for input: {}", input);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }
}

#[test]
fn test_lone_ampersand_is_error() {
    let mut lexer = Lexer::new("a eq 1 & b eq 2");
    for _ in 0..3 {
        lexer.next_token().unwrap();
    }
    assert_eq!(
        lexer.next_token(),
        Err(LexError::UnexpectedChar { ch: '&', position: 7 })
    );
}

// ============================================================================
// Words
// ============================================================================

#[test]
fn test_symbols_split_words() {
    assert_eq!(
        tokens("rating>=80&&!(a<b)"),
        vec![
            word("rating"),
            Token::GtEq,
            word("80"),
            Token::AndAnd,
            Token::Bang,
            Token::LParen,
            word("a"),
            Token::Lt,
            word("b"),
            Token::RParen,
        ]
    );
}

#[test]
fn test_word_keeps_literal_punctuation() {
    assert_eq!(
        tokens("genres has action,comedy"),
        vec![word("genres"), word("has"), word("action,comedy")]
    );
    assert_eq!(tokens("airDate lt 2022-10-12"), vec![word("airDate"), word("lt"), word("2022-10-12")]);
    assert_eq!(tokens("x eq -1.5"), vec![word("x"), word("eq"), word("-1.5")]);
}

// ============================================================================
// Quoted Strings
// ============================================================================

#[test]
fn test_quoted_strings() {
    assert_eq!(tokens(r#""hello world""#), vec![Token::Quoted("hello world".into())]);
    assert_eq!(tokens("'hello world'"), vec![Token::Quoted("hello world".into())]);
    assert_eq!(tokens(r#""say \"hi\"""#), vec![Token::Quoted(r#"say "hi""#.into())]);
    assert_eq!(tokens(r"'it\'s'"), vec![Token::Quoted("it's".into())]);
    assert_eq!(tokens(r#"'a "b"'"#), vec![Token::Quoted(r#"a "b""#.into())]);
    assert_eq!(tokens("''"), vec![Token::Quoted(String::new())]);
}

#[test]
fn test_unterminated_string() {
    let mut lexer = Lexer::new("name eq 'abc");
    lexer.next_token().unwrap();
    lexer.next_token().unwrap();
    let err = lexer.next_token().unwrap_err();
    assert_eq!(err, LexError::UnterminatedString { position: 8 });
    assert_eq!(err.position(), 8);
}

#[test]
fn test_positions_are_char_offsets() {
    let mut lexer = Lexer::new("név eq 'é' or x eq 1");
    let mut starts = Vec::new();
    while lexer.next_token().unwrap() != Token::Eof {
        starts.push(lexer.token_start());
    }
    assert_eq!(starts, vec![0, 4, 7, 11, 14, 16, 19]);
}
