use thiserror::Error;

use crate::ast::Token;

/// Character offset into the filter string (0-based).
pub type Position = usize;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated string starting at position {position}")]
    UnterminatedString { position: Position },

    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar { ch: char, position: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnterminatedString { position } | LexError::UnexpectedChar { position, .. } => {
                *position
            }
        }
    }
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    token_start: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            token_start: 0,
        }
    }

    /// Start position of the token most recently returned.
    pub fn token_start(&self) -> Position {
        self.token_start
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn is_word_char(ch: char) -> bool {
        !ch.is_whitespace() && !matches!(ch, '(' | ')' | '"' | '\'' | '=' | '!' | '<' | '>' | '&' | '|')
    }

    fn read_word(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if Self::is_word_char(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    self.advance();
                    match self.current_char() {
                        Some(escaped) => result.push(escaped),
                        None => return Err(LexError::UnterminatedString { position: start }),
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString { position: start })
    }

    /// Consume `second` if it follows the current character, yielding `double`,
    /// otherwise consume only the current character and yield `single`.
    fn one_or_two(&mut self, second: char, double: Token, single: Token) -> Token {
        if self.peek_char(1) == Some(second) {
            self.advance();
            self.advance();
            double
        } else {
            self.advance();
            single
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        self.token_start = self.position;

        let token = match self.current_char() {
            None => Token::Eof,
            Some('(') => {
                self.advance();
                Token::LParen
            }
            Some(')') => {
                self.advance();
                Token::RParen
            }
            Some('"') => Token::Quoted(self.read_string('"')?),
            Some('\'') => Token::Quoted(self.read_string('\'')?),
            Some('=') => {
                // `==` is tolerated as a spelling of `=`
                self.one_or_two('=', Token::Eq, Token::Eq)
            }
            Some('!') => self.one_or_two('=', Token::NotEq, Token::Bang),
            Some('<') => self.one_or_two('=', Token::LtEq, Token::Lt),
            Some('>') => self.one_or_two('=', Token::GtEq, Token::Gt),
            Some('&') => {
                if self.peek_char(1) == Some('&') {
                    self.advance();
                    self.advance();
                    Token::AndAnd
                } else {
                    return Err(LexError::UnexpectedChar {
                        ch: '&',
                        position: self.position,
                    });
                }
            }
            Some('|') => {
                if self.peek_char(1) == Some('|') {
                    self.advance();
                    self.advance();
                    Token::OrOr
                } else {
                    return Err(LexError::UnexpectedChar {
                        ch: '|',
                        position: self.position,
                    });
                }
            }
            Some(_) => Token::Word(self.read_word()),
        };

        Ok(token)
    }
}

#[test]
fn test_comparison_tokens() {
    let mut lexer = Lexer::new("rating lt 10");
    assert_eq!(lexer.next_token(), Ok(Token::Word("rating".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::Word("lt".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::Word("10".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::Eof));
}

#[test]
fn test_token_start_tracks_positions() {
    let mut lexer = Lexer::new("  (a eq 'x')");
    assert_eq!(lexer.next_token(), Ok(Token::LParen));
    assert_eq!(lexer.token_start(), 2);
    lexer.next_token().unwrap();
    assert_eq!(lexer.token_start(), 3);
    lexer.next_token().unwrap();
    assert_eq!(lexer.next_token(), Ok(Token::Quoted("x".to_string())));
    assert_eq!(lexer.token_start(), 8);
}
