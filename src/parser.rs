use std::sync::LazyLock;

use regex::Regex;

use crate::{
    ast::{Expr, Operator, Token},
    config::Limits,
    error::ParseError,
    lexer::{Lexer, Position},
    value::Value,
};

static PROPERTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{L}[\p{L}\p{N}]*$").expect("property pattern compiles"));

const UNARY_START: [&str; 3] = ["'not'", "'('", "property"];
const VALUE_FORMS: [&str; 4] = ["date", "number", "quoted string", "bareword"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Connective {
    And,
    Or,
}

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    current_pos: Position,
    depth: usize,
    max_depth: usize,
    terms: usize,
    max_terms: usize,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        let current_pos = lexer.token_start();
        Ok(Parser {
            lexer,
            current_token,
            current_pos,
            depth: 0,
            max_depth: Limits::default().max_depth,
            terms: 0,
            max_terms: Limits::default().max_terms,
        })
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_terms(mut self, max_terms: usize) -> Self {
        self.max_terms = max_terms;
        self
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self.lexer.next_token()?;
        self.current_pos = self.lexer.token_start();
        Ok(())
    }

    fn unexpected(&self, expected: &[&str]) -> ParseError {
        ParseError::Syntax {
            position: self.current_pos,
            expected: expected.iter().map(|s| s.to_string()).collect(),
            found: self.current_token.describe(),
        }
    }

    fn is_keyword(&self, keyword: &str) -> bool {
        matches!(&self.current_token, Token::Word(w) if w.eq_ignore_ascii_case(keyword))
    }

    fn connective(&self) -> Option<Connective> {
        match &self.current_token {
            Token::AndAnd => Some(Connective::And),
            Token::OrOr => Some(Connective::Or),
            _ if self.is_keyword("and") => Some(Connective::And),
            _ if self.is_keyword("or") => Some(Connective::Or),
            _ => None,
        }
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ParseError::TooDeep {
                position: self.current_pos,
                max: self.max_depth,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Parse a complete filter; trailing input is an error.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        if self.current_token != Token::Eof {
            return Err(self.unexpected(&["'and'", "'or'", "end of input"]));
        }
        Ok(expr)
    }

    /// `expression := unary { ("and" | "or") unary }`
    ///
    /// Both connectives fold left at the same level: `a and b or c` is
    /// `(a and b) or c`.
    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        while let Some(connective) = self.connective() {
            self.advance()?;
            let right = self.parse_unary()?;

            left = match connective {
                Connective::And => Expr::and(left, right),
                Connective::Or => Expr::or(left, right),
            };
        }
        Ok(left)
    }

    /// `unary := "not" unary | "(" expression ")" | comparison`
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.current_token == Token::Bang || self.is_keyword("not") {
            self.enter()?;
            self.advance()?;
            let inner = self.parse_unary()?;
            self.leave();
            return Ok(Expr::negate(inner));
        }

        if self.current_token == Token::LParen {
            self.enter()?;
            self.advance()?;
            let expr = self.parse_expression()?;
            if self.current_token != Token::RParen {
                return Err(self.unexpected(&["'and'", "'or'", "')'"]));
            }
            self.advance()?;
            self.leave();
            return Ok(expr);
        }

        self.parse_comparison()
    }

    /// `comparison := property operator value`
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        self.terms += 1;
        if self.terms > self.max_terms {
            return Err(ParseError::TooManyTerms {
                position: self.current_pos,
                max: self.max_terms,
            });
        }

        let property = match &self.current_token {
            Token::Word(w) if PROPERTY.is_match(w) => w.clone(),
            _ => return Err(self.unexpected(&UNARY_START)),
        };
        self.advance()?;

        let operator = match Operator::from_token(&self.current_token) {
            Some(op) => op,
            None => {
                let names: Vec<&str> = Operator::ALL.iter().map(|op| op.as_str()).collect();
                return Err(self.unexpected(&names));
            }
        };
        self.advance()?;

        let value = self.parse_value()?;

        Ok(Expr::Comparison {
            property,
            operator,
            value,
        })
    }

    /// `value := date | float | int | quoted | bareword`
    fn parse_value(&mut self) -> Result<Value, ParseError> {
        let value = match &self.current_token {
            Token::Quoted(s) => Value::Str(s.clone()),
            Token::Word(w) => match Value::classify(w) {
                Some(value) => value,
                None => return Err(self.unexpected(&VALUE_FORMS)),
            },
            _ => return Err(self.unexpected(&VALUE_FORMS)),
        };
        self.advance()?;
        Ok(value)
    }
}

/// Parse a filter string with default [`Limits`].
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    parse_with_limits(input, &Limits::default())
}

/// Parse a filter string, rejecting input over `limits` before recursing.
pub fn parse_with_limits(input: &str, limits: &Limits) -> Result<Expr, ParseError> {
    let length = input.chars().count();
    if length > limits.max_length {
        return Err(ParseError::InputTooLong {
            length,
            max: limits.max_length,
        });
    }

    let mut parser = Parser::new(Lexer::new(input))?
        .with_max_depth(limits.max_depth)
        .with_max_terms(limits.max_terms);
    parser.parse()
}
