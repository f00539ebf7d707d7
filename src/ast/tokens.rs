#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Unquoted run of characters
    ///
    /// Property names, keywords, operator words and bareword values all lex
    /// as words; the parser decides what a word means from its position.
    ///
    /// # Examples
    /// ```text
    /// status
    /// and
    /// 2022-10-12
    /// action,comedy
    /// ```
    Word(String),

    /// String literal enclosed in double or single quotes, escapes resolved
    ///
    /// # Examples
    /// ```text
    /// "hello world"
    /// 'it\'s'
    /// ```
    Quoted(String),

    // Delimiters
    /// Left parenthesis for grouping
    LParen,

    /// Right parenthesis
    RParen,

    // Symbolic comparison aliases
    /// `=`, alias of `eq`
    Eq,

    /// `!=`, alias of `ne`
    NotEq,

    /// `<`, alias of `lt`
    Lt,

    /// `<=`, alias of `le`
    LtEq,

    /// `>`, alias of `gt`
    Gt,

    /// `>=`, alias of `ge`
    GtEq,

    // Symbolic logical aliases
    /// `&&`, alias of `and`
    AndAnd,

    /// `||`, alias of `or`
    OrOr,

    /// `!`, alias of `not`
    Bang,

    /// End of input
    Eof,
}

impl Token {
    /// Short human-readable description used in syntax errors.
    pub fn describe(&self) -> String {
        match self {
            Token::Word(w) => format!("'{}'", w),
            Token::Quoted(s) => format!("string \"{}\"", s),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Eq => "'='".to_string(),
            Token::NotEq => "'!='".to_string(),
            Token::Lt => "'<'".to_string(),
            Token::LtEq => "'<='".to_string(),
            Token::Gt => "'>'".to_string(),
            Token::GtEq => "'>='".to_string(),
            Token::AndAnd => "'&&'".to_string(),
            Token::OrOr => "'||'".to_string(),
            Token::Bang => "'!'".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}
