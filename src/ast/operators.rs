use std::fmt;

use serde::Serialize;

use crate::ast::Token;

/// Comparison operators.
///
/// Spelling aliases (`not`, `ctn`, `lte`, `gte` and the symbolic forms) are
/// resolved by the parser; only the canonical set survives in the AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// Equal (`eq`, `=`)
    Eq,
    /// Not equal (`ne`, `not`, `!=`)
    Ne,
    /// Greater than (`gt`, `>`)
    Gt,
    /// Greater than or equal (`ge`, `gte`, `>=`)
    Ge,
    /// Less than (`lt`, `<`)
    Lt,
    /// Less than or equal (`le`, `lte`, `<=`)
    Le,
    /// Containment (`has`, `ctn`)
    Has,
}

impl Operator {
    pub const ALL: [Operator; 7] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Ge,
        Operator::Lt,
        Operator::Le,
        Operator::Has,
    ];

    /// Resolve an operator word, case-insensitively.
    pub fn from_word(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "eq" => Some(Operator::Eq),
            "ne" | "not" => Some(Operator::Ne),
            "gt" => Some(Operator::Gt),
            "ge" | "gte" => Some(Operator::Ge),
            "lt" => Some(Operator::Lt),
            "le" | "lte" => Some(Operator::Le),
            "has" | "ctn" => Some(Operator::Has),
            _ => None,
        }
    }

    /// Resolve a symbolic operator token.
    pub fn from_token(token: &Token) -> Option<Self> {
        match token {
            Token::Eq => Some(Operator::Eq),
            Token::NotEq => Some(Operator::Ne),
            Token::Gt => Some(Operator::Gt),
            Token::GtEq => Some(Operator::Ge),
            Token::Lt => Some(Operator::Lt),
            Token::LtEq => Some(Operator::Le),
            Token::Word(w) => Operator::from_word(w),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Gt => "gt",
            Operator::Ge => "ge",
            Operator::Lt => "lt",
            Operator::Le => "le",
            Operator::Has => "has",
        }
    }

    /// `eq` and `has` both mean containment on array fields.
    pub fn is_containment(&self) -> bool {
        matches!(self, Operator::Eq | Operator::Has)
    }

    pub fn is_ordering(&self) -> bool {
        matches!(self, Operator::Gt | Operator::Ge | Operator::Lt | Operator::Le)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
