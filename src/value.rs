use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static DATE_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("date pattern compiles"));
static INT_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+$").expect("integer pattern compiles"));
static FLOAT_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+\.\d+$").expect("float pattern compiles"));
static BAREWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w\-.,:]+$").expect("bareword pattern compiles"));

/// A calendar date literal (`YYYY-MM-DD`).
///
/// Ordering is chronological: fields compare year first, then month, then day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl Date {
    /// Build a date, rejecting months outside 1-12 and days outside 1-31.
    pub fn new(year: u16, month: u8, day: u8) -> Option<Self> {
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }
        Some(Date { year, month, day })
    }

    /// Parse a strict `NNNN-NN-NN` literal.
    pub fn parse(s: &str) -> Option<Self> {
        let caps = DATE_LITERAL.captures(s)?;
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        Date::new(year, month, day)
    }

    /// Parse the leading date of a stored value.
    ///
    /// Accepts plain dates and RFC 3339 timestamps (`2022-10-12T08:00:00Z`).
    pub fn parse_prefix(s: &str) -> Option<Self> {
        let head = s.get(..10)?;
        match s.as_bytes().get(10) {
            None | Some(b'T') | Some(b't') | Some(b' ') => Date::parse(head),
            Some(_) => None,
        }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl Serialize for Date {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A literal value as written in a filter, before schema knowledge.
///
/// # Literal Classification
///
/// An unquoted lexeme is tried as each alternative in turn, falling through
/// to the next when it does not match:
///
/// 1. **Date** - strict `NNNN-NN-NN` with a valid month and day
/// 2. **Integer** - `-?digits` fitting in `i64`
/// 3. **Float** - `-?digits.digits`
/// 4. **Bareword** - letters, digits, `_`, `-`, `.`, `,` and `:`
///
/// Quoted text is always a [`Value::Str`].
///
/// # Examples
///
/// ```
/// use sieve_lang::Value;
///
/// assert!(matches!(Value::classify("2022-10-12"), Some(Value::Date(_))));
/// assert_eq!(Value::classify("42"), Some(Value::Int(42)));
/// assert_eq!(Value::classify("8.5"), Some(Value::Float(8.5)));
/// assert_eq!(Value::classify("finished"), Some(Value::Enum("finished".into())));
/// assert_eq!(Value::classify("2022-13-45"), Some(Value::Enum("2022-13-45".into())));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Integer number
    Int(i64),

    /// Floating-point number
    Float(f64),

    /// Calendar date
    Date(Date),

    /// Quoted string
    Str(String),

    /// Unquoted bareword
    Enum(String),
}

/// The kind of a [`Value`], used in type mismatch reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Int,
    Float,
    Date,
    Str,
    Enum,
}

impl Value {
    /// Classify an unquoted lexeme, or `None` when no alternative matches.
    pub fn classify(lexeme: &str) -> Option<Value> {
        if let Some(date) = Date::parse(lexeme) {
            return Some(Value::Date(date));
        }
        if INT_LITERAL.is_match(lexeme)
            && let Ok(n) = lexeme.parse::<i64>()
        {
            return Some(Value::Int(n));
        }
        if FLOAT_LITERAL.is_match(lexeme)
            && let Ok(n) = lexeme.parse::<f64>()
        {
            return Some(Value::Float(n));
        }
        if BAREWORD.is_match(lexeme) {
            return Some(Value::Enum(lexeme.to_string()));
        }
        None
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Date(_) => ValueKind::Date,
            Value::Str(_) => ValueKind::Str,
            Value::Enum(_) => ValueKind::Enum,
        }
    }

    /// The textual payload of `Str` and `Enum` values.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Enum(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{:?}", n),
            Value::Date(d) => write!(f, "{}", d),
            Value::Str(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    if c == '"' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{}", c)?;
                }
                f.write_str("\"")
            }
            Value::Enum(s) => f.write_str(s),
        }
    }
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Date => "date",
            ValueKind::Str => "string",
            ValueKind::Enum => "enum",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
