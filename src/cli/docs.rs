//! Documentation content for the sieve CLI

use super::CliError;

/// Available documentation topics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocTopic {
    Syntax,
    Operators,
    Types,
    Errors,
}

impl DocTopic {
    /// Parse topic name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "syntax" | "grammar" => Some(Self::Syntax),
            "operators" | "ops" => Some(Self::Operators),
            "types" | "type" | "schema" => Some(Self::Types),
            "errors" | "error" => Some(Self::Errors),
            _ => None,
        }
    }
}

/// Get the docs overview (topic listing)
pub fn get_docs_overview() -> &'static str {
    r#"SIEVE DOCUMENTATION

Sieve is a filter language for list endpoints. A filter is one boolean
expression over the fields of a resource, checked against a schema and then
run over records in memory or compiled to a SQL condition.

DOCUMENTATION TOPICS

  syntax       Comparisons, connectives, negation, grouping and literals
  operators    Comparison operators and their aliases
  types        Schema field types and the literals each accepts
  errors       Error kinds and the JSON error report

QUICK REFERENCE

  status eq finished                   Comparison
  rating gte 80 and status eq airing   Connectives fold left to right
  not (rating lt 10 or rating gt 90)   Negation and grouping
  genres has action,comedy             Every listed genre present
  name eq "Cowboy Bebop"               Quoted text

Run 'sieve doc <topic>' for detailed documentation.
"#
}

/// Get documentation for a specific topic
pub fn get_doc_topic(name: &str) -> Result<&'static str, CliError> {
    match DocTopic::from_name(name) {
        Some(DocTopic::Syntax) => Ok(SYNTAX_DOC),
        Some(DocTopic::Operators) => Ok(OPERATORS_DOC),
        Some(DocTopic::Types) => Ok(TYPES_DOC),
        Some(DocTopic::Errors) => Ok(ERRORS_DOC),
        None => Err(CliError::UnknownTopic(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Filter Grammar

COMPARISON
  property operator value
    Property names start with a letter and continue with letters or digits.
    They are matched against the schema case-sensitively.

    Example:
      rating gt 80

CONNECTIVES
  and, &&    Both sides hold
  or,  ||    Either side holds

    Keywords are case-insensitive. There is no precedence between them:
    connectives fold strictly left to right.

      a eq 1 and b eq 2 or c eq 3
      => (a eq 1 and b eq 2) or c eq 3

      a eq 1 or b eq 2 and c eq 3
      => (a eq 1 or b eq 2) and c eq 3

NEGATION
  not unary, !unary
    Negates the single comparison or group that follows it.

      not a eq 1 and b eq 2
      => (not a eq 1) and b eq 2

GROUPING
  ( expression )
    Parentheses are the only way to change grouping.

      a eq 1 and (b eq 2 or c eq 3)

LITERALS
  Unquoted literals are tried in this order:

    2022-10-12      Date (YYYY-MM-DD, month 1-12, day 1-31)
    42, -7          Integer
    8.5, -0.25      Float
    finished        Bareword: letters, digits, _ - . , :

  Quoted text uses single or double quotes. A backslash escapes the
  following character.

    name eq 'Howl\'s Moving Castle'

  Constraints:
    - Quoted text is always a string, even "42"
    - Invalid dates such as 2022-13-45 fall through to a bareword
"#;

const OPERATORS_DOC: &str = r#"OPERATORS - Comparison Operators

  eq   =  ==     Equal
  ne   not  !=   Not equal
  gt   >         Greater than
  ge   gte  >=   Greater than or equal
  lt   <         Less than
  le   lte  <=   Less than or equal
  has  ctn       Array contains

  Word operators are case-insensitive.

  Examples:
    rating >= 80
    status not finished
    tags ctn classic

  Constraints:
    - Array fields accept only eq and has, both meaning "contains"
    - Resource fields accept only eq and ne
    - Ordering operators compare numbers numerically, dates
      chronologically and text by code point
"#;

const TYPES_DOC: &str = r#"TYPES - Schema Field Types

A schema file is a JSON object keyed by property name:

  {
    "status":  { "type": "enum", "values": ["unreleased", "airing", "finished"] },
    "rating":  { "type": "int" },
    "airDate": { "type": "date", "column": "start_air" },
    "genres":  { "type": "resource", "isArray": true }
  }

FIELD TYPES
  int        Integer literals
  float      Float or integer literals
  date       Date literals
  string     Quoted text or barewords
  enum       Barewords from "values", matched case-sensitively
  resource   Integer IDs or slugs

OPTIONS
  isArray      The field holds a list; eq/has test membership
  column       Record key and SQL column (defaults to the property name)
  slugColumn   SQL column for resource slugs (defaults to <column>_slug)

RESOURCES
  A resource literal that parses as an integer is an ID, anything else is
  a slug. On array fields a comma-separated list requires every entry:

    genres has action,comedy
    => genres contains action AND genres contains comedy
"#;

const ERRORS_DOC: &str = r#"ERRORS - Error Kinds and Reports

Every error is reported as JSON on stderr and the command exits with 1.

  {
    "message": "unknown property 'bogus', expected one of: airDate, rating, status",
    "context": {
      "raw_filter": "bogus eq 1",
      "property": "bogus",
      "allowed": ["airDate", "rating", "status"]
    }
  }

SYNTAX ERRORS
  syntax                 Unexpected token; "position" is a character
                         offset and "allowed" lists what would fit there
  input_too_long         Longer than --max-length characters
  too_deep               Nested deeper than --max-depth
  too_many_terms         More comparisons than --max-terms

VALIDATION ERRORS
  unknown_property       "allowed" lists the schema's properties
  type_mismatch          Literal does not fit the field type
  invalid_enum_value     "allowed" lists the enum values
  unsupported_operator   "allowed" lists the field's operators

  Validation stops at the first error, left to right.
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_aliases() {
        assert_eq!(DocTopic::from_name("OPS"), Some(DocTopic::Operators));
        assert_eq!(DocTopic::from_name("schema"), Some(DocTopic::Types));
        assert!(matches!(get_doc_topic("nope"), Err(CliError::UnknownTopic(_))));
    }
}
