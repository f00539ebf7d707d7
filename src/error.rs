//! Error types and the user-facing error report.
//!
//! Every failure in the pipeline is a client input error: it is returned
//! once, unchanged, and never retried. [`FilterError::report`] turns any of
//! them into the single [`ErrorReport`] shape the HTTP layer serializes.

use serde::Serialize;
use thiserror::Error;

use crate::ast::Operator;
use crate::lexer::{LexError, Position};
use crate::schema::FieldType;
use crate::value::ValueKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("syntax error at position {position}: expected {}, found {found}", .expected.join(" or "))]
    Syntax {
        position: Position,
        expected: Vec<String>,
        found: String,
    },

    #[error("filter is {length} characters long, the limit is {max}")]
    InputTooLong { length: usize, max: usize },

    #[error("filter nests deeper than {max} levels at position {position}")]
    TooDeep { position: Position, max: usize },

    #[error("filter has more than {max} comparisons at position {position}")]
    TooManyTerms { position: Position, max: usize },
}

impl ParseError {
    pub fn position(&self) -> Option<Position> {
        match self {
            ParseError::Syntax { position, .. }
            | ParseError::TooDeep { position, .. }
            | ParseError::TooManyTerms { position, .. } => Some(*position),
            ParseError::InputTooLong { .. } => None,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> Self {
        match e {
            LexError::UnterminatedString { position } => ParseError::Syntax {
                position,
                expected: vec!["closing quote".to_string()],
                found: "end of input".to_string(),
            },
            LexError::UnexpectedChar { ch, position } => ParseError::Syntax {
                position,
                expected: vec!["'&&'".to_string(), "'||'".to_string()],
                found: format!("'{}'", ch),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown property '{name}', expected one of: {}", .candidates.join(", "))]
    UnknownProperty {
        name: String,
        candidates: Vec<String>,
    },

    #[error("property '{property}' expects a value of type {expected}, got {got}")]
    TypeMismatch {
        property: String,
        expected: FieldType,
        got: ValueKind,
    },

    #[error("invalid value '{got}' for property '{property}', expected one of: {}", .allowed.join(", "))]
    InvalidEnumValue {
        property: String,
        got: String,
        allowed: Vec<String>,
    },

    #[error("operator '{operator}' is not supported on property '{property}'")]
    UnsupportedOperator {
        property: String,
        operator: Operator,
        supported: Vec<Operator>,
    },
}

impl ValidationError {
    pub fn property(&self) -> &str {
        match self {
            ValidationError::UnknownProperty { name, .. } => name,
            ValidationError::TypeMismatch { property, .. }
            | ValidationError::InvalidEnumValue { property, .. }
            | ValidationError::UnsupportedOperator { property, .. } => property,
        }
    }
}

/// Top-level error of the filter pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl FilterError {
    /// Stable machine-readable name of the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            FilterError::Parse(ParseError::Syntax { .. }) => "syntax",
            FilterError::Parse(ParseError::InputTooLong { .. }) => "input_too_long",
            FilterError::Parse(ParseError::TooDeep { .. }) => "too_deep",
            FilterError::Parse(ParseError::TooManyTerms { .. }) => "too_many_terms",
            FilterError::Validation(ValidationError::UnknownProperty { .. }) => "unknown_property",
            FilterError::Validation(ValidationError::TypeMismatch { .. }) => "type_mismatch",
            FilterError::Validation(ValidationError::InvalidEnumValue { .. }) => {
                "invalid_enum_value"
            }
            FilterError::Validation(ValidationError::UnsupportedOperator { .. }) => {
                "unsupported_operator"
            }
        }
    }

    /// Build the external error shape for the filter text that failed.
    pub fn report(&self, raw_filter: &str) -> ErrorReport {
        let mut context = ReportContext {
            raw_filter: raw_filter.to_string(),
            property: None,
            allowed: None,
            position: None,
        };

        match self {
            FilterError::Parse(e) => {
                context.position = e.position();
                if let ParseError::Syntax { expected, .. } = e {
                    context.allowed = Some(expected.clone());
                }
            }
            FilterError::Validation(e) => {
                context.property = Some(e.property().to_string());
                context.allowed = match e {
                    ValidationError::UnknownProperty { candidates, .. } => Some(candidates.clone()),
                    ValidationError::InvalidEnumValue { allowed, .. } => Some(allowed.clone()),
                    ValidationError::UnsupportedOperator { supported, .. } => {
                        Some(supported.iter().map(|op| op.to_string()).collect())
                    }
                    ValidationError::TypeMismatch { .. } => None,
                };
            }
        }

        ErrorReport {
            message: self.to_string(),
            context,
        }
    }
}

/// The stable external error shape.
///
/// ```json
/// {
///   "message": "unknown property 'bogus', expected one of: status, rating",
///   "context": {
///     "raw_filter": "bogus eq 1",
///     "property": "bogus",
///     "allowed": ["status", "rating"]
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub message: String,
    pub context: ReportContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportContext {
    pub raw_filter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_property_report() {
        let err = FilterError::from(ValidationError::UnknownProperty {
            name: "bogus".to_string(),
            candidates: vec!["status".to_string(), "rating".to_string()],
        });
        let report = err.report("bogus eq 1");

        assert_eq!(err.kind(), "unknown_property");
        assert_eq!(report.context.raw_filter, "bogus eq 1");
        assert_eq!(report.context.property.as_deref(), Some("bogus"));
        assert_eq!(
            report.context.allowed,
            Some(vec!["status".to_string(), "rating".to_string()])
        );
        assert!(report.message.contains("bogus"));
    }

    #[test]
    fn test_report_omits_absent_context() {
        let err = FilterError::from(ValidationError::TypeMismatch {
            property: "rating".to_string(),
            expected: FieldType::Int,
            got: ValueKind::Enum,
        });
        let json = serde_json::to_value(err.report("rating gt finished")).unwrap();

        assert_eq!(json["context"]["property"], "rating");
        assert!(json["context"].get("allowed").is_none());
        assert!(json["context"].get("position").is_none());
        assert_eq!(
            json["message"],
            "property 'rating' expects a value of type int, got enum"
        );
    }

    #[test]
    fn test_syntax_report_carries_position() {
        let err = FilterError::from(ParseError::Syntax {
            position: 7,
            expected: vec!["value".to_string()],
            found: "end of input".to_string(),
        });
        let report = err.report("rating lt");
        assert_eq!(report.context.position, Some(7));
        assert_eq!(report.context.allowed, Some(vec!["value".to_string()]));
        assert_eq!(
            report.message,
            "syntax error at position 7: expected value, found end of input"
        );
    }
}
