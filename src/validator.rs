//! Semantic validation of a parsed filter against a [`Schema`].
//!
//! The validator resolves every property, checks literal kinds and operators
//! against the field's descriptor, and produces a [`ValidatedExpr`]: the IR
//! both backends compile from. Validation is pre-order and fail-fast; the
//! first error aborts the walk.

use crate::ast::{Expr, Operator};
use crate::error::ValidationError;
use crate::schema::{FieldDescriptor, FieldKind, Schema};
use crate::value::{Date, Value};

/// Identifier of a referenced resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceRef {
    Id(i64),
    Slug(String),
}

impl ResourceRef {
    /// Integers are IDs, anything else is a slug.
    pub fn parse(text: &str) -> Self {
        match Value::classify(text) {
            Some(Value::Int(id)) => ResourceRef::Id(id),
            _ => ResourceRef::Slug(text.to_string()),
        }
    }

    /// Split a comma-separated identifier list, ignoring empty segments.
    pub fn parse_list(text: &str) -> Vec<Self> {
        let refs: Vec<Self> = text
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(ResourceRef::parse)
            .collect();
        if refs.is_empty() {
            vec![ResourceRef::Slug(text.to_string())]
        } else {
            refs
        }
    }
}

/// Right-hand side of a validated comparison, typed by the field it targets.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Int(i64),
    Float(f64),
    Date(Date),
    /// String and enum values
    Text(String),
    /// Scalar resource reference
    Resource(ResourceRef),
    /// Every identifier must be present in a resource array
    Resources(Vec<ResourceRef>),
}

/// A comparison whose property, operator and literal all passed validation.
///
/// On array fields the operator is always [`Operator::Has`].
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: FieldDescriptor,
    pub operator: Operator,
    pub operand: Operand,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedExpr {
    Condition(Condition),
    And(Box<ValidatedExpr>, Box<ValidatedExpr>),
    Or(Box<ValidatedExpr>, Box<ValidatedExpr>),
    Not(Box<ValidatedExpr>),
}

/// Operators a field accepts.
pub fn supported_operators(field: &FieldDescriptor) -> Vec<Operator> {
    if field.is_array {
        return vec![Operator::Eq, Operator::Has];
    }
    match field.kind {
        FieldKind::Resource => vec![Operator::Eq, Operator::Ne],
        _ => vec![
            Operator::Eq,
            Operator::Ne,
            Operator::Gt,
            Operator::Ge,
            Operator::Lt,
            Operator::Le,
        ],
    }
}

/// Validate a parsed filter against `schema`.
pub fn validate(expr: Expr, schema: &Schema) -> Result<ValidatedExpr, ValidationError> {
    match expr {
        Expr::Comparison {
            property,
            operator,
            value,
        } => check_comparison(property, operator, value, schema).map(ValidatedExpr::Condition),
        Expr::And { lhs, rhs } => {
            let lhs = validate(*lhs, schema)?;
            let rhs = validate(*rhs, schema)?;
            Ok(ValidatedExpr::And(Box::new(lhs), Box::new(rhs)))
        }
        Expr::Or { lhs, rhs } => {
            let lhs = validate(*lhs, schema)?;
            let rhs = validate(*rhs, schema)?;
            Ok(ValidatedExpr::Or(Box::new(lhs), Box::new(rhs)))
        }
        Expr::Not { inner } => Ok(ValidatedExpr::Not(Box::new(validate(*inner, schema)?))),
    }
}

fn check_comparison(
    property: String,
    operator: Operator,
    value: Value,
    schema: &Schema,
) -> Result<Condition, ValidationError> {
    let Some(field) = schema.get(&property) else {
        return Err(ValidationError::UnknownProperty {
            name: property,
            candidates: schema.names(),
        });
    };

    // Barewords are text too; a string field takes them as-is.
    let value = match (value, &field.kind) {
        (Value::Enum(s), FieldKind::String) => Value::Str(s),
        (value, _) => value,
    };

    let operand = match (&field.kind, value) {
        (FieldKind::Int, Value::Int(n)) => Operand::Int(n),
        (FieldKind::Float, Value::Float(n)) => Operand::Float(n),
        (FieldKind::Float, Value::Int(n)) => Operand::Float(n as f64),
        (FieldKind::Date, Value::Date(d)) => Operand::Date(d),
        (FieldKind::String, Value::Str(s)) => Operand::Text(s),
        (FieldKind::Enum { allowed }, Value::Enum(s)) => {
            if !allowed.contains(&s) {
                return Err(ValidationError::InvalidEnumValue {
                    property,
                    got: s,
                    allowed: allowed.clone(),
                });
            }
            Operand::Text(s)
        }
        (FieldKind::Resource, Value::Int(id)) if field.is_array => {
            Operand::Resources(vec![ResourceRef::Id(id)])
        }
        (FieldKind::Resource, Value::Int(id)) => Operand::Resource(ResourceRef::Id(id)),
        (FieldKind::Resource, Value::Str(s) | Value::Enum(s)) if field.is_array => {
            Operand::Resources(ResourceRef::parse_list(&s))
        }
        (FieldKind::Resource, Value::Str(s) | Value::Enum(s)) => {
            Operand::Resource(ResourceRef::parse(&s))
        }
        (_, other) => {
            return Err(ValidationError::TypeMismatch {
                property,
                expected: field.field_type(),
                got: other.kind(),
            });
        }
    };

    let supported = supported_operators(field);
    if !supported.contains(&operator) {
        return Err(ValidationError::UnsupportedOperator {
            property,
            operator,
            supported,
        });
    }

    Ok(Condition {
        field: field.clone(),
        operator: if field.is_array { Operator::Has } else { operator },
        operand,
    })
}
