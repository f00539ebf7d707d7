use std::{cmp::Ordering, collections::HashMap, fmt, sync::Arc};

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use serde_json::{Map, Value as JsonValue};

use crate::{
    ast::Operator,
    validator::{Condition, Operand, ResourceRef, ValidatedExpr},
    value::Date,
};

/// A record the in-memory predicate can read fields from.
///
/// Keys are storage names, i.e. [`FieldDescriptor::column`](crate::schema::FieldDescriptor::column).
pub trait Record {
    fn field(&self, key: &str) -> Option<&JsonValue>;
}

impl Record for JsonValue {
    fn field(&self, key: &str) -> Option<&JsonValue> {
        self.as_object()?.get(key)
    }
}

impl Record for Map<String, JsonValue> {
    fn field(&self, key: &str) -> Option<&JsonValue> {
        self.get(key)
    }
}

impl Record for HashMap<String, JsonValue> {
    fn field(&self, key: &str) -> Option<&JsonValue> {
        self.get(key)
    }
}

type Matcher = dyn Fn(&dyn Record) -> bool + Send + Sync;

/// A compiled in-memory filter.
///
/// Cloning is cheap; clones share the compiled closure tree.
#[derive(Clone)]
pub struct Predicate {
    matcher: Arc<Matcher>,
}

impl Predicate {
    pub fn compile(expr: &ValidatedExpr) -> Self {
        Predicate {
            matcher: Arc::from(compile(expr)),
        }
    }

    /// Evaluate the filter against one record.
    pub fn matches(&self, record: &dyn Record) -> bool {
        (self.matcher)(record)
    }

    /// Keep the records the filter accepts, in order.
    pub fn filter<'p, 'a, R: Record>(&'p self, records: &'a [R]) -> impl Iterator<Item = &'a R> + use<'p, 'a, R> {
        records.iter().filter(move |r| self.matches(*r))
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").finish_non_exhaustive()
    }
}

fn compile(expr: &ValidatedExpr) -> Box<Matcher> {
    match expr {
        ValidatedExpr::Condition(condition) => compile_condition(condition),
        ValidatedExpr::And(lhs, rhs) => {
            let (lhs, rhs) = (compile(lhs), compile(rhs));
            Box::new(move |record: &dyn Record| lhs(record) && rhs(record))
        }
        ValidatedExpr::Or(lhs, rhs) => {
            let (lhs, rhs) = (compile(lhs), compile(rhs));
            Box::new(move |record: &dyn Record| lhs(record) || rhs(record))
        }
        ValidatedExpr::Not(inner) => {
            let inner = compile(inner);
            Box::new(move |record: &dyn Record| !inner(record))
        }
    }
}

/// A numeric value, held exactly whenever `Decimal` can.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Number {
    Exact(Decimal),
    Float(f64),
}

impl Number {
    fn from_f64(n: f64) -> Self {
        // Decimal rounds what it cannot hold (1e-30 becomes 0); keep those as floats.
        match Decimal::from_f64(n) {
            Some(d) if d.to_f64() == Some(n) => Number::Exact(d),
            _ => Number::Float(n),
        }
    }

    fn from_json(n: &serde_json::Number) -> Option<Self> {
        if let Some(i) = n.as_i64() {
            Some(Number::Exact(Decimal::from(i)))
        } else if let Some(u) = n.as_u64() {
            Some(Number::Exact(Decimal::from(u)))
        } else {
            n.as_f64().map(Number::from_f64)
        }
    }

    fn to_f64(self) -> Option<f64> {
        match self {
            Number::Exact(d) => d.to_f64(),
            Number::Float(n) => Some(n),
        }
    }

    /// `None` only when a side is NaN.
    fn partial_cmp(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Exact(a), Number::Exact(b)) => Some(a.cmp(&b)),
            (a, b) => a.to_f64()?.partial_cmp(&b.to_f64()?),
        }
    }
}

/// Literal side of a leaf, converted once at compile time.
#[derive(Debug, Clone)]
enum Expected {
    Number(Number),
    Date(Date),
    Text(String),
    Resource(ResourceRef),
    Resources(Vec<ResourceRef>),
}

impl Expected {
    fn from_operand(operand: &Operand) -> Self {
        match operand {
            Operand::Int(n) => Expected::Number(Number::Exact(Decimal::from(*n))),
            Operand::Float(n) => Expected::Number(Number::from_f64(*n)),
            Operand::Date(d) => Expected::Date(*d),
            Operand::Text(s) => Expected::Text(s.clone()),
            Operand::Resource(r) => Expected::Resource(r.clone()),
            Operand::Resources(refs) => Expected::Resources(refs.clone()),
        }
    }
}

fn compile_condition(condition: &Condition) -> Box<Matcher> {
    let key = condition.field.column().to_string();
    let operator = condition.operator;
    let expected = Expected::from_operand(&condition.operand);

    if condition.field.is_array {
        Box::new(move |record: &dyn Record| match record.field(&key) {
            Some(JsonValue::Array(items)) => contains(items, &expected),
            _ => false,
        })
    } else {
        Box::new(move |record: &dyn Record| match record.field(&key) {
            Some(value) => compare(value, &expected)
                .map(|ord| holds(operator, ord))
                .unwrap_or(false),
            None => false,
        })
    }
}

fn holds(operator: Operator, ord: Ordering) -> bool {
    match operator {
        Operator::Eq | Operator::Has => ord == Ordering::Equal,
        Operator::Ne => ord != Ordering::Equal,
        Operator::Gt => ord == Ordering::Greater,
        Operator::Ge => ord != Ordering::Less,
        Operator::Lt => ord == Ordering::Less,
        Operator::Le => ord != Ordering::Greater,
    }
}

/// Order a record value against the literal, `None` when they are not comparable.
///
/// Resources have no order: a match is `Equal`, a mismatch `Less`.
fn compare(value: &JsonValue, expected: &Expected) -> Option<Ordering> {
    match expected {
        Expected::Number(n) => Number::from_json(value.as_number()?)?.partial_cmp(*n),
        Expected::Date(d) => Some(Date::parse_prefix(value.as_str()?)?.cmp(d)),
        Expected::Text(s) => Some(value.as_str()?.cmp(s.as_str())),
        Expected::Resource(r) => {
            let matched = resource_matches(value, r)?;
            Some(if matched {
                Ordering::Equal
            } else {
                Ordering::Less
            })
        }
        Expected::Resources(_) => None,
    }
}

fn contains(items: &[JsonValue], expected: &Expected) -> bool {
    match expected {
        Expected::Resources(refs) => refs.iter().all(|r| {
            items
                .iter()
                .any(|item| resource_matches(item, r) == Some(true))
        }),
        _ => items
            .iter()
            .any(|item| compare(item, expected) == Some(Ordering::Equal)),
    }
}

/// IDs match integers or an object's `id`; slugs match strings or an object's `slug`.
fn resource_matches(value: &JsonValue, reference: &ResourceRef) -> Option<bool> {
    match reference {
        ResourceRef::Id(id) => {
            let found = match value {
                JsonValue::Object(obj) => obj.get("id")?.as_i64()?,
                other => other.as_i64()?,
            };
            Some(found == *id)
        }
        ResourceRef::Slug(slug) => {
            let found = match value {
                JsonValue::Object(obj) => obj.get("slug")?.as_str()?,
                other => other.as_str()?,
            };
            Some(found == slug)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decimal_comparison_is_exact() {
        let expected = Expected::from_operand(&Operand::Float(0.3));
        assert_eq!(compare(&json!(0.3), &expected), Some(Ordering::Equal));
        let one = Expected::from_operand(&Operand::Int(1));
        assert_eq!(compare(&json!(1), &one), Some(Ordering::Equal));
        let max = Expected::from_operand(&Operand::Int(i64::MAX));
        assert_eq!(compare(&json!(u64::MAX), &max), Some(Ordering::Greater));
        assert_eq!(compare(&json!(i64::MAX), &max), Some(Ordering::Equal));
        assert_eq!(compare(&json!(i64::MAX - 1), &max), Some(Ordering::Less));
    }

    #[test]
    fn test_out_of_decimal_range_falls_back_to_float() {
        assert_eq!(Number::from_f64(1e30), Number::Float(1e30));
        assert_eq!(Number::from_f64(1e-30), Number::Float(1e-30));
        assert_eq!(Number::from_f64(7.5), Number::Exact(Decimal::new(75, 1)));

        let eight = Expected::from_operand(&Operand::Int(8));
        assert_eq!(compare(&json!(1e30), &eight), Some(Ordering::Greater));
        assert_eq!(compare(&json!(-1e30), &eight), Some(Ordering::Less));
        let zero = Expected::from_operand(&Operand::Float(0.0));
        assert_eq!(compare(&json!(1e-30), &zero), Some(Ordering::Greater));
        assert_eq!(compare(&json!(-1e-30), &zero), Some(Ordering::Less));
        let tiny = Expected::from_operand(&Operand::Float(1e-30));
        assert_eq!(compare(&json!(1e-30), &tiny), Some(Ordering::Equal));
    }

    #[test]
    fn test_wrong_type_is_not_comparable() {
        assert_eq!(compare(&json!("7"), &Expected::from_operand(&Operand::Int(7))), None);
        assert_eq!(compare(&json!(null), &Expected::Text("a".into())), None);
        assert_eq!(compare(&json!("2022-13-01"), &Expected::Date(Date::new(2022, 1, 1).unwrap())), None);
    }

    #[test]
    fn test_resource_object_lookup() {
        let studio = json!({ "id": 4, "slug": "bones" });
        assert_eq!(resource_matches(&studio, &ResourceRef::Id(4)), Some(true));
        assert_eq!(resource_matches(&studio, &ResourceRef::Slug("madhouse".into())), Some(false));
        assert_eq!(resource_matches(&json!(4), &ResourceRef::Slug("bones".into())), None);
    }
}
