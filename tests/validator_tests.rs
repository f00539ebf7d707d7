// tests/validator_tests.rs

use sieve_lang::ast::Operator;
use sieve_lang::error::ValidationError;
use sieve_lang::parser::parse;
use sieve_lang::schema::{FieldDescriptor, FieldType, Schema};
use sieve_lang::validator::{Condition, Operand, ResourceRef, ValidatedExpr, validate};
use sieve_lang::value::ValueKind;

fn schema() -> Schema {
    Schema::new()
        .with_field(FieldDescriptor::enumeration(
            "status",
            ["unreleased", "airing", "finished"],
        ))
        .with_field(FieldDescriptor::int("rating"))
        .with_field(FieldDescriptor::date("airDate"))
        .with_field(FieldDescriptor::string("name"))
        .with_field(FieldDescriptor::string("tags").array())
        .with_field(FieldDescriptor::resource("studio"))
        .with_field(FieldDescriptor::resource("genres").array())
}

fn check(filter: &str) -> Result<ValidatedExpr, ValidationError> {
    validate(parse(filter).unwrap(), &schema())
}

fn condition(filter: &str) -> Condition {
    match check(filter).unwrap() {
        ValidatedExpr::Condition(c) => c,
        other => panic!("Expected a single condition, got {:?}", other),
    }
}

// ============================================================================
// Accepted Filters
// ============================================================================

#[test]
fn test_structure_is_preserved() {
    let validated = check("not status eq airing and rating gt 5 or airDate lt 2022-01-01").unwrap();
    match validated {
        ValidatedExpr::Or(lhs, _) => match *lhs {
            ValidatedExpr::And(lhs, _) => assert!(matches!(*lhs, ValidatedExpr::Not(_))),
            other => panic!("Expected And, got {:?}", other),
        },
        other => panic!("Expected Or, got {:?}", other),
    }
}

#[test]
fn test_bareword_promoted_on_string_field() {
    let c = condition("name eq bebop");
    assert_eq!(c.operand, Operand::Text("bebop".into()));
    assert_eq!(condition("name eq 'bebop'").operand, c.operand);
}

#[test]
fn test_enum_value_accepted() {
    let c = condition("status ne finished");
    assert_eq!(c.operator, Operator::Ne);
    assert_eq!(c.operand, Operand::Text("finished".into()));
}

#[test]
fn test_array_eq_means_has() {
    assert_eq!(condition("tags eq classic").operator, Operator::Has);
    assert_eq!(condition("tags ctn classic").operator, Operator::Has);
}

#[test]
fn test_resource_list_requires_every_entry() {
    let c = condition("genres has action,comedy,7");
    assert_eq!(
        c.operand,
        Operand::Resources(vec![
            ResourceRef::Slug("action".into()),
            ResourceRef::Slug("comedy".into()),
            ResourceRef::Id(7),
        ])
    );
}

#[test]
fn test_quoted_resource_list_is_split_too() {
    let c = condition("genres has 'action, comedy'");
    assert_eq!(
        c.operand,
        Operand::Resources(vec![
            ResourceRef::Slug("action".into()),
            ResourceRef::Slug("comedy".into()),
        ])
    );
}

// ============================================================================
// Rejected Filters
// ============================================================================

#[test]
fn test_unknown_property_lists_candidates() {
    let err = check("bogus eq 1").unwrap_err();
    assert_eq!(
        err,
        ValidationError::UnknownProperty {
            name: "bogus".into(),
            candidates: schema().names(),
        }
    );
}

#[test]
fn test_property_lookup_is_case_sensitive() {
    assert!(matches!(
        check("Rating eq 1"),
        Err(ValidationError::UnknownProperty { .. })
    ));
}

#[test]
fn test_type_mismatches() {
    let test_cases = vec![
        ("rating gt finished", FieldType::Int, ValueKind::Enum),
        ("rating gt 8.5", FieldType::Int, ValueKind::Float),
        ("rating eq '8'", FieldType::Int, ValueKind::Str),
        ("airDate lt 2022", FieldType::Date, ValueKind::Int),
        ("status eq 'airing'", FieldType::Enum, ValueKind::Str),
        ("name eq 5", FieldType::String, ValueKind::Int),
        ("studio eq 2022-01-01", FieldType::Resource, ValueKind::Date),
    ];

    for (filter, expected, got) in test_cases {
        match check(filter) {
            Err(ValidationError::TypeMismatch {
                expected: e,
                got: g,
                ..
            }) => {
                assert_eq!((e, g), (expected, got), "Failed for filter: {}", filter);
            }
            other => panic!("Expected type mismatch for {}, got {:?}", filter, other),
        }
    }
}

#[test]
fn test_invalid_enum_value_is_case_sensitive() {
    let err = check("status eq Finished").unwrap_err();
    assert_eq!(
        err,
        ValidationError::InvalidEnumValue {
            property: "status".into(),
            got: "Finished".into(),
            allowed: vec!["unreleased".into(), "airing".into(), "finished".into()],
        }
    );
}

#[test]
fn test_array_rejects_ordering() {
    let err = check("tags gt classic").unwrap_err();
    assert_eq!(
        err,
        ValidationError::UnsupportedOperator {
            property: "tags".into(),
            operator: Operator::Gt,
            supported: vec![Operator::Eq, Operator::Has],
        }
    );
    assert!(matches!(
        check("genres ne action"),
        Err(ValidationError::UnsupportedOperator { .. })
    ));
}

#[test]
fn test_scalar_rejects_has() {
    assert!(matches!(
        check("rating has 5"),
        Err(ValidationError::UnsupportedOperator { operator: Operator::Has, .. })
    ));
    assert!(matches!(
        check("studio gt 5"),
        Err(ValidationError::UnsupportedOperator {
            operator: Operator::Gt,
            ..
        })
    ));
}

#[test]
fn test_first_error_wins() {
    let err = check("rating eq x or bogus eq 1").unwrap_err();
    assert_eq!(err.property(), "rating");

    // Type is checked before the operator.
    let err = check("tags gt 5").unwrap_err();
    assert!(matches!(err, ValidationError::TypeMismatch { .. }));
}
