// tests/behavior_tests.rs
//
// End-to-end behavior over the anime catalog schema:
// status (enum), rating (int) and airDate (date).

use serde_json::{Value as JsonValue, json};
use sieve_lang::{
    Filter, FilterError, Limits,
    ast::{Expr, Operator},
    error::ValidationError,
    parser::parse,
    schema::{FieldDescriptor, FieldType, Schema},
    sql::SqlParam,
    value::{Value, ValueKind},
};

fn catalog() -> Schema {
    Schema::new()
        .with_field(FieldDescriptor::enumeration(
            "status",
            ["unreleased", "airing", "finished"],
        ))
        .with_field(FieldDescriptor::int("rating"))
        .with_field(FieldDescriptor::date("airDate"))
}

fn accepts(filter: &str, record: JsonValue) -> bool {
    Filter::parse(filter, &catalog())
        .unwrap()
        .to_predicate()
        .matches(&record)
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_status_equality() {
    assert!(accepts("status eq finished", json!({ "status": "finished" })));
    assert!(!accepts("status eq finished", json!({ "status": "airing" })));
}

#[test]
fn test_rating_below() {
    assert!(accepts("rating lt 10", json!({ "rating": 5 })));
    assert!(!accepts("rating lt 10", json!({ "rating": 10 })));
}

#[test]
fn test_negated_band() {
    let filter = "not rating lt 10 and rating lt 20";
    assert!(accepts(filter, json!({ "rating": 15 })));
    assert!(!accepts(filter, json!({ "rating": 5 })));
    assert!(!accepts(filter, json!({ "rating": 25 })));
}

#[test]
fn test_aired_since() {
    let filter = "airDate ge 2022-10-12";
    assert!(accepts(filter, json!({ "airDate": "2022-10-12" })));
    assert!(accepts(filter, json!({ "airDate": "2023-01-01" })));
    assert!(!accepts(filter, json!({ "airDate": "2022-10-11" })));
}

#[test]
fn test_enum_literal_on_int_field() {
    let err = Filter::parse("rating gt finished", &catalog()).unwrap_err();
    assert_eq!(
        err,
        FilterError::Validation(ValidationError::TypeMismatch {
            property: "rating".into(),
            expected: FieldType::Int,
            got: ValueKind::Enum,
        })
    );
}

// ============================================================================
// Grammar Properties
// ============================================================================

#[test]
fn test_grouping_single_comparison() {
    for filter in ["rating lt 10", "status eq 'x'", "airDate ge 2022-10-12", "a has b,c"] {
        assert_eq!(parse(&format!("({})", filter)), parse(filter));
    }
}

#[test]
fn test_and_or_have_no_precedence() {
    let eq = |p: &str, n: i64| Expr::comparison(p, Operator::Eq, Value::Int(n));
    let filter = parse("a eq 1 and b eq 2 or c eq 3").unwrap();
    assert_eq!(filter, Expr::or(Expr::and(eq("a", 1), eq("b", 2)), eq("c", 3)));
    assert_ne!(filter, Expr::and(eq("a", 1), Expr::or(eq("b", 2), eq("c", 3))));
}

#[test]
fn test_not_does_not_swallow_and() {
    let lt = |p: &str, n: i64| Expr::comparison(p, Operator::Lt, Value::Int(n));
    assert_eq!(
        parse("not a lt 1 and b lt 2").unwrap(),
        Expr::and(Expr::negate(lt("a", 1)), lt("b", 2))
    );
}

// ============================================================================
// Schema Properties
// ============================================================================

#[test]
fn test_bareword_on_string_field() {
    let schema = Schema::new().with_field(FieldDescriptor::string("status"));
    let filter = Filter::parse("status eq finished", &schema).unwrap();

    assert!(filter.to_predicate().matches(&json!({ "status": "finished" })));
    assert_eq!(filter.to_sql().render().params, vec![SqlParam::Text("finished".into())]);
}

#[test]
fn test_resource_array_needs_every_value() {
    let schema = Schema::new().with_field(FieldDescriptor::resource("genres").array());
    let predicate = Filter::parse("genres eq action,comedy", &schema)
        .unwrap()
        .to_predicate();

    assert!(predicate.matches(&json!({ "genres": ["action", "comedy", "drama"] })));
    assert!(!predicate.matches(&json!({ "genres": ["action"] })));
    assert!(!predicate.matches(&json!({ "genres": ["comedy"] })));
}

#[test]
fn test_unknown_property_candidates() {
    let err = Filter::parse("bogus eq 1", &catalog()).unwrap_err();
    assert_eq!(
        err,
        FilterError::Validation(ValidationError::UnknownProperty {
            name: "bogus".into(),
            candidates: catalog().names(),
        })
    );
}

// ============================================================================
// Error Reports
// ============================================================================

#[test]
fn test_report_shapes() {
    let raw = "status eq cancelled";
    let report = Filter::parse(raw, &catalog()).unwrap_err().report(raw);
    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        json!({
            "message": "invalid value 'cancelled' for property 'status', expected one of: unreleased, airing, finished",
            "context": {
                "raw_filter": raw,
                "property": "status",
                "allowed": ["unreleased", "airing", "finished"],
            }
        })
    );

    let raw = "rating lt";
    let err = Filter::parse(raw, &catalog()).unwrap_err();
    assert_eq!(err.kind(), "syntax");
    let report = serde_json::to_value(err.report(raw)).unwrap();
    assert_eq!(report["context"]["position"], 9);
    assert!(report["context"].get("property").is_none());
}

#[test]
fn test_limits_apply_through_filter() {
    let limits = Limits::default().with_max_length(8);
    let err = Filter::parse_with("rating lt 10", &catalog(), &limits).unwrap_err();
    assert_eq!(err.kind(), "input_too_long");
}

#[test]
fn test_longest_chain_runs_through_every_backend() {
    let filter = "rating=5||".repeat(511) + "rating=7";
    let limits = Limits::default().with_max_length(usize::MAX);
    let compiled = Filter::parse_with(&filter, &catalog(), &limits).unwrap();

    assert!(compiled.to_predicate().matches(&json!({ "rating": 7 })));
    assert!(!compiled.to_predicate().matches(&json!({ "rating": 6 })));
    assert_eq!(compiled.to_sql().render().params.len(), 512);

    let err = Filter::parse_with(&(filter + "||rating=1"), &catalog(), &limits).unwrap_err();
    assert_eq!(err.kind(), "too_many_terms");
    assert!(err.report("").context.position.is_some());
}
