use tracing::{debug, trace};

use crate::{
    ast::Expr,
    config::Limits,
    error::FilterError,
    evaluator::Predicate,
    parser::parse_with_limits,
    schema::Schema,
    sql::{SqlCondition, SqlOptions},
    validator::{ValidatedExpr, validate},
};

/// A filter that parsed and validated against a schema.
///
/// ```
/// use sieve_lang::{Filter, schema::{FieldDescriptor, Schema}};
/// use serde_json::json;
///
/// let schema = Schema::new()
///     .with_field(FieldDescriptor::enumeration("status", ["airing", "finished"]))
///     .with_field(FieldDescriptor::int("rating"));
///
/// let filter = Filter::parse("status eq airing and rating gt 70", &schema).unwrap();
/// let predicate = filter.to_predicate();
///
/// assert!(predicate.matches(&json!({ "status": "airing", "rating": 82 })));
/// assert!(!predicate.matches(&json!({ "status": "finished", "rating": 82 })));
/// ```
#[derive(Debug, Clone)]
pub struct Filter {
    expr: Expr,
    validated: ValidatedExpr,
}

impl Filter {
    pub fn parse(input: &str, schema: &Schema) -> Result<Self, FilterError> {
        Self::parse_with(input, schema, &Limits::default())
    }

    pub fn parse_with(input: &str, schema: &Schema, limits: &Limits) -> Result<Self, FilterError> {
        match Self::build(input, schema, limits) {
            Ok(filter) => {
                debug!(
                    filter = input,
                    comparisons = filter.expr.comparison_count(),
                    "accepted filter"
                );
                Ok(filter)
            }
            Err(err) => {
                debug!(filter = input, kind = err.kind(), error = %err, "rejected filter");
                Err(err)
            }
        }
    }

    fn build(input: &str, schema: &Schema, limits: &Limits) -> Result<Self, FilterError> {
        let expr = parse_with_limits(input, limits)?;
        let validated = validate(expr.clone(), schema)?;
        Ok(Filter { expr, validated })
    }

    /// The parsed syntax tree.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn validated(&self) -> &ValidatedExpr {
        &self.validated
    }

    pub fn to_predicate(&self) -> Predicate {
        Predicate::compile(&self.validated)
    }

    pub fn to_sql(&self) -> SqlCondition {
        self.to_sql_with(&SqlOptions::default())
    }

    pub fn to_sql_with(&self, options: &SqlOptions) -> SqlCondition {
        let condition = SqlCondition::compile(&self.validated, options);
        trace!(sql = %condition, "compiled filter");
        condition
    }
}
