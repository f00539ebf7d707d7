//! Check filters against a schema, then run them over records or compile them to SQL

use serde_json::Value as JsonValue;

use super::{CliError, records_from_json, schema_from_json};
use crate::{
    config::Limits,
    error::FilterError,
    filter::Filter,
    parser::parse_with_limits,
    sql::{SqlFragment, SqlOptions},
};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The filter to check
    pub filter: String,
    /// Schema document, as JSON text
    pub schema: Option<String>,
    /// JSON records to run the filter over
    pub input: Option<String>,
    /// Compile to SQL instead of evaluating records
    pub sql: bool,
    /// Bind resource lists as one parameter
    pub no_split_lists: bool,
    /// Only validate syntax, no schema needed
    pub syntax_only: bool,
    pub limits: Limits,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Records the filter kept, in input order
    Matches(Vec<JsonValue>),
    /// The compiled condition
    Sql(SqlFragment),
}

/// Execute a sieve check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    if options.syntax_only {
        parse_with_limits(&options.filter, &options.limits).map_err(FilterError::from)?;
        return Ok(CheckResult::SyntaxValid);
    }

    let schema_json = options.schema.as_ref().ok_or(CliError::NoSchema)?;
    let schema = schema_from_json(schema_json)?;
    let filter = Filter::parse_with(&options.filter, &schema, &options.limits)?;

    if options.sql {
        let sql_options = SqlOptions {
            split_resource_lists: !options.no_split_lists,
        };
        return Ok(CheckResult::Sql(filter.to_sql_with(&sql_options).render()));
    }

    let input = options.input.as_ref().ok_or(CliError::NoInput)?;
    let records = records_from_json(input)?;
    let predicate = filter.to_predicate();
    Ok(CheckResult::Matches(
        predicate.filter(&records).cloned().collect(),
    ))
}
