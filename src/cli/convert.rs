//! JSON inputs of the CLI: schema documents and record sets

use serde_json::Value as JsonValue;

use super::CliError;
use crate::schema::Schema;

/// Read a schema document (an object keyed by property name).
pub fn schema_from_json(json: &str) -> Result<Schema, CliError> {
    Ok(serde_json::from_str(json)?)
}

/// Read records: either an array of objects or one bare object.
pub fn records_from_json(json: &str) -> Result<Vec<JsonValue>, CliError> {
    match serde_json::from_str(json)? {
        JsonValue::Array(records) => Ok(records),
        record => Ok(vec![record]),
    }
}
