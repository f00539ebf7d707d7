//! CLI support for sieve-lang
//!
//! Lets a filter be checked against a schema file, and optionally run over
//! JSON records or compiled to SQL, without writing a host program.

mod check;
mod convert;
mod docs;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use convert::{records_from_json, schema_from_json};
pub use docs::{DocTopic, get_doc_topic, get_docs_overview};

use std::io;

use thiserror::Error;

use crate::error::{ErrorReport, FilterError};

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// The filter failed to parse or validate
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Records are required unless only checking
    #[error("no input provided, use --input or pipe JSON records to stdin")]
    NoInput,

    #[error("no schema provided, use --schema or set SIEVE_SCHEMA")]
    NoSchema,

    #[error("unknown topic: '{0}'\nRun 'sieve docs' to see available topics.")]
    UnknownTopic(String),
}

impl CliError {
    /// The structured report for filter errors, `None` for everything else.
    pub fn report(&self, raw_filter: &str) -> Option<ErrorReport> {
        match self {
            CliError::Filter(e) => Some(e.report(raw_filter)),
            _ => None,
        }
    }
}
