//! Parsing limits.

use serde::Deserialize;

pub const DEFAULT_MAX_LENGTH: usize = 4096;
pub const DEFAULT_MAX_DEPTH: usize = 64;
pub const DEFAULT_MAX_TERMS: usize = 512;

/// Bounds checked before and during parsing.
///
/// The grammar is recursive, so `not (not (not ...))` or deep parenthesization
/// would otherwise grow the stack with the input. Connectives fold left, so a
/// long `a and b and ...` chain is as deep as it is long; `max_terms` caps that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Limits {
    /// Maximum filter length, in characters
    pub max_length: usize,
    /// Maximum nesting of `not` and parentheses
    pub max_depth: usize,
    /// Maximum number of comparisons in one filter
    pub max_terms: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_length: DEFAULT_MAX_LENGTH,
            max_depth: DEFAULT_MAX_DEPTH,
            max_terms: DEFAULT_MAX_TERMS,
        }
    }
}

impl Limits {
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_terms(mut self, max_terms: usize) -> Self {
        self.max_terms = max_terms;
        self
    }
}
