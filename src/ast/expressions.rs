use std::fmt;

use crate::ast::Operator;
use crate::value::Value;

/// Abstract Syntax Tree node representing a parsed filter.
///
/// The AST is the parser's output: structurally valid, but not yet checked
/// against any schema. Nodes own their children; trees never share nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Leaf comparison
    ///
    /// # Example
    /// ```text
    /// rating gt 80
    /// ```
    Comparison {
        property: String,
        operator: Operator,
        value: Value,
    },

    /// Logical conjunction
    ///
    /// # Example
    /// ```text
    /// status eq finished and rating gt 80
    /// ```
    And { lhs: Box<Expr>, rhs: Box<Expr> },

    /// Logical disjunction
    ///
    /// # Example
    /// ```text
    /// status eq airing or status eq finished
    /// ```
    Or { lhs: Box<Expr>, rhs: Box<Expr> },

    /// Negation of a single comparison or group
    ///
    /// # Example
    /// ```text
    /// not (rating lt 10 or rating gt 90)
    /// ```
    Not { inner: Box<Expr> },
}

impl Expr {
    pub fn comparison(property: impl Into<String>, operator: Operator, value: Value) -> Self {
        Expr::Comparison {
            property: property.into(),
            operator,
            value,
        }
    }

    pub fn and(lhs: Expr, rhs: Expr) -> Self {
        Expr::And {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn or(lhs: Expr, rhs: Expr) -> Self {
        Expr::Or {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn negate(inner: Expr) -> Self {
        Expr::Not {
            inner: Box::new(inner),
        }
    }

    /// Number of comparison leaves in the tree.
    pub fn comparison_count(&self) -> usize {
        match self {
            Expr::Comparison { .. } => 1,
            Expr::And { lhs, rhs } | Expr::Or { lhs, rhs } => {
                lhs.comparison_count() + rhs.comparison_count()
            }
            Expr::Not { inner } => inner.comparison_count(),
        }
    }
}

/// Renders the filter back to source form.
///
/// Binary nodes are always parenthesized, so the output re-parses to the same
/// tree regardless of the left-fold rule.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Comparison {
                property,
                operator,
                value,
            } => write!(f, "{} {} {}", property, operator, value),
            Expr::And { lhs, rhs } => write!(f, "({} and {})", lhs, rhs),
            Expr::Or { lhs, rhs } => write!(f, "({} or {})", lhs, rhs),
            Expr::Not { inner } => write!(f, "not {}", inner),
        }
    }
}
