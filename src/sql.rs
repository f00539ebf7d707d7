//! PostgreSQL condition backend.
//!
//! A validated filter compiles to a [`SqlCondition`] tree, which renders to a
//! [`SqlFragment`]: a `WHERE`-clause body with `$n` placeholders and the
//! parameters to bind to them. Column names come from the schema, never from
//! the filter text, and every literal is bound rather than spliced in.
//!
//! ```
//! use sieve_lang::{Filter, schema::{FieldDescriptor, Schema}};
//!
//! let schema = Schema::new()
//!     .with_field(FieldDescriptor::int("rating"))
//!     .with_field(FieldDescriptor::resource("genres").array());
//!
//! let fragment = Filter::parse("rating ge 80 and genres has action", &schema)
//!     .unwrap()
//!     .to_sql()
//!     .render();
//! assert_eq!(fragment.sql, r#"("rating" >= $1 AND $2 = ANY("genres_slug"))"#);
//! assert_eq!(fragment.params.len(), 2);
//! ```

use std::fmt;

use serde::Serialize;

use crate::{
    ast::Operator,
    schema::FieldDescriptor,
    validator::{Condition, Operand, ResourceRef, ValidatedExpr},
    value::Date,
};

/// A bound parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlParam {
    Int(i64),
    Float(f64),
    Date(Date),
    Text(String),
}

impl fmt::Display for SqlParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlParam::Int(n) => write!(f, "{}", n),
            SqlParam::Float(n) => write!(f, "{:?}", n),
            SqlParam::Date(d) => write!(f, "'{}'", d),
            SqlParam::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlOptions {
    /// Compile `genres has action,comedy` to one `ANY` test per identifier,
    /// all of which must hold. When off, the list is bound as a single text
    /// parameter.
    pub split_resource_lists: bool,
}

impl Default for SqlOptions {
    fn default() -> Self {
        SqlOptions {
            split_resource_lists: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SqlCondition {
    /// `"column" <op> $n`
    Compare {
        column: String,
        op: Operator,
        param: SqlParam,
    },
    /// `$n = ANY("column")`
    AnyEquals { column: String, param: SqlParam },
    And(Box<SqlCondition>, Box<SqlCondition>),
    Or(Box<SqlCondition>, Box<SqlCondition>),
    Not(Box<SqlCondition>),
}

/// Rendered SQL text and its parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlFragment {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl SqlCondition {
    pub fn compile(expr: &ValidatedExpr, options: &SqlOptions) -> Self {
        match expr {
            ValidatedExpr::Condition(condition) => compile_condition(condition, options),
            ValidatedExpr::And(lhs, rhs) => SqlCondition::And(
                Box::new(Self::compile(lhs, options)),
                Box::new(Self::compile(rhs, options)),
            ),
            ValidatedExpr::Or(lhs, rhs) => SqlCondition::Or(
                Box::new(Self::compile(lhs, options)),
                Box::new(Self::compile(rhs, options)),
            ),
            ValidatedExpr::Not(inner) => SqlCondition::Not(Box::new(Self::compile(inner, options))),
        }
    }

    pub fn render(&self) -> SqlFragment {
        let mut sql = String::new();
        let mut params = Vec::new();
        self.write_sql(&mut sql, &mut params);
        SqlFragment { sql, params }
    }

    fn write_sql(&self, buf: &mut String, params: &mut Vec<SqlParam>) {
        match self {
            SqlCondition::Compare { column, op, param } => {
                params.push(param.clone());
                buf.push_str(&format!(
                    "{} {} ${}",
                    quote_ident(column),
                    sql_operator(*op),
                    params.len()
                ));
            }
            SqlCondition::AnyEquals { column, param } => {
                params.push(param.clone());
                buf.push_str(&format!("${} = ANY({})", params.len(), quote_ident(column)));
            }
            SqlCondition::And(lhs, rhs) | SqlCondition::Or(lhs, rhs) => {
                let keyword = if matches!(self, SqlCondition::And(..)) {
                    " AND "
                } else {
                    " OR "
                };
                buf.push('(');
                lhs.write_sql(buf, params);
                buf.push_str(keyword);
                rhs.write_sql(buf, params);
                buf.push(')');
            }
            SqlCondition::Not(inner) => {
                buf.push_str("NOT (");
                inner.write_sql(buf, params);
                buf.push(')');
            }
        }
    }
}

/// Inline rendering with literals spliced in, for logs and the CLI.
impl fmt::Display for SqlCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlCondition::Compare { column, op, param } => {
                write!(f, "{} {} {}", quote_ident(column), sql_operator(*op), param)
            }
            SqlCondition::AnyEquals { column, param } => {
                write!(f, "{} = ANY({})", param, quote_ident(column))
            }
            SqlCondition::And(lhs, rhs) => write!(f, "({} AND {})", lhs, rhs),
            SqlCondition::Or(lhs, rhs) => write!(f, "({} OR {})", lhs, rhs),
            SqlCondition::Not(inner) => write!(f, "NOT ({})", inner),
        }
    }
}

fn compile_condition(condition: &Condition, options: &SqlOptions) -> SqlCondition {
    let field = &condition.field;
    let op = condition.operator;

    match &condition.operand {
        Operand::Resource(reference) => {
            let (column, param) = resource_target(field, reference);
            SqlCondition::Compare { column, op, param }
        }
        Operand::Resources(refs) if options.split_resource_lists || refs.len() == 1 => {
            let mut tests = refs.iter().map(|reference| {
                let (column, param) = resource_target(field, reference);
                SqlCondition::AnyEquals { column, param }
            });
            match tests.next() {
                Some(first) => tests.fold(first, |lhs, rhs| {
                    SqlCondition::And(Box::new(lhs), Box::new(rhs))
                }),
                None => SqlCondition::AnyEquals {
                    column: field.slug_column(),
                    param: SqlParam::Text(String::new()),
                },
            }
        }
        Operand::Resources(refs) => SqlCondition::AnyEquals {
            column: field.slug_column(),
            param: SqlParam::Text(join_refs(refs)),
        },
        scalar => {
            let column = field.column().to_string();
            let param = scalar_param(scalar);
            if field.is_array {
                SqlCondition::AnyEquals { column, param }
            } else {
                SqlCondition::Compare { column, op, param }
            }
        }
    }
}

/// IDs go to the field's column, slugs to its slug column.
fn resource_target(field: &FieldDescriptor, reference: &ResourceRef) -> (String, SqlParam) {
    match reference {
        ResourceRef::Id(id) => (field.column().to_string(), SqlParam::Int(*id)),
        ResourceRef::Slug(slug) => (field.slug_column(), SqlParam::Text(slug.clone())),
    }
}

fn scalar_param(operand: &Operand) -> SqlParam {
    match operand {
        Operand::Int(n) => SqlParam::Int(*n),
        Operand::Float(n) => SqlParam::Float(*n),
        Operand::Date(d) => SqlParam::Date(*d),
        Operand::Text(s) => SqlParam::Text(s.clone()),
        Operand::Resource(r) => SqlParam::Text(join_refs(std::slice::from_ref(r))),
        Operand::Resources(refs) => SqlParam::Text(join_refs(refs)),
    }
}

fn join_refs(refs: &[ResourceRef]) -> String {
    refs.iter()
        .map(|r| match r {
            ResourceRef::Id(id) => id.to_string(),
            ResourceRef::Slug(slug) => slug.clone(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn sql_operator(op: Operator) -> &'static str {
    match op {
        Operator::Eq | Operator::Has => "=",
        Operator::Ne => "<>",
        Operator::Gt => ">",
        Operator::Ge => ">=",
        Operator::Lt => "<",
        Operator::Le => "<=",
    }
}
