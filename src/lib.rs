pub mod ast;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod filter;
pub mod lexer;
pub mod parser;
pub mod schema;
pub mod sql;
pub mod validator;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{Expr, Operator, Token};
pub use config::Limits;
pub use error::{ErrorReport, FilterError, ParseError, ReportContext, ValidationError};
pub use evaluator::{Predicate, Record};
pub use filter::Filter;
pub use lexer::{LexError, Lexer, Position};
pub use parser::{Parser, parse, parse_with_limits};
pub use schema::{FieldDescriptor, FieldKind, FieldType, Schema};
pub use sql::{SqlCondition, SqlFragment, SqlOptions, SqlParam};
pub use validator::{Condition, Operand, ResourceRef, ValidatedExpr, validate};
pub use value::{Date, Value, ValueKind};
