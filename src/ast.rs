//! # Sieve Filter Language - Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) for the Sieve filter
//! language, a single boolean expression over the fields of one resource type.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (comparisons and logical connectives)
//! - **[operators]** - Comparison operators and their spelling aliases
//!
//! ## Quick Start
//!
//! ```text
//! status eq finished and rating gt 80
//! ```
//!
//! This filter keeps finished resources rated above 80.
//!
//! ## Core Concepts
//!
//! ### Comparisons
//!
//! Every leaf is `property operator value`. Values carry no schema knowledge
//! yet: a bareword such as `finished` is an [`Enum`](crate::Value::Enum)
//! literal until the validator decides otherwise.
//!
//! ### Left-fold Connectives
//!
//! `and` and `or` share one precedence level and fold strictly left to right:
//!
//! ```text
//! a eq 1 and b eq 2 or c eq 3    =>   (a eq 1 and b eq 2) or c eq 3
//! ```
//!
//! Parentheses are the only way to group differently.
//!
//! ### Negation
//!
//! `not` applies to the single comparison or parenthesized group after it:
//!
//! ```text
//! not rating lt 10 and rating lt 20   =>   (not rating lt 10) and rating lt 20
//! ```
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::Expr;
pub use operators::Operator;
pub use tokens::Token;
