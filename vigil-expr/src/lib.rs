// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Rule expression front-end for vigil.
//!
//! Parses textual rules such as `avg(cpu, 1m) > 70 || mem > k * 2` into an
//! immutable expression tree, and provides the analyses the engine runs over
//! it: metric and variable collection, complexity metrics, and validation.
//! Thresholds are a small arithmetic sub-language (`+ - * /` over constants
//! and resolver-supplied variables).
//!
//! The parser is a hand-written recursive descent over the grammar in
//! [`parser`]; any front-end producing the same [`Expr`] shape is
//! interchangeable with it.

#![allow(clippy::multiple_crate_versions)]

pub mod analysis;
pub mod arith;
pub mod ast;
pub mod parser;
pub mod resolver;
pub mod token;
pub mod validate;
pub mod visitor;

// Re-export commonly used types
pub use analysis::{Complexity, ComplexityAnalyzer, MetricCollector, VariableCollector};
pub use arith::{ArithExpr, ArithOp};
pub use ast::{ComparisonOp, Condition, Expr};
pub use parser::parse;
pub use resolver::{EmptyResolver, VariableResolver};
pub use validate::{ValidationReport, Validator};
pub use visitor::ExprVisitor;
