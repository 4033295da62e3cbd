// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Semantic validation of parsed expressions.
//!
//! Validation distinguishes errors (the rule must not be built) from
//! warnings (the rule is suspicious but evaluable). Known-metric and
//! known-variable sets are optional; without them the corresponding checks
//! are skipped.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use vigil_core::LogicalOp;

use crate::ast::{Condition, Expr};
use crate::visitor::ExprVisitor;

const MAX_REASONABLE_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// Outcome of validating one expression.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// `true` when no errors were found (warnings do not affect validity)
    pub is_valid: bool,
    /// One message per validation failure
    pub errors: Vec<String>,
    /// One message per non-fatal finding
    pub warnings: Vec<String>,
}

/// Validating visitor over the expression tree.
pub struct Validator<'a> {
    known_metrics: Option<&'a BTreeSet<String>>,
    known_variables: Option<&'a BTreeSet<String>>,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl<'a> Validator<'a> {
    /// Create a validator; `None` for either set skips that check.
    #[must_use]
    pub fn new(
        known_metrics: Option<&'a BTreeSet<String>>,
        known_variables: Option<&'a BTreeSet<String>>,
    ) -> Self {
        Self {
            known_metrics,
            known_variables,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Validate the expression and produce a report.
    #[must_use]
    pub fn check(mut self, expr: &Expr) -> ValidationReport {
        expr.accept(&mut self);
        ValidationReport {
            is_valid: self.errors.is_empty(),
            errors: self.errors,
            warnings: self.warnings,
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

impl ExprVisitor for Validator<'_> {
    type Output = ();

    fn visit_condition(&mut self, condition: &Condition) {
        let metric = condition.metric.as_ref();
        if metric.is_empty() {
            self.error("condition has an empty metric name");
        } else if let Some(known) = self.known_metrics {
            if !known.contains(metric) {
                self.error(format!("unknown metric `{metric}`"));
            }
        }

        if condition.threshold.has_non_finite_constant() {
            self.error(format!(
                "threshold of condition on `{metric}` is not a finite number"
            ));
        }

        if let Some(known) = self.known_variables {
            for variable in condition.threshold.variables() {
                if !known.contains(&variable) {
                    self.error(format!("unknown variable `{variable}`"));
                }
            }
        }

        if condition.is_aggregation {
            if condition.aggregation.is_none() {
                self.error(format!(
                    "aggregation condition on `{metric}` is missing its aggregation kind"
                ));
            }
            match condition.window {
                None => self.error(format!(
                    "aggregation condition on `{metric}` is missing a window"
                )),
                Some(window) if window.is_zero() => self.error(format!(
                    "aggregation window on `{metric}` must be positive"
                )),
                Some(window) if window > MAX_REASONABLE_WINDOW => self.warning(format!(
                    "aggregation window on `{metric}` exceeds 24 hours"
                )),
                Some(_) => {}
            }
        } else if condition.aggregation.is_some() || condition.window.is_some() {
            self.warning(format!(
                "aggregation fields on non-aggregation condition `{metric}` are ignored"
            ));
        }
    }

    fn visit_binary(&mut self, _name: &Arc<str>, _op: LogicalOp, left: &Expr, right: &Expr) {
        left.accept(self);
        right.accept(self);
    }
}

impl Expr {
    /// Validate this tree against optional known-metric/variable universes.
    #[must_use]
    pub fn validate(
        &self,
        known_metrics: Option<&BTreeSet<String>>,
        known_variables: Option<&BTreeSet<String>>,
    ) -> ValidationReport {
        Validator::new(known_metrics, known_variables).check(self)
    }
}
