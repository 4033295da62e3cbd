// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Read-only analyses over the expression tree: metric collection, variable
//! collection, and complexity metrics. Each analysis is an [`ExprVisitor`].

use std::collections::BTreeSet;
use std::sync::Arc;

use vigil_core::LogicalOp;

use crate::ast::{Condition, Expr};
use crate::visitor::ExprVisitor;

/// Collects the set of metric names referenced anywhere in the tree.
#[derive(Debug, Default)]
pub struct MetricCollector {
    metrics: BTreeSet<String>,
}

impl MetricCollector {
    /// Run the collector over an expression.
    #[must_use]
    pub fn collect(expr: &Expr) -> BTreeSet<String> {
        let mut collector = Self::default();
        expr.accept(&mut collector);
        collector.metrics
    }
}

impl ExprVisitor for MetricCollector {
    type Output = ();

    fn visit_condition(&mut self, condition: &Condition) {
        self.metrics.insert(condition.metric.to_string());
    }

    fn visit_binary(&mut self, _name: &Arc<str>, _op: LogicalOp, left: &Expr, right: &Expr) {
        left.accept(self);
        right.accept(self);
    }
}

/// Collects the set of variable names referenced in any threshold tree.
#[derive(Debug, Default)]
pub struct VariableCollector {
    variables: BTreeSet<String>,
}

impl VariableCollector {
    /// Run the collector over an expression.
    #[must_use]
    pub fn collect(expr: &Expr) -> BTreeSet<String> {
        let mut collector = Self::default();
        expr.accept(&mut collector);
        collector.variables
    }
}

impl ExprVisitor for VariableCollector {
    type Output = ();

    fn visit_condition(&mut self, condition: &Condition) {
        self.variables.extend(condition.threshold.variables());
    }

    fn visit_binary(&mut self, _name: &Arc<str>, _op: LogicalOp, left: &Expr, right: &Expr) {
        left.accept(self);
        right.accept(self);
    }
}

/// Shape metrics of one expression tree.
///
/// `max_depth` counts a condition leaf as `1 + depth(threshold)`, so a
/// condition with a literal threshold contributes 2. This keeps the depth
/// sensitive to elaborate threshold arithmetic, not just the boolean shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Complexity {
    /// Total expression nodes (conditions + logical operators)
    pub node_count: usize,
    /// Number of condition leaves
    pub condition_count: usize,
    /// Number of aggregation condition leaves
    pub aggregation_count: usize,
    /// Height of the tree, thresholds included
    pub max_depth: usize,
    /// Number of logical operator nodes
    pub operator_count: usize,
}

impl Complexity {
    /// Whether the rule is costly enough to deserve attention: more than 20
    /// nodes, deeper than 10, or more than 5 aggregations.
    #[must_use]
    pub const fn is_high_complexity(&self) -> bool {
        self.node_count > 20 || self.max_depth > 10 || self.aggregation_count > 5
    }
}

/// Computes [`Complexity`] for an expression tree.
#[derive(Debug, Default)]
pub struct ComplexityAnalyzer;

impl ComplexityAnalyzer {
    /// Run the analyzer over an expression.
    #[must_use]
    pub fn analyze(expr: &Expr) -> Complexity {
        expr.accept(&mut Self)
    }
}

impl ExprVisitor for ComplexityAnalyzer {
    type Output = Complexity;

    fn visit_condition(&mut self, condition: &Condition) -> Complexity {
        Complexity {
            node_count: 1,
            condition_count: 1,
            aggregation_count: usize::from(condition.is_aggregation),
            max_depth: 1 + condition.threshold.depth(),
            operator_count: 0,
        }
    }

    fn visit_binary(
        &mut self,
        _name: &Arc<str>,
        _op: LogicalOp,
        left: &Expr,
        right: &Expr,
    ) -> Complexity {
        let l = left.accept(self);
        let r = right.accept(self);
        Complexity {
            node_count: l.node_count + r.node_count + 1,
            condition_count: l.condition_count + r.condition_count,
            aggregation_count: l.aggregation_count + r.aggregation_count,
            max_depth: 1 + l.max_depth.max(r.max_depth),
            operator_count: l.operator_count + r.operator_count + 1,
        }
    }
}

impl Expr {
    /// The set of metric names referenced anywhere in the tree.
    #[must_use]
    pub fn metrics(&self) -> BTreeSet<String> {
        MetricCollector::collect(self)
    }

    /// The set of variable names referenced in any threshold tree.
    #[must_use]
    pub fn variables(&self) -> BTreeSet<String> {
        VariableCollector::collect(self)
    }

    /// Shape metrics for this tree.
    #[must_use]
    pub fn complexity(&self) -> Complexity {
        ComplexityAnalyzer::analyze(self)
    }
}
