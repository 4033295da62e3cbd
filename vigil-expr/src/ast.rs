// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The rule expression tree.
//!
//! An expression is a tagged sum of two shapes: a condition leaf, or a
//! binary AND/OR node owning its children exclusively. Every node carries a
//! name minted at construction (leaves) or derived from its children
//! (binaries); names tag the verdicts the node emits, for tracing.
//!
//! Equality on conditions and expressions is structural and ignores node
//! names, so independently built trees with the same shape compare equal.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use vigil_core::{AggregateKind, LogicalOp};

use crate::arith::ArithExpr;
use crate::visitor::ExprVisitor;

static NODE_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_node_id() -> u64 {
    NODE_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Comparison operator of a condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
}

impl ComparisonOp {
    /// Operator spelling in rule text.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "==",
            Self::Ne => "!=",
        }
    }

    /// Apply the comparison to a measured value and a threshold.
    #[must_use]
    pub fn compare(self, value: f64, threshold: f64) -> bool {
        match self {
            Self::Gt => value > threshold,
            Self::Ge => value >= threshold,
            Self::Lt => value < threshold,
            Self::Le => value <= threshold,
            Self::Eq => value == threshold,
            Self::Ne => value != threshold,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One condition leaf: a metric compared against a threshold, optionally
/// through a windowed aggregation.
///
/// The aggregation fields mirror the wire shape of a condition (a flag plus
/// optional kind and window) rather than a nested enum, so a
/// programmatically built condition can carry inconsistent fields; the
/// validator reports those as errors or warnings instead of making them
/// unrepresentable.
#[derive(Clone, Debug)]
pub struct Condition {
    name: Arc<str>,
    /// Metric whose sub-stream this condition consumes
    pub metric: Arc<str>,
    /// Comparison applied to the (aggregated) value
    pub op: ComparisonOp,
    /// Threshold: a literal or an arithmetic tree over variables
    pub threshold: ArithExpr,
    /// Whether this condition aggregates a window before comparing
    pub is_aggregation: bool,
    /// Fold to apply, when aggregating
    pub aggregation: Option<AggregateKind>,
    /// Tumbling window width, when aggregating
    pub window: Option<Duration>,
}

impl Condition {
    /// A per-sample condition: one verdict per incoming sample.
    pub fn simple(metric: impl Into<Arc<str>>, op: ComparisonOp, threshold: ArithExpr) -> Self {
        let metric = metric.into();
        let name = Arc::from(format!("{metric}_{}", next_node_id()));
        Self {
            name,
            metric,
            op,
            threshold,
            is_aggregation: false,
            aggregation: None,
            window: None,
        }
    }

    /// A windowed aggregation condition: one verdict per completed window.
    pub fn aggregation(
        kind: AggregateKind,
        metric: impl Into<Arc<str>>,
        window: Duration,
        op: ComparisonOp,
        threshold: ArithExpr,
    ) -> Self {
        let metric = metric.into();
        let name = Arc::from(format!("{kind}_{metric}_{}", next_node_id()));
        Self {
            name,
            metric,
            op,
            threshold,
            is_aggregation: true,
            aggregation: Some(kind),
            window: Some(window),
        }
    }

    /// The node name minted at construction.
    #[must_use]
    pub fn name(&self) -> &Arc<str> {
        &self.name
    }
}

impl PartialEq for Condition {
    /// Structural equality; node names are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.metric == other.metric
            && self.op == other.op
            && self.threshold == other.threshold
            && self.is_aggregation == other.is_aggregation
            && self.aggregation == other.aggregation
            && self.window == other.window
    }
}

fn fmt_window(f: &mut fmt::Formatter<'_>, window: Duration) -> fmt::Result {
    let ms = window.as_millis();
    if ms > 0 && ms % 3_600_000 == 0 {
        write!(f, "{}h", ms / 3_600_000)
    } else if ms > 0 && ms % 60_000 == 0 {
        write!(f, "{}m", ms / 60_000)
    } else if ms % 1_000 == 0 {
        write!(f, "{}s", ms / 1_000)
    } else {
        write!(f, "{}s", ms as f64 / 1_000.0)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_aggregation {
            if let (Some(kind), Some(window)) = (self.aggregation, self.window) {
                write!(f, "{kind}({}, ", self.metric)?;
                fmt_window(f, window)?;
                return write!(f, ") {} {}", self.op, self.threshold);
            }
        }
        write!(f, "{} {} {}", self.metric, self.op, self.threshold)
    }
}

/// A rule expression: a condition leaf or a binary AND/OR node.
#[derive(Clone, Debug)]
pub enum Expr {
    /// A condition leaf
    Condition(Condition),
    /// A binary AND/OR over two sub-expressions
    Binary {
        /// Derived name: `op(left_name,right_name)`
        name: Arc<str>,
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    /// Wrap a condition leaf.
    #[must_use]
    pub const fn condition(condition: Condition) -> Self {
        Self::Condition(condition)
    }

    /// Build a binary node; the name is derived from the operator and the
    /// children's names, so it is unique whenever the children are.
    #[must_use]
    pub fn binary(op: LogicalOp, left: Expr, right: Expr) -> Self {
        let name = Arc::from(format!("{}({},{})", op.keyword(), left.name(), right.name()));
        Self::Binary {
            name,
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// The node's name tag.
    #[must_use]
    pub fn name(&self) -> &Arc<str> {
        match self {
            Self::Condition(condition) => condition.name(),
            Self::Binary { name, .. } => name,
        }
    }

    /// Dispatch a visitor over this node.
    pub fn accept<V: ExprVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Self::Condition(condition) => visitor.visit_condition(condition),
            Self::Binary {
                name,
                op,
                left,
                right,
            } => visitor.visit_binary(name, *op, left, right),
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Binary operands always get parentheses; the printed form then
        // re-parses to exactly the same tree shape regardless of operator
        // precedence.
        match self {
            Self::Condition(_) => write!(f, "{self}"),
            Self::Binary { .. } => write!(f, "({self})"),
        }
    }
}

impl PartialEq for Expr {
    /// Structural equality; node names are ignored.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Condition(a), Self::Condition(b)) => a == b,
            (
                Self::Binary {
                    op: op_a,
                    left: left_a,
                    right: right_a,
                    ..
                },
                Self::Binary {
                    op: op_b,
                    left: left_b,
                    right: right_b,
                    ..
                },
            ) => op_a == op_b && left_a == left_b && right_a == right_b,
            _ => false,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Condition(condition) => write!(f, "{condition}"),
            Self::Binary {
                op, left, right, ..
            } => {
                left.fmt_operand(f)?;
                write!(f, " {op} ")?;
                right.fmt_operand(f)
            }
        }
    }
}
