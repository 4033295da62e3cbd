// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::Arc;
use std::time::Duration;

use futures::stream;
use vigil_core::{LogicalOp, StreamItem, VigilError};
use vigil_expr::{Condition, Expr, ExprVisitor, VariableResolver};
use vigil_stream::{CombineVerdictsExt, MetricRouter};

use crate::leaf::{aggregation_leaf, simple_leaf, VerdictStream};

/// The evaluating visitor: compiles an expression tree into a live verdict
/// stream against a router.
///
/// Conditions subscribe to their metric's sub-stream and become leaves;
/// binary nodes combine their children's streams under combine-latest.
pub(crate) struct Evaluator<'a> {
    router: &'a MetricRouter,
    resolver: Arc<dyn VariableResolver>,
    reorder_interval: Duration,
}

impl<'a> Evaluator<'a> {
    pub(crate) fn new(
        router: &'a MetricRouter,
        resolver: Arc<dyn VariableResolver>,
        reorder_interval: Duration,
    ) -> Self {
        Self {
            router,
            resolver,
            reorder_interval,
        }
    }
}

impl ExprVisitor for Evaluator<'_> {
    type Output = VerdictStream;

    fn visit_condition(&mut self, condition: &Condition) -> VerdictStream {
        let samples = self.router.subscribe(&condition.metric);
        let node = Arc::clone(condition.name());
        let threshold = Arc::new(condition.threshold.clone());

        if condition.is_aggregation {
            match (condition.aggregation, condition.window) {
                (Some(kind), Some(window)) if !window.is_zero() => aggregation_leaf(
                    samples,
                    node,
                    kind,
                    window,
                    condition.op,
                    threshold,
                    Arc::clone(&self.resolver),
                    self.reorder_interval,
                ),
                // Unvalidated programmatic tree: fail the stream instead of
                // guessing a window
                _ => Box::pin(stream::once(async move {
                    StreamItem::Error(VigilError::InvalidExpression {
                        errors: vec![format!(
                            "aggregation condition `{node}` has no usable kind or window"
                        )],
                    })
                })),
            }
        } else {
            simple_leaf(
                samples,
                node,
                condition.op,
                threshold,
                Arc::clone(&self.resolver),
            )
        }
    }

    fn visit_binary(
        &mut self,
        name: &Arc<str>,
        op: LogicalOp,
        left: &Expr,
        right: &Expr,
    ) -> VerdictStream {
        let left_stream = left.accept(self);
        let right_stream = right.accept(self);
        Box::pin(left_stream.combine_verdicts(right_stream, op, Arc::clone(name)))
    }
}
