// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Leaf evaluation: turning a per-metric sample stream into a verdict
//! stream, either per completed window (aggregation conditions) or per
//! sample (simple conditions).

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures::{future, Stream, StreamExt};
use tracing::trace;
use vigil_core::{
    Aggregate, AggregateKind, Period, Result, Sample, StreamItem, Verdict,
};
use vigil_expr::{ArithExpr, ComparisonOp, VariableResolver};
use vigil_stream::{MetricStream, WindowByTimestampExt, WindowStream};

/// Boxed verdict stream produced for one expression node.
pub type VerdictStream = Pin<Box<dyn Stream<Item = StreamItem<Verdict>> + Send + 'static>>;

/// A literal threshold is used as-is; an arithmetic tree is evaluated
/// against the resolver at each comparison time.
fn resolve_threshold(threshold: &ArithExpr, resolver: &dyn VariableResolver) -> Result<f64> {
    match threshold.as_constant() {
        Some(value) => Ok(value),
        None => threshold.evaluate(resolver),
    }
}

/// An error item is terminal: forward it, then end the stream.
fn end_after_error<S>(stream: S) -> impl Stream<Item = StreamItem<Verdict>>
where
    S: Stream<Item = StreamItem<Verdict>>,
{
    stream.scan(false, |errored, item| {
        if *errored {
            return future::ready(None);
        }
        if item.is_error() {
            *errored = true;
        }
        future::ready(Some(item))
    })
}

/// One verdict per completed tumbling window: fold the window's samples
/// with `kind`, compare against the threshold, stamp with the aligned
/// window period.
#[allow(clippy::too_many_arguments)]
pub(crate) fn aggregation_leaf(
    samples: MetricStream,
    node: Arc<str>,
    kind: AggregateKind,
    window: Duration,
    op: ComparisonOp,
    threshold: Arc<ArithExpr>,
    resolver: Arc<dyn VariableResolver>,
    reorder_interval: Duration,
) -> VerdictStream {
    let windows = samples.window_by_timestamp(window, reorder_interval);

    let verdicts = windows.filter_map(move |item| {
        let node = Arc::clone(&node);
        let threshold = Arc::clone(&threshold);
        let resolver = Arc::clone(&resolver);
        async move {
            match item {
                StreamItem::Value(window_stream) => {
                    fold_and_compare(window_stream, node, kind, op, &threshold, resolver.as_ref())
                        .await
                }
                StreamItem::Error(error) => Some(StreamItem::Error(error)),
            }
        }
    });

    Box::pin(end_after_error(verdicts))
}

/// Drain one window and produce its verdict, or `None` for an empty window.
async fn fold_and_compare(
    mut window: WindowStream<Sample>,
    node: Arc<str>,
    kind: AggregateKind,
    op: ComparisonOp,
    threshold: &ArithExpr,
    resolver: &dyn VariableResolver,
) -> Option<StreamItem<Verdict>> {
    let period = window.period();
    let mut count = 0_usize;
    let mut sum = 0.0_f64;
    let mut max = f64::NEG_INFINITY;
    let mut min = f64::INFINITY;

    while let Some(item) = window.next().await {
        match item {
            StreamItem::Value(sample) => {
                count += 1;
                sum += sample.value;
                max = max.max(sample.value);
                min = min.min(sample.value);
            }
            StreamItem::Error(error) => return Some(StreamItem::Error(error)),
        }
    }

    // Empty windows emit no verdict
    if count == 0 {
        return None;
    }

    let value = match kind {
        AggregateKind::Avg => sum / count as f64,
        AggregateKind::Sum => sum,
        AggregateKind::Max => max,
        AggregateKind::Min => min,
    };
    let aggregate = Aggregate {
        node: Arc::clone(&node),
        kind,
        period,
        value,
    };
    trace!(%aggregate, samples = count, "window folded");

    match resolve_threshold(threshold, resolver) {
        Ok(limit) => Some(StreamItem::Value(Verdict {
            node,
            value: op.compare(aggregate.value, limit),
            period,
        })),
        Err(error) => Some(StreamItem::Error(error)),
    }
}

/// One verdict per incoming sample, stamped with the sample's instant.
pub(crate) fn simple_leaf(
    samples: MetricStream,
    node: Arc<str>,
    op: ComparisonOp,
    threshold: Arc<ArithExpr>,
    resolver: Arc<dyn VariableResolver>,
) -> VerdictStream {
    let verdicts = samples.map(move |item| match item {
        StreamItem::Value(sample) => match resolve_threshold(&threshold, resolver.as_ref()) {
            Ok(limit) => StreamItem::Value(Verdict {
                node: Arc::clone(&node),
                value: op.compare(sample.value, limit),
                period: Period::point(sample.timestamp),
            }),
            Err(error) => StreamItem::Error(error),
        },
        StreamItem::Error(error) => StreamItem::Error(error),
    });

    Box::pin(end_after_error(verdicts))
}
