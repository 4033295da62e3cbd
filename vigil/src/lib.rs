// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # vigil
//!
//! A streaming rule engine: compile a boolean rule over named metrics once,
//! then receive a running stream of period-stamped verdicts as samples
//! arrive.
//!
//! ```text
//! avg(cpu, 1m) > 70 || avg(mem, 1m) > 80
//! ```
//!
//! Samples flow source → router → per-metric sub-stream → tumbling
//! event-time windows → aggregation and comparison → combine-latest AND/OR
//! up the expression tree → root verdict stream.
//!
//! ## Quick start
//!
//! ```
//! use futures::StreamExt;
//! use vigil_rx::{EventTime, RuleEngine, Sample, StreamItem};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
//! let source = tokio_stream::wrappers::UnboundedReceiverStream::new(rx);
//!
//! let engine = RuleEngine::new(source);
//! let mut verdicts = engine.build("avg(cpu, 3s) > 70")?;
//!
//! for t in [0.0, 1.0, 2.0] {
//!     tx.send(StreamItem::Value(Sample::new("cpu", 85.0, EventTime::from_secs_f64(t))))?;
//! }
//! drop(tx); // completing the source closes the last window
//!
//! let verdict = verdicts.next().await.unwrap().unwrap();
//! assert!(verdict.value);
//! # Ok(())
//! # }
//! ```

#![allow(clippy::multiple_crate_versions)]

pub use vigil_core::{
    Aggregate, AggregateKind, EventTime, EventTimed, LogicalOp, Period, Result, Sample,
    StreamItem, Subject, SubjectError, Task, Verdict, VigilError,
};
pub use vigil_engine::{EngineOptions, RuleEngine, VerdictStream};
pub use vigil_expr::{
    parse, ArithExpr, ArithOp, ComparisonOp, Complexity, Condition, EmptyResolver, Expr,
    ExprVisitor, ValidationReport, VariableResolver,
};
pub use vigil_stream::{
    CombineVerdictsExt, MetricRouter, MetricStream, WindowByTimestampExt, WindowStream,
    WindowedStream,
};
