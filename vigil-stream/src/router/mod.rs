// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Per-metric fan-out over a single hot sample source.
//!
//! A [`MetricRouter`] consumes one stream of [`Sample`](vigil_core::Sample)s
//! and demultiplexes it into one hot sub-stream per metric name. Subscribing
//! twice to the same metric reuses the same internal subject, so any number
//! of conditions referencing a metric share one upstream filter.
//!
//! ## Semantics
//!
//! - Samples are delivered to sub-streams in source order.
//! - Samples for metrics nobody has subscribed to are discarded.
//! - A source error is fanned out to every active sub-stream exactly once;
//!   completion likewise. After either, `subscribe` returns an
//!   already-terminated stream.
//! - The routing task is cancelled when the router is dropped.
//!
//! ## Example
//!
//! ```
//! use futures::StreamExt;
//! use vigil_core::{EventTime, Sample, StreamItem};
//! use vigil_stream::MetricRouter;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
//! let source = tokio_stream::wrappers::UnboundedReceiverStream::new(rx);
//! let router = MetricRouter::new(source);
//!
//! let mut cpu = router.subscribe("cpu");
//!
//! tx.send(StreamItem::Value(Sample::new("cpu", 42.0, EventTime::from_secs(0))))
//!     .unwrap();
//! tx.send(StreamItem::Value(Sample::new("mem", 7.0, EventTime::from_secs(0))))
//!     .unwrap();
//! drop(tx);
//!
//! let sample = cpu.next().await.unwrap().unwrap();
//! assert_eq!(sample.metric.as_ref(), "cpu");
//! assert!(cpu.next().await.is_none()); // mem sample was not routed here
//! # }
//! ```

mod implementation;

pub use implementation::{MetricRouter, MetricStream};
