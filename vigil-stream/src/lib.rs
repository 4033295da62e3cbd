// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Stream plumbing for the vigil rule engine.
//!
//! Three operators make up the data path between a sample source and a rule
//! verdict:
//!
//! - [`MetricRouter`] fans one hot sample stream out into per-metric
//!   sub-streams, shared across every condition referencing a metric.
//! - [`window_by_timestamp`](WindowByTimestampExt::window_by_timestamp)
//!   groups a sub-stream into tumbling event-time windows behind a
//!   wall-clock reorder buffer.
//! - [`combine_verdicts`](CombineVerdictsExt::combine_verdicts) merges two
//!   child verdict streams under AND/OR with combine-latest semantics.

#![allow(clippy::multiple_crate_versions)]

pub mod combine_verdicts;
pub mod router;
pub mod window_by_timestamp;

// Re-export commonly used types
pub use combine_verdicts::{CombineVerdicts, CombineVerdictsExt};
pub use router::{MetricRouter, MetricStream};
pub use window_by_timestamp::{WindowByTimestampExt, WindowStream, WindowedStream};
