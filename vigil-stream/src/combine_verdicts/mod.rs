// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Combine-latest for two verdict streams under a boolean connective.
//!
//! [`combine_verdicts`](CombineVerdictsExt::combine_verdicts) pairs the
//! verdict streams of two child expression nodes. Nothing is emitted until
//! both children have produced at least one verdict; after that, every new
//! verdict on either side yields exactly one combined verdict built from the
//! new value and the latest value of the opposite side. The combined period
//! is the join of the two input periods.
//!
//! Children emitting at different cadences (say, a 1-second and a 5-minute
//! aggregation) therefore keep the combined output responsive: the output
//! never waits for synchronized windows. During start-up, one side's period
//! dominates until the other side has spoken.
//!
//! Errors on either child are forwarded immediately and terminate the
//! combined stream. Child completion is not forwarded as long as the other
//! child is still live; the combined stream completes when both children
//! have completed.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use futures::StreamExt;
//! use vigil_core::{EventTime, LogicalOp, Period, StreamItem, Verdict};
//! use vigil_stream::CombineVerdictsExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let period = Period::point(EventTime::from_secs(0));
//! let left = futures::stream::iter(vec![
//!     StreamItem::Value(Verdict::new("cpu", true, period)),
//! ]);
//! let right = futures::stream::iter(vec![
//!     StreamItem::Value(Verdict::new("mem", false, period)),
//! ]);
//!
//! let combined: Vec<_> = left
//!     .combine_verdicts(right, LogicalOp::Or, Arc::from("or(cpu,mem)"))
//!     .collect()
//!     .await;
//!
//! assert_eq!(combined.len(), 1);
//! assert!(combined[0].clone().unwrap().value);
//! # }
//! ```

mod implementation;

pub use implementation::{CombineVerdicts, CombineVerdictsExt};
