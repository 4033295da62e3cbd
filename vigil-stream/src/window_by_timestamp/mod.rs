// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Tumbling event-time windows with a wall-clock reorder buffer.
//!
//! [`window_by_timestamp`](WindowByTimestampExt::window_by_timestamp)
//! transforms a stream of event-timed items into a stream of
//! [`WindowStream`]s, one per tumbling window of the configured duration.
//! Each inner stream yields that window's items in non-decreasing event-time
//! order and completes when the window closes.
//!
//! ## Algorithm
//!
//! 1. Incoming items are buffered for one reorder interval of wall-clock
//!    time, then stably sorted by event-time and re-emitted. The interval
//!    bounds the out-of-order tolerance; it must be positive.
//! 2. Each re-emitted item is routed by its window id,
//!    `event_time.div_euclid(window)`.
//! 3. The first item of a new window id opens a window: an inner subject is
//!    created and published on the outer stream.
//! 4. Opening a later window completes the previous one immediately, even
//!    though later samples might still have belonged to it. This is the
//!    deliberate one-live-window policy: bounded memory in exchange for
//!    strict event-time completeness, with the reorder buffer absorbing the
//!    usual jitter.
//! 5. A sample whose window has already been completed is dropped (logged at
//!    debug level); it is never routed into a re-opened window, so windows
//!    are always published in the order they first open.
//! 6. Upstream completion flushes the reorder buffer before completing all
//!    windows; an upstream error discards the buffer and propagates to the
//!    open window and the outer stream.
//!
//! Dropping the outer stream cancels the windowing task, its flush timer,
//! and all in-flight inner windows.
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use futures::StreamExt;
//! use vigil_core::{EventTime, Sample, StreamItem};
//! use vigil_stream::WindowByTimestampExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
//! let source = tokio_stream::wrappers::UnboundedReceiverStream::new(rx);
//!
//! let mut windows = source
//!     .window_by_timestamp(Duration::from_secs(3), Duration::from_millis(50));
//!
//! for t in [0, 1, 2, 3] {
//!     tx.send(StreamItem::Value(Sample::new("cpu", 1.0, EventTime::from_secs(t))))
//!         .unwrap();
//! }
//! drop(tx);
//!
//! let first = windows.next().await.unwrap().unwrap();
//! assert_eq!(first.id(), 0);
//! assert_eq!(first.collect::<Vec<_>>().await.len(), 3);
//!
//! let second = windows.next().await.unwrap().unwrap();
//! assert_eq!(second.id(), 1);
//! # }
//! ```

mod implementation;

pub use implementation::{WindowByTimestampExt, WindowStream, WindowedStream};
