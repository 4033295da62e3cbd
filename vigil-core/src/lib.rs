// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core types for the vigil streaming rule engine.
//!
//! This crate defines the clocked sample model ([`Sample`], [`EventTime`],
//! [`Period`], [`Verdict`], [`Aggregate`]), the in-band error carrier
//! [`StreamItem`], the hot multicast [`Subject`], and the cancellable
//! background [`Task`] that the routing and windowing layers are built on.

#![allow(clippy::multiple_crate_versions)]

pub mod aggregate;
pub mod error;
pub mod event_time;
pub mod logic;
pub mod period;
pub mod sample;
pub mod stream_item;
pub mod subject;
pub mod task;
pub mod verdict;

// Re-export commonly used types
pub use aggregate::{Aggregate, AggregateKind};
pub use error::{Result, VigilError};
pub use event_time::{EventTime, EventTimed};
pub use logic::LogicalOp;
pub use period::Period;
pub use sample::Sample;
pub use stream_item::StreamItem;
pub use subject::{Subject, SubjectError, SubjectStream};
pub use task::Task;
pub use verdict::Verdict;
pub use tokio_util::sync::CancellationToken;
