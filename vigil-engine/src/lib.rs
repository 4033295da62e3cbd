// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Streaming rule evaluation for vigil.
//!
//! A [`RuleEngine`] compiles a textual rule such as
//! `avg(cpu, 1m) > 70 || avg(mem, 1m) > 80` once and emits a running stream
//! of boolean [`Verdict`](vigil_core::Verdict)s as samples arrive:
//! per-metric routing, tumbling event-time windows, aggregation and
//! comparison at the leaves, combine-latest AND/OR up the tree.

#![allow(clippy::multiple_crate_versions)]

pub mod engine;
mod evaluator;
mod leaf;

// Re-export commonly used types
pub use engine::{EngineOptions, RuleEngine};
pub use leaf::VerdictStream;
