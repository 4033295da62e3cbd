// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt;
use std::sync::Arc;

use crate::event_time::{EventTime, EventTimed};

/// One named numeric measurement produced by the data source.
///
/// Samples are immutable: the router consumes each one once and fans it out
/// to every sub-stream whose metric name matches. The metric name is an
/// `Arc<str>` so fan-out clones are pointer-sized.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    /// Metric name this sample belongs to
    pub metric: Arc<str>,
    /// Measured value
    pub value: f64,
    /// Event-time the measurement was taken
    pub timestamp: EventTime,
}

impl Sample {
    /// Create a sample.
    pub fn new(metric: impl Into<Arc<str>>, value: f64, timestamp: EventTime) -> Self {
        Self {
            metric: metric.into(),
            value,
            timestamp,
        }
    }
}

impl EventTimed for Sample {
    fn event_time(&self) -> EventTime {
        self.timestamp
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} @ {}", self.metric, self.value, self.timestamp)
    }
}
