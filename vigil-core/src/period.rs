// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt;
use std::time::Duration;

use crate::event_time::EventTime;

/// A half-open interval `[start, end)` on the event-time axis.
///
/// Every verdict carries the period spanning exactly the samples that
/// contributed to it: aligned window boundaries for aggregation leaves, a
/// single instant for simple leaves, and the [`join`](Period::join) of the
/// child periods for combinators.
///
/// [`Period::EMPTY`] is a distinguished zero-duration value at the epoch and
/// is the unit of `join`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    start: EventTime,
    end: EventTime,
}

impl Period {
    /// The distinguished empty period, the unit of [`join`](Period::join).
    pub const EMPTY: Period = Period {
        start: EventTime::EPOCH,
        end: EventTime::EPOCH,
    };

    /// Create a period from `start` to `end`.
    ///
    /// # Panics
    ///
    /// Panics if `end` precedes `start`.
    #[must_use]
    pub fn new(start: EventTime, end: EventTime) -> Self {
        assert!(end >= start, "period end must not precede start");
        Self { start, end }
    }

    /// A zero-duration period at a single instant.
    #[must_use]
    pub fn point(at: EventTime) -> Self {
        Self { start: at, end: at }
    }

    /// The aligned period of tumbling window `id` with the given duration:
    /// `[id * d, (id + 1) * d)`.
    #[must_use]
    pub fn window(id: i64, duration: Duration) -> Self {
        let duration_ms = duration.as_millis() as i64;
        let start = EventTime::from_millis(id * duration_ms);
        Self {
            start,
            end: start + duration,
        }
    }

    /// Start of the interval (inclusive).
    #[must_use]
    pub const fn start(&self) -> EventTime {
        self.start
    }

    /// End of the interval (exclusive).
    #[must_use]
    pub const fn end(&self) -> EventTime {
        self.end
    }

    /// Width of the interval.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end.duration_since(self.start)
    }

    /// Whether this is the distinguished empty period.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// The smallest period covering both inputs:
    /// `[min(starts), max(ends))`. `EMPTY` is the unit.
    #[must_use]
    pub fn join(self, other: Period) -> Period {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Period {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
