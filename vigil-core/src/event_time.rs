// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Event-time representation and the [`EventTimed`] accessor trait.
//!
//! Event-time is the timestamp a sample carries; it is entirely distinct from
//! the engine's wall clock, which is only used to pace the reorder buffer.
//! Times are kept as integer milliseconds since the Unix epoch so window
//! arithmetic is exact (no sub-second truncation loss) and truncation toward
//! minus infinity falls out of `div_euclid`.

use std::fmt;
use std::ops::{Add, Sub};
use std::time::Duration;

/// A point on the event-time axis, in milliseconds since the Unix epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventTime(i64);

impl EventTime {
    /// The Unix epoch, the origin of the window grid.
    pub const EPOCH: EventTime = EventTime(0);

    /// Construct from milliseconds since the epoch.
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Construct from whole seconds since the epoch.
    #[must_use]
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs * 1_000)
    }

    /// Construct from fractional seconds since the epoch, truncated to
    /// millisecond precision.
    #[must_use]
    pub fn from_secs_f64(secs: f64) -> Self {
        Self((secs * 1_000.0) as i64)
    }

    /// Milliseconds since the epoch.
    #[must_use]
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// The id of the tumbling window of width `window` containing this time.
    ///
    /// `id = millis.div_euclid(window_millis)`: truncation is toward minus
    /// infinity, so pre-epoch times land in the correct window, and two times
    /// exactly one window width apart always land in distinct windows.
    #[must_use]
    pub fn window_id(self, window: Duration) -> i64 {
        let window_ms = window.as_millis() as i64;
        debug_assert!(window_ms > 0, "window duration must be positive");
        self.0.div_euclid(window_ms)
    }

    /// Duration from an earlier time to this one.
    ///
    /// # Panics
    ///
    /// Panics if `earlier` is after `self`.
    #[must_use]
    pub fn duration_since(self, earlier: EventTime) -> Duration {
        assert!(earlier.0 <= self.0, "duration_since: earlier time is later");
        Duration::from_millis((self.0 - earlier.0) as u64)
    }
}

impl Add<Duration> for EventTime {
    type Output = EventTime;

    fn add(self, rhs: Duration) -> EventTime {
        EventTime(self.0 + rhs.as_millis() as i64)
    }
}

impl Sub<Duration> for EventTime {
    type Output = EventTime;

    fn sub(self, rhs: Duration) -> EventTime {
        EventTime(self.0 - rhs.as_millis() as i64)
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Read-only access to an item's event-time.
///
/// The windower uses this to route items onto the tumbling window grid; any
/// stream element that carries an event-time can be windowed.
pub trait EventTimed {
    /// The event-time this item carries.
    fn event_time(&self) -> EventTime;
}
