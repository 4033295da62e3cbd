// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::VigilError;
use crate::period::Period;

/// The fold applied to the samples of one window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    /// Arithmetic mean of the window's sample values
    Avg,
    /// Sum of the window's sample values
    Sum,
    /// Largest sample value in the window
    Max,
    /// Smallest sample value in the window
    Min,
}

impl AggregateKind {
    /// Canonical lowercase keyword.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Avg => "avg",
            Self::Sum => "sum",
            Self::Max => "max",
            Self::Min => "min",
        }
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for AggregateKind {
    type Err = VigilError;

    /// Case-insensitive, per the grammar.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "avg" => Ok(Self::Avg),
            "sum" => Ok(Self::Sum),
            "max" => Ok(Self::Max),
            "min" => Ok(Self::Min),
            other => Err(VigilError::UnsupportedOperator {
                operator: other.to_string(),
            }),
        }
    }
}

/// The folded value of one completed window, before threshold comparison.
#[derive(Clone, Debug, PartialEq)]
pub struct Aggregate {
    /// Name of the aggregation leaf that produced this value
    pub node: Arc<str>,
    /// Which fold was applied
    pub kind: AggregateKind,
    /// Aligned boundaries of the window
    pub period: Period,
    /// The folded value
    pub value: f64,
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}={} over {}",
            self.node, self.kind, self.value, self.period
        )
    }
}
