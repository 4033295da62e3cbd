// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt;
use std::sync::Arc;

use crate::period::Period;

/// A boolean output of one expression node, stamped with the period of the
/// samples that produced it.
///
/// The `node` tag identifies the emitting node within one built rule. It is
/// non-empty and stable for the lifetime of that build, but its exact shape
/// is not a cross-build API.
#[derive(Clone, Debug, PartialEq)]
pub struct Verdict {
    /// Name of the expression node that emitted this verdict
    pub node: Arc<str>,
    /// The boolean outcome
    pub value: bool,
    /// Event-time span of the contributing samples
    pub period: Period,
}

impl Verdict {
    /// Create a verdict.
    pub fn new(node: impl Into<Arc<str>>, value: bool, period: Period) -> Self {
        Self {
            node: node.into(),
            value,
            period,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} over {}", self.node, self.value, self.period)
    }
}
