// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Sample and resolver builders shared by the workspace's tests.

use std::collections::HashMap;

use vigil_core::{EventTime, Sample};

/// A sample for an arbitrary metric at `at_secs` seconds past the epoch.
#[must_use]
pub fn sample(metric: &str, value: f64, at_secs: f64) -> Sample {
    Sample::new(metric, value, EventTime::from_secs_f64(at_secs))
}

/// A `cpu` sample at `at_secs` seconds past the epoch.
#[must_use]
pub fn cpu(value: f64, at_secs: f64) -> Sample {
    sample("cpu", value, at_secs)
}

/// A `mem` sample at `at_secs` seconds past the epoch.
#[must_use]
pub fn mem(value: f64, at_secs: f64) -> Sample {
    sample("mem", value, at_secs)
}

/// A resolver map from name/value pairs.
#[must_use]
pub fn resolver(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_string(), *value))
        .collect()
}
