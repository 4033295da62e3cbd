// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities for the vigil workspace: push-style test channels,
//! stream assertions with timeouts, and sample builders.

#![allow(clippy::multiple_crate_versions)]

pub mod helpers;
pub mod samples;

pub use helpers::{
    assert_no_element_emitted, drain_verdicts, test_channel, test_channel_with_errors,
    unwrap_stream, unwrap_value,
};
pub use samples::{cpu, mem, resolver, sample};
