// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::collections::{BTreeMap, HashMap};

/// Read-only mapping from variable name to numeric value, consulted when a
/// threshold arithmetic tree is evaluated.
///
/// Implementations must be safe to read from multiple leaves concurrently;
/// the engine never mutates a resolver during evaluation.
pub trait VariableResolver: Send + Sync {
    /// Look up `name`, returning `None` when it is not defined.
    fn resolve(&self, name: &str) -> Option<f64>;
}

impl VariableResolver for HashMap<String, f64> {
    fn resolve(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl VariableResolver for BTreeMap<String, f64> {
    fn resolve(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

/// Resolver that defines no variables at all.
///
/// The engine default; any variable reference fails with
/// `UnresolvedVariable` at evaluation time.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyResolver;

impl VariableResolver for EmptyResolver {
    fn resolve(&self, _name: &str) -> Option<f64> {
        None
    }
}
