// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The engine surface: compile rule text into live verdict streams.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use futures::Stream;
use tracing::{debug, warn};
use vigil_core::{Result, Sample, StreamItem, VigilError};
use vigil_expr::{parse, Complexity, EmptyResolver, ValidationReport, VariableResolver};
use vigil_stream::MetricRouter;

use crate::evaluator::Evaluator;
use crate::leaf::VerdictStream;

/// Tunables of one engine instance.
#[derive(Clone, Debug)]
pub struct EngineOptions {
    /// Wall-clock width of the windower's reorder buffer. Must be positive.
    pub reorder_interval: Duration,
    /// When set, `build` rejects rules referencing metrics outside this set.
    pub known_metrics: Option<BTreeSet<String>>,
    /// When set, `build` rejects rules referencing variables outside this set.
    pub known_variables: Option<BTreeSet<String>>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            reorder_interval: Duration::from_millis(1_000),
            known_metrics: None,
            known_variables: None,
        }
    }
}

/// Compiles textual rules against one live sample source.
///
/// The engine owns the [`MetricRouter`] over the source, so every rule built
/// from it shares per-metric sub-streams. Building is side-effect free until
/// validation has passed: an invalid rule never creates a subscription.
///
/// ## Example
///
/// ```
/// use futures::StreamExt;
/// use vigil_core::{EventTime, Sample, StreamItem};
/// use vigil_engine::RuleEngine;
///
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
/// let source = tokio_stream::wrappers::UnboundedReceiverStream::new(rx);
/// let engine = RuleEngine::new(source);
///
/// let mut verdicts = engine.build("cpu > 70")?;
///
/// tx.send(StreamItem::Value(Sample::new("cpu", 85.0, EventTime::from_secs(0))))?;
/// drop(tx);
///
/// let verdict = verdicts.next().await.unwrap().unwrap();
/// assert!(verdict.value);
/// # Ok(())
/// # }
/// ```
pub struct RuleEngine {
    router: MetricRouter,
    resolver: Arc<dyn VariableResolver>,
    options: EngineOptions,
}

impl RuleEngine {
    /// Create an engine over the given sample source.
    ///
    /// Uses an empty variable resolver and default options; see
    /// [`with_resolver`](Self::with_resolver) and
    /// [`with_options`](Self::with_options).
    pub fn new<S>(source: S) -> Self
    where
        S: Stream<Item = StreamItem<Sample>> + Send + Unpin + 'static,
    {
        Self {
            router: MetricRouter::new(source),
            resolver: Arc::new(EmptyResolver),
            options: EngineOptions::default(),
        }
    }

    /// Replace the variable resolver consulted by threshold expressions.
    #[must_use]
    pub fn with_resolver(mut self, resolver: impl VariableResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Replace the engine options.
    #[must_use]
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Compile `text` into a live verdict stream.
    ///
    /// Parses, validates (warnings are logged, errors reject the rule), then
    /// builds the evaluation pipeline: one router subscription per distinct
    /// metric, one windower per aggregation condition, combine-latest up the
    /// tree. Dropping the returned stream tears the pipeline down.
    ///
    /// # Errors
    ///
    /// `VigilError::Syntax` when the grammar rejects `text`;
    /// `VigilError::InvalidExpression` when validation fails. Neither
    /// creates any subscription.
    pub fn build(&self, text: &str) -> Result<VerdictStream> {
        let expr = parse(text)?;

        let report = expr.validate(
            self.options.known_metrics.as_ref(),
            self.options.known_variables.as_ref(),
        );
        for warning in &report.warnings {
            warn!(rule = %text, warning = %warning, "rule validation warning");
        }
        if !report.is_valid {
            return Err(VigilError::InvalidExpression {
                errors: report.errors,
            });
        }

        let complexity = expr.complexity();
        if complexity.is_high_complexity() {
            warn!(rule = %text, ?complexity, "rule is highly complex");
        }
        debug!(
            rule = %text,
            nodes = complexity.node_count,
            aggregations = complexity.aggregation_count,
            "building rule"
        );

        let mut evaluator = Evaluator::new(
            &self.router,
            Arc::clone(&self.resolver),
            self.options.reorder_interval,
        );
        Ok(expr.accept(&mut evaluator))
    }

    /// The set of metric names referenced by `text`.
    ///
    /// # Errors
    ///
    /// `VigilError::Syntax` when the grammar rejects `text`.
    pub fn extract_metrics(text: &str) -> Result<BTreeSet<String>> {
        Ok(parse(text)?.metrics())
    }

    /// The set of variable names referenced by `text`'s thresholds.
    ///
    /// # Errors
    ///
    /// `VigilError::Syntax` when the grammar rejects `text`.
    pub fn extract_variables(text: &str) -> Result<BTreeSet<String>> {
        Ok(parse(text)?.variables())
    }

    /// Validate `text` against optional known-metric/variable universes.
    ///
    /// Total: a syntax error is reported as an invalid report rather than a
    /// separate failure channel.
    #[must_use]
    pub fn validate(
        text: &str,
        known_metrics: Option<&BTreeSet<String>>,
        known_variables: Option<&BTreeSet<String>>,
    ) -> ValidationReport {
        match parse(text) {
            Ok(expr) => expr.validate(known_metrics, known_variables),
            Err(error) => ValidationReport {
                is_valid: false,
                errors: vec![error.to_string()],
                warnings: Vec::new(),
            },
        }
    }

    /// Shape metrics of `text`.
    ///
    /// # Errors
    ///
    /// `VigilError::Syntax` when the grammar rejects `text`.
    pub fn analyze_complexity(text: &str) -> Result<Complexity> {
        Ok(parse(text)?.complexity())
    }

    /// The router this engine fans samples out through.
    #[must_use]
    pub fn router(&self) -> &MetricRouter {
        &self.router
    }
}
