// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! End-to-end smoke tests through the facade crate.

use std::time::Duration;

use futures::StreamExt;
use tokio_stream::wrappers::UnboundedReceiverStream;
use vigil_rx::{EngineOptions, EventTime, RuleEngine, Sample, StreamItem};

fn source() -> (
    tokio::sync::mpsc::UnboundedSender<StreamItem<Sample>>,
    UnboundedReceiverStream<StreamItem<Sample>>,
) {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    (tx, UnboundedReceiverStream::new(rx))
}

#[tokio::test]
async fn test_quick_start_pipeline() -> anyhow::Result<()> {
    // Arrange
    let (tx, rx) = source();
    let engine = RuleEngine::new(rx).with_options(EngineOptions {
        reorder_interval: Duration::from_millis(50),
        ..EngineOptions::default()
    });
    let mut verdicts = engine.build("avg(cpu, 3s) > 70 || avg(mem, 3s) > 80")?;

    // Act
    for t in [0, 1, 2] {
        tx.send(StreamItem::Value(Sample::new(
            "cpu",
            85.0,
            EventTime::from_secs(t),
        )))?;
        tx.send(StreamItem::Value(Sample::new(
            "mem",
            60.0,
            EventTime::from_secs(t),
        )))?;
    }
    drop(tx);

    // Assert
    let verdict = verdicts.next().await.expect("expected a verdict").unwrap();
    assert!(verdict.value);
    assert!(verdicts.next().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_parse_and_analyze_through_the_facade() -> anyhow::Result<()> {
    let expr = vigil_rx::parse("avg(cpu, 1m) > 70 && mem > k * 2")?;

    assert_eq!(expr.metrics().len(), 2);
    assert_eq!(expr.variables().len(), 1);
    assert_eq!(expr.complexity().condition_count, 2);
    Ok(())
}
