// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::Arc;

use futures::StreamExt;
use vigil_core::{EventTime, LogicalOp, Period, StreamItem, Verdict, VigilError};
use vigil_stream::CombineVerdictsExt;
use vigil_test_utils::{assert_no_element_emitted, test_channel_with_errors, unwrap_stream, unwrap_value};

fn verdict(node: &str, value: bool, start_secs: i64, end_secs: i64) -> Verdict {
    Verdict::new(
        node,
        value,
        Period::new(EventTime::from_secs(start_secs), EventTime::from_secs(end_secs)),
    )
}

fn node() -> Arc<str> {
    Arc::from("and(left,right)")
}

#[tokio::test]
async fn test_nothing_is_emitted_until_both_sides_have_spoken() -> anyhow::Result<()> {
    // Arrange
    let (left_tx, left) = test_channel_with_errors();
    let (_right_tx, right) = test_channel_with_errors();
    let mut combined = left.combine_verdicts(right, LogicalOp::And, node());

    // Act
    left_tx.send(StreamItem::Value(verdict("l", true, 0, 3)))?;
    left_tx.send(StreamItem::Value(verdict("l", false, 3, 6)))?;

    // Assert
    assert_no_element_emitted(&mut combined, 100).await;
    Ok(())
}

#[tokio::test]
async fn test_first_emission_combines_the_latest_of_both_sides() -> anyhow::Result<()> {
    // Arrange
    let (left_tx, left) = test_channel_with_errors();
    let (right_tx, right) = test_channel_with_errors();
    let mut combined = left.combine_verdicts(right, LogicalOp::And, node());

    // Act: the left side trips twice before the right side speaks
    left_tx.send(StreamItem::Value(verdict("l", false, 0, 3)))?;
    left_tx.send(StreamItem::Value(verdict("l", true, 3, 6)))?;
    right_tx.send(StreamItem::Value(verdict("r", true, 0, 6)))?;

    // Assert: combined with the latest left value, not the first
    let out = unwrap_value(Some(unwrap_stream(&mut combined, 500).await));
    assert!(out.value);
    Ok(())
}

#[tokio::test]
async fn test_every_input_after_startup_produces_exactly_one_output() -> anyhow::Result<()> {
    // Arrange
    let (left_tx, left) = test_channel_with_errors();
    let (right_tx, right) = test_channel_with_errors();
    let mut combined = left.combine_verdicts(right, LogicalOp::Or, node());

    // Act
    left_tx.send(StreamItem::Value(verdict("l", true, 0, 1)))?;
    right_tx.send(StreamItem::Value(verdict("r", false, 0, 1)))?;
    let _first = unwrap_stream(&mut combined, 500).await;

    left_tx.send(StreamItem::Value(verdict("l", false, 1, 2)))?;
    right_tx.send(StreamItem::Value(verdict("r", true, 1, 2)))?;
    left_tx.send(StreamItem::Value(verdict("l", true, 2, 3)))?;
    drop(left_tx);
    drop(right_tx);

    // Assert: three further inputs, three further outputs
    let rest: Vec<_> = combined.collect().await;
    assert_eq!(rest.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_and_or_semantics() -> anyhow::Result<()> {
    for (op, left_value, right_value, expected) in [
        (LogicalOp::And, true, true, true),
        (LogicalOp::And, true, false, false),
        (LogicalOp::Or, false, false, false),
        (LogicalOp::Or, true, false, true),
    ] {
        // Arrange
        let (left_tx, left) = test_channel_with_errors();
        let (right_tx, right) = test_channel_with_errors();
        let mut combined = left.combine_verdicts(right, op, node());

        // Act
        left_tx.send(StreamItem::Value(verdict("l", left_value, 0, 3)))?;
        right_tx.send(StreamItem::Value(verdict("r", right_value, 0, 3)))?;

        // Assert
        let out = unwrap_value(Some(unwrap_stream(&mut combined, 500).await));
        assert_eq!(out.value, expected, "{op:?}({left_value}, {right_value})");
    }
    Ok(())
}

#[tokio::test]
async fn test_combined_period_is_the_join_of_both_inputs() -> anyhow::Result<()> {
    // Arrange
    let (left_tx, left) = test_channel_with_errors();
    let (right_tx, right) = test_channel_with_errors();
    let mut combined = left.combine_verdicts(right, LogicalOp::And, node());

    // Act
    left_tx.send(StreamItem::Value(verdict("l", true, 0, 3)))?;
    right_tx.send(StreamItem::Value(verdict("r", true, 5, 10)))?;

    // Assert
    let out = unwrap_value(Some(unwrap_stream(&mut combined, 500).await));
    assert_eq!(
        out.period,
        Period::new(EventTime::from_secs(0), EventTime::from_secs(10))
    );
    Ok(())
}

#[tokio::test]
async fn test_output_carries_the_combinator_node_name() -> anyhow::Result<()> {
    // Arrange
    let (left_tx, left) = test_channel_with_errors();
    let (right_tx, right) = test_channel_with_errors();
    let mut combined = left.combine_verdicts(right, LogicalOp::And, node());

    // Act
    left_tx.send(StreamItem::Value(verdict("l", true, 0, 3)))?;
    right_tx.send(StreamItem::Value(verdict("r", true, 0, 3)))?;

    // Assert
    let out = unwrap_value(Some(unwrap_stream(&mut combined, 500).await));
    assert_eq!(out.node.as_ref(), "and(left,right)");
    Ok(())
}

#[tokio::test]
async fn test_child_error_terminates_the_combined_stream() -> anyhow::Result<()> {
    // Arrange
    let (left_tx, left) = test_channel_with_errors();
    let (right_tx, right) = test_channel_with_errors();
    let mut combined = left.combine_verdicts(right, LogicalOp::And, node());

    left_tx.send(StreamItem::Value(verdict("l", true, 0, 3)))?;
    right_tx.send(StreamItem::Value(verdict("r", true, 0, 3)))?;
    let _first = unwrap_stream(&mut combined, 500).await;

    // Act
    right_tx.send(StreamItem::Error(VigilError::DivisionByZero))?;

    // Assert
    assert!(unwrap_stream(&mut combined, 500).await.is_error());
    assert!(combined.next().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_one_side_completing_does_not_end_the_stream() -> anyhow::Result<()> {
    // Arrange
    let (left_tx, left) = test_channel_with_errors();
    let (right_tx, right) = test_channel_with_errors();
    let mut combined = left.combine_verdicts(right, LogicalOp::Or, node());

    left_tx.send(StreamItem::Value(verdict("l", true, 0, 1)))?;
    right_tx.send(StreamItem::Value(verdict("r", false, 0, 1)))?;
    let _first = unwrap_stream(&mut combined, 500).await;

    // Act: the left child completes; the right keeps emitting
    drop(left_tx);
    right_tx.send(StreamItem::Value(verdict("r", true, 1, 2)))?;

    // Assert: still combining against the last left value
    let out = unwrap_value(Some(unwrap_stream(&mut combined, 500).await));
    assert!(out.value);

    drop(right_tx);
    assert!(combined.next().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_both_sides_completing_without_emitting_produces_nothing() {
    // Arrange
    let (left_tx, left) = test_channel_with_errors::<Verdict>();
    let (right_tx, right) = test_channel_with_errors::<Verdict>();
    let mut combined = left.combine_verdicts(right, LogicalOp::And, node());

    // Act
    drop(left_tx);
    drop(right_tx);

    // Assert
    assert!(combined.next().await.is_none());
}
