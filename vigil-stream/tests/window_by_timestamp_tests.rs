// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::time::Duration;

use futures::StreamExt;
use tokio::time::sleep;
use vigil_core::{EventTime, Period, Sample, StreamItem, VigilError};
use vigil_stream::{WindowByTimestampExt, WindowStream};
use vigil_test_utils::{cpu, test_channel, test_channel_with_errors, unwrap_stream, unwrap_value};

const WINDOW: Duration = Duration::from_secs(3);
const REORDER: Duration = Duration::from_millis(50);

async fn collect_values(window: WindowStream<Sample>) -> Vec<f64> {
    window
        .filter_map(|item| async move { item.ok().map(|sample| sample.value) })
        .collect()
        .await
}

#[tokio::test]
async fn test_samples_are_grouped_by_event_time() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel();
    let mut windows = source.window_by_timestamp(WINDOW, REORDER);

    // Act: two event-time windows worth of samples
    for (value, at) in [(1.0, 0.0), (2.0, 1.0), (3.0, 2.0), (4.0, 3.0), (5.0, 4.0)] {
        tx.send(cpu(value, at))?;
    }
    drop(tx);

    // Assert
    let first = unwrap_value(windows.next().await);
    assert_eq!(first.id(), 0);
    assert_eq!(collect_values(first).await, vec![1.0, 2.0, 3.0]);

    let second = unwrap_value(windows.next().await);
    assert_eq!(second.id(), 1);
    assert_eq!(collect_values(second).await, vec![4.0, 5.0]);

    assert!(windows.next().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_window_periods_are_aligned_to_the_grid() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel();
    let mut windows = source.window_by_timestamp(WINDOW, REORDER);

    // Act: first sample lands mid-window
    tx.send(cpu(1.0, 4.0))?;
    drop(tx);

    // Assert: period is [3s, 6s), not [4s, 7s)
    let window = unwrap_value(windows.next().await);
    assert_eq!(
        window.period(),
        Period::new(EventTime::from_secs(3), EventTime::from_secs(6))
    );
    Ok(())
}

#[tokio::test]
async fn test_out_of_order_samples_are_sorted_within_the_reorder_buffer() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel();
    let mut windows = source.window_by_timestamp(WINDOW, REORDER);

    // Act: jittered arrival order, all within one reorder interval
    for (value, at) in [(3.0, 2.0), (1.0, 0.0), (2.0, 1.0)] {
        tx.send(cpu(value, at))?;
    }
    drop(tx);

    // Assert: emitted in event-time order
    let window = unwrap_value(windows.next().await);
    assert_eq!(collect_values(window).await, vec![1.0, 2.0, 3.0]);
    Ok(())
}

#[tokio::test]
async fn test_ties_keep_arrival_order() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel();
    let mut windows = source.window_by_timestamp(WINDOW, REORDER);

    // Act: identical event-times
    for value in [1.0, 2.0, 3.0] {
        tx.send(cpu(value, 1.0))?;
    }
    drop(tx);

    // Assert: stable sort preserves arrival order
    let window = unwrap_value(windows.next().await);
    assert_eq!(collect_values(window).await, vec![1.0, 2.0, 3.0]);
    Ok(())
}

#[tokio::test]
async fn test_single_sample_window_emits_exactly_once() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel();
    let mut windows = source.window_by_timestamp(Duration::from_secs(1), REORDER);

    // Act
    tx.send(cpu(42.0, 0.5))?;
    drop(tx);

    // Assert
    let window = unwrap_value(windows.next().await);
    assert_eq!(collect_values(window).await, vec![42.0]);
    assert!(windows.next().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_boundary_samples_fall_into_distinct_windows() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel();
    let mut windows = source.window_by_timestamp(Duration::from_secs(1), REORDER);

    // Act: t = 1s is the first instant of the second window
    tx.send(cpu(1.0, 0.0))?;
    tx.send(cpu(2.0, 1.0))?;
    drop(tx);

    // Assert
    let first = unwrap_value(windows.next().await);
    assert_eq!(first.id(), 0);
    assert_eq!(collect_values(first).await, vec![1.0]);

    let second = unwrap_value(windows.next().await);
    assert_eq!(second.id(), 1);
    assert_eq!(collect_values(second).await, vec![2.0]);
    Ok(())
}

#[tokio::test]
async fn test_opening_a_later_window_completes_the_previous_one() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel();
    let mut windows = source.window_by_timestamp(WINDOW, REORDER);

    // Act: flush the first window, then open a second while the source stays live
    tx.send(cpu(1.0, 0.0))?;
    sleep(REORDER * 3).await;
    tx.send(cpu(2.0, 3.0))?;
    sleep(REORDER * 3).await;

    // Assert: the first inner stream is already complete
    let first = unwrap_value(windows.next().await);
    assert_eq!(collect_values(first).await, vec![1.0]);

    let second = unwrap_value(windows.next().await);
    assert_eq!(second.id(), 1);
    drop(tx);
    assert_eq!(collect_values(second).await, vec![2.0]);
    Ok(())
}

#[tokio::test]
async fn test_late_sample_for_a_closed_window_is_dropped() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel();
    let mut windows = source.window_by_timestamp(WINDOW, REORDER);

    // Act: window 0 closes when window 1 opens; then a straggler for window 0
    // arrives well outside the reorder interval
    tx.send(cpu(1.0, 0.0))?;
    sleep(REORDER * 3).await;
    tx.send(cpu(2.0, 3.0))?;
    sleep(REORDER * 3).await;
    tx.send(cpu(99.0, 1.0))?;
    drop(tx);

    // Assert: the straggler appears in no window and opens no new one
    let first = unwrap_value(windows.next().await);
    assert_eq!(collect_values(first).await, vec![1.0]);

    let second = unwrap_value(windows.next().await);
    assert_eq!(collect_values(second).await, vec![2.0]);

    assert!(windows.next().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_completion_flushes_the_reorder_buffer() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel();
    let mut windows = source.window_by_timestamp(WINDOW, REORDER);

    // Act: complete the source immediately, before any flush tick
    tx.send(cpu(1.0, 0.0))?;
    tx.send(cpu(2.0, 1.0))?;
    drop(tx);

    // Assert: buffered samples still reach their window
    let window = unwrap_value(windows.next().await);
    assert_eq!(collect_values(window).await, vec![1.0, 2.0]);
    assert!(windows.next().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_upstream_error_reaches_inner_and_outer_streams() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel_with_errors();
    let mut windows = source.window_by_timestamp(WINDOW, REORDER);

    // Act: open a window, then fail the source
    tx.send(StreamItem::Value(cpu(1.0, 0.0)))?;
    sleep(REORDER * 3).await;
    tx.send(StreamItem::Error(VigilError::upstream("collector died")))?;

    // Assert
    let mut window = unwrap_value(windows.next().await);
    let first = unwrap_stream(&mut window, 500).await;
    assert_eq!(first.unwrap().value, 1.0);
    assert!(unwrap_stream(&mut window, 500).await.is_error());

    assert!(unwrap_stream(&mut windows, 500).await.is_error());
    assert!(windows.next().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_empty_source_produces_no_windows() {
    // Arrange
    let (tx, source) = test_channel::<Sample>();
    let mut windows = source.window_by_timestamp(WINDOW, REORDER);

    // Act
    drop(tx);

    // Assert
    assert!(windows.next().await.is_none());
}
