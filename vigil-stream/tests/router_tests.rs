// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::StreamExt;
use tokio::time::{sleep, Duration};
use vigil_core::{StreamItem, VigilError};
use vigil_stream::MetricRouter;
use vigil_test_utils::{
    assert_no_element_emitted, cpu, mem, sample, test_channel, test_channel_with_errors,
    unwrap_stream, unwrap_value,
};

#[tokio::test]
async fn test_samples_are_routed_by_metric_name() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel();
    let router = MetricRouter::new(source);
    let mut cpu_stream = router.subscribe("cpu");
    let mut mem_stream = router.subscribe("mem");

    // Act
    tx.send(cpu(10.0, 0.0))?;
    tx.send(mem(20.0, 0.0))?;
    tx.send(cpu(30.0, 1.0))?;
    drop(tx);

    // Assert
    let first = unwrap_value(cpu_stream.next().await);
    let second = unwrap_value(cpu_stream.next().await);
    assert_eq!((first.value, second.value), (10.0, 30.0));
    assert!(cpu_stream.next().await.is_none());

    let only = unwrap_value(mem_stream.next().await);
    assert_eq!(only.value, 20.0);
    assert!(mem_stream.next().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_subscribers_of_one_metric_share_a_single_subject() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel();
    let router = MetricRouter::new(source);

    // Act
    let mut first = router.subscribe("cpu");
    let mut second = router.subscribe("cpu");
    let mut third = router.subscribe("cpu");

    // Assert
    assert_eq!(router.metric_count(), 1);

    tx.send(cpu(42.0, 0.0))?;
    drop(tx);
    for stream in [&mut first, &mut second, &mut third] {
        assert_eq!(unwrap_value(stream.next().await).value, 42.0);
    }
    Ok(())
}

#[tokio::test]
async fn test_samples_for_unsubscribed_metrics_are_discarded() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel();
    let router = MetricRouter::new(source);
    let mut cpu_stream = router.subscribe("cpu");

    // Act
    tx.send(sample("disk", 1.0, 0.0))?;

    // Assert
    assert_no_element_emitted(&mut cpu_stream, 100).await;
    Ok(())
}

#[tokio::test]
async fn test_source_order_is_preserved_per_metric() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel();
    let router = MetricRouter::new(source);
    let mut cpu_stream = router.subscribe("cpu");

    // Act
    for value in [1.0, 2.0, 3.0, 4.0, 5.0] {
        tx.send(cpu(value, 0.0))?;
    }
    drop(tx);

    // Assert
    let values: Vec<f64> = cpu_stream
        .filter_map(|item| async move { item.ok().map(|s| s.value) })
        .collect()
        .await;
    assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    Ok(())
}

#[tokio::test]
async fn test_source_error_fans_out_to_every_sub_stream() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel_with_errors();
    let router = MetricRouter::new(source);
    let mut cpu_stream = router.subscribe("cpu");
    let mut mem_stream = router.subscribe("mem");

    // Act
    tx.send(StreamItem::Error(VigilError::upstream("collector died")))?;

    // Assert
    assert!(unwrap_stream(&mut cpu_stream, 500).await.is_error());
    assert!(cpu_stream.next().await.is_none());
    assert!(unwrap_stream(&mut mem_stream, 500).await.is_error());
    assert!(mem_stream.next().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_subscribe_after_completion_returns_a_terminated_stream() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<vigil_core::Sample>();
    let router = MetricRouter::new(source);

    // Act
    drop(tx);
    sleep(Duration::from_millis(50)).await;

    // Assert
    let mut late = router.subscribe("cpu");
    assert!(late.next().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_subscribe_after_error_returns_the_error() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel_with_errors::<vigil_core::Sample>();
    let router = MetricRouter::new(source);
    let _existing = router.subscribe("cpu");

    // Act
    tx.send(StreamItem::Error(VigilError::upstream("collector died")))?;
    sleep(Duration::from_millis(50)).await;

    // Assert
    let mut late = router.subscribe("mem");
    assert!(unwrap_stream(&mut late, 500).await.is_error());
    assert!(late.next().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_subscribed_metrics_lists_every_routed_metric() {
    // Arrange
    let (_tx, source) = test_channel::<vigil_core::Sample>();
    let router = MetricRouter::new(source);

    // Act
    let _cpu = router.subscribe("cpu");
    let _mem = router.subscribe("mem");
    let _again = router.subscribe("cpu");

    // Assert
    let metrics: Vec<String> = router.subscribed_metrics().into_iter().collect();
    assert_eq!(metrics, vec!["cpu".to_string(), "mem".to_string()]);
}
