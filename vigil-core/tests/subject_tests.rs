// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::StreamExt;
use vigil_core::{StreamItem, Subject, SubjectError, VigilError};

#[tokio::test]
async fn test_subject_broadcasts_to_all_subscribers() -> anyhow::Result<()> {
    // Arrange
    let subject = Subject::<i32>::new();
    let mut first = subject.subscribe()?;
    let mut second = subject.subscribe()?;

    // Act
    subject.next(1)?;
    subject.next(2)?;
    subject.close();

    // Assert
    assert_eq!(first.next().await, Some(StreamItem::Value(1)));
    assert_eq!(first.next().await, Some(StreamItem::Value(2)));
    assert_eq!(first.next().await, None);
    assert_eq!(second.next().await, Some(StreamItem::Value(1)));
    assert_eq!(second.next().await, Some(StreamItem::Value(2)));
    assert_eq!(second.next().await, None);
    Ok(())
}

#[tokio::test]
async fn test_late_subscriber_misses_earlier_items() -> anyhow::Result<()> {
    // Arrange
    let subject = Subject::<i32>::new();
    subject.next(1)?;

    // Act
    let mut late = subject.subscribe()?;
    subject.next(2)?;
    subject.close();

    // Assert
    assert_eq!(late.next().await, Some(StreamItem::Value(2)));
    assert_eq!(late.next().await, None);
    Ok(())
}

#[tokio::test]
async fn test_error_reaches_subscribers_and_closes_the_subject() -> anyhow::Result<()> {
    // Arrange
    let subject = Subject::<i32>::new();
    let mut stream = subject.subscribe()?;

    // Act
    subject.error(VigilError::upstream("source failed"))?;

    // Assert
    let item = stream.next().await.expect("expected the error item");
    assert!(item.is_error());
    assert_eq!(stream.next().await, None);
    assert!(subject.is_closed());
    assert_eq!(subject.next(3), Err(SubjectError::Closed));
    Ok(())
}

#[tokio::test]
async fn test_closed_subject_rejects_new_subscribers() {
    // Arrange
    let subject = Subject::<i32>::new();

    // Act
    subject.close();

    // Assert
    assert!(subject.subscribe().is_err());
}

#[tokio::test]
async fn test_dropped_subscribers_are_pruned_on_send() -> anyhow::Result<()> {
    // Arrange
    let subject = Subject::<i32>::new();
    let first = subject.subscribe()?;
    let _second = subject.subscribe()?;
    assert_eq!(subject.subscriber_count(), 2);

    // Act
    drop(first);
    subject.next(1)?;

    // Assert
    assert_eq!(subject.subscriber_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_clones_share_state() -> anyhow::Result<()> {
    // Arrange
    let subject = Subject::<i32>::new();
    let clone = subject.clone();
    let mut stream = subject.subscribe()?;

    // Act
    clone.next(42)?;
    clone.close();

    // Assert
    assert_eq!(stream.next().await, Some(StreamItem::Value(42)));
    assert_eq!(stream.next().await, None);
    assert!(subject.is_closed());
    Ok(())
}
