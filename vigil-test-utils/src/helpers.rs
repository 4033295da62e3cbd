// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::time::Duration;

use futures::{Stream, StreamExt};
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tokio::time::{sleep, timeout};
use tokio_stream::wrappers::UnboundedReceiverStream;
use vigil_core::{StreamItem, Verdict, VigilError};

/// Unwraps a `StreamItem::Value`, panicking if it's an error or absent.
///
/// # Panics
///
/// Panics if the item is an `Error` variant or the stream already ended.
pub fn unwrap_value<T>(item: Option<StreamItem<T>>) -> T {
    match item {
        Some(StreamItem::Value(value)) => value,
        Some(StreamItem::Error(e)) => panic!("Expected Value but got Error: {e}"),
        None => panic!("Expected Value but stream ended"),
    }
}

/// Waits up to `timeout_ms` for the next item of a stream.
///
/// Streams under test are often fed by spawned routing tasks; the timeout
/// gives those tasks time to run without letting a broken test hang.
///
/// # Panics
///
/// Panics if the stream ends or no item arrives within the timeout.
pub async fn unwrap_stream<T, S>(stream: &mut S, timeout_ms: u64) -> StreamItem<T>
where
    S: Stream<Item = StreamItem<T>> + Unpin,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(Some(item)) => item,
        Ok(None) => panic!("Expected StreamItem but stream ended"),
        Err(_) => panic!("Timeout: no item received within {timeout_ms}ms"),
    }
}

/// Creates a test channel that wraps sent values in `StreamItem::Value`.
pub fn test_channel<T: Send + 'static>(
) -> (UnboundedSender<T>, impl Stream<Item = StreamItem<T>> + Send + Unpin) {
    let (tx, rx) = unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx).map(StreamItem::Value);
    (tx, stream)
}

/// Creates a test channel that accepts raw `StreamItem<T>`, for error
/// injection tests.
pub fn test_channel_with_errors<T: Send + 'static>() -> (
    UnboundedSender<StreamItem<T>>,
    impl Stream<Item = StreamItem<T>> + Send + Unpin,
) {
    let (tx, rx) = unbounded_channel();
    (tx, UnboundedReceiverStream::new(rx))
}

/// Assert that no element is emitted within the given timeout.
///
/// # Panics
///
/// Panics if the stream emits an element before the timeout elapses.
pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        _item = stream.next() => {
            panic!("Unexpected element emitted, expected no output.");
        }
        () = sleep(Duration::from_millis(timeout_ms)) => {
        }
    }
}

/// Collect every remaining item of a verdict stream, separating values from
/// a possible trailing error.
///
/// # Panics
///
/// Panics if the stream does not end within five seconds.
pub async fn drain_verdicts<S>(stream: &mut S) -> (Vec<Verdict>, Option<VigilError>)
where
    S: Stream<Item = StreamItem<Verdict>> + Unpin,
{
    let mut verdicts = Vec::new();
    let mut error = None;

    loop {
        match timeout(Duration::from_secs(5), stream.next()).await {
            Ok(Some(StreamItem::Value(verdict))) => verdicts.push(verdict),
            Ok(Some(StreamItem::Error(e))) => error = Some(e),
            Ok(None) => return (verdicts, error),
            Err(_) => panic!("Timeout: verdict stream did not end within 5s"),
        }
    }
}

/// Macro to wrap test bodies with a timeout to prevent hanging tests.
#[macro_export]
macro_rules! with_timeout {
    ($test_body:expr) => {
        tokio::time::timeout(std::time::Duration::from_secs(5), async { $test_body })
            .await
            .expect("Test timed out after 5 seconds")
    };
}
