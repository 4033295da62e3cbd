// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Hot, multi-subscriber subject.
//!
//! A [`Subject`] broadcasts each [`StreamItem<T>`] to all active subscribers.
//!
//! - **Hot**: late subscribers only receive items sent after subscribing.
//! - **Unbounded**: subscriber channels are unbounded (no backpressure).
//! - **Thread-safe**: cheap to clone; all clones share the same state.
//! - **Error/close**: an error is broadcast to all subscribers and closes
//!   the subject.
//!
//! The router holds one subject per metric name; the windower holds one per
//! live window.

use std::pin::Pin;
use std::sync::Arc;

use async_channel::Sender;
use futures::stream::Stream;
use parking_lot::Mutex;

use crate::error::VigilError;
use crate::stream_item::StreamItem;

/// Boxed subscriber stream handed out by [`Subject::subscribe`].
pub type SubjectStream<T> = Pin<Box<dyn Stream<Item = StreamItem<T>> + Send + 'static>>;

/// Error returned by subject operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubjectError {
    /// The subject has been closed and accepts no further items or subscribers.
    #[error("subject is closed")]
    Closed,
}

struct SubjectState<T> {
    closed: bool,
    senders: Vec<Sender<StreamItem<T>>>,
}

/// A hot, unbounded subject that broadcasts items to all current subscribers.
pub struct Subject<T: Clone + Send + 'static> {
    state: Arc<Mutex<SubjectState<T>>>,
}

impl<T: Clone + Send + 'static> Subject<T> {
    /// Creates a new open subject with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SubjectState {
                closed: false,
                senders: Vec::new(),
            })),
        }
    }

    /// Subscribe and receive a stream of `StreamItem<T>`.
    ///
    /// Late subscribers do not receive previously sent items.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has been closed.
    pub fn subscribe(&self) -> Result<SubjectStream<T>, SubjectError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SubjectError::Closed);
        }

        let (tx, rx) = async_channel::unbounded();
        state.senders.push(tx);
        Ok(Box::pin(rx))
    }

    /// Send an item to all active subscribers.
    ///
    /// Dropped subscribers are pruned lazily here, not at drop time.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has been closed.
    pub fn send(&self, item: StreamItem<T>) -> Result<(), SubjectError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SubjectError::Closed);
        }

        let mut next_senders = Vec::with_capacity(state.senders.len());

        for tx in state.senders.drain(..) {
            if tx.try_send(item.clone()).is_ok() {
                next_senders.push(tx);
            }
        }

        state.senders = next_senders;
        Ok(())
    }

    /// Send a value to all active subscribers.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has been closed.
    pub fn next(&self, value: T) -> Result<(), SubjectError> {
        self.send(StreamItem::Value(value))
    }

    /// Broadcast a stream error to all subscribers and close the subject.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject was already closed.
    pub fn error(&self, err: VigilError) -> Result<(), SubjectError> {
        let result = self.send(StreamItem::Error(err));
        self.close();
        result
    }

    /// Closes the subject, completing all subscriber streams.
    ///
    /// Closing is idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        state.senders.clear();
    }

    /// Returns `true` if the subject has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Number of currently active subscribers.
    ///
    /// Updated lazily: dropped subscribers are pruned on the next `send`.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().senders.len()
    }
}

impl<T: Clone + Send + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}
