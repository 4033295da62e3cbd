// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Background tasks with cooperative cancellation.
//!
//! The router and the windower each run one background task. Holding the
//! [`Task`] handle keeps the pipeline alive; dropping it signals the
//! cancellation token, so dropping a verdict stream tears down the timers and
//! subscriptions it owns.

use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Handle to a spawned background task, cancelled on drop.
///
/// The spawned future receives a [`CancellationToken`] and is expected to
/// select on `token.cancelled()` at its suspension points and exit promptly
/// once the token fires.
#[derive(Debug)]
pub struct Task {
    cancel: CancellationToken,
}

impl Task {
    /// Spawn a background task onto the tokio runtime.
    pub fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        tokio::spawn(f(cancel.clone()));
        Self { cancel }
    }

    /// Signal the task to stop without waiting for it to finish.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for Task {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
