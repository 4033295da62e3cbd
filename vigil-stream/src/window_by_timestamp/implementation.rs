// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::{Stream, StreamExt};
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::debug;
use vigil_core::{EventTimed, Period, StreamItem, Subject, SubjectStream, Task, VigilError};

/// One tumbling window: its id, aligned period, and item stream.
///
/// Yields the window's items in non-decreasing event-time order and
/// completes when the window closes.
pub struct WindowStream<T: Clone + Send + 'static> {
    id: i64,
    period: Period,
    items: SubjectStream<T>,
}

impl<T: Clone + Send + 'static> WindowStream<T> {
    /// The window id, `event_time.div_euclid(window_duration)`.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// The aligned window boundaries `[id * d, (id + 1) * d)`.
    #[must_use]
    pub const fn period(&self) -> Period {
        self.period
    }
}

impl<T: Clone + Send + 'static> Stream for WindowStream<T> {
    type Item = StreamItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().items.as_mut().poll_next(cx)
    }
}

impl<T: Clone + Send + 'static> fmt::Debug for WindowStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowStream")
            .field("id", &self.id)
            .field("period", &self.period)
            .finish_non_exhaustive()
    }
}

/// Outer stream of windows produced by
/// [`window_by_timestamp`](WindowByTimestampExt::window_by_timestamp).
///
/// Holds the windowing task; dropping this stream cancels the task, its
/// flush timer, and all in-flight inner windows.
pub struct WindowedStream<T: Clone + Send + 'static> {
    inner: UnboundedReceiverStream<StreamItem<WindowStream<T>>>,
    _task: Arc<Task>,
}

impl<T: Clone + Send + 'static> Stream for WindowedStream<T> {
    type Item = StreamItem<WindowStream<T>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().inner).poll_next(cx)
    }
}

/// Extension trait providing the
/// [`window_by_timestamp`](WindowByTimestampExt::window_by_timestamp)
/// operator.
pub trait WindowByTimestampExt<T>: Stream<Item = StreamItem<T>> + Sized
where
    T: EventTimed + Clone + Send + 'static,
{
    /// Group this stream into tumbling event-time windows of width `window`,
    /// reordering nearly-in-time items within `reorder_interval` of
    /// wall-clock buffering.
    ///
    /// See the [module documentation](super) for the full algorithm.
    ///
    /// # Panics
    ///
    /// Panics if `window` or `reorder_interval` is zero.
    fn window_by_timestamp(
        self,
        window: Duration,
        reorder_interval: Duration,
    ) -> WindowedStream<T>
    where
        Self: Send + Unpin + 'static;
}

impl<S, T> WindowByTimestampExt<T> for S
where
    S: Stream<Item = StreamItem<T>>,
    T: EventTimed + Clone + Send + 'static,
{
    fn window_by_timestamp(self, window: Duration, reorder_interval: Duration) -> WindowedStream<T>
    where
        Self: Send + Unpin + 'static,
    {
        assert!(!window.is_zero(), "window duration must be positive");
        assert!(
            !reorder_interval.is_zero(),
            "reorder interval must be positive"
        );

        let (out_tx, out_rx) = unbounded_channel();

        let task = Task::spawn(move |cancel| async move {
            let mut source = self;
            let mut windower = Windower::new(window, out_tx);
            let mut buffer: Vec<T> = Vec::new();

            let start = tokio::time::Instant::now() + reorder_interval;
            let mut flush = tokio::time::interval_at(start, reorder_interval);
            flush.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    () = cancel.cancelled() => {
                        windower.abandon();
                        return;
                    }
                    _ = flush.tick() => {
                        windower.flush(&mut buffer);
                    }
                    item = source.next() => match item {
                        Some(StreamItem::Value(value)) => buffer.push(value),
                        Some(StreamItem::Error(error)) => {
                            windower.error(error);
                            return;
                        }
                        None => {
                            windower.flush(&mut buffer);
                            windower.complete();
                            return;
                        }
                    }
                }
            }
        });

        WindowedStream {
            inner: UnboundedReceiverStream::new(out_rx),
            _task: Arc::new(task),
        }
    }
}

/// Window bookkeeping owned by the windowing task (single writer).
struct Windower<T: Clone + Send + 'static> {
    window: Duration,
    open: HashMap<i64, Subject<T>>,
    latest: Option<i64>,
    out_tx: UnboundedSender<StreamItem<WindowStream<T>>>,
}

impl<T: EventTimed + Clone + Send + 'static> Windower<T> {
    fn new(window: Duration, out_tx: UnboundedSender<StreamItem<WindowStream<T>>>) -> Self {
        Self {
            window,
            open: HashMap::new(),
            latest: None,
            out_tx,
        }
    }

    /// Sort the reorder batch by event-time (stable, so equal timestamps
    /// keep their arrival order) and route every item.
    fn flush(&mut self, buffer: &mut Vec<T>) {
        if buffer.is_empty() {
            return;
        }
        let mut batch = std::mem::take(buffer);
        batch.sort_by_key(EventTimed::event_time);
        for item in batch {
            self.route(item);
        }
    }

    fn route(&mut self, item: T) {
        let wid = item.event_time().window_id(self.window);

        if let Some(latest) = self.latest {
            if wid < latest {
                debug!(window_id = wid, "dropping late sample for closed window");
                return;
            }
            if wid > latest {
                if let Some(previous) = self.open.remove(&latest) {
                    debug!(window_id = latest, "completing window");
                    previous.close();
                }
            }
        }

        let subject = match self.open.get(&wid) {
            Some(subject) => subject.clone(),
            None => self.open_window(wid),
        };
        let _ = subject.next(item);
    }

    fn open_window(&mut self, wid: i64) -> Subject<T> {
        let subject = Subject::new();
        // Subscribe before any item is pushed so nothing is missed
        let items = subject
            .subscribe()
            .unwrap_or_else(|_| unreachable!("fresh subject must accept subscribers"));
        let period = Period::window(wid, self.window);
        debug!(window_id = wid, %period, "opening window");

        let _ = self.out_tx.send(StreamItem::Value(WindowStream {
            id: wid,
            period,
            items,
        }));
        self.open.insert(wid, subject.clone());
        self.latest = Some(wid);
        subject
    }

    /// Upstream error: discard the buffer, propagate to every open window
    /// and the outer stream, then terminate.
    fn error(&mut self, error: VigilError) {
        debug!(%error, "upstream errored, propagating to open windows");
        for subject in self.open.values() {
            let _ = subject.error(error.clone());
        }
        self.open.clear();
        let _ = self.out_tx.send(StreamItem::Error(error));
    }

    /// Upstream completion: complete every open window. Dropping the sender
    /// completes the outer stream.
    fn complete(&mut self) {
        for (wid, subject) in self.open.drain() {
            debug!(window_id = wid, "completing window");
            subject.close();
        }
    }

    /// Cancellation: tear down without emitting anything further.
    fn abandon(&mut self) {
        for subject in self.open.values() {
            subject.close();
        }
        self.open.clear();
    }
}
