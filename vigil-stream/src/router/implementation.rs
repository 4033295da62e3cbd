// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::collections::{BTreeSet, HashMap};
use std::pin::Pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use parking_lot::Mutex;
use tracing::{debug, trace};
use vigil_core::{Sample, StreamItem, Subject, Task, VigilError};

/// Boxed per-metric sub-stream handed out by [`MetricRouter::subscribe`].
pub type MetricStream = Pin<Box<dyn Stream<Item = StreamItem<Sample>> + Send + 'static>>;

enum Terminal {
    Completed,
    Errored(VigilError),
}

struct RouterState {
    subjects: HashMap<Arc<str>, Subject<Sample>>,
    terminal: Option<Terminal>,
}

/// Demultiplexes one hot sample stream into per-metric sub-streams.
///
/// See the [module documentation](super) for semantics.
pub struct MetricRouter {
    state: Arc<Mutex<RouterState>>,
    _task: Task,
}

impl MetricRouter {
    /// Start routing the given source stream.
    ///
    /// The routing task starts immediately; samples arriving before the
    /// first subscription to their metric are discarded.
    pub fn new<S>(source: S) -> Self
    where
        S: Stream<Item = StreamItem<Sample>> + Send + Unpin + 'static,
    {
        let state = Arc::new(Mutex::new(RouterState {
            subjects: HashMap::new(),
            terminal: None,
        }));

        let task_state = Arc::clone(&state);
        let task = Task::spawn(move |cancel| async move {
            let mut source = source;
            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    item = source.next() => match item {
                        Some(StreamItem::Value(sample)) => {
                            let subject = task_state.lock().subjects.get(&sample.metric).cloned();
                            if let Some(subject) = subject {
                                trace!(metric = %sample.metric, value = sample.value, "routing sample");
                                // Send failures only mean the subject raced termination
                                let _ = subject.next(sample);
                            }
                        }
                        Some(StreamItem::Error(error)) => {
                            debug!(%error, "source errored, fanning out to all sub-streams");
                            let mut state = task_state.lock();
                            state.terminal = Some(Terminal::Errored(error.clone()));
                            for subject in state.subjects.values() {
                                let _ = subject.error(error.clone());
                            }
                            break;
                        }
                        None => {
                            debug!("source completed, closing all sub-streams");
                            let mut state = task_state.lock();
                            state.terminal = Some(Terminal::Completed);
                            for subject in state.subjects.values() {
                                subject.close();
                            }
                            break;
                        }
                    }
                }
            }
        });

        Self { state, _task: task }
    }

    /// Sub-stream of exactly the samples whose metric name equals `metric`.
    ///
    /// Idempotent per metric: the first call creates the internal subject,
    /// later calls attach to it. After the source has terminated, this
    /// returns an already-terminated stream (an immediate error for an
    /// errored source, an empty stream for a completed one).
    pub fn subscribe(&self, metric: &str) -> MetricStream {
        let mut state = self.state.lock();

        match &state.terminal {
            Some(Terminal::Errored(error)) => {
                let error = error.clone();
                return Box::pin(futures::stream::once(
                    async move { StreamItem::Error(error) },
                ));
            }
            Some(Terminal::Completed) => return Box::pin(futures::stream::empty()),
            None => {}
        }

        let subject = state
            .subjects
            .entry(Arc::from(metric))
            .or_insert_with(|| {
                debug!(metric, "creating sub-stream subject");
                Subject::new()
            })
            .clone();

        // The subject cannot be closed here: termination sets `terminal`
        // under the same lock we hold.
        subject
            .subscribe()
            .unwrap_or_else(|_| unreachable!("live subject must accept subscribers"))
    }

    /// Number of distinct metrics with an internal subject.
    #[must_use]
    pub fn metric_count(&self) -> usize {
        self.state.lock().subjects.len()
    }

    /// The set of metric names currently routed.
    #[must_use]
    pub fn subscribed_metrics(&self) -> BTreeSet<String> {
        self.state
            .lock()
            .subjects
            .keys()
            .map(|metric| metric.to_string())
            .collect()
    }
}
