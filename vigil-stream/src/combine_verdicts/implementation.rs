// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use pin_project::pin_project;
use vigil_core::{LogicalOp, StreamItem, Verdict};

/// Extension trait providing the
/// [`combine_verdicts`](CombineVerdictsExt::combine_verdicts) operator.
pub trait CombineVerdictsExt: Stream<Item = StreamItem<Verdict>> + Sized {
    /// Combine this verdict stream with `other` under `op`, tagging every
    /// combined verdict with `node`.
    ///
    /// See the [module documentation](super) for the combine-latest
    /// semantics.
    fn combine_verdicts<R>(self, other: R, op: LogicalOp, node: Arc<str>) -> CombineVerdicts<Self, R>
    where
        R: Stream<Item = StreamItem<Verdict>>;
}

impl<S> CombineVerdictsExt for S
where
    S: Stream<Item = StreamItem<Verdict>> + Sized,
{
    fn combine_verdicts<R>(self, other: R, op: LogicalOp, node: Arc<str>) -> CombineVerdicts<S, R>
    where
        R: Stream<Item = StreamItem<Verdict>>,
    {
        CombineVerdicts {
            left: self,
            right: other,
            node,
            op,
            latest_left: None,
            latest_right: None,
            left_done: false,
            right_done: false,
            errored: false,
        }
    }
}

/// Stream returned by [`combine_verdicts`](CombineVerdictsExt::combine_verdicts).
#[pin_project]
pub struct CombineVerdicts<L, R> {
    #[pin]
    left: L,
    #[pin]
    right: R,
    node: Arc<str>,
    op: LogicalOp,
    latest_left: Option<Verdict>,
    latest_right: Option<Verdict>,
    left_done: bool,
    right_done: bool,
    errored: bool,
}

fn combine(
    node: &Arc<str>,
    op: LogicalOp,
    left: &Option<Verdict>,
    right: &Option<Verdict>,
) -> Option<Verdict> {
    let (left, right) = (left.as_ref()?, right.as_ref()?);
    Some(Verdict {
        node: Arc::clone(node),
        value: op.apply(left.value, right.value),
        period: left.period.join(right.period),
    })
}

impl<L, R> Stream for CombineVerdicts<L, R>
where
    L: Stream<Item = StreamItem<Verdict>>,
    R: Stream<Item = StreamItem<Verdict>>,
{
    type Item = StreamItem<Verdict>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.errored {
            return Poll::Ready(None);
        }

        loop {
            let mut progressed = false;

            if !*this.left_done {
                match this.left.as_mut().poll_next(cx) {
                    Poll::Ready(Some(StreamItem::Value(verdict))) => {
                        *this.latest_left = Some(verdict);
                        progressed = true;
                        if let Some(out) =
                            combine(this.node, *this.op, this.latest_left, this.latest_right)
                        {
                            return Poll::Ready(Some(StreamItem::Value(out)));
                        }
                    }
                    Poll::Ready(Some(StreamItem::Error(error))) => {
                        *this.errored = true;
                        return Poll::Ready(Some(StreamItem::Error(error)));
                    }
                    Poll::Ready(None) => {
                        *this.left_done = true;
                        progressed = true;
                    }
                    Poll::Pending => {}
                }
            }

            if !*this.right_done {
                match this.right.as_mut().poll_next(cx) {
                    Poll::Ready(Some(StreamItem::Value(verdict))) => {
                        *this.latest_right = Some(verdict);
                        progressed = true;
                        if let Some(out) =
                            combine(this.node, *this.op, this.latest_left, this.latest_right)
                        {
                            return Poll::Ready(Some(StreamItem::Value(out)));
                        }
                    }
                    Poll::Ready(Some(StreamItem::Error(error))) => {
                        *this.errored = true;
                        return Poll::Ready(Some(StreamItem::Error(error)));
                    }
                    Poll::Ready(None) => {
                        *this.right_done = true;
                        progressed = true;
                    }
                    Poll::Pending => {}
                }
            }

            if !progressed {
                return if *this.left_done && *this.right_done {
                    Poll::Ready(None)
                } else {
                    Poll::Pending
                };
            }
            if *this.left_done && *this.right_done {
                return Poll::Ready(None);
            }
        }
    }
}
