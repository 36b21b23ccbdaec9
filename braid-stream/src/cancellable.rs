// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Explicit cancellation of a sequence through a [`CancellationToken`].

use braid_core::{BraidError, CancellationToken, CancelledOwned, StreamItem};
use futures::Stream;
use pin_project::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A sequence that ends with `CancellationRequested` once its token is cancelled.
/// Created by [`CancellableExt::with_cancellation`].
#[pin_project]
#[must_use = "streams do nothing unless polled"]
pub struct CancellableStream<S> {
    #[pin]
    stream: S,
    cancelled: CancelledOwned,
    done: bool,
}

impl<S, T> Stream for CancellableStream<S>
where
    S: Stream<Item = StreamItem<T>>,
{
    type Item = StreamItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        if *this.done {
            return Poll::Ready(None);
        }

        if Pin::new(this.cancelled).poll(cx).is_ready() {
            *this.done = true;
            debug!("sequence cancelled by its token");
            return Poll::Ready(Some(StreamItem::Error(BraidError::cancelled(
                "sequence cancelled by its token",
            ))));
        }

        match this.stream.poll_next(cx) {
            Poll::Ready(Some(StreamItem::Error(error))) => {
                *this.done = true;
                Poll::Ready(Some(StreamItem::Error(error)))
            }
            Poll::Ready(None) => {
                *this.done = true;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

/// Extension trait providing the `with_cancellation` operator.
pub trait CancellableExt<T>: Stream<Item = StreamItem<T>> + Sized {
    /// Stop this sequence when `token` is cancelled.
    ///
    /// Once cancelled, the next poll yields a single
    /// [`CancellationRequested`](BraidError::CancellationRequested) error and the
    /// sequence ends. The input is dropped with the returned sequence, which in turn
    /// stops any background work it owns.
    ///
    /// ```rust
    /// use braid_core::CancellationToken;
    /// use braid_stream::{from_iter, CancellableExt};
    /// use futures::StreamExt;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let token = CancellationToken::new();
    /// let mut readings = from_iter(0..).with_cancellation(token.clone());
    ///
    /// assert_eq!(readings.next().await.unwrap().unwrap(), 0);
    /// token.cancel();
    /// assert!(readings.next().await.unwrap().err().unwrap().is_cancellation());
    /// assert!(readings.next().await.is_none());
    /// # }
    /// ```
    fn with_cancellation(self, token: CancellationToken) -> CancellableStream<Self>;
}

impl<S, T> CancellableExt<T> for S
where
    S: Stream<Item = StreamItem<T>>,
{
    fn with_cancellation(self, token: CancellationToken) -> CancellableStream<Self> {
        CancellableStream {
            stream: self,
            cancelled: token.cancelled_owned(),
            done: false,
        }
    }
}
