// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities for error injection in streams.

use braid_core::{BraidError, StreamItem};
use futures::stream::{self, Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};

/// A stream wrapper that injects an error at a given position.
///
/// Values from the inner stream are wrapped in `StreamItem::Value`. At position
/// `inject_error_at` (0-indexed) an [`UpstreamFailure`](BraidError::UpstreamFailure) is
/// yielded instead, once. The wrapper keeps forwarding afterwards, which lets tests check
/// that operators stop on their own.
///
/// ```rust
/// use braid_core::StreamItem;
/// use braid_test_utils::ErrorInjectingStream;
/// use futures::{stream, StreamExt};
///
/// # #[tokio::main]
/// # async fn main() {
/// let mut items = ErrorInjectingStream::new(stream::iter([1, 2]), 1);
///
/// assert!(matches!(items.next().await, Some(StreamItem::Value(1))));
/// assert!(matches!(items.next().await, Some(StreamItem::Error(_))));
/// assert!(matches!(items.next().await, Some(StreamItem::Value(2))));
/// # }
/// ```
#[derive(Debug)]
pub struct ErrorInjectingStream<S> {
    inner: S,
    inject_error_at: Option<usize>,
    count: usize,
}

impl<S> ErrorInjectingStream<S> {
    pub fn new(inner: S, inject_error_at: usize) -> Self {
        Self {
            inner,
            inject_error_at: Some(inject_error_at),
            count: 0,
        }
    }
}

impl<S> Stream for ErrorInjectingStream<S>
where
    S: Stream + Unpin,
{
    type Item = StreamItem<S::Item>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(error_pos) = self.inject_error_at {
            if self.count == error_pos {
                self.inject_error_at = None;
                self.count += 1;
                return Poll::Ready(Some(StreamItem::Error(BraidError::upstream_failure(
                    "Injected test error",
                ))));
            }
        }

        match Pin::new(&mut self.inner).poll_next(cx) {
            Poll::Ready(Some(item)) => {
                self.count += 1;
                Poll::Ready(Some(StreamItem::Value(item)))
            }
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Yields `values`, then an upstream failure carrying `context`.
pub fn error_stream<T>(
    values: Vec<T>,
    context: &'static str,
) -> impl Stream<Item = StreamItem<T>> + Send + Unpin
where
    T: Send + Unpin + 'static,
{
    stream::iter(values)
        .map(StreamItem::Value)
        .chain(stream::iter(std::iter::once(StreamItem::Error(
            BraidError::upstream_failure(context),
        ))))
}
