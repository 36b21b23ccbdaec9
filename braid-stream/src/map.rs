// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Lazy element-wise transformation with synchronous or suspending functions.

use braid_core::{suspending, StreamItem, Suspending, Transform};
use futures::Stream;
use pin_project::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

/// Apply `transform` to every value of `stream`, in order.
///
/// One value is transformed at a time, only when the consumer asks for the next item.
/// An upstream error, or a failing [`fallible`](braid_core::fallible) transform, is
/// yielded and ends the sequence.
///
/// # Example
///
/// ```rust
/// use braid_core::suspending;
/// use braid_stream::{from_iter, map};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() {
/// let lengths: Vec<usize> = map(
///     suspending(|word: &'static str| async move { word.len() }),
///     from_iter(["a", "bb", "ccc"]),
/// )
/// .map(|item| item.unwrap())
/// .collect()
/// .await;
/// assert_eq!(lengths, vec![1, 2, 3]);
/// # }
/// ```
pub fn map<F, S, T>(transform: F, stream: S) -> MapStream<S, F, T>
where
    S: Stream<Item = StreamItem<T>>,
    F: Transform<T>,
{
    MapStream {
        stream,
        transform,
        pending: None,
        done: false,
    }
}

/// A transformed sequence. Created by [`map`] and [`MapExt`].
#[pin_project]
#[must_use = "streams do nothing unless polled"]
pub struct MapStream<S, F, T>
where
    F: Transform<T>,
{
    #[pin]
    stream: S,
    transform: F,
    #[pin]
    pending: Option<F::Future>,
    done: bool,
}

impl<S, F, T> Stream for MapStream<S, F, T>
where
    S: Stream<Item = StreamItem<T>>,
    F: Transform<T>,
{
    type Item = StreamItem<F::Output>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.done {
            return Poll::Ready(None);
        }

        if this.pending.is_none() {
            match ready!(this.stream.as_mut().poll_next(cx)) {
                Some(StreamItem::Value(value)) => {
                    let future = this.transform.apply(value);
                    this.pending.set(Some(future));
                }
                Some(StreamItem::Error(error)) => {
                    *this.done = true;
                    return Poll::Ready(Some(StreamItem::Error(error)));
                }
                None => {
                    *this.done = true;
                    return Poll::Ready(None);
                }
            }
        }

        let Some(pending) = this.pending.as_mut().as_pin_mut() else {
            return Poll::Ready(None);
        };
        let output = ready!(pending.poll(cx));
        this.pending.set(None);

        Poll::Ready(Some(match output {
            Ok(value) => StreamItem::Value(value),
            Err(error) => {
                *this.done = true;
                StreamItem::Error(error)
            }
        }))
    }
}

/// Extension trait providing the `map_with` operators.
pub trait MapExt<T>: Stream<Item = StreamItem<T>> + Sized {
    /// Transform every value with `transform`.
    ///
    /// ```rust
    /// use braid_stream::{from_iter, MapExt};
    /// use futures::StreamExt;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let doubled: Vec<i32> = from_iter(1..=3)
    ///     .map_with(|x: i32| x * 2)
    ///     .map(|item| item.unwrap())
    ///     .collect()
    ///     .await;
    /// assert_eq!(doubled, vec![2, 4, 6]);
    /// # }
    /// ```
    fn map_with<F>(self, transform: F) -> MapStream<Self, F, T>
    where
        F: Transform<T>;

    /// Transform every value with a function returning a future.
    fn map_with_async<F, Fut>(self, transform: F) -> MapStream<Self, Suspending<F, Fut>, T>
    where
        F: FnMut(T) -> Fut,
        Fut: Future;
}

impl<S, T> MapExt<T> for S
where
    S: Stream<Item = StreamItem<T>>,
{
    fn map_with<F>(self, transform: F) -> MapStream<Self, F, T>
    where
        F: Transform<T>,
    {
        map(transform, self)
    }

    fn map_with_async<F, Fut>(self, transform: F) -> MapStream<Self, Suspending<F, Fut>, T>
    where
        F: FnMut(T) -> Fut,
        Fut: Future,
    {
        map(suspending(transform), self)
    }
}
