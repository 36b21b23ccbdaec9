// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Lazy filtering with synchronous or suspending predicates.
//!
//! The predicate is any [`Predicate`]: a plain `FnMut(&T) -> bool`, a closure returning a
//! future (see [`suspending`]), a fallible closure (see [`fallible`](braid_core::fallible))
//! or [`truthy`](braid_core::truthy) for "no predicate".
//!
//! Each request for the next item pulls from the input until an item passes or the input
//! ends. Nothing is read ahead.
//!
//! ## Errors
//!
//! An upstream error is yielded and ends the filtered sequence. A predicate failure is
//! yielded as [`TransformFailure`](braid_core::BraidError::TransformFailure) and ends it
//! as well.

use braid_core::{
    fallible_suspending, suspending, FallibleSuspending, Predicate, StreamItem, Suspending,
};
use futures::Stream;
use pin_project::pin_project;
use std::error::Error;
use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

/// Keep the items of `stream` for which `predicate` holds.
///
/// # Example
///
/// ```rust
/// use braid_stream::{filter, from_iter};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() {
/// let odd: Vec<i32> = filter(|x: &i32| x % 2 == 1, from_iter(0..5))
///     .map(|item| item.unwrap())
///     .collect()
///     .await;
/// assert_eq!(odd, vec![1, 3]);
/// # }
/// ```
pub fn filter<P, S, T>(predicate: P, stream: S) -> FilterStream<S, P, T>
where
    S: Stream<Item = StreamItem<T>>,
    P: Predicate<T>,
{
    FilterStream {
        stream,
        predicate,
        verdict: None,
        candidate: None,
        done: false,
    }
}

/// A filtered sequence. Created by [`filter`] and [`FilterExt`].
#[pin_project]
#[must_use = "streams do nothing unless polled"]
pub struct FilterStream<S, P, T>
where
    P: Predicate<T>,
{
    #[pin]
    stream: S,
    predicate: P,
    #[pin]
    verdict: Option<P::Future>,
    candidate: Option<T>,
    done: bool,
}

impl<S, P, T> Stream for FilterStream<S, P, T>
where
    S: Stream<Item = StreamItem<T>>,
    P: Predicate<T>,
{
    type Item = StreamItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if *this.done {
                return Poll::Ready(None);
            }

            if let Some(verdict) = this.verdict.as_mut().as_pin_mut() {
                let verdict = ready!(verdict.poll(cx));
                this.verdict.set(None);
                let candidate = this.candidate.take();

                match (verdict, candidate) {
                    (Ok(true), Some(value)) => {
                        return Poll::Ready(Some(StreamItem::Value(value)));
                    }
                    (Ok(_), _) => continue,
                    (Err(error), _) => {
                        *this.done = true;
                        return Poll::Ready(Some(StreamItem::Error(error)));
                    }
                }
            }

            match ready!(this.stream.as_mut().poll_next(cx)) {
                Some(StreamItem::Value(value)) => {
                    let verdict = this.predicate.test(&value);
                    *this.candidate = Some(value);
                    this.verdict.set(Some(verdict));
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
    }
}

/// Extension trait providing the `filter_with` operators.
pub trait FilterExt<T>: Stream<Item = StreamItem<T>> + Sized {
    /// Keep the items for which `predicate` holds.
    ///
    /// ```rust
    /// use braid_core::truthy;
    /// use braid_stream::{from_iter, FilterExt};
    /// use futures::StreamExt;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let kept: Vec<i32> = from_iter(0..3)
    ///     .filter_with(truthy())
    ///     .map(|item| item.unwrap())
    ///     .collect()
    ///     .await;
    /// assert_eq!(kept, vec![1, 2]);
    /// # }
    /// ```
    fn filter_with<P>(self, predicate: P) -> FilterStream<Self, P, T>
    where
        P: Predicate<T>;

    /// Keep the items for which the future returned by `predicate` resolves to `true`.
    fn filter_with_async<F, Fut>(self, predicate: F) -> FilterStream<Self, Suspending<F, Fut>, T>
    where
        F: FnMut(&T) -> Fut,
        Fut: Future<Output = bool>;

    /// Keep the items for which the future returned by `predicate` resolves to
    /// `Ok(true)`. An `Err` ends the sequence with a
    /// [`TransformFailure`](braid_core::BraidError::TransformFailure).
    fn filter_with_fallible_async<F, Fut, E>(
        self,
        predicate: F,
    ) -> FilterStream<Self, FallibleSuspending<F, Fut>, T>
    where
        F: FnMut(&T) -> Fut,
        Fut: Future<Output = Result<bool, E>>,
        E: Error + Send + Sync + 'static;
}

impl<S, T> FilterExt<T> for S
where
    S: Stream<Item = StreamItem<T>>,
{
    fn filter_with<P>(self, predicate: P) -> FilterStream<Self, P, T>
    where
        P: Predicate<T>,
    {
        filter(predicate, self)
    }

    fn filter_with_async<F, Fut>(self, predicate: F) -> FilterStream<Self, Suspending<F, Fut>, T>
    where
        F: FnMut(&T) -> Fut,
        Fut: Future<Output = bool>,
    {
        filter(suspending(predicate), self)
    }

    fn filter_with_fallible_async<F, Fut, E>(
        self,
        predicate: F,
    ) -> FilterStream<Self, FallibleSuspending<F, Fut>, T>
    where
        F: FnMut(&T) -> Fut,
        Fut: Future<Output = Result<bool, E>>,
        E: Error + Send + Sync + 'static,
    {
        filter(fallible_suspending(predicate), self)
    }
}
