// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Sequential concatenation of sequences.

use braid_core::StreamItem;
use futures::Stream;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Concatenate `streams`: each input is exhausted before the next one is polled.
///
/// An error from any input is yielded and ends the chain; the inputs after it are
/// never polled.
///
/// # Example
///
/// ```rust
/// use braid_stream::{chain, from_iter};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() {
/// let joined: String = chain(vec![from_iter("ab".chars()), from_iter("cd".chars())])
///     .map(|item| item.unwrap())
///     .collect()
///     .await;
/// assert_eq!(joined, "abcd");
/// # }
/// ```
pub fn chain<I, S, T>(streams: I) -> ChainStream<S>
where
    I: IntoIterator<Item = S>,
    S: Stream<Item = StreamItem<T>>,
{
    ChainStream {
        streams: streams.into_iter().map(|s| Some(Box::pin(s))).collect(),
        cursor: 0,
    }
}

/// A sequence concatenating several inputs. Created by [`chain`] and
/// [`ChainExt::chain_with`].
#[must_use = "streams do nothing unless polled"]
pub struct ChainStream<S> {
    /// Exhausted inputs are released as soon as the cursor leaves them
    streams: Vec<Option<Pin<Box<S>>>>,
    cursor: usize,
}

impl<S> ChainStream<S> {
    /// Number of inputs not yet exhausted, including the current one.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.streams.len().saturating_sub(self.cursor)
    }

    fn finish(&mut self) {
        self.streams.clear();
        self.cursor = 0;
    }
}

impl<S> fmt::Debug for ChainStream<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainStream")
            .field("cursor", &self.cursor)
            .field("remaining", &self.remaining())
            .finish()
    }
}

impl<S, T> Stream for ChainStream<S>
where
    S: Stream<Item = StreamItem<T>>,
{
    type Item = StreamItem<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        while this.cursor < this.streams.len() {
            let Some(current) = this.streams[this.cursor].as_mut() else {
                this.cursor += 1;
                continue;
            };

            match current.as_mut().poll_next(cx) {
                Poll::Ready(Some(StreamItem::Value(value))) => {
                    return Poll::Ready(Some(StreamItem::Value(value)));
                }
                Poll::Ready(Some(StreamItem::Error(error))) => {
                    warn!("chain input {} failed, skipping the rest", this.cursor);
                    this.finish();
                    return Poll::Ready(Some(StreamItem::Error(error)));
                }
                Poll::Ready(None) => {
                    this.streams[this.cursor] = None;
                    this.cursor += 1;
                    debug!("chain advanced to input {}", this.cursor);
                }
                Poll::Pending => return Poll::Pending,
            }
        }

        Poll::Ready(None)
    }
}

/// Extension trait providing the `chain_with` operator.
pub trait ChainExt<T>: Stream<Item = StreamItem<T>> + Sized {
    /// Yield every item of this sequence, then every item of each of `rest`, in order.
    ///
    /// All inputs must share one type; box heterogeneous inputs first (for example
    /// with `futures::StreamExt::boxed`).
    ///
    /// ```rust
    /// use braid_stream::{from_iter, ChainExt};
    /// use futures::StreamExt;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let numbers: Vec<i32> = from_iter(vec![1, 2])
    ///     .chain_with([from_iter(vec![3])])
    ///     .map(|item| item.unwrap())
    ///     .collect()
    ///     .await;
    /// assert_eq!(numbers, vec![1, 2, 3]);
    /// # }
    /// ```
    fn chain_with<I>(self, rest: I) -> ChainStream<Self>
    where
        I: IntoIterator<Item = Self>;
}

impl<S, T> ChainExt<T> for S
where
    S: Stream<Item = StreamItem<T>>,
{
    fn chain_with<I>(self, rest: I) -> ChainStream<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        chain(std::iter::once(self).chain(rest))
    }
}
