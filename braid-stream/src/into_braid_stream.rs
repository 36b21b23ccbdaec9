// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Source adapters turning arbitrary producers into braid sequences.
//!
//! Every combinator in this crate consumes `Stream<Item = StreamItem<T>>`. The adapters
//! here lift plain producers into that shape:
//!
//! - [`IntoBraidStream::into_braid_stream`]: any `Stream<Item = T>` (channels, timers,
//!   `futures::stream::iter`, ...); every item becomes a `Value`
//! - [`TryIntoBraidStream::try_into_braid_stream`]: a `Stream<Item = Result<T, E>>`; the
//!   first `Err` becomes an [`UpstreamFailure`](braid_core::BraidError::UpstreamFailure)
//!   and ends the sequence
//! - [`from_iter`]: a synchronous iterator, yielded without suspending

use braid_core::{BraidError, StreamItem};
use futures::stream::{self, Stream, StreamExt};
use pin_project::pin_project;
use std::error::Error;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Sequence returned by [`IntoBraidStream::into_braid_stream`].
pub type BraidValues<S> =
    stream::Map<S, fn(<S as Stream>::Item) -> StreamItem<<S as Stream>::Item>>;

/// Extension trait lifting a stream of plain values into a braid sequence.
pub trait IntoBraidStream: Stream + Sized {
    /// Wrap every item in [`StreamItem::Value`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use braid_stream::IntoBraidStream;
    /// use futures::{stream, StreamExt};
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let mut readings = stream::iter([21, 22]).into_braid_stream();
    ///
    /// assert_eq!(readings.next().await.unwrap().unwrap(), 21);
    /// assert_eq!(readings.next().await.unwrap().unwrap(), 22);
    /// assert!(readings.next().await.is_none());
    /// # }
    /// ```
    fn into_braid_stream(self) -> BraidValues<Self>;
}

impl<S: Stream> IntoBraidStream for S {
    fn into_braid_stream(self) -> BraidValues<Self> {
        self.map(StreamItem::Value as fn(S::Item) -> StreamItem<S::Item>)
    }
}

/// Extension trait lifting a stream of `Result`s into a braid sequence.
pub trait TryIntoBraidStream<T, E>: Stream<Item = Result<T, E>> + Sized {
    /// Wrap `Ok` items in [`StreamItem::Value`]; the first `Err` is yielded as an
    /// upstream failure and terminates the sequence.
    ///
    /// # Example
    ///
    /// ```rust
    /// use braid_stream::TryIntoBraidStream;
    /// use futures::{stream, StreamExt};
    /// use std::io;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let source = stream::iter([
    ///     Ok(1),
    ///     Err(io::Error::other("feed lost")),
    ///     Ok(2),
    /// ]);
    /// let items: Vec<_> = source.try_into_braid_stream().collect().await;
    ///
    /// assert_eq!(items.len(), 2);
    /// assert!(items[1].is_error());
    /// # }
    /// ```
    fn try_into_braid_stream(self) -> TryBraidValues<Self>;
}

impl<S, T, E> TryIntoBraidStream<T, E> for S
where
    S: Stream<Item = Result<T, E>>,
    E: Error + Send + Sync + 'static,
{
    fn try_into_braid_stream(self) -> TryBraidValues<Self> {
        TryBraidValues {
            stream: self,
            done: false,
        }
    }
}

/// Sequence returned by [`TryIntoBraidStream::try_into_braid_stream`].
#[pin_project]
#[derive(Debug)]
#[must_use = "streams do nothing unless polled"]
pub struct TryBraidValues<S> {
    #[pin]
    stream: S,
    done: bool,
}

impl<S, T, E> Stream for TryBraidValues<S>
where
    S: Stream<Item = Result<T, E>>,
    E: Error + Send + Sync + 'static,
{
    type Item = StreamItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        if *this.done {
            return Poll::Ready(None);
        }

        match this.stream.poll_next(cx) {
            Poll::Ready(Some(Ok(value))) => Poll::Ready(Some(StreamItem::Value(value))),
            Poll::Ready(Some(Err(error))) => {
                *this.done = true;
                Poll::Ready(Some(StreamItem::Error(BraidError::upstream(error))))
            }
            Poll::Ready(None) => {
                *this.done = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Build a sequence from a synchronous iterator.
///
/// ```rust
/// use braid_stream::from_iter;
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() {
/// let letters: Vec<char> = from_iter("abc".chars())
///     .map(|item| item.unwrap())
///     .collect()
///     .await;
/// assert_eq!(letters, vec!['a', 'b', 'c']);
/// # }
/// ```
pub fn from_iter<I>(iter: I) -> impl Stream<Item = StreamItem<I::Item>>
where
    I: IntoIterator,
{
    stream::iter(iter).map(StreamItem::Value)
}
