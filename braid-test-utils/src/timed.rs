// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Sources that pace their values on the `tokio` clock.
//!
//! Combined with `#[tokio::test(start_paused = true)]` the interleaving of several
//! paced sources is fully determined by their delays.

use braid_core::StreamItem;
use futures::stream::{self, Stream};
use std::time::Duration;
use tokio::time::sleep;

/// Yields `values` in order, sleeping `delay` before each one.
///
/// ```rust
/// use braid_test_utils::simple_stream;
/// use futures::StreamExt;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() {
/// let letters: Vec<char> = simple_stream("ab".chars(), Duration::from_millis(1))
///     .map(|item| item.unwrap())
///     .collect()
///     .await;
/// assert_eq!(letters, vec!['a', 'b']);
/// # }
/// ```
pub fn simple_stream<I>(values: I, delay: Duration) -> impl Stream<Item = StreamItem<I::Item>> + Send
where
    I: IntoIterator,
    I::IntoIter: Send + 'static,
    I::Item: Send + 'static,
{
    simple_stream_after(values, Duration::ZERO, delay)
}

/// Like [`simple_stream`], with an extra `start` delay before the first value.
pub fn simple_stream_after<I>(
    values: I,
    start: Duration,
    delay: Duration,
) -> impl Stream<Item = StreamItem<I::Item>> + Send
where
    I: IntoIterator,
    I::IntoIter: Send + 'static,
    I::Item: Send + 'static,
{
    stream::unfold(
        (values.into_iter(), start),
        move |(mut values, pending)| async move {
            let value = values.next()?;
            sleep(pending + delay).await;
            Some((StreamItem::Value(value), (values, Duration::ZERO)))
        },
    )
}
