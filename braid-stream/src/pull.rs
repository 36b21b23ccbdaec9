// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use braid_core::{BraidError, CancellationToken, StreamItem};
use futures::future::{select, Either};
use futures::{FutureExt, Stream, StreamExt};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;

/// Next item of an input driven by a background task, or `None` once the input ends
/// or `cancel` fires.
///
/// A panic raised while polling the input is reported as an `UpstreamFailure`, so the
/// task can still close its queue.
pub(crate) async fn next_or_cancelled<S, T>(
    stream: &mut Pin<Box<S>>,
    cancel: &CancellationToken,
) -> Option<StreamItem<T>>
where
    S: Stream<Item = StreamItem<T>>,
{
    let next = AssertUnwindSafe(stream.next()).catch_unwind();

    match select(next, cancel.cancelled()).await {
        Either::Left((Ok(item), _)) => item,
        Either::Left((Err(payload), _)) => {
            let message = panic_message(payload.as_ref());
            warn!("input panicked: {}", message);
            Some(StreamItem::Error(BraidError::upstream_failure(format!(
                "input panicked: {message}"
            ))))
        }
        Either::Right(_) => None,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string payload")
}
