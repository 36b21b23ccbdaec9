// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use braid_core::{BraidError, StreamItem};
use futures::stream::{Stream, StreamExt};
use std::fmt::Debug;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Fails the test if `stream` yields anything within `timeout_ms`.
pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        _item = stream.next() => {
            panic!("Unexpected item emitted, expected no output.");
        }
        _ = sleep(Duration::from_millis(timeout_ms)) => {
        }
    }
}

/// Waits up to `timeout_ms` for the next item and returns its value.
///
/// # Panics
///
/// Panics on timeout, on an `Error` item or when the stream ended.
pub async fn unwrap_stream<S, T>(stream: &mut S, timeout_ms: u64) -> T
where
    S: Stream<Item = StreamItem<T>> + Unpin,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(Some(StreamItem::Value(value))) => value,
        Ok(Some(StreamItem::Error(error))) => panic!("Expected a value, got error: {error}"),
        Ok(None) => panic!("Expected a value, but the stream ended"),
        Err(_) => panic!("Timed out after {timeout_ms}ms waiting for a value"),
    }
}

/// Waits up to `timeout_ms` for the next item and returns its error.
///
/// # Panics
///
/// Panics on timeout, on a `Value` item or when the stream ended.
pub async fn unwrap_error<S, T>(stream: &mut S, timeout_ms: u64) -> BraidError
where
    S: Stream<Item = StreamItem<T>> + Unpin,
    T: Debug,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(Some(StreamItem::Error(error))) => error,
        Ok(Some(StreamItem::Value(value))) => panic!("Expected an error, got value: {value:?}"),
        Ok(None) => panic!("Expected an error, but the stream ended"),
        Err(_) => panic!("Timed out after {timeout_ms}ms waiting for an error"),
    }
}

/// Fails the test unless `stream` ends within `timeout_ms`.
pub async fn assert_stream_ended<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
    T: Debug,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(None) => {}
        Ok(Some(item)) => panic!("Expected the stream to end, got {item:?}"),
        Err(_) => panic!("Timed out after {timeout_ms}ms waiting for the stream to end"),
    }
}

/// Drains `stream`, splitting its values from the terminating error, if any.
pub async fn collect_values<S, T>(stream: S) -> (Vec<T>, Option<BraidError>)
where
    S: Stream<Item = StreamItem<T>>,
{
    let mut stream = Box::pin(stream);
    let mut values = Vec::new();

    while let Some(item) = stream.next().await {
        match item {
            StreamItem::Value(value) => values.push(value),
            StreamItem::Error(error) => return (values, Some(error)),
        }
    }

    (values, None)
}
