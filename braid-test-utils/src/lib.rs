// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities for the braid stream combinators.
//!
//! This crate provides sources, error injection and assertion helpers for testing
//! stream operators. It is designed for use in development and testing only, not for
//! production code.
//!
//! # Sources
//!
//! - [`test_channel`] / [`test_channel_with_errors`]: imperative sources driven from the
//!   test body through a `tokio` unbounded sender
//! - [`simple_stream`]: a fixed list of values, each preceded by a delay; run under
//!   `tokio::time::pause` for deterministic interleavings
//! - [`error_stream`]: values followed by an upstream failure
//! - [`ErrorInjectingStream`]: wraps a plain stream and injects an error at a position
//!
//! # Assertions
//!
//! ```rust
//! use braid_test_utils::assert_no_element_emitted;
//! use futures::stream;
//!
//! # async fn example() {
//! let mut pending = stream::pending::<i32>();
//! assert_no_element_emitted(&mut pending, 10).await;
//! # }
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod error_injection;
pub mod helpers;
pub mod timed;

use braid_core::StreamItem;
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

// Re-export commonly used test utilities
pub use error_injection::{error_stream, ErrorInjectingStream};
pub use helpers::{
    assert_no_element_emitted, assert_stream_ended, collect_values, unwrap_error,
    unwrap_stream,
};
pub use timed::{simple_stream, simple_stream_after};

/// Creates a test channel that automatically wraps values in `StreamItem::Value`.
///
/// # Example
///
/// ```rust
/// use braid_test_utils::test_channel;
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() {
/// let (tx, mut stream) = test_channel();
/// tx.send("reading").unwrap();
///
/// assert_eq!(stream.next().await.unwrap().unwrap(), "reading");
/// # }
/// ```
pub fn test_channel<T: Send + 'static>() -> (
    mpsc::UnboundedSender<T>,
    impl Stream<Item = StreamItem<T>> + Send,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx).map(StreamItem::Value);
    (tx, stream)
}

/// Creates a test channel that accepts `StreamItem<T>`, so tests can send errors too.
///
/// # Example
///
/// ```rust
/// use braid_core::{BraidError, StreamItem};
/// use braid_test_utils::test_channel_with_errors;
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() {
/// let (tx, mut stream) = test_channel_with_errors::<i32>();
/// tx.send(StreamItem::Value(42)).unwrap();
/// tx.send(StreamItem::Error(BraidError::upstream_failure("sensor offline"))).unwrap();
///
/// assert_eq!(stream.next().await.unwrap().unwrap(), 42);
/// assert!(stream.next().await.unwrap().is_error());
/// # }
/// ```
pub fn test_channel_with_errors<T: Send + 'static>() -> (
    mpsc::UnboundedSender<StreamItem<T>>,
    impl Stream<Item = StreamItem<T>> + Send,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx);
    (tx, stream)
}
