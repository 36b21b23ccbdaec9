// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Fan-out: replay one sequence to several independent branches.
//!
//! [`split`] drives its input exactly once, from a background task, into a bounded
//! [`MultiConsumerQueue`]. Every branch reads the queue through its own cursor, so each
//! branch yields the full input, in order, at its own pace.
//!
//! ## Characteristics
//!
//! - **Spawns a task**: the producer starts when `split` is called
//! - **Backpressure**: the producer pauses while the buffer holds `buffer_size` items the
//!   slowest branch has not read yet
//! - **Eviction**: an item leaves the buffer once every live branch has read it
//! - **Error propagation**: an input error is delivered to every branch, after the
//!   items that preceded it; each branch ends right after
//! - **Independent cancellation**: dropping a branch releases whatever it was holding
//!   back, so the remaining branches never stall on it; dropping the last branch stops
//!   the producer
//!
//! ## Runtime Requirements
//!
//! Requires `runtime-tokio` (default) or `runtime-smol`.
//!
//! ## Example
//!
//! ```rust
//! use braid_stream::{from_iter, split_pair};
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let (left, right) = split_pair(from_iter("abc".chars()));
//!
//! let (left, right) = futures::join!(
//!     left.map(|item| item.unwrap()).collect::<String>(),
//!     right.map(|item| item.unwrap()).collect::<String>(),
//! );
//! assert_eq!(left, "abc");
//! assert_eq!(right, "abc");
//! # }
//! ```

use crate::pull::next_or_cancelled;
use braid_core::{BraidError, BraidTask, Consumer, MultiConsumerQueue, Result, StreamItem};
use futures::stream::{self, Stream};
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Number of branches produced when none is requested.
pub const DEFAULT_SPLIT_BRANCHES: usize = 2;

/// Number of unread items buffered when no size is requested.
pub const DEFAULT_SPLIT_BUFFER: usize = 1;

/// Configuration for [`split`].
///
/// ```rust
/// use braid_stream::SplitOptions;
///
/// let options = SplitOptions::default().with_branches(3).with_buffer_size(8);
/// assert_eq!(options.branches, 3);
/// assert_eq!(options.buffer_size, 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitOptions {
    /// Number of output branches, at least 1.
    pub branches: usize,
    /// Maximum number of items read by some branch but not yet by all, at least 1.
    pub buffer_size: usize,
}

impl SplitOptions {
    #[must_use]
    pub const fn with_branches(mut self, branches: usize) -> Self {
        self.branches = branches;
        self
    }

    #[must_use]
    pub const fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Reject option values the splitter cannot honor.
    ///
    /// # Errors
    ///
    /// Returns [`BraidError::InvalidConfiguration`] when `branches` or `buffer_size` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.branches == 0 {
            return Err(BraidError::invalid_configuration(
                "split requires at least one branch",
            ));
        }
        if self.buffer_size == 0 {
            return Err(BraidError::invalid_configuration(
                "split buffer must hold at least one item",
            ));
        }
        Ok(())
    }
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            branches: DEFAULT_SPLIT_BRANCHES,
            buffer_size: DEFAULT_SPLIT_BUFFER,
        }
    }
}

/// Stops the producer once the last branch is gone.
struct ProducerGuard<T> {
    task: BraidTask,
    queue: Arc<MultiConsumerQueue<StreamItem<T>>>,
}

impl<T> Drop for ProducerGuard<T> {
    fn drop(&mut self) {
        self.task.cancel();
        // Releases a producer blocked on a full buffer
        self.queue.close();
    }
}

/// Held by the producer task; closes the buffer when the task ends, even on unwind.
struct CloseOnExit<T> {
    buffer: Arc<MultiConsumerQueue<StreamItem<T>>>,
    produced: usize,
}

impl<T> Drop for CloseOnExit<T> {
    fn drop(&mut self) {
        debug!("split producer finished after {} item(s)", self.produced);
        self.buffer.close();
    }
}

type BranchItems<T> = Pin<Box<dyn Stream<Item = StreamItem<T>> + Send + 'static>>;

/// One branch of a split sequence. Created by [`split`] and [`split_pair`].
///
/// The producer keeps running while at least one branch is alive.
#[must_use = "streams do nothing unless polled"]
pub struct SplitStream<T> {
    inner: BranchItems<T>,
    _guard: Arc<ProducerGuard<T>>,
}

impl<T> fmt::Debug for SplitStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitStream")
            .field("inner", &"<stream>")
            .finish()
    }
}

impl<T> Stream for SplitStream<T> {
    type Item = StreamItem<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

/// Split `stream` into `options.branches` independent copies.
///
/// # Errors
///
/// Returns [`BraidError::InvalidConfiguration`] for zero branches or a zero buffer.
///
/// # Panics
///
/// With `runtime-tokio`, panics when called outside of a Tokio runtime.
pub fn split<S, T>(stream: S, options: SplitOptions) -> Result<Vec<SplitStream<T>>>
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Clone + Send + 'static,
{
    options.validate()?;

    let queue = Arc::new(MultiConsumerQueue::new(options.buffer_size));
    // Register every branch before the first item can be produced
    let consumers: Vec<Consumer<StreamItem<T>>> =
        (0..options.branches).map(|_| queue.consumer()).collect();
    let guard = spawn_producer(stream, queue);

    Ok(consumers
        .into_iter()
        .map(|consumer| branch(consumer, Arc::clone(&guard)))
        .collect())
}

/// Split `stream` into two branches with the default buffer.
///
/// # Panics
///
/// With `runtime-tokio`, panics when called outside of a Tokio runtime.
pub fn split_pair<S, T>(stream: S) -> (SplitStream<T>, SplitStream<T>)
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Clone + Send + 'static,
{
    let queue = Arc::new(MultiConsumerQueue::new(DEFAULT_SPLIT_BUFFER));
    let first = queue.consumer();
    let second = queue.consumer();
    let guard = spawn_producer(stream, queue);

    (branch(first, Arc::clone(&guard)), branch(second, guard))
}

fn spawn_producer<S, T>(
    stream: S,
    queue: Arc<MultiConsumerQueue<StreamItem<T>>>,
) -> Arc<ProducerGuard<T>>
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Clone + Send + 'static,
{
    let buffer = Arc::clone(&queue);
    let task = BraidTask::spawn(move |cancel| async move {
        let mut exit = CloseOnExit {
            buffer,
            produced: 0,
        };
        let mut stream = Box::pin(stream);

        while let Some(item) = next_or_cancelled(&mut stream, &cancel).await {
            let failed = item.is_error();
            if exit.buffer.put(item).await.is_err() {
                break;
            }
            exit.produced += 1;
            if failed {
                warn!("split input failed after {} item(s)", exit.produced - 1);
                break;
            }
        }
    });

    Arc::new(ProducerGuard { task, queue })
}

fn branch<T>(consumer: Consumer<StreamItem<T>>, guard: Arc<ProducerGuard<T>>) -> SplitStream<T>
where
    T: Clone + Send + 'static,
{
    let items = stream::unfold(consumer, |consumer| async move {
        let item = consumer.get().await?;
        Some((item, consumer))
    });

    SplitStream {
        inner: Box::pin(items),
        _guard: guard,
    }
}

/// Extension trait providing the `split_into` and `split_pair` operators.
pub trait SplitExt<T>: Stream<Item = StreamItem<T>> + Sized
where
    T: Clone + Send + 'static,
{
    /// Split this sequence into `options.branches` independent copies.
    ///
    /// # Errors
    ///
    /// Returns [`BraidError::InvalidConfiguration`] for zero branches or a zero buffer.
    fn split_into(self, options: SplitOptions) -> Result<Vec<SplitStream<T>>>
    where
        Self: Send + 'static;

    /// Split this sequence into two copies with the default buffer.
    fn split_pair(self) -> (SplitStream<T>, SplitStream<T>)
    where
        Self: Send + 'static;
}

impl<S, T> SplitExt<T> for S
where
    S: Stream<Item = StreamItem<T>>,
    T: Clone + Send + 'static,
{
    fn split_into(self, options: SplitOptions) -> Result<Vec<SplitStream<T>>>
    where
        Self: Send + 'static,
    {
        split(self, options)
    }

    fn split_pair(self) -> (SplitStream<T>, SplitStream<T>)
    where
        Self: Send + 'static,
    {
        split_pair(self)
    }
}
