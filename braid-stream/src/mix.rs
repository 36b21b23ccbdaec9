// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Fan-in: merge several sequences into one, in emission order.
//!
//! [`mix`] spawns one pull-task per input. Each task repeatedly awaits its input and
//! pushes every item into a shared [`ClosableQueue`]; the mixed sequence reads from that
//! queue. Items therefore appear in the order they become available, not in input
//! order, and a slow input never delays a fast one.
//!
//! ## Characteristics
//!
//! - **Spawns tasks**: one background task per input, started when `mix` is called
//! - **Emission order**: first-ready-wins; each input's own order is preserved
//! - **Bounded**: the shared queue holds at most `capacity` items (default: number of
//!   inputs), so inputs are paused while the consumer lags
//! - **Fail-fast**: the first error from any input is yielded, every other pull-task is
//!   cancelled and the sequence ends
//! - **Cancellation**: dropping the mixed sequence cancels every pull-task
//!
//! Ties between inputs that become ready at the same instant are resolved by queue
//! arrival order, which depends on the runtime's scheduling.
//!
//! ## Runtime Requirements
//!
//! Requires `runtime-tokio` (default) or `runtime-smol`.
//!
//! ## Example
//!
//! ```rust
//! use braid_stream::{from_iter, mix};
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mixed = mix(vec![from_iter(vec![1, 2]), from_iter(vec![3])]);
//! let mut values: Vec<i32> = mixed.map(|item| item.unwrap()).collect().await;
//!
//! values.sort();
//! assert_eq!(values, vec![1, 2, 3]);
//! # }
//! ```

use crate::pull::next_or_cancelled;
use braid_core::{BraidTask, CancellationToken, ClosableQueue, StreamItem};
use futures::stream::{self, Stream};
use std::fmt;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

type BoxedItems<T> = Pin<Box<dyn Stream<Item = StreamItem<T>> + Send + 'static>>;

struct Shared<T> {
    queue: ClosableQueue<StreamItem<T>>,
    live: AtomicUsize,
}

/// Owns the pull-tasks for as long as the mixed sequence is alive.
struct Mixer<T> {
    shared: Arc<Shared<T>>,
    tasks: Vec<BraidTask>,
    done: bool,
}

impl<T> Mixer<T> {
    fn stop(&mut self) {
        self.done = true;
        for task in &self.tasks {
            task.cancel();
        }
        self.shared.queue.close();
    }
}

impl<T> Drop for Mixer<T> {
    fn drop(&mut self) {
        if !self.done && !self.shared.queue.is_closed() {
            debug!("mixed sequence dropped, cancelling {} pull-task(s)", self.tasks.len());
        }
        self.stop();
    }
}

/// A sequence merging several inputs. Created by [`mix`] and [`MixExt::mix_with`].
#[must_use = "streams do nothing unless polled"]
pub struct MixStream<T> {
    inner: BoxedItems<T>,
}

impl<T> fmt::Debug for MixStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MixStream")
            .field("inner", &"<stream>")
            .finish()
    }
}

impl<T> Stream for MixStream<T> {
    type Item = StreamItem<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

/// Merge `streams` into one sequence yielding items as soon as any input produces them.
///
/// The shared queue holds as many items as there are inputs. With no inputs the
/// sequence is empty.
///
/// # Panics
///
/// With `runtime-tokio`, panics when called outside of a Tokio runtime.
pub fn mix<I, S, T>(streams: I) -> MixStream<T>
where
    I: IntoIterator<Item = S>,
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Send + 'static,
{
    let streams: Vec<S> = streams.into_iter().collect();
    let capacity = streams.len();
    mix_with_capacity(streams, capacity)
}

/// Like [`mix`], with an explicit bound on the shared queue (at least one item).
pub fn mix_with_capacity<I, S, T>(streams: I, capacity: usize) -> MixStream<T>
where
    I: IntoIterator<Item = S>,
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Send + 'static,
{
    let streams: Vec<S> = streams.into_iter().collect();
    let shared = Arc::new(Shared {
        queue: ClosableQueue::bounded(capacity),
        live: AtomicUsize::new(streams.len()),
    });

    debug!("mixing {} input(s)", streams.len());
    if streams.is_empty() {
        shared.queue.close();
    }

    let tasks = streams
        .into_iter()
        .enumerate()
        .map(|(index, stream)| {
            let shared = Arc::clone(&shared);
            BraidTask::spawn(move |cancel| pull(index, stream, shared, cancel))
        })
        .collect();

    let mixer = Mixer {
        shared,
        tasks,
        done: false,
    };

    let items = stream::unfold(mixer, |mut mixer| async move {
        if mixer.done {
            return None;
        }
        let item = mixer.shared.queue.get().await?;
        if item.is_error() {
            warn!("mixed input failed, cancelling the remaining inputs");
            mixer.stop();
        }
        Some((item, mixer))
    });

    MixStream {
        inner: Box::pin(items),
    }
}

/// Held by a pull-task; the last one to go closes the shared queue, even on unwind.
struct LiveInput<T> {
    index: usize,
    shared: Arc<Shared<T>>,
}

impl<T> Drop for LiveInput<T> {
    fn drop(&mut self) {
        debug!("mix input {} finished", self.index);
        if self.shared.live.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.shared.queue.close();
        }
    }
}

/// Forward every item of one input into the shared queue.
async fn pull<S, T>(index: usize, stream: S, shared: Arc<Shared<T>>, cancel: CancellationToken)
where
    S: Stream<Item = StreamItem<T>>,
{
    let input = LiveInput { index, shared };
    let mut stream = Box::pin(stream);

    while let Some(item) = next_or_cancelled(&mut stream, &cancel).await {
        let failed = item.is_error();
        if input.shared.queue.put(item).await.is_err() || failed {
            break;
        }
    }
}

/// Extension trait providing the `mix_with` operator.
pub trait MixExt<T>: Stream<Item = StreamItem<T>> + Sized
where
    T: Send + 'static,
{
    /// Mix this sequence with `others`.
    ///
    /// All inputs must share one type; box heterogeneous inputs first (for example
    /// with `futures::StreamExt::boxed`).
    ///
    /// See the [module-level documentation](crate::mix) for details.
    fn mix_with<I>(self, others: I) -> MixStream<T>
    where
        Self: Send + 'static,
        I: IntoIterator<Item = Self>;
}

impl<S, T> MixExt<T> for S
where
    S: Stream<Item = StreamItem<T>>,
    T: Send + 'static,
{
    fn mix_with<I>(self, others: I) -> MixStream<T>
    where
        Self: Send + 'static,
        I: IntoIterator<Item = Self>,
    {
        mix(std::iter::once(self).chain(others))
    }
}
