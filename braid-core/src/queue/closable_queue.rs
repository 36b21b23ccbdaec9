// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::QueueError;
use event_listener::Event;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// A FIFO async queue that can be closed.
///
/// Closing is the queue's end-of-stream signal:
///
/// - readers drain the remaining items, then [`get`](Self::get) returns `None`;
/// - [`put`](Self::put) on a closed queue fails with [`QueueError::Closed`], including
///   writers that were already waiting for space when the queue closed.
///
/// # Example
///
/// ```
/// use braid_core::ClosableQueue;
/// use futures::executor::block_on;
///
/// let queue = ClosableQueue::bounded(2);
/// block_on(async {
///     queue.put(1).await.unwrap();
///     queue.put(2).await.unwrap();
///     queue.close();
///
///     assert_eq!(queue.get().await, Some(1));
///     assert_eq!(queue.get().await, Some(2));
///     assert_eq!(queue.get().await, None);
/// });
/// ```
#[derive(Debug)]
pub struct ClosableQueue<T> {
    state: Mutex<State<T>>,
    capacity: Option<usize>,
    item_added: Event,
    space_freed: Event,
}

#[derive(Debug)]
struct State<T> {
    items: VecDeque<T>,
    closed: bool,
}

impl<T> ClosableQueue<T> {
    /// Create a queue holding at most `capacity` items (at least one).
    #[must_use]
    pub fn bounded(capacity: usize) -> Self {
        Self::with_capacity(Some(capacity.max(1)))
    }

    /// Create a queue without a size limit; `put` never waits.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::with_capacity(None)
    }

    fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            state: Mutex::new(State {
                items: VecDeque::new(),
                closed: false,
            }),
            capacity,
            item_added: Event::new(),
            space_freed: Event::new(),
        }
    }

    /// Append an item, waiting while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Closed`] if the queue is closed before the item is accepted.
    pub async fn put(&self, item: T) -> Result<(), QueueError> {
        loop {
            let listener = {
                let mut state = self.state.lock();
                if state.closed {
                    return Err(QueueError::Closed);
                }
                if !self.is_full_locked(&state) {
                    state.items.push_back(item);
                    drop(state);
                    self.item_added.notify(usize::MAX);
                    return Ok(());
                }
                self.space_freed.listen()
            };
            listener.await;
        }
    }

    /// Append an item without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Closed`] on a closed queue and [`QueueError::Full`] when no
    /// space is available.
    pub fn try_put(&self, item: T) -> Result<(), QueueError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(QueueError::Closed);
        }
        if self.is_full_locked(&state) {
            return Err(QueueError::Full);
        }
        state.items.push_back(item);
        drop(state);
        self.item_added.notify(usize::MAX);
        Ok(())
    }

    /// Remove the oldest item, waiting while the queue is empty and open.
    ///
    /// Returns `None` once the queue is closed and drained.
    pub async fn get(&self) -> Option<T> {
        loop {
            let listener = {
                let mut state = self.state.lock();
                if let Some(item) = state.items.pop_front() {
                    drop(state);
                    self.space_freed.notify(usize::MAX);
                    return Some(item);
                }
                if state.closed {
                    return None;
                }
                self.item_added.listen()
            };
            listener.await;
        }
    }

    /// Mark the queue closed and wake every waiting reader and writer.
    ///
    /// Idempotent. Items already queued stay readable.
    pub fn close(&self) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        let remaining = state.items.len();
        drop(state);

        debug!("closable queue closed with {} item(s) left", remaining);
        self.item_added.notify(usize::MAX);
        self.space_freed.notify(usize::MAX);
    }

    /// Returns `true` once [`close`](Self::close) was called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Returns `true` when the queue is closed and no items remain.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        let state = self.state.lock();
        state.closed && state.items.is_empty()
    }

    /// Number of queued items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    /// Returns `true` when a bounded queue holds `capacity` items.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.is_full_locked(&self.state.lock())
    }

    /// The size limit, or `None` for an unbounded queue.
    #[must_use]
    pub const fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    fn is_full_locked(&self, state: &State<T>) -> bool {
        self.capacity
            .is_some_and(|capacity| state.items.len() >= capacity)
    }
}

impl<T> Default for ClosableQueue<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}
