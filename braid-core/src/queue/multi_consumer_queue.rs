// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::QueueError;
use event_listener::Event;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Opaque registration key returned by [`MultiConsumerQueue::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConsumerKey(u64);

/// A bounded buffer read independently by several consumers.
///
/// Every stored item carries an implicit, monotonically increasing sequence number;
/// each registered consumer owns a cursor into that sequence. An item is evicted only
/// once every registered consumer has read it, and [`put`](Self::put) waits while the
/// buffer holds `capacity` items the slowest consumer has not read yet.
///
/// A consumer registered late starts at the oldest item still buffered. With no
/// consumers registered nothing is evicted.
///
/// # Example
///
/// ```
/// use braid_core::MultiConsumerQueue;
/// use futures::executor::block_on;
///
/// let queue = MultiConsumerQueue::new(2);
/// let fast = queue.register();
/// let slow = queue.register();
///
/// block_on(async {
///     queue.put('a').await.unwrap();
///     assert_eq!(queue.get(fast).await, Ok(Some('a')));
///     assert_eq!(queue.len(), 1); // `slow` has not read it yet
///
///     assert_eq!(queue.get(slow).await, Ok(Some('a')));
///     assert_eq!(queue.len(), 0);
/// });
/// ```
#[derive(Debug)]
pub struct MultiConsumerQueue<T> {
    state: Mutex<State<T>>,
    capacity: usize,
    item_added: Event,
    space_freed: Event,
}

#[derive(Debug)]
struct State<T> {
    items: VecDeque<T>,
    /// Sequence number of `items[0]`
    base: u64,
    cursors: HashMap<ConsumerKey, u64>,
    next_key: u64,
    closed: bool,
}

impl<T> State<T> {
    /// Drop every item all consumers have read. Returns `true` if anything was evicted.
    fn evict(&mut self) -> bool {
        let Some(slowest) = self.cursors.values().copied().min() else {
            return false;
        };

        let mut evicted = false;
        while self.base < slowest && self.items.pop_front().is_some() {
            self.base += 1;
            evicted = true;
        }
        evicted
    }

    fn unread(&self, cursor: u64) -> usize {
        let read = usize::try_from(cursor - self.base).unwrap_or(usize::MAX);
        self.items.len().saturating_sub(read)
    }
}

impl<T> MultiConsumerQueue<T> {
    /// Create a queue buffering at most `capacity` unread items (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(State {
                items: VecDeque::new(),
                base: 0,
                cursors: HashMap::new(),
                next_key: 0,
                closed: false,
            }),
            capacity: capacity.max(1),
            item_added: Event::new(),
            space_freed: Event::new(),
        }
    }

    /// Register a new consumer, positioned at the oldest buffered item.
    pub fn register(&self) -> ConsumerKey {
        let mut state = self.state.lock();
        let key = ConsumerKey(state.next_key);
        state.next_key += 1;
        let base = state.base;
        state.cursors.insert(key, base);
        key
    }

    /// Remove a consumer. Items only it was holding back are evicted.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::UnknownConsumer`] if `key` is not registered.
    pub fn unregister(&self, key: ConsumerKey) -> Result<(), QueueError> {
        let mut state = self.state.lock();
        if state.cursors.remove(&key).is_none() {
            warn!("unregister of unknown consumer {:?}", key);
            return Err(QueueError::UnknownConsumer);
        }
        let evicted = state.evict();
        drop(state);

        if evicted {
            self.space_freed.notify(usize::MAX);
        }
        Ok(())
    }

    /// Append an item, waiting while the buffer is full.
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
                if state.items.len() < self.capacity {
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

    /// Mark the queue closed and wake every waiter.
    ///
    /// Consumers still read what is buffered, then observe the end. Idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        drop(state);

        debug!("multi-consumer queue closed");
        self.item_added.notify(usize::MAX);
        self.space_freed.notify(usize::MAX);
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Number of buffered items, i.e. items not yet read by every consumer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    /// Returns `true` when `put` would wait.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.state.lock().items.len() >= self.capacity
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of buffered items `key` has not read yet.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::UnknownConsumer`] if `key` is not registered.
    pub fn pending(&self, key: ConsumerKey) -> Result<usize, QueueError> {
        let state = self.state.lock();
        let cursor = *state
            .cursors
            .get(&key)
            .ok_or(QueueError::UnknownConsumer)?;
        Ok(state.unread(cursor))
    }

    /// Number of registered consumers.
    #[must_use]
    pub fn consumer_count(&self) -> usize {
        self.state.lock().cursors.len()
    }
}

impl<T: Clone> MultiConsumerQueue<T> {
    /// Read the next item for `key`, waiting while it has nothing unread.
    ///
    /// Returns `Ok(None)` once the queue is closed and `key` has read everything.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::UnknownConsumer`] if `key` is not registered.
    pub async fn get(&self, key: ConsumerKey) -> Result<Option<T>, QueueError> {
        loop {
            let listener = {
                let mut state = self.state.lock();
                let cursor = *state
                    .cursors
                    .get(&key)
                    .ok_or(QueueError::UnknownConsumer)?;

                let index = usize::try_from(cursor - state.base).unwrap_or(usize::MAX);
                if let Some(item) = state.items.get(index).cloned() {
                    state.cursors.insert(key, cursor + 1);
                    let evicted = state.evict();
                    drop(state);

                    if evicted {
                        self.space_freed.notify(usize::MAX);
                    }
                    return Ok(Some(item));
                }
                if state.closed {
                    return Ok(None);
                }
                self.item_added.listen()
            };
            listener.await;
        }
    }

    /// Register a consumer and wrap it in a handle that unregisters on drop.
    #[must_use]
    pub fn consumer(self: &Arc<Self>) -> Consumer<T> {
        Consumer {
            key: self.register(),
            queue: Arc::clone(self),
        }
    }
}

impl<T> Default for MultiConsumerQueue<T> {
    fn default() -> Self {
        Self::new(1)
    }
}

/// A registered reader of a [`MultiConsumerQueue`].
///
/// Dropping the handle unregisters it, releasing every item only it was holding back.
#[derive(Debug)]
pub struct Consumer<T> {
    queue: Arc<MultiConsumerQueue<T>>,
    key: ConsumerKey,
}

impl<T> Consumer<T> {
    #[must_use]
    pub const fn key(&self) -> ConsumerKey {
        self.key
    }

    /// Number of buffered items this consumer has not read yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.pending(self.key).unwrap_or(0)
    }
}

impl<T: Clone> Consumer<T> {
    /// Read the next item, or `None` once the queue is closed and drained.
    ///
    /// A consumer unregistered behind its back also reads as exhausted.
    pub async fn get(&self) -> Option<T> {
        match self.queue.get(self.key).await {
            Ok(item) => item,
            Err(error) => {
                warn!("consumer {:?} cannot read: {}", self.key, error);
                None
            }
        }
    }
}

impl<T> Drop for Consumer<T> {
    fn drop(&mut self) {
        let _ = self.queue.unregister(self.key);
    }
}
