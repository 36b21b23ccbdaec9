// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Async buffers shared between background pull-tasks and the sequences they feed.
//!
//! - [`ClosableQueue`]: bounded FIFO with an explicit end. The mixer funnels every
//!   input through one.
//! - [`MultiConsumerQueue`]: bounded buffer read independently by several consumers,
//!   each through its own cursor. The splitter replays its input through one.
//!
//! Both queues guard their state with a short, non-suspending critical section and
//! wake waiters through `event_listener`; woken waiters always re-check the state.

mod closable_queue;
mod multi_consumer_queue;
mod queue_error;

pub use closable_queue::ClosableQueue;
pub use multi_consumer_queue::{Consumer, ConsumerKey, MultiConsumerQueue};
pub use queue_error::QueueError;
