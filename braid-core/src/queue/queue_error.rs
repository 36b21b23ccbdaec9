// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt;

/// Errors raised by queue operations.
///
/// These are buffer-level failures, distinct from the [`BraidError`](crate::BraidError)s
/// that travel through sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// The queue has been closed and cannot accept new items.
    Closed,
    /// The queue is at capacity and the caller asked not to wait.
    Full,
    /// The consumer key is not (or no longer) registered.
    UnknownConsumer,
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "Queue is closed"),
            Self::Full => write!(f, "Queue is full"),
            Self::UnknownConsumer => write!(f, "Consumer is not registered"),
        }
    }
}

impl std::error::Error for QueueError {}
