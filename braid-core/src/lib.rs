// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core types for the braid stream combinators.
//!
//! Everything the combinators in `braid-stream` share lives here:
//!
//! - [`StreamItem`] and [`BraidError`]: the in-band item type and its error taxonomy
//! - [`Transform`] and [`Predicate`]: capabilities over synchronous and suspending callables
//! - [`ClosableQueue`] and [`MultiConsumerQueue`]: the buffers behind `mix` and `split`
//! - [`CancellationToken`] and [`BraidTask`]: runtime-agnostic background work

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

#[macro_use]
mod logging;

pub mod braid_task;
pub mod cancellation_token;
pub mod error;
pub mod queue;
pub mod stream_item;
pub mod transform;

#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
pub use self::braid_task::BraidTask;
pub use self::cancellation_token::{CancellationToken, Cancelled, CancelledOwned};
pub use self::error::{BraidError, IntoBraidError, Result, ResultExt};
pub use self::queue::{ClosableQueue, Consumer, ConsumerKey, MultiConsumerQueue, QueueError};
pub use self::stream_item::StreamItem;
pub use self::transform::{
    fallible, fallible_suspending, suspending, truthy, Fallible, FallibleSuspending, Predicate,
    Suspending, Transform, Truthy, TruthyPredicate,
};
