// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Async stream combinators.
//!
//! `braid` merges, replays, concatenates, filters and transforms asynchronous
//! sequences. Every sequence is a `futures::Stream` of [`StreamItem`]s: values and
//! errors travel in-band, and an error is always the last item a sequence yields.
//!
//! | Operator | Shape | Order |
//! |----------|-------|-------|
//! | [`mix`] | many to one | emission order, each input's order preserved |
//! | [`split`] | one to many | input order on every branch |
//! | [`chain`] | many to one | input after input |
//! | [`filter`] | one to one | input order |
//! | [`map`] | one to one | input order |
//!
//! # Quick Start
//!
//! ```rust
//! use braid::prelude::*;
//! use futures::StreamExt;
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let ticks = futures::stream::iter(1..=3).into_braid_stream().boxed();
//! let words = braid::from_iter(vec![10, 20]).boxed();
//!
//! let mut total = 0;
//! let mut mixed = Box::pin(
//!     ticks
//!         .mix_with([words])
//!         .filter_with(|x: &i32| *x != 2)
//!         .map_with_async(|x: i32| async move {
//!             tokio::time::sleep(Duration::from_millis(1)).await;
//!             x * 100
//!         }),
//! );
//! while let Some(item) = mixed.next().await {
//!     total += item.unwrap();
//! }
//! assert_eq!(total, 3_400);
//! # }
//! ```
//!
//! # Features
//!
//! - `runtime-tokio` (default): background tasks for [`mix`] and [`split`] run on tokio
//! - `runtime-smol`: run them on smol instead
//! - `tracing`: emit lifecycle events through `tracing`

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

// Re-export core types
pub use braid_core::{
    fallible, fallible_suspending, suspending, truthy, BraidError, CancellationToken,
    ClosableQueue, Consumer, ConsumerKey, Fallible, FallibleSuspending, IntoBraidError,
    MultiConsumerQueue, Predicate, QueueError, Result, ResultExt, StreamItem, Suspending,
    Transform, Truthy, TruthyPredicate,
};

#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
pub use braid_core::BraidTask;

// Re-export the operators
pub use braid_stream::{
    chain, filter, from_iter, map, CancellableExt, CancellableStream, ChainExt, ChainStream,
    FilterExt, FilterStream, IntoBraidStream, MapExt, MapStream, TryIntoBraidStream,
};

#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
pub use braid_stream::{
    mix, mix_with_capacity, split, split_pair, MixExt, MixStream, SplitExt, SplitOptions,
    SplitStream,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use braid_core::{
        fallible, fallible_suspending, suspending, truthy, BraidError, CancellationToken,
        StreamItem,
    };
    pub use braid_stream::prelude::*;
}
