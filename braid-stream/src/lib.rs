// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Combinators over async sequences of [`StreamItem`]s.
//!
//! Every operator consumes and yields `Stream<Item = StreamItem<T>>`. Values and errors
//! travel in-band; an error is always the last item a sequence yields.
//!
//! # Operators
//!
//! ## Fan-in and fan-out
//!
//! - **[`mix`]**: merge several inputs into one sequence, in the order items become
//!   available
//! - **[`split`]**: replay one input to several independent branches through a bounded
//!   buffer
//!
//! Both run background tasks and need a runtime feature (`runtime-tokio`, the default,
//! or `runtime-smol`).
//!
//! ## Sequential
//!
//! - **[`chain`]**: exhaust each input before starting the next
//! - **[`filter`]**: keep the items a [`Predicate`](braid_core::Predicate) accepts
//! - **[`map`]**: apply a [`Transform`](braid_core::Transform) to every value
//! - **[`with_cancellation`](CancellableExt::with_cancellation)**: stop on a
//!   [`CancellationToken`](braid_core::CancellationToken)
//!
//! These are plain state machines: nothing runs until the result is polled, and no more
//! than one item is in flight at a time.
//!
//! ## Sources
//!
//! - **[`IntoBraidStream`]**: any `Stream` of plain values
//! - **[`TryIntoBraidStream`]**: any `Stream` of `Result`s
//! - **[`from_iter`]**: any synchronous iterator
//!
//! # Error Handling
//!
//! | Operator | Upstream error | Callable error |
//! |----------|----------------|----------------|
//! | [`mix`] | Yielded, other inputs cancelled, sequence ends | n/a |
//! | [`split`] | Delivered to every branch, each branch ends | n/a |
//! | [`chain`] | Yielded, later inputs never polled | n/a |
//! | [`filter`] | Yielded, sequence ends | `TransformFailure`, sequence ends |
//! | [`map`] | Yielded, sequence ends | `TransformFailure`, sequence ends |
//!
//! # Cancellation
//!
//! Dropping a sequence releases everything it owns. For [`mix`] this cancels every
//! pull-task; for [`split`] the producer stops once the last branch is dropped.
//!
//! # Example
//!
//! ```rust
//! use braid_stream::prelude::*;
//! use braid_stream::from_iter;
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let (evens, odds) = from_iter(0..6).split_pair();
//!
//! let doubled = evens
//!     .filter_with(|x: &i32| x % 2 == 0)
//!     .map_with(|x: i32| x * 2)
//!     .boxed();
//! let odds = odds.filter_with(|x: &i32| x % 2 == 1).boxed();
//!
//! let mut values: Vec<i32> = doubled
//!     .mix_with([odds])
//!     .map(|item| item.unwrap())
//!     .collect()
//!     .await;
//! values.sort();
//! assert_eq!(values, vec![0, 1, 3, 4, 5, 8]);
//! # }
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

#[macro_use]
mod logging;

pub mod cancellable;
pub mod chain;
pub mod filter;
pub mod into_braid_stream;
pub mod map;
#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
pub mod mix;
pub mod prelude;
#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
mod pull;
#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
pub mod split;

// Re-export commonly used types
pub use braid_core::{BraidError, StreamItem};
pub use cancellable::{CancellableExt, CancellableStream};
pub use chain::{chain, ChainExt, ChainStream};
pub use filter::{filter, FilterExt, FilterStream};
pub use into_braid_stream::{
    from_iter, BraidValues, IntoBraidStream, TryBraidValues, TryIntoBraidStream,
};
pub use map::{map, MapExt, MapStream};
#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
pub use mix::{mix, mix_with_capacity, MixExt, MixStream};
#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
pub use split::{
    split, split_pair, SplitExt, SplitOptions, SplitStream, DEFAULT_SPLIT_BRANCHES,
    DEFAULT_SPLIT_BUFFER,
};
