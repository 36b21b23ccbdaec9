// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Prelude module re-exporting every operator trait.
//!
//! ```rust
//! use braid_stream::prelude::*;
//! ```
//!
//! # Contents
//!
//! - [`CancellableExt`] - Stop a sequence through a cancellation token
//! - [`ChainExt`] - Concatenate sequences
//! - [`FilterExt`] - Keep items matching a predicate
//! - [`IntoBraidStream`] / [`TryIntoBraidStream`] - Lift plain streams into braid sequences
//! - [`MapExt`] - Transform every value
//! - `MixExt` - Merge sequences in emission order (runtime feature required)
//! - `SplitExt` - Replay a sequence to several branches (runtime feature required)

pub use crate::cancellable::CancellableExt;
pub use crate::chain::ChainExt;
pub use crate::filter::FilterExt;
pub use crate::into_braid_stream::{IntoBraidStream, TryIntoBraidStream};
pub use crate::map::MapExt;
#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
pub use crate::mix::MixExt;
#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
pub use crate::split::{SplitExt, SplitOptions};
pub use braid_core::{fallible, fallible_suspending, suspending, truthy, StreamItem};
