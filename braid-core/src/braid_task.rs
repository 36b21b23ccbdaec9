// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Runtime-agnostic task spawning with cooperative cancellation.

use crate::CancellationToken;
use std::future::Future;

/// Handle to a background task that is cancelled when dropped.
///
/// `BraidTask` spawns a future on the configured runtime and hands it a
/// [`CancellationToken`]. The future is expected to race its suspension points against
/// [`CancellationToken::cancelled`]; dropping the handle (or calling [`cancel`](Self::cancel))
/// signals the token.
///
/// # Runtime Support
///
/// - **Tokio**: `tokio::spawn` (default, `runtime-tokio`)
/// - **smol**: `smol::spawn` (`runtime-smol`)
///
/// # Example
///
/// ```rust
/// use braid_core::BraidTask;
///
/// # #[tokio::main]
/// # async fn main() {
/// let task = BraidTask::spawn(|cancel| async move {
///     cancel.cancelled().await;
/// });
///
/// assert!(!task.is_cancelled());
/// drop(task);
/// # }
/// ```
#[derive(Debug)]
pub struct BraidTask {
    cancel: CancellationToken,
}

impl BraidTask {
    /// Spawn a background task with cancellation support.
    ///
    /// The closure receives the token that is signalled when this handle is dropped.
    ///
    /// # Panics
    ///
    /// With `runtime-tokio`, panics when called outside of a Tokio runtime.
    pub fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let future = f(cancel.clone());

        #[cfg(feature = "runtime-tokio")]
        {
            drop(tokio::spawn(future));
        }

        #[cfg(all(feature = "runtime-smol", not(feature = "runtime-tokio")))]
        {
            smol::spawn(future).detach();
        }

        Self { cancel }
    }

    /// Signal the task to stop at its next cancellation checkpoint.
    ///
    /// Does not wait for the task to finish.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns `true` once `cancel()` was called or the handle was dropped.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// A clone of the token handed to the spawned future.
    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Drop for BraidTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
