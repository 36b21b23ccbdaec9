// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Runtime-agnostic cancellation token.
//!
//! Pull-tasks spawned by `mix` and `split` race every upstream pull against
//! [`CancellationToken::cancelled`], so dropping a combinator's output stops them at
//! their next suspension point regardless of the runtime in use.

use event_listener::{Event, EventListener};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

/// Cloneable handle to a shared cancellation flag.
///
/// When `cancel()` is called on any clone, every waiter on `cancelled()` is woken.
///
/// # Example
///
/// ```
/// use braid_core::CancellationToken;
///
/// let token = CancellationToken::new();
/// let observer = token.clone();
///
/// token.cancel();
/// assert!(observer.is_cancelled());
/// ```
#[derive(Clone, Debug)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    cancelled: AtomicBool,
    event: Event,
}

impl CancellationToken {
    /// Create a new, not yet cancelled, token.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                event: Event::new(),
            }),
        }
    }

    /// Cancel the token, waking all listeners.
    ///
    /// Idempotent.
    pub fn cancel(&self) {
        // Flag first so woken waiters observe it
        self.inner.cancelled.store(true, Ordering::Release);
        self.inner.event.notify(usize::MAX);
    }

    /// Check if the token has been cancelled (non-blocking).
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Wait asynchronously until the token is cancelled.
    ///
    /// Resolves immediately if the token is already cancelled.
    pub fn cancelled(&self) -> Cancelled<'_> {
        Cancelled {
            token: self,
            listener: None,
        }
    }

    /// Like [`cancelled`](Self::cancelled), but the future owns a clone of the token.
    ///
    /// Streams that hold the wait across polls store this one.
    pub fn cancelled_owned(&self) -> CancelledOwned {
        CancelledOwned {
            token: self.clone(),
            listener: None,
        }
    }

    fn poll_cancelled(
        &self,
        listener: &mut Option<EventListener>,
        cx: &mut Context<'_>,
    ) -> Poll<()> {
        loop {
            if self.is_cancelled() {
                return Poll::Ready(());
            }

            match listener.as_mut() {
                Some(waiting) => match Pin::new(waiting).poll(cx) {
                    // Woken: loop back and re-check the flag
                    Poll::Ready(()) => *listener = None,
                    Poll::Pending => return Poll::Pending,
                },
                None => {
                    // Register first, then the loop re-checks the flag before waiting
                    *listener = Some(self.inner.event.listen());
                }
            }
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Future returned by [`CancellationToken::cancelled()`].
pub struct Cancelled<'a> {
    token: &'a CancellationToken,
    listener: Option<EventListener>,
}

impl Future for Cancelled<'_> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        this.token.poll_cancelled(&mut this.listener, cx)
    }
}

/// Future returned by [`CancellationToken::cancelled_owned()`].
pub struct CancelledOwned {
    token: CancellationToken,
    listener: Option<EventListener>,
}

impl Future for CancelledOwned {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        this.token.poll_cancelled(&mut this.listener, cx)
    }
}
