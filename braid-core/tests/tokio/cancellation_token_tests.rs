// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use braid_core::CancellationToken;
use futures::FutureExt;
use std::time::Duration;

#[test]
fn test_new_token_not_cancelled() {
    let token = CancellationToken::new();
    assert!(!token.is_cancelled());
}

#[test]
fn test_cancel_is_idempotent_and_shared_by_clones() {
    let token = CancellationToken::default();
    let observer = token.clone();

    token.cancel();
    token.cancel();

    assert!(observer.is_cancelled());
}

#[test]
fn test_cancelled_is_pending_until_cancel() {
    let token = CancellationToken::new();
    assert!(token.cancelled().now_or_never().is_none());

    token.cancel();
    assert!(token.cancelled().now_or_never().is_some());
}

#[tokio::test]
async fn test_cancelled_wakes_waiting_task() -> anyhow::Result<()> {
    let token = CancellationToken::new();
    let waiter = token.clone();

    let handle = tokio::spawn(async move {
        waiter.cancelled().await;
        true
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    token.cancel();

    assert!(tokio::time::timeout(Duration::from_secs(1), handle).await??);
    Ok(())
}

#[tokio::test]
async fn test_cancel_wakes_every_waiter() -> anyhow::Result<()> {
    let token = CancellationToken::new();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let waiter = token.clone();
            tokio::spawn(async move { waiter.cancelled().await })
        })
        .collect();

    tokio::time::sleep(Duration::from_millis(10)).await;
    token.cancel();

    for handle in handles {
        tokio::time::timeout(Duration::from_secs(1), handle).await??;
    }
    Ok(())
}

#[tokio::test]
async fn test_cancelled_owned_outlives_the_borrow() -> anyhow::Result<()> {
    let token = CancellationToken::new();
    let wait = token.cancelled_owned();
    let handle = tokio::spawn(wait);

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!handle.is_finished());
    token.cancel();

    tokio::time::timeout(Duration::from_secs(1), handle).await??;
    Ok(())
}
