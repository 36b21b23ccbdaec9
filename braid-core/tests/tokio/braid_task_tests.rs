// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use braid_core::BraidTask;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

#[tokio::test]
async fn test_spawned_future_runs() -> anyhow::Result<()> {
    let (tx, rx) = oneshot::channel();

    let _task = BraidTask::spawn(move |_cancel| async move {
        let _ = tx.send(42);
    });

    assert_eq!(tokio::time::timeout(Duration::from_secs(1), rx).await??, 42);
    Ok(())
}

#[tokio::test]
async fn test_drop_signals_cancellation() -> anyhow::Result<()> {
    let stopped = Arc::new(AtomicBool::new(false));
    let (tx, rx) = oneshot::channel();

    let task = BraidTask::spawn({
        let stopped = stopped.clone();
        move |cancel| async move {
            cancel.cancelled().await;
            stopped.store(true, Ordering::SeqCst);
            let _ = tx.send(());
        }
    });

    assert!(!task.is_cancelled());
    drop(task);

    tokio::time::timeout(Duration::from_secs(1), rx).await??;
    assert!(stopped.load(Ordering::SeqCst));
    Ok(())
}

#[tokio::test]
async fn test_explicit_cancel_stops_loop() -> anyhow::Result<()> {
    let ticks = Arc::new(AtomicUsize::new(0));

    let task = BraidTask::spawn({
        let ticks = ticks.clone();
        move |cancel| async move {
            while !cancel.is_cancelled() {
                ticks.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        }
    });

    tokio::time::sleep(Duration::from_millis(30)).await;
    task.cancel();
    assert!(task.is_cancelled());
    assert!(task.token().is_cancelled());

    tokio::time::sleep(Duration::from_millis(20)).await;
    let after_cancel = ticks.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), after_cancel);
    assert!(after_cancel > 0);
    Ok(())
}
