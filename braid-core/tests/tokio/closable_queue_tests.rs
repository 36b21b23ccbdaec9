// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use braid_core::{ClosableQueue, QueueError};
use futures::{pin_mut, poll};
use std::sync::Arc;
use std::task::Poll;
use std::time::Duration;

#[tokio::test]
async fn test_put_then_get() -> anyhow::Result<()> {
    // Arrange
    let queue = ClosableQueue::unbounded();

    // Act
    queue.put(1).await?;

    // Assert
    assert!(!queue.is_empty());
    assert!(!queue.is_full());
    assert_eq!(queue.len(), 1);
    assert!(!queue.is_closed());
    assert_eq!(queue.capacity(), None);

    assert_eq!(queue.get().await, Some(1));
    assert!(queue.is_empty());
    assert_eq!(queue.len(), 0);
    assert!(!queue.is_closed());
    Ok(())
}

#[tokio::test]
async fn test_close_releases_waiting_reader() -> anyhow::Result<()> {
    // Arrange
    let queue = Arc::new(ClosableQueue::<i32>::unbounded());
    let closer = queue.clone();

    // Act
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        closer.close();
    });

    // Assert
    assert_eq!(tokio::time::timeout(Duration::from_secs(1), queue.get()).await?, None);
    assert!(queue.is_empty());
    assert!(queue.is_closed());
    assert!(queue.is_exhausted());
    assert_eq!(queue.get().await, None);
    Ok(())
}

#[tokio::test]
async fn test_close_releases_waiting_writer() -> anyhow::Result<()> {
    // Arrange
    let queue = Arc::new(ClosableQueue::bounded(1));
    queue.put(1).await?;
    assert!(queue.is_full());
    assert_eq!(queue.len(), 1);

    let closer = queue.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        closer.close();
    });

    // Act
    let blocked = tokio::time::timeout(Duration::from_secs(1), queue.put(2)).await?;

    // Assert
    assert_eq!(blocked, Err(QueueError::Closed));
    assert!(queue.is_full());
    assert_eq!(queue.len(), 1);
    assert!(queue.is_closed());
    assert!(!queue.is_exhausted());
    assert_eq!(queue.put(3).await, Err(QueueError::Closed));
    Ok(())
}

#[tokio::test]
async fn test_items_survive_close() -> anyhow::Result<()> {
    // Arrange
    let queue = ClosableQueue::unbounded();
    queue.put(1).await?;
    queue.put(2).await?;

    // Act
    queue.close();

    // Assert
    assert_eq!(queue.len(), 2);
    assert!(queue.is_closed());
    assert_eq!(queue.get().await, Some(1));
    assert_eq!(queue.get().await, Some(2));
    assert_eq!(queue.get().await, None);
    Ok(())
}

#[tokio::test]
async fn test_full_queue_blocks_put_until_get() -> anyhow::Result<()> {
    // Arrange
    let queue = ClosableQueue::bounded(1);
    queue.put('a').await?;

    let pending_put = queue.put('b');
    pin_mut!(pending_put);

    // Act & Assert
    assert!(poll!(pending_put.as_mut()).is_pending());

    assert_eq!(queue.get().await, Some('a'));
    assert_eq!(poll!(pending_put.as_mut()), Poll::Ready(Ok(())));
    assert_eq!(queue.get().await, Some('b'));
    Ok(())
}

#[tokio::test]
async fn test_try_put() -> anyhow::Result<()> {
    // Arrange
    let queue = ClosableQueue::bounded(2);

    // Act & Assert
    queue.try_put(1)?;
    queue.try_put(2)?;
    assert_eq!(queue.try_put(3), Err(QueueError::Full));

    queue.close();
    assert_eq!(queue.try_put(4), Err(QueueError::Closed));
    assert_eq!(queue.capacity(), Some(2));
    Ok(())
}

#[tokio::test]
async fn test_zero_capacity_is_clamped() -> anyhow::Result<()> {
    let queue = ClosableQueue::bounded(0);
    assert_eq!(queue.capacity(), Some(1));

    queue.put(()).await?;
    assert!(queue.is_full());
    Ok(())
}

#[tokio::test]
async fn test_fifo_order_across_tasks() -> anyhow::Result<()> {
    // Arrange
    let queue = Arc::new(ClosableQueue::bounded(2));
    let producer = queue.clone();

    // Act
    let handle = tokio::spawn(async move {
        for i in 0..50 {
            producer.put(i).await?;
        }
        producer.close();
        Ok::<_, QueueError>(())
    });

    let mut received = Vec::new();
    while let Some(item) = queue.get().await {
        received.push(item);
    }

    // Assert
    handle.await??;
    assert_eq!(received, (0..50).collect::<Vec<_>>());
    Ok(())
}
