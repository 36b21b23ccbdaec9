// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use braid_core::{MultiConsumerQueue, QueueError};
use futures::{pin_mut, poll};
use std::sync::Arc;
use std::task::Poll;
use std::time::Duration;

#[tokio::test]
async fn test_items_are_evicted_once_every_consumer_read_them() -> anyhow::Result<()> {
    // Arrange
    let queue = MultiConsumerQueue::default();
    assert_eq!(queue.capacity(), 1);
    assert_eq!(queue.len(), 0);
    assert!(!queue.is_full());

    // Act & Assert
    queue.put(1).await?;
    assert_eq!(queue.len(), 1);
    assert!(queue.is_full());

    let first = queue.register();
    assert_eq!(queue.pending(first)?, 1);
    assert_eq!(queue.get(first).await?, Some(1));
    assert_eq!(queue.len(), 0);
    assert!(!queue.is_full());

    let second = queue.register();
    assert_eq!(queue.pending(second)?, 0);

    queue.put(2).await?;
    assert_eq!(queue.get(second).await?, Some(2));
    assert_eq!(queue.len(), 1);
    assert!(queue.is_full());
    assert_eq!(queue.pending(second)?, 0);
    assert_eq!(queue.pending(first)?, 1);

    assert_eq!(queue.get(first).await?, Some(2));
    assert_eq!(queue.len(), 0);
    assert!(!queue.is_full());
    assert_eq!(queue.pending(second)?, 0);
    assert_eq!(queue.pending(first)?, 0);

    queue.put(3).await?;
    assert_eq!(queue.get(first).await?, Some(3));
    queue.unregister(second)?;
    assert_eq!(queue.len(), 0);
    assert!(!queue.is_full());
    Ok(())
}

#[tokio::test]
async fn test_put_waits_for_the_slowest_consumer() -> anyhow::Result<()> {
    // Arrange
    let queue = MultiConsumerQueue::new(1);
    queue.put(1).await?;
    assert!(queue.is_full());

    let pending_put = queue.put(2);
    pin_mut!(pending_put);
    assert!(poll!(pending_put.as_mut()).is_pending());

    // Registering alone frees nothing
    let key = queue.register();
    assert!(poll!(pending_put.as_mut()).is_pending());

    // Act
    assert_eq!(queue.get(key).await?, Some(1));

    // Assert
    assert_eq!(poll!(pending_put.as_mut()), Poll::Ready(Ok(())));
    assert!(queue.is_full());
    Ok(())
}

#[tokio::test]
async fn test_unregistering_the_only_consumer_keeps_items() -> anyhow::Result<()> {
    // Arrange
    let queue = MultiConsumerQueue::new(1);
    queue.put(1).await?;
    let key = queue.register();

    // Act
    queue.unregister(key)?;

    // Assert
    assert!(queue.is_full());
    let pending_put = queue.put(2);
    pin_mut!(pending_put);
    assert!(poll!(pending_put.as_mut()).is_pending());
    Ok(())
}

#[tokio::test]
async fn test_unregistering_a_slow_consumer_frees_space() -> anyhow::Result<()> {
    // Arrange
    let queue = MultiConsumerQueue::new(1);
    let fast = queue.register();
    let slow = queue.register();
    queue.put('a').await?;
    assert_eq!(queue.get(fast).await?, Some('a'));
    assert!(queue.is_full());

    // Act
    queue.unregister(slow)?;

    // Assert
    assert!(queue.is_empty());
    queue.put('b').await?;
    assert_eq!(queue.get(fast).await?, Some('b'));
    Ok(())
}

#[tokio::test]
async fn test_get_waits_for_put() -> anyhow::Result<()> {
    // Arrange
    let queue = Arc::new(MultiConsumerQueue::default());
    let key = queue.register();
    let producer = queue.clone();

    // Act
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        let _ = producer.put(1).await;
    });

    // Assert
    let item = tokio::time::timeout(Duration::from_secs(1), queue.get(key)).await??;
    assert_eq!(item, Some(1));
    Ok(())
}

#[tokio::test]
async fn test_register_unregister() {
    let queue = MultiConsumerQueue::<i32>::default();
    let key = queue.register();
    assert_eq!(queue.pending(key), Ok(0));
    assert_eq!(queue.consumer_count(), 1);

    assert_eq!(queue.unregister(key), Ok(()));
    assert_eq!(queue.consumer_count(), 0);
    assert_eq!(queue.pending(key), Err(QueueError::UnknownConsumer));
    assert_eq!(queue.unregister(key), Err(QueueError::UnknownConsumer));
    assert_eq!(queue.get(key).await, Err(QueueError::UnknownConsumer));
}

#[tokio::test]
async fn test_close_drains_then_ends_each_consumer() -> anyhow::Result<()> {
    // Arrange
    let queue = MultiConsumerQueue::new(2);
    let first = queue.register();
    let second = queue.register();
    queue.put(1).await?;
    queue.put(2).await?;

    // Act
    queue.close();

    // Assert
    assert_eq!(queue.put(3).await, Err(QueueError::Closed));
    assert_eq!(queue.get(first).await?, Some(1));
    assert_eq!(queue.get(first).await?, Some(2));
    assert_eq!(queue.get(first).await?, None);
    assert_eq!(queue.get(second).await?, Some(1));
    assert_eq!(queue.get(second).await?, Some(2));
    assert_eq!(queue.get(second).await?, None);
    assert!(queue.is_closed());
    Ok(())
}

#[tokio::test]
async fn test_close_releases_blocked_put() -> anyhow::Result<()> {
    // Arrange
    let queue = Arc::new(MultiConsumerQueue::new(1));
    queue.put(1).await?;
    let closer = queue.clone();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        closer.close();
    });

    // Act
    let result = tokio::time::timeout(Duration::from_secs(1), queue.put(2)).await?;

    // Assert
    assert_eq!(result, Err(QueueError::Closed));
    Ok(())
}

#[tokio::test]
async fn test_consumer_handle_unregisters_on_drop() -> anyhow::Result<()> {
    // Arrange
    let queue = Arc::new(MultiConsumerQueue::new(1));
    let reader = queue.consumer();
    let lagging = queue.consumer();
    assert_eq!(queue.consumer_count(), 2);

    queue.put(10).await?;
    assert_eq!(reader.get().await, Some(10));
    assert_eq!(lagging.pending(), 1);
    assert!(queue.is_full());

    // Act
    drop(lagging);

    // Assert
    assert_eq!(queue.consumer_count(), 1);
    assert!(queue.is_empty());

    queue.close();
    assert_eq!(reader.get().await, None);
    Ok(())
}

#[tokio::test]
async fn test_consumer_unregistered_elsewhere_reads_as_exhausted() -> anyhow::Result<()> {
    // Arrange
    let queue = Arc::new(MultiConsumerQueue::new(2));
    let reader = queue.consumer();
    queue.put(7).await?;

    // Act
    queue.unregister(reader.key())?;
    let result = tokio::time::timeout(Duration::from_secs(1), reader.get()).await?;

    // Assert
    assert_eq!(result, None);
    assert_eq!(queue.consumer_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_consumers_read_at_their_own_pace() -> anyhow::Result<()> {
    // Arrange
    let queue = Arc::new(MultiConsumerQueue::new(3));
    let fast = queue.consumer();
    let slow = queue.consumer();
    let producer = queue.clone();

    let handle = tokio::spawn(async move {
        for i in 0..20 {
            producer.put(i).await?;
        }
        producer.close();
        Ok::<_, QueueError>(())
    });

    // Act
    let fast_reader = tokio::spawn(async move {
        let mut items = Vec::new();
        while let Some(item) = fast.get().await {
            items.push(item);
        }
        items
    });

    let mut slow_items = Vec::new();
    while let Some(item) = slow.get().await {
        tokio::time::sleep(Duration::from_millis(1)).await;
        slow_items.push(item);
    }

    // Assert
    handle.await??;
    let expected: Vec<i32> = (0..20).collect();
    assert_eq!(fast_reader.await?, expected);
    assert_eq!(slow_items, expected);
    Ok(())
}
