// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use braid_stream::prelude::*;
use braid_stream::mix;
use braid_test_utils::{assert_stream_ended, unwrap_stream};
use futures::StreamExt;

#[tokio::test]
async fn test_async_channel_sources_are_mixed() -> anyhow::Result<()> {
    // Arrange
    let (temperature_tx, temperature_rx) = async_channel::unbounded::<f64>();
    let (humidity_tx, humidity_rx) = async_channel::unbounded::<f64>();
    let mut readings = mix(vec![
        temperature_rx.into_braid_stream().boxed(),
        humidity_rx.into_braid_stream().boxed(),
    ]);

    // Act & Assert
    temperature_tx.send(21.5).await?;
    assert!((unwrap_stream(&mut readings, 500).await - 21.5).abs() < f64::EPSILON);

    humidity_tx.send(0.4).await?;
    assert!((unwrap_stream(&mut readings, 500).await - 0.4).abs() < f64::EPSILON);

    temperature_tx.close();
    humidity_tx.close();
    assert_stream_ended(&mut readings, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_channel_source_filtered_and_split() -> anyhow::Result<()> {
    // Arrange
    let (tx, rx) = async_channel::bounded::<u32>(4);
    let (mut audit, mut alerts) = rx
        .into_braid_stream()
        .filter_with(|reading: &u32| *reading > 100)
        .split_pair();

    // Act
    for reading in [50, 150, 80, 300] {
        tx.send(reading).await?;
    }
    drop(tx);

    // Assert
    assert_eq!(unwrap_stream(&mut audit, 500).await, 150);
    assert_eq!(unwrap_stream(&mut alerts, 500).await, 150);
    assert_eq!(unwrap_stream(&mut audit, 500).await, 300);
    assert_eq!(unwrap_stream(&mut alerts, 500).await, 300);
    assert_stream_ended(&mut audit, 500).await;
    assert_stream_ended(&mut alerts, 500).await;

    Ok(())
}
