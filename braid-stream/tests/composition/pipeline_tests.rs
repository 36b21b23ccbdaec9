// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use braid_core::{suspending, truthy};
use braid_stream::prelude::*;
use braid_stream::{chain, filter, from_iter, map, mix, split, SplitOptions};
use braid_test_utils::{collect_values, error_stream, simple_stream};
use futures::StreamExt;
use std::time::Duration;

#[tokio::test]
async fn test_split_transform_and_mix_back() -> anyhow::Result<()> {
    // Arrange
    let (evens, odds) = from_iter(0..6).split_pair();

    // Act
    let doubled = evens
        .filter_with(|x: &i32| x % 2 == 0)
        .map_with(|x: i32| x * 2)
        .boxed();
    let odds = odds.filter_with(|x: &i32| x % 2 == 1).boxed();
    let (mut values, error) = collect_values(doubled.mix_with([odds])).await;

    // Assert
    assert!(error.is_none());
    values.sort_unstable();
    assert_eq!(values, vec![0, 1, 3, 4, 5, 8]);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_chain_of_mixes_keeps_groups_apart() -> anyhow::Result<()> {
    // Arrange
    let first_group = mix(vec![
        simple_stream("ab".chars(), Duration::from_millis(30)),
        simple_stream("cd".chars(), Duration::from_millis(40)),
    ]);
    let second_group = mix(vec![
        simple_stream("ef".chars(), Duration::from_millis(5)),
        simple_stream("gh".chars(), Duration::from_millis(7)),
    ]);

    // Act
    let (letters, _) = collect_values(first_group.chain_with([second_group])).await;
    let (first, second) = letters.split_at(4);
    let mut second = second.to_vec();
    second.sort_unstable();

    // Assert
    assert_eq!(first.iter().collect::<String>(), "acbd");
    assert_eq!(second.into_iter().collect::<String>(), "efgh");

    Ok(())
}

#[tokio::test]
async fn test_every_branch_feeds_its_own_pipeline() -> anyhow::Result<()> {
    // Arrange
    let options = SplitOptions::default().with_branches(3).with_buffer_size(4);
    let mut branches = split(from_iter(0..10_i64), options)?.into_iter();
    let (Some(first), Some(second), Some(third)) =
        (branches.next(), branches.next(), branches.next())
    else {
        anyhow::bail!("expected three branches");
    };

    // Act
    let truthy_only = filter(truthy(), first);
    let negated = map(|x: i64| -x, second);
    let delayed = map(
        suspending(|x: i64| async move {
            tokio::task::yield_now().await;
            x + 100
        }),
        third,
    );
    let ((truthy_values, _), (negated, _), (delayed, _)) = futures::join!(
        collect_values(truthy_only),
        collect_values(negated),
        collect_values(delayed)
    );

    // Assert
    assert_eq!(truthy_values, (1..10).collect::<Vec<_>>());
    assert_eq!(negated, (0..10).map(|x| -x).collect::<Vec<_>>());
    assert_eq!(delayed, (100..110).collect::<Vec<_>>());

    Ok(())
}

#[tokio::test]
async fn test_error_travels_through_a_whole_pipeline() -> anyhow::Result<()> {
    // Arrange
    // The chain drains the left branch first, so the buffer must hold the whole input
    let options = SplitOptions::default().with_buffer_size(8);
    let mut branches = error_stream(vec![1, 2, 3], "sensor offline").split_into(options)?;
    let (Some(right), Some(left)) = (branches.pop(), branches.pop()) else {
        anyhow::bail!("expected two branches");
    };

    // Act
    let left = left.map_with(|x: i32| x * 10).boxed();
    let right = right.filter_with(|x: &i32| *x > 1).boxed();
    let (values, error) = collect_values(chain(vec![left, right])).await;

    // Assert
    assert_eq!(values, vec![10, 20, 30]);
    let error = error.ok_or_else(|| anyhow::anyhow!("expected the upstream error"))?;
    assert_eq!(error.context(), "sensor offline");

    Ok(())
}
