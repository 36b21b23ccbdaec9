// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use braid_core::{BraidError, IntoBraidError, Result, ResultExt};
use std::error::Error;
use std::io;

#[test]
fn test_upstream_failure_display() {
    let error = BraidError::upstream_failure("sensor offline");
    assert_eq!(error.to_string(), "Upstream failure: sensor offline");
    assert!(error.is_upstream());
    assert!(!error.is_transform());
    assert!(!error.is_cancellation());
}

#[test]
fn test_transform_failure_display() {
    let error = BraidError::transform_failure("division by zero");
    assert_eq!(error.to_string(), "Transform failure: division by zero");
    assert!(error.is_transform());
}

#[test]
fn test_cancellation_display() {
    let error = BraidError::cancelled("consumer went away");
    assert_eq!(error.to_string(), "Cancellation requested: consumer went away");
    assert!(error.is_cancellation());
}

#[test]
fn test_invalid_configuration_display() {
    let error = BraidError::invalid_configuration("branches must be at least 1");
    assert_eq!(
        error.to_string(),
        "Invalid configuration: branches must be at least 1"
    );
    assert_eq!(error.context(), "branches must be at least 1");
}

#[test]
fn test_upstream_wraps_source() {
    let io_error = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");
    let error = BraidError::upstream(io_error);

    assert!(error.is_upstream());
    assert_eq!(error.context(), "pipe closed");
    let source = error.source().expect("source should be kept");
    assert_eq!(source.to_string(), "pipe closed");
}

#[test]
fn test_transform_wraps_source() {
    let parse_error = "x".parse::<i32>().unwrap_err();
    let error = BraidError::transform(parse_error);

    assert!(error.is_transform());
    assert!(error.source().is_some());
}

#[test]
fn test_into_braid_error_with_context() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "missing");
    let error = io_error.into_braid_error("reading feed");

    assert!(error.is_upstream());
    assert_eq!(error.context(), "reading feed: missing");
}

#[test]
fn test_into_braid_without_context() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "missing");
    let error = io_error.into_braid();

    assert_eq!(error.context(), "missing");
}

#[test]
fn test_result_ext_context_prefixes() {
    let result: Result<()> = Err(BraidError::transform_failure("bad value"));
    let error = result.context("mapping readings").unwrap_err();

    assert!(error.is_transform());
    assert_eq!(error.context(), "mapping readings: bad value");
}

#[test]
fn test_result_ext_with_context_is_lazy() {
    let ok: Result<u32> = Ok(3);
    let value = ok
        .with_context(|| panic!("context must not be built for Ok"))
        .unwrap();
    assert_eq!(value, 3);

    let err: Result<u32> = Err(BraidError::cancelled("stop"));
    let error = err.with_context(|| format!("step {}", 2)).unwrap_err();
    assert_eq!(error.context(), "step 2: stop");
}

#[test]
fn test_clone_keeps_variant_and_context_but_drops_source() {
    let error = BraidError::upstream(io::Error::other("boom"));
    let cloned = error.clone();

    assert!(cloned.is_upstream());
    assert_eq!(cloned.context(), "boom");
    assert!(cloned.source().is_none());
}

#[test]
fn test_error_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BraidError>();
}
