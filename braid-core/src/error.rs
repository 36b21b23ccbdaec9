// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for braid stream combinators.
//!
//! Every failure that travels through a sequence is a [`BraidError`]. Failures are
//! carried in-band as [`StreamItem::Error`](crate::StreamItem::Error) and terminate the
//! sequence that yields them.
//!
//! # Examples
//!
//! ```
//! use braid_core::{BraidError, Result};
//!
//! fn open_source() -> Result<()> {
//!     Err(BraidError::upstream_failure("sensor feed went away"))
//! }
//!
//! assert!(open_source().unwrap_err().is_upstream());
//! ```

use std::error::Error;

type BoxedSource = Box<dyn Error + Send + Sync>;

/// Root error type for all braid operations.
#[derive(Debug, thiserror::Error)]
pub enum BraidError {
    /// An input sequence raised.
    #[error("Upstream failure: {context}")]
    UpstreamFailure {
        /// What the input was doing when it failed
        context: String,
        /// The error produced by the input, when one is available
        #[source]
        source: Option<BoxedSource>,
    },

    /// A user-supplied predicate or transform raised.
    #[error("Transform failure: {context}")]
    TransformFailure {
        /// What the transform was doing when it failed
        context: String,
        /// The error returned by the transform, when one is available
        #[source]
        source: Option<BoxedSource>,
    },

    /// The consumer abandoned the sequence before it was exhausted.
    #[error("Cancellation requested: {context}")]
    CancellationRequested {
        /// Where the cancellation was observed
        context: String,
    },

    /// A combinator was invoked with options it cannot honor.
    #[error("Invalid configuration: {context}")]
    InvalidConfiguration {
        /// Which option was rejected and why
        context: String,
    },
}

impl BraidError {
    /// Create an upstream failure with the given context
    pub fn upstream_failure(context: impl Into<String>) -> Self {
        Self::UpstreamFailure {
            context: context.into(),
            source: None,
        }
    }

    /// Wrap an error raised by an input sequence
    pub fn upstream(error: impl Error + Send + Sync + 'static) -> Self {
        Self::UpstreamFailure {
            context: error.to_string(),
            source: Some(Box::new(error)),
        }
    }

    /// Create a transform failure with the given context
    pub fn transform_failure(context: impl Into<String>) -> Self {
        Self::TransformFailure {
            context: context.into(),
            source: None,
        }
    }

    /// Wrap an error returned by a predicate or transform
    pub fn transform(error: impl Error + Send + Sync + 'static) -> Self {
        Self::TransformFailure {
            context: error.to_string(),
            source: Some(Box::new(error)),
        }
    }

    /// Create a cancellation error with the given context
    pub fn cancelled(context: impl Into<String>) -> Self {
        Self::CancellationRequested {
            context: context.into(),
        }
    }

    /// Create a configuration error with the given context
    pub fn invalid_configuration(context: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            context: context.into(),
        }
    }

    /// Returns `true` for [`BraidError::UpstreamFailure`].
    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(self, Self::UpstreamFailure { .. })
    }

    /// Returns `true` for [`BraidError::TransformFailure`].
    #[must_use]
    pub const fn is_transform(&self) -> bool {
        matches!(self, Self::TransformFailure { .. })
    }

    /// Returns `true` for [`BraidError::CancellationRequested`].
    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::CancellationRequested { .. })
    }

    /// The context string carried by every variant.
    #[must_use]
    pub fn context(&self) -> &str {
        match self {
            Self::UpstreamFailure { context, .. }
            | Self::TransformFailure { context, .. }
            | Self::CancellationRequested { context }
            | Self::InvalidConfiguration { context } => context,
        }
    }
}

/// Specialized Result type for braid operations.
///
/// ```
/// use braid_core::Result;
///
/// fn process() -> Result<u32> {
///     Ok(7)
/// }
/// ```
pub type Result<T> = std::result::Result<T, BraidError>;

/// Extension trait for converting arbitrary errors into `BraidError`.
///
/// Implemented for every `std::error::Error + Send + Sync + 'static`. Foreign errors are
/// treated as upstream failures since they enter through a source adapter.
pub trait IntoBraidError {
    /// Convert this error into a `BraidError` with additional context
    fn into_braid_error(self, context: &str) -> BraidError;

    /// Convert this error into a `BraidError` without additional context
    fn into_braid(self) -> BraidError
    where
        Self: Sized,
    {
        self.into_braid_error("")
    }
}

impl<E: Error + Send + Sync + 'static> IntoBraidError for E {
    fn into_braid_error(self, context: &str) -> BraidError {
        if context.is_empty() {
            BraidError::upstream(self)
        } else {
            BraidError::UpstreamFailure {
                context: format!("{context}: {self}"),
                source: Some(Box::new(self)),
            }
        }
    }
}

/// Helper trait for adding context to `Result`s.
pub trait ResultExt<T> {
    /// Add context to an error
    ///
    /// # Errors
    /// Returns `Err(BraidError)` if the underlying result is `Err`.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context to an error using a closure (lazy evaluation)
    ///
    /// # Errors
    /// Returns `Err(BraidError)` if the underlying result is `Err`.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<BraidError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| prefix_context(e.into(), &context.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| prefix_context(e.into(), &f()))
    }
}

fn prefix_context(error: BraidError, prefix: &str) -> BraidError {
    match error {
        BraidError::UpstreamFailure { context, source } => BraidError::UpstreamFailure {
            context: format!("{prefix}: {context}"),
            source,
        },
        BraidError::TransformFailure { context, source } => BraidError::TransformFailure {
            context: format!("{prefix}: {context}"),
            source,
        },
        BraidError::CancellationRequested { context } => BraidError::CancellationRequested {
            context: format!("{prefix}: {context}"),
        },
        BraidError::InvalidConfiguration { context } => BraidError::InvalidConfiguration {
            context: format!("{prefix}: {context}"),
        },
    }
}

impl Clone for BraidError {
    fn clone(&self) -> Self {
        // Boxed sources cannot be cloned; their message already lives in `context`.
        match self {
            Self::UpstreamFailure { context, .. } => Self::upstream_failure(context.clone()),
            Self::TransformFailure { context, .. } => Self::transform_failure(context.clone()),
            Self::CancellationRequested { context } => Self::cancelled(context.clone()),
            Self::InvalidConfiguration { context } => Self::invalid_configuration(context.clone()),
        }
    }
}
