// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Capabilities over synchronous and suspending callables.
//!
//! `filter` and `map` accept any [`Predicate`] or [`Transform`]. Both traits hide whether
//! the callable runs to completion immediately or suspends: every call returns a future,
//! and synchronous callables return one that is already resolved.
//!
//! | Callable | Wrapper |
//! |----------|---------|
//! | `FnMut(T) -> U` / `FnMut(&T) -> bool` | none, closures implement the traits directly |
//! | `FnMut(T) -> impl Future<Output = U>` | [`suspending`] |
//! | `FnMut(T) -> Result<U, E>` | [`fallible`] |
//! | `FnMut(T) -> impl Future<Output = Result<U, E>>` | [`fallible_suspending`] |
//! | "no predicate" | [`truthy`] |
//!
//! An `Err(E)` returned by a fallible callable becomes [`BraidError::TransformFailure`].
//!
//! # Example
//!
//! ```
//! use braid_core::{suspending, Predicate, Transform};
//! use futures::executor::block_on;
//!
//! let mut double = |x: i32| x * 2;
//! assert_eq!(block_on(double.apply(21)).unwrap(), 42);
//!
//! let mut is_even = suspending(|x: &i32| {
//!     let even = x % 2 == 0;
//!     async move { even }
//! });
//! assert!(block_on(is_even.test(&4)).unwrap());
//! ```

use crate::error::{BraidError, Result};
use futures::future::{ready, Map, Ready};
use futures::FutureExt;
use std::collections::VecDeque;
use std::error::Error;
use std::future::Future;
use std::marker::PhantomData;

/// A (possibly suspending) function applied to every value by `map`.
pub trait Transform<T> {
    /// The value produced for each input.
    type Output;
    /// Future resolving to the transformed value, or to a `TransformFailure`.
    type Future: Future<Output = Result<Self::Output>>;

    /// Apply the transform to one item.
    fn apply(&mut self, item: T) -> Self::Future;
}

/// A (possibly suspending) test applied to every value by `filter`.
///
/// The returned future must not borrow the item: the filter keeps the item until the
/// verdict arrives.
pub trait Predicate<T> {
    /// Future resolving to the verdict, or to a `TransformFailure`.
    type Future: Future<Output = Result<bool>>;

    /// Decide whether `item` is kept.
    fn test(&mut self, item: &T) -> Self::Future;
}

impl<T, U, F> Transform<T> for F
where
    F: FnMut(T) -> U,
{
    type Output = U;
    type Future = Ready<Result<U>>;

    fn apply(&mut self, item: T) -> Self::Future {
        ready(Ok((self)(item)))
    }
}

impl<T, F> Predicate<T> for F
where
    F: FnMut(&T) -> bool,
{
    type Future = Ready<Result<bool>>;

    fn test(&mut self, item: &T) -> Self::Future {
        ready(Ok((self)(item)))
    }
}

/// A callable returning a future. Created by [`suspending`].
#[derive(Clone)]
pub struct Suspending<F, Fut> {
    f: F,
    _marker: PhantomData<fn() -> Fut>,
}

/// Wrap a closure that returns a future.
pub fn suspending<F, Fut>(f: F) -> Suspending<F, Fut> {
    Suspending {
        f,
        _marker: PhantomData,
    }
}

impl<T, F, Fut> Transform<T> for Suspending<F, Fut>
where
    F: FnMut(T) -> Fut,
    Fut: Future,
{
    type Output = Fut::Output;
    type Future = Map<Fut, fn(Fut::Output) -> Result<Fut::Output>>;

    fn apply(&mut self, item: T) -> Self::Future {
        (self.f)(item).map(Ok as fn(Fut::Output) -> Result<Fut::Output>)
    }
}

impl<T, F, Fut> Predicate<T> for Suspending<F, Fut>
where
    F: FnMut(&T) -> Fut,
    Fut: Future<Output = bool>,
{
    type Future = Map<Fut, fn(bool) -> Result<bool>>;

    fn test(&mut self, item: &T) -> Self::Future {
        (self.f)(item).map(Ok as fn(bool) -> Result<bool>)
    }
}

/// A synchronous callable returning `Result`. Created by [`fallible`].
#[derive(Clone)]
pub struct Fallible<F, E> {
    f: F,
    _marker: PhantomData<fn() -> E>,
}

/// Wrap a closure whose `Err` should surface as a `TransformFailure`.
pub fn fallible<F, E>(f: F) -> Fallible<F, E> {
    Fallible {
        f,
        _marker: PhantomData,
    }
}

impl<T, U, E, F> Transform<T> for Fallible<F, E>
where
    F: FnMut(T) -> std::result::Result<U, E>,
    E: Error + Send + Sync + 'static,
{
    type Output = U;
    type Future = Ready<Result<U>>;

    fn apply(&mut self, item: T) -> Self::Future {
        ready(into_transform_result((self.f)(item)))
    }
}

impl<T, E, F> Predicate<T> for Fallible<F, E>
where
    F: FnMut(&T) -> std::result::Result<bool, E>,
    E: Error + Send + Sync + 'static,
{
    type Future = Ready<Result<bool>>;

    fn test(&mut self, item: &T) -> Self::Future {
        ready(into_transform_result((self.f)(item)))
    }
}

/// A callable returning a future of `Result`. Created by [`fallible_suspending`].
#[derive(Clone)]
pub struct FallibleSuspending<F, Fut> {
    f: F,
    _marker: PhantomData<fn() -> Fut>,
}

/// Wrap a closure returning a future whose `Err` should surface as a `TransformFailure`.
pub fn fallible_suspending<F, Fut>(f: F) -> FallibleSuspending<F, Fut> {
    FallibleSuspending {
        f,
        _marker: PhantomData,
    }
}

type TransformResultFn<U, E> = fn(std::result::Result<U, E>) -> Result<U>;

impl<T, U, E, F, Fut> Transform<T> for FallibleSuspending<F, Fut>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = std::result::Result<U, E>>,
    E: Error + Send + Sync + 'static,
{
    type Output = U;
    type Future = Map<Fut, TransformResultFn<U, E>>;

    fn apply(&mut self, item: T) -> Self::Future {
        (self.f)(item).map(into_transform_result::<U, E> as TransformResultFn<U, E>)
    }
}

impl<T, E, F, Fut> Predicate<T> for FallibleSuspending<F, Fut>
where
    F: FnMut(&T) -> Fut,
    Fut: Future<Output = std::result::Result<bool, E>>,
    E: Error + Send + Sync + 'static,
{
    type Future = Map<Fut, TransformResultFn<bool, E>>;

    fn test(&mut self, item: &T) -> Self::Future {
        (self.f)(item).map(into_transform_result::<bool, E> as TransformResultFn<bool, E>)
    }
}

fn into_transform_result<U, E>(result: std::result::Result<U, E>) -> Result<U>
where
    E: Error + Send + Sync + 'static,
{
    result.map_err(BraidError::transform)
}

/// Values that count as "true" when `filter` runs without a predicate.
///
/// Zero, empty text, empty collections, `false` and `None` are falsy; everything else
/// is truthy.
pub trait Truthy {
    /// Returns `true` if the value should be kept by [`truthy`].
    fn is_truthy(&self) -> bool;
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

macro_rules! impl_truthy_for_numbers {
    ($zero:literal => $($ty:ty),*) => {
        $(
            impl Truthy for $ty {
                fn is_truthy(&self) -> bool {
                    *self != $zero
                }
            }
        )*
    };
}

impl_truthy_for_numbers!(0 => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_truthy_for_numbers!(0.0 => f32, f64);

impl Truthy for char {
    fn is_truthy(&self) -> bool {
        *self != '\0'
    }
}

impl Truthy for str {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Truthy for [T] {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Truthy for Vec<T> {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Truthy for VecDeque<T> {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.is_some()
    }
}

impl<T: Truthy + ?Sized> Truthy for &T {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

impl<T: Truthy + ?Sized> Truthy for Box<T> {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

/// Predicate keeping truthy values. Created by [`truthy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TruthyPredicate;

/// The "no predicate" filter: keeps every value whose [`Truthy::is_truthy`] holds.
#[must_use]
pub const fn truthy() -> TruthyPredicate {
    TruthyPredicate
}

impl<T: Truthy> Predicate<T> for TruthyPredicate {
    type Future = Ready<Result<bool>>;

    fn test(&mut self, item: &T) -> Self::Future {
        ready(Ok(item.is_truthy()))
    }
}
