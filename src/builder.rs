//! Two-phase construction contracts.
//!
//! A [`Builder`] builds a result, keeps it, and hands it out on request. A
//! [`Director`] turns inputs into a finished value in one call, optionally by
//! driving a builder.

use std::marker::PhantomData;
use std::sync::Mutex;

use thiserror::Error;

/// Builds a value from `I` and keeps the most recent result.
pub trait Builder<I> {
    type Output;
    type Error;

    /// Builds a new result, replacing the stored one.
    ///
    /// On failure the previously stored result, if any, is kept.
    fn build(&mut self, input: I) -> Result<(), Self::Error>;

    /// The stored result, without the empty-builder warning.
    fn result(&self) -> Option<&Self::Output>;

    /// Returns the most recently built result.
    ///
    /// Asking before anything was built is almost always a call-order bug, so
    /// it is logged at `warn`.
    fn get(&self) -> Option<&Self::Output> {
        let result = self.result();
        if result.is_none() {
            tracing::warn!(
                builder = std::any::type_name::<Self>(),
                "result requested before anything was built"
            );
        }
        result
    }

    /// [`build`](Builder::build) followed by [`get`](Builder::get).
    fn build_and_get(&mut self, input: I) -> Result<Option<&Self::Output>, Self::Error> {
        self.build(input)?;
        Ok(self.get())
    }
}

/// Produces one finished value per call.
pub trait Director<I> {
    type Output;
    type Error;

    fn build(&self, input: I) -> Result<Self::Output, Self::Error>;
}

/// A [`Builder`] backed by a closure.
///
/// ```
/// use setkit::{Builder, FnBuilder};
///
/// let mut greeting = FnBuilder::new(|name: &str| Ok::<_, std::convert::Infallible>(format!("hello {name}")));
/// assert_eq!(greeting.build_and_get("ada").unwrap().map(String::as_str), Some("hello ada"));
/// ```
pub struct FnBuilder<F, O> {
    build: F,
    result: Option<O>,
}

impl<F, O> FnBuilder<F, O> {
    pub fn new(build: F) -> Self {
        Self {
            build,
            result: None,
        }
    }

    /// Takes the stored result out, leaving the builder empty.
    pub fn take(&mut self) -> Option<O> {
        self.result.take()
    }
}

impl<F, I, O, E> Builder<I> for FnBuilder<F, O>
where
    F: FnMut(I) -> Result<O, E>,
{
    type Output = O;
    type Error = E;

    fn build(&mut self, input: I) -> Result<(), E> {
        self.result = Some((self.build)(input)?);
        Ok(())
    }

    fn result(&self) -> Option<&O> {
        self.result.as_ref()
    }
}

impl<F, O: std::fmt::Debug> std::fmt::Debug for FnBuilder<F, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnBuilder")
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

/// Failure of a [`BuilderDirector`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuildError<E> {
    #[error("director has no builder")]
    NoBuilder,

    #[error("builder produced no result")]
    Empty,

    #[error("builder failed: {0}")]
    Builder(E),
}

/// A [`Director`] that delegates to an optional [`Builder`].
///
/// The builder sits behind a mutex so the director can be shared and driven
/// through `&self`.
pub struct BuilderDirector<B, I> {
    builder: Mutex<Option<B>>,
    _input: PhantomData<fn(I)>,
}

impl<B, I> BuilderDirector<B, I> {
    pub fn new(builder: Option<B>) -> Self {
        Self {
            builder: Mutex::new(builder),
            _input: PhantomData,
        }
    }

    /// Swaps the builder, returning the previous one.
    pub fn set_builder(&self, builder: Option<B>) -> Option<B> {
        let mut slot = self
            .builder
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        std::mem::replace(&mut *slot, builder)
    }
}

impl<B, I> Default for BuilderDirector<B, I> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<B, I> Director<I> for BuilderDirector<B, I>
where
    B: Builder<I>,
    B::Output: Clone,
{
    type Output = B::Output;
    type Error = BuildError<B::Error>;

    fn build(&self, input: I) -> Result<B::Output, Self::Error> {
        let mut slot = self
            .builder
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let builder = slot.as_mut().ok_or(BuildError::NoBuilder)?;
        builder
            .build_and_get(input)
            .map_err(BuildError::Builder)?
            .cloned()
            .ok_or(BuildError::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Doubler = FnBuilder<fn(i32) -> Result<i32, String>, i32>;

    fn double(n: i32) -> Result<i32, String> {
        if n < 0 {
            Err(format!("negative input: {n}"))
        } else {
            Ok(n * 2)
        }
    }

    fn doubler() -> Doubler {
        FnBuilder::new(double as fn(i32) -> Result<i32, String>)
    }

    #[test]
    fn test_get_before_build_is_empty() {
        let builder = doubler();
        assert_eq!(builder.get(), None);
    }

    #[test]
    fn test_build_and_get_matches_build_then_get() {
        let mut composed = doubler();
        let mut stepwise = doubler();

        let via_composed = composed.build_and_get(21).unwrap().copied();
        stepwise.build(21).unwrap();

        assert_eq!(via_composed, stepwise.get().copied());
        assert_eq!(composed.result(), stepwise.result());
    }

    #[test]
    fn test_rebuild_replaces_previous_result() {
        let mut builder = doubler();
        builder.build(1).unwrap();
        builder.build(5).unwrap();

        assert_eq!(builder.get(), Some(&10));
    }

    #[test]
    fn test_failed_build_keeps_previous_result() {
        let mut builder = doubler();
        builder.build(3).unwrap();

        assert!(builder.build(-1).is_err());
        assert_eq!(builder.get(), Some(&6));
    }

    #[test]
    fn test_take_empties_builder() {
        let mut builder = doubler();
        builder.build(2).unwrap();

        assert_eq!(builder.take(), Some(4));
        assert_eq!(builder.result(), None);
    }

    #[test]
    fn test_director_without_builder() {
        let director: BuilderDirector<Doubler, i32> = BuilderDirector::default();

        assert!(matches!(director.build(1), Err(BuildError::NoBuilder)));
    }

    #[test]
    fn test_director_delegates_to_builder() {
        let director: BuilderDirector<Doubler, i32> = BuilderDirector::new(Some(doubler()));

        assert_eq!(director.build(4).unwrap(), 8);
        assert!(matches!(director.build(-4), Err(BuildError::Builder(_))));
    }

    /// Accepts every input but never keeps a result.
    struct Discarding;

    impl Builder<i32> for Discarding {
        type Output = i32;
        type Error = String;

        fn build(&mut self, _input: i32) -> Result<(), String> {
            Ok(())
        }

        fn result(&self) -> Option<&i32> {
            None
        }
    }

    #[test]
    fn test_director_reports_empty_builder() {
        let director: BuilderDirector<Discarding, i32> = BuilderDirector::new(Some(Discarding));

        assert!(matches!(director.build(1), Err(BuildError::Empty)));
    }

    #[test]
    fn test_set_builder_swaps_builder() {
        let director: BuilderDirector<Doubler, i32> = BuilderDirector::new(None);
        assert!(director.set_builder(Some(doubler())).is_none());

        assert_eq!(director.build(7).unwrap(), 14);
        assert!(director.set_builder(None).is_some());
        assert!(matches!(director.build(7), Err(BuildError::NoBuilder)));
    }
}
