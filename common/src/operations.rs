//! Abstract operations.

use std::marker::PhantomData;

/// Operation to insert a value.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Operation to update a value.
#[derive(Clone, Copy, Debug)]
pub struct Update<T>(pub T);

/// Operation to update a value, applied only if the stored value still
/// matches the provided witness `W`.
///
/// This is the conditional replace backing optimistic concurrency: the
/// operation reports whether the replacement was committed.
#[derive(Clone, Copy, Debug)]
pub struct UpdateIf<T, W>(pub T, pub W);

/// Operation to select a value.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Operation to publish a value.
#[derive(Clone, Copy, Debug)]
pub struct Publish<T>(pub T);

/// Operation to subscribe to values of type `T`.
#[derive(Clone, Copy, Debug)]
pub struct Subscribe<T>(PhantomData<T>);

impl<T> Default for Subscribe<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

/// Operation to start a value.
#[derive(Clone, Copy, Debug)]
pub struct Start<T>(pub T);

/// Operation to perform a value.
#[derive(Clone, Copy, Debug)]
pub struct Perform<T>(pub T);

/// Selector of `W` by `B`.
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Type of the value to select.
    _what: PhantomData<W>,

    /// Value to select by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Creates a new [`By`] with the given value.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Consumes this [`By`] and returns the inner value.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}
