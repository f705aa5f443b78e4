//! Abstract operations.

use std::marker::PhantomData;

/// Operation to fetch a value.
#[derive(Clone, Copy, Debug)]
pub struct Fetch<T>(pub T);

/// Operation to create a value.
#[derive(Clone, Copy, Debug)]
pub struct Create<T>(pub T);

/// Operation to update a value.
#[derive(Clone, Copy, Debug)]
pub struct Update<T>(pub T);

/// Operation to delete a value.
#[derive(Clone, Copy, Debug)]
pub struct Delete<T>(pub T);

/// Operation to perform with `C` credentials attached.
#[derive(Clone, Copy, Debug)]
pub struct Authorized<T, C> {
    /// Wrapped operation.
    pub op: T,

    /// Credentials to authorize the [`Authorized::op`] with.
    pub credentials: C,
}

impl<T, C> Authorized<T, C> {
    /// Creates a new [`Authorized`] operation with the given `credentials`.
    #[must_use]
    pub fn new(op: T, credentials: C) -> Self {
        Self { op, credentials }
    }
}

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
