//! [`Backend`]-related implementations.

#[cfg(feature = "rest")]
pub mod rest;

use common::operations::Authorized;
use derive_more::{Display, Error as StdError, From};

use crate::domain::user::session;

#[cfg(feature = "rest")]
pub use self::rest::Rest;

/// Backend API operation.
pub use common::Handler as Backend;

/// Credentials a [`Backend`] operation is performed with.
///
/// [`None`] sends the operation anonymously, leaving its rejection to the
/// [`Backend`].
pub type Auth = Option<session::Token>;

/// [`Backend`] operation with [`Auth`] credentials attached.
pub type Authed<T> = Authorized<T, Auth>;

/// [`Backend`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "rest")]
    /// [`Rest`] error.
    Rest(rest::Error),
}

impl Error {
    /// Indicates whether this [`Error`] is a rejection of the operation's
    /// [`Auth`] credentials.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        match *self {
            #[cfg(feature = "rest")]
            Self::Rest(ref e) => e.is_unauthorized(),
        }
    }

    /// Indicates whether this [`Error`] reports a missing entity.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match *self {
            #[cfg(feature = "rest")]
            Self::Rest(ref e) => e.is_not_found(),
        }
    }

    /// Returns the input [`Violation`]s this [`Error`] reports, if any.
    #[must_use]
    pub fn violations(&self) -> Option<&[Violation]> {
        match *self {
            #[cfg(feature = "rest")]
            Self::Rest(ref e) => e.violations(),
        }
    }
}

/// Violation of a single input field, as reported by a [`Backend`].
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[display("{field}: {message}")]
pub struct Violation {
    /// Name of the violated field.
    pub field: String,

    /// Reason of the violation.
    pub message: String,
}
