//! [`Error`]-related definitions.

use std::fmt;

use derive_more::Error as StdError;
use itertools::Itertools as _;
use service::infra::Violation;
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[severity = $severity:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            severity: $crate::Severity::$severity,
                            message: $message.to_string(),
                            field: None,
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// Application [`Error`], ready to be surfaced as a [`Notice`].
///
/// [`Notice`]: crate::Notice
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`Severity`] of this [`Error`].
    pub severity: Severity,

    /// Name of the input field this [`Error`] refers to, if any.
    pub field: Option<String>,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Creates a new [`Error`] representing an internal failure.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_ERROR",
            severity: Severity::Error,
            field: None,
            message: msg.to_string(),
            backtrace: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            severity: _,
            field: _,
            backtrace,
            message,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("{trace}"))),
        )
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Severity of an [`Error`].
#[derive(
    Clone, Copy, Debug, derive_more::Display, Eq, Ord, PartialEq, PartialOrd,
)]
pub enum Severity {
    /// Informational only.
    #[display("info")]
    Info,

    /// Deserves attention, but the operation may be retried as is.
    #[display("warning")]
    Warning,

    /// The operation failed and won't succeed without intervention.
    #[display("error")]
    Error,
}

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Returns the per-field input [`Violation`]s behind the type, if any.
    fn violations(&self) -> Option<&[Violation]> {
        None
    }

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }

    fn violations(&self) -> Option<&[Violation]> {
        self.as_ref().violations()
    }
}

impl AsError for service::infra::Error {
    fn try_as_error(&self) -> Option<Error> {
        Some(if self.is_unauthorized() {
            ApiError::SessionExpired.into()
        } else if self.is_not_found() {
            ApiError::NotFound.into()
        } else if Self::violations(self).is_some() {
            ApiError::InvalidInput.into()
        } else {
            ApiError::Unavailable.into()
        })
    }

    fn violations(&self) -> Option<&[Violation]> {
        Self::violations(self)
    }
}

define_error! {
    enum ApiError {
        #[code = "SESSION_EXPIRED"]
        #[severity = Warning]
        #[message = "Session has expired, sign in to continue"]
        SessionExpired,

        #[code = "NOT_FOUND"]
        #[severity = Warning]
        #[message = "Requested entry does not exist"]
        NotFound,

        #[code = "INVALID_INPUT"]
        #[severity = Error]
        #[message = "Provided input is rejected by the server"]
        InvalidInput,

        #[code = "API_UNAVAILABLE"]
        #[severity = Error]
        #[message = "Cannot reach the server, try again"]
        Unavailable,
    }
}

#[cfg(test)]
mod spec {
    use service::infra::{rest, Error as ApiErr};

    use super::{AsError as _, Severity};

    #[test]
    fn unauthorized_maps_to_session_expired() {
        let err = ApiErr::from(rest::Error::Unauthorized);

        let error = err.as_error();

        assert_eq!(error.code, "SESSION_EXPIRED");
        assert_eq!(error.severity, Severity::Warning);
    }

    #[test]
    fn traced_error_carries_backtrace() {
        let err = tracerr::new!(ApiErr::from(rest::Error::NotFound));

        let error = err.as_error();

        assert_eq!(error.code, "NOT_FOUND");
        assert!(error.backtrace.is_some());
    }
}
