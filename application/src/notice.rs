//! [`Notice`]-related definitions.

use std::fmt;

use tracerr::Traced;
use tracing as log;

use crate::{
    error::{AsError, Code, Severity},
    Error,
};

/// Transient notification surfaced to the user.
///
/// Every failure degrades into one or more [`Notice`]s, there is no fatal
/// category.
#[derive(Clone, Debug)]
pub struct Notice {
    /// [`Severity`] of this [`Notice`].
    pub severity: Severity,

    /// Code of the [`Error`] this [`Notice`] was raised for.
    pub code: Code,

    /// Human-readable message of this [`Notice`].
    pub message: String,

    /// Name of the input field this [`Notice`] refers to, if any.
    pub field: Option<String>,
}

impl Notice {
    /// Creates a new [`Notice`] out of the provided [`Error`].
    #[must_use]
    pub fn of(error: Error) -> Self {
        Self {
            severity: error.severity,
            code: error.code,
            message: error.message,
            field: error.field,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            severity,
            code,
            message,
            field,
        } = self;

        write!(f, "{severity}: [{code}] ")?;
        if let Some(field) = field {
            write!(f, "`{field}`: ")?;
        }
        write!(f, "{message}")
    }
}

/// Converts a failed operation into the [`Notice`]s to surface.
///
/// A failure reporting per-field [`Violation`]s expands into one [`Notice`]
/// per offending field, so each may be rendered next to its input. Any other
/// failure produces a single [`Notice`].
///
/// [`Violation`]: service::infra::Violation
pub fn of_failure<E>(err: &Traced<E>) -> Vec<Notice>
where
    E: AsError + fmt::Display,
{
    log::warn!("operation failed: {err}");

    if let Some(violations) = err.violations() {
        return violations
            .iter()
            .map(|v| Notice {
                severity: Severity::Error,
                code: "INVALID_INPUT",
                message: v.message.clone(),
                field: Some(v.field.clone()),
            })
            .collect();
    }

    vec![Notice::of(err.as_error())]
}

#[cfg(test)]
mod spec {
    use service::infra::{rest, Error as ApiErr, Violation};

    use super::{of_failure, Severity};

    #[test]
    fn expands_violations_per_field() {
        let err = tracerr::new!(ApiErr::from(rest::Error::Validation(vec![
            Violation {
                field: "name".into(),
                message: "This field is required.".into(),
            },
            Violation {
                field: "phone".into(),
                message: "Enter a valid phone number.".into(),
            },
        ])));

        let notices = of_failure(&err);

        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].field.as_deref(), Some("name"));
        assert_eq!(notices[0].message, "This field is required.");
        assert_eq!(notices[1].field.as_deref(), Some("phone"));
    }

    #[test]
    fn connectivity_failure_produces_single_notice() {
        let err = tracerr::new!(ApiErr::from(rest::Error::NotFound));

        let notices = of_failure(&err);

        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].code, "NOT_FOUND");
        assert_eq!(notices[0].severity, Severity::Warning);
        assert_eq!(notices[0].field, None);
    }
}
