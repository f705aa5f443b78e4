//! [`Session`]-related definitions.

use std::time::Duration;

use common::DateTime;
use service::{
    command::{refresh_session, sign_in},
    domain::user::{self, session},
    infra::Auth,
};

/// Authentication state of the application.
///
/// Passed explicitly to every operation needing credentials, so the state is
/// always in exactly one place and every transition is a plain value change.
#[derive(Debug, Default)]
pub enum Session {
    /// Nobody is signed in.
    #[default]
    Anonymous,

    /// A user is signed in.
    Authenticated(Active),

    /// The session was rejected by the server and a new sign-in is required.
    Expired {
        /// Logical path of the interrupted operation, to return to after the
        /// next sign-in.
        return_to: String,
    },
}

/// State of an [`Session::Authenticated`] session.
#[derive(Debug)]
pub struct Active {
    /// Access [`session::Token`] attached to outgoing operations.
    pub token: session::Token,

    /// [`session::RefreshToken`] for obtaining the next access token.
    pub refresh_token: Option<session::RefreshToken>,

    /// ID of the signed-in [`User`].
    ///
    /// [`User`]: service::domain::User
    pub user_id: user::Id,

    /// [`DateTime`] when the access token expires.
    pub expires_at: session::ExpirationDateTime,
}

impl Session {
    /// Transitions this [`Session`] into [`Session::Authenticated`] with the
    /// output of a successful sign-in.
    pub fn signed_in(&mut self, out: sign_in::Output) {
        *self = Self::Authenticated(Active {
            token: out.token,
            refresh_token: out.refresh_token,
            user_id: out.session.user_id,
            expires_at: out.session.expires_at,
        });
    }

    /// Applies the output of a successful refresh to this [`Session`].
    ///
    /// No-op unless [`Session::Authenticated`]: a refresh that races a
    /// sign-out must not resurrect the session.
    pub fn refreshed(&mut self, out: refresh_session::Output) {
        if let Self::Authenticated(active) = self {
            active.token = out.token;
            active.expires_at = out.session.expires_at;
        }
    }

    /// Transitions this [`Session`] into [`Session::Expired`], preserving
    /// the logical path of the interrupted operation.
    pub fn expire(&mut self, return_to: String) {
        *self = Self::Expired { return_to };
    }

    /// Transitions this [`Session`] into [`Session::Anonymous`].
    pub fn signed_out(&mut self) {
        *self = Self::Anonymous;
    }

    /// Returns the [`Auth`] credentials to attach to an outgoing operation.
    #[must_use]
    pub fn credentials(&self) -> Auth {
        match self {
            Self::Authenticated(active) => Some(active.token.clone()),
            Self::Anonymous | Self::Expired { .. } => None,
        }
    }

    /// Returns the [`session::RefreshToken`] of this [`Session`], if any.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&session::RefreshToken> {
        match self {
            Self::Authenticated(active) => active.refresh_token.as_ref(),
            Self::Anonymous | Self::Expired { .. } => None,
        }
    }

    /// Returns the path to return to after the next sign-in, if this
    /// [`Session`] has expired.
    #[must_use]
    pub fn return_to(&self) -> Option<&str> {
        match self {
            Self::Expired { return_to } => Some(return_to),
            Self::Anonymous | Self::Authenticated(_) => None,
        }
    }

    /// Indicates whether a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Indicates whether the access token expires within the provided
    /// `margin` from `now`, so a refresh is due before the next operation.
    #[must_use]
    pub fn needs_refresh(&self, now: DateTime, margin: Duration) -> bool {
        match self {
            Self::Authenticated(active) => {
                active.expires_at.coerce::<()>() <= now + margin
            }
            Self::Anonymous | Self::Expired { .. } => false,
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;
    use service::{
        command::{refresh_session, sign_in},
        domain::user::{self, session, Session as Claims},
    };

    use super::Session;

    const MARGIN: Duration = Duration::from_secs(60);

    fn token(raw: &str) -> session::Token {
        raw.parse().unwrap()
    }

    fn signed_in(expires_in: Duration) -> Session {
        let mut session = Session::default();
        session.signed_in(sign_in::Output {
            token: token("access"),
            refresh_token: Some("refresh".parse().unwrap()),
            session: Claims {
                user_id: user::Id::new(),
                expires_at: (DateTime::now() + expires_in).coerce(),
            },
        });
        session
    }

    #[test]
    fn anonymous_carries_no_credentials() {
        let session = Session::default();

        assert!(session.credentials().is_none());
        assert!(!session.is_authenticated());
        assert!(!session.needs_refresh(DateTime::now(), MARGIN));
    }

    #[test]
    fn sign_in_attaches_token_to_operations() {
        let session = signed_in(Duration::from_secs(30 * 60));

        assert!(session.is_authenticated());
        assert_eq!(
            session.credentials().map(|t| t.to_string()),
            Some("access".to_string()),
        );
    }

    #[test]
    fn refresh_is_due_within_margin_of_expiry() {
        let session = signed_in(Duration::from_secs(30));

        assert!(session.needs_refresh(DateTime::now(), MARGIN));
        assert!(!session.needs_refresh(
            DateTime::now(),
            Duration::from_secs(0),
        ));
    }

    #[test]
    fn refresh_replaces_access_token_only() {
        let mut session = signed_in(Duration::from_secs(30));

        session.refreshed(refresh_session::Output {
            token: token("fresh"),
            session: Claims {
                user_id: user::Id::new(),
                expires_at: (DateTime::now() + Duration::from_secs(30 * 60))
                    .coerce(),
            },
        });

        assert_eq!(
            session.credentials().map(|t| t.to_string()),
            Some("fresh".to_string()),
        );
        assert!(session.refresh_token().is_some());
        assert!(!session.needs_refresh(DateTime::now(), MARGIN));
    }

    #[test]
    fn expiry_preserves_return_target() {
        let mut session = signed_in(Duration::from_secs(30 * 60));

        session.expire("/patients".into());

        assert!(session.credentials().is_none());
        assert_eq!(session.return_to(), Some("/patients"));
    }

    #[test]
    fn sign_out_drops_everything() {
        let mut session = signed_in(Duration::from_secs(30 * 60));

        session.signed_out();

        assert!(matches!(session, Session::Anonymous));
        assert!(session.refresh_token().is_none());
    }
}
