//! [`Session`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, FromStr};
use jsonwebtoken::{DecodingKey, Validation};
use secrecy::SecretBox;
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::domain::User;
use crate::domain::user;

/// User session.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct Session {
    /// ID of the [`User`] this [`Session`] belongs to.
    pub user_id: user::Id,

    /// [`DateTime`] when this [`Session`] expires.
    #[serde(rename = "exp", with = "common::datetime::serde::unix_timestamp")]
    pub expires_at: ExpirationDateTime,
}

impl Session {
    /// Decodes a [`Session`] from the claims of the given [`Token`].
    ///
    /// The signature is not verified, since the signing key never leaves
    /// the issuing server. Expired [`Token`]s decode normally, so that
    /// [`Session::expires_at`] may still be inspected.
    #[must_use]
    pub fn decode(token: &Token) -> Option<Self> {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;

        jsonwebtoken::decode::<Self>(
            token.as_ref(),
            &DecodingKey::from_secret(&[]),
            &validation,
        )
        .ok()
        .map(|data| data.claims)
    }
}

/// Access token of a [`Session`].
#[derive(AsRef, Clone, Debug, Display, FromStr)]
pub struct Token(String);

impl Token {
    /// Creates a new [`Token`] without checking its contents.
    ///
    /// # Safety
    ///
    /// The provided `token` must be a valid [`Token`] representation.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(token: String) -> Self {
        Self(token)
    }
}

/// Refresh token of a [`Session`].
#[derive(AsRef, Clone, Debug, Display, FromStr)]
pub struct RefreshToken(String);

impl RefreshToken {
    /// Creates a new [`RefreshToken`] without checking its contents.
    ///
    /// # Safety
    ///
    /// The provided `token` must be a valid [`RefreshToken`] representation.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(token: String) -> Self {
        Self(token)
    }
}

/// [`Session`] tokens issued to a [`User`].
#[derive(Clone, Debug)]
pub struct Grant {
    /// [`Token`] authorizing operations on behalf of the [`User`].
    pub token: Token,

    /// [`RefreshToken`] for obtaining the next [`Grant`].
    ///
    /// Issued on [`Session`] creation only, never on refresh.
    pub refresh_token: Option<RefreshToken>,
}

/// Credentials a [`Session`] is created with.
#[derive(Clone, Debug)]
pub struct Credentials {
    /// [`Login`](user::Login) of the [`User`].
    pub login: user::Login,

    /// [`Password`](user::Password) of the [`User`].
    pub password: SecretBox<user::Password>,
}

/// [`DateTime`] of a [`Session`] expiration.
pub type ExpirationDateTime = DateTimeOf<(Session, unit::Expiration)>;

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;
    use jsonwebtoken::EncodingKey;

    use super::{Session, Token};
    use crate::domain::user;

    fn issue(session: &Session) -> Token {
        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            session,
            &EncodingKey::from_secret(b"top-secret"),
        )
        .unwrap()
        .parse()
        .unwrap()
    }

    #[test]
    fn decodes_claims_without_key() {
        let session = Session {
            user_id: user::Id::new(),
            expires_at: (DateTime::now() + Duration::from_secs(30 * 60))
                .coerce(),
        };

        let decoded = Session::decode(&issue(&session)).unwrap();

        assert_eq!(decoded.user_id, session.user_id);
        assert_eq!(
            decoded.expires_at.unix_timestamp(),
            session.expires_at.unix_timestamp(),
        );
    }

    #[test]
    fn decodes_expired_token() {
        let session = Session {
            user_id: user::Id::new(),
            expires_at: (DateTime::now() - Duration::from_secs(30 * 60))
                .coerce(),
        };

        assert!(
            Session::decode(&issue(&session)).is_some(),
            "expired claims must still decode",
        );
    }

    #[test]
    fn rejects_garbage_token() {
        let token = "not-a-jwt".parse().unwrap();

        assert!(Session::decode(&token).is_none());
    }
}
