//! [`Session`]-related [`Backend`] implementations.
//!
//! [`Backend`]: crate::infra::Backend
//! [`Session`]: crate::domain::user::Session

use common::operations::{Authorized, Create};
use secrecy::ExposeSecret as _;
use tracerr::Traced;

use crate::{
    domain::user::session,
    infra::{
        backend::{self, rest::Rest, Authed},
        Backend,
    },
};

impl Backend<Authed<Create<session::Credentials>>> for Rest {
    type Ok = session::Grant;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized {
            op: Create(credentials),
            credentials: auth,
        }: Authed<Create<session::Credentials>>,
    ) -> Result<Self::Ok, Self::Err> {
        let url = self.endpoint("auth/sign-in/")?;
        let body = wire::SignIn {
            login: credentials.login.to_string(),
            password: credentials.password.expose_secret().to_string(),
        };
        self.post::<wire::Tokens>(url, &body, auth)
            .await
            .map(Into::into)
    }
}

impl Backend<Authed<Create<session::RefreshToken>>> for Rest {
    type Ok = session::Grant;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized {
            op: Create(refresh_token),
            credentials: auth,
        }: Authed<Create<session::RefreshToken>>,
    ) -> Result<Self::Ok, Self::Err> {
        let url = self.endpoint("auth/refresh/")?;
        let body = wire::Refresh {
            refresh: refresh_token.to_string(),
        };
        self.post::<wire::Tokens>(url, &body, auth)
            .await
            .map(Into::into)
    }
}

mod wire {
    //! Wire representation of `auth/` endpoint bodies.

    use serde::{Deserialize, Serialize};

    use crate::domain::user::session;

    /// Body of a sign-in request.
    #[derive(Debug, Serialize)]
    pub(super) struct SignIn {
        /// Login of the user.
        pub(super) login: String,

        /// Password of the user.
        pub(super) password: String,
    }

    /// Body of a session refresh request.
    #[derive(Debug, Serialize)]
    pub(super) struct Refresh {
        /// Refresh token of the session.
        pub(super) refresh: String,
    }

    /// Tokens issued by an `auth/` response.
    #[derive(Debug, Deserialize)]
    pub(super) struct Tokens {
        /// Issued access token.
        pub(super) access: String,

        /// Issued refresh token, on sign-in only.
        #[serde(default)]
        pub(super) refresh: Option<String>,
    }

    impl From<Tokens> for session::Grant {
        #[expect(unsafe_code, reason = "invariants are preserved")]
        fn from(wire: Tokens) -> Self {
            // SAFETY: The API only issues well-formed tokens.
            unsafe {
                Self {
                    token: session::Token::new_unchecked(wire.access),
                    refresh_token: wire
                        .refresh
                        .map(|t| session::RefreshToken::new_unchecked(t)),
                }
            }
        }
    }
}

#[cfg(test)]
mod spec {
    use common::operations::Create;
    use secrecy::SecretBox;
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::super::mock;
    use crate::{
        domain::user::{self, session},
        infra::{backend::Authed, Backend as _},
    };

    fn credentials() -> session::Credentials {
        session::Credentials {
            login: user::Login::new("gadler").unwrap(),
            password: SecretBox::new(Box::new(
                user::Password::new("hunter22").unwrap(),
            )),
        }
    }

    #[tokio::test]
    async fn sign_in_issues_token_pair() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/sign-in/"))
            .and(body_json(json!({
                "login": "gadler",
                "password": "hunter22",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access": "access-token",
                "refresh": "refresh-token",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let grant = mock::rest(&server)
            .execute(Authed::new(Create(credentials()), None))
            .await
            .unwrap();

        assert_eq!(grant.token.to_string(), "access-token");
        assert_eq!(
            grant.refresh_token.map(|t| t.to_string()),
            Some("refresh-token".to_string()),
        );
    }

    #[tokio::test]
    async fn refresh_issues_access_token_only() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh/"))
            .and(body_json(json!({"refresh": "refresh-token"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access": "fresh-token"})),
            )
            .mount(&server)
            .await;

        let refresh_token =
            "refresh-token".parse::<session::RefreshToken>().unwrap();
        let grant = mock::rest(&server)
            .execute(Authed::new(Create(refresh_token), None))
            .await
            .unwrap();

        assert_eq!(grant.token.to_string(), "fresh-token");
        assert!(grant.refresh_token.is_none());
    }
}
