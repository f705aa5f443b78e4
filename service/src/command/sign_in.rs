//! [`Command`] for signing a [`User`] in.
//!
//! [`User`]: crate::domain::User

use common::operations::Create;
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::user::{session, Session},
    infra::{self, Authed, Backend},
    Service,
};

use super::Command;

/// [`Command`] for signing a [`User`] in with its [`session::Credentials`].
#[derive(Debug)]
pub struct SignIn {
    /// [`session::Credentials`] to sign in with.
    pub credentials: session::Credentials,
}

/// Output of [`SignIn`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`session::Token`] of the created [`Session`].
    pub token: session::Token,

    /// [`session::RefreshToken`] for obtaining the next token pair.
    pub refresh_token: Option<session::RefreshToken>,

    /// [`Session`] claims decoded out of the [`Output::token`].
    pub session: Session,
}

impl<Api> Command<SignIn> for Service<Api>
where
    Api: Backend<
        Authed<Create<session::Credentials>>,
        Ok = session::Grant,
        Err = Traced<infra::Error>,
    >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SignIn) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let grant = self
            .api()
            .execute(Authed::new(Create(cmd.credentials), None))
            .await
            .map_err(|e| {
                if e.as_ref().is_unauthorized() {
                    tracerr::new!(E::WrongCredentials)
                } else {
                    tracerr::map_from(e)
                }
            })?;

        let session = Session::decode(&grant.token)
            .ok_or_else(|| tracerr::new!(E::MalformedToken))?;

        Ok(Output {
            token: grant.token,
            refresh_token: grant.refresh_token,
            session,
        })
    }
}

/// Error of [`SignIn`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Backend`] API error.
    #[display("API operation failed: {_0}")]
    Api(infra::Error),

    /// Issued [`session::Token`] doesn't carry decodable [`Session`] claims.
    #[display("Issued token doesn't carry decodable `Session` claims")]
    MalformedToken,

    /// Provided [`session::Credentials`] are rejected by the API.
    #[display("Wrong `User` credentials")]
    WrongCredentials,
}

#[cfg(all(test, feature = "rest"))]
mod spec {
    use std::time::Duration;

    use common::DateTime;
    use jsonwebtoken::EncodingKey;
    use secrecy::SecretBox;
    use serde_json::json;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::{ExecutionError, SignIn};
    use crate::{
        domain::user::{self, session, Session},
        infra::rest::{Config, Rest},
        Command as _, Service,
    };

    fn service(server: &MockServer) -> Service<Rest> {
        let rest = Rest::new(&Config {
            base_url: server.uri().parse().unwrap(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        Service::new(crate::Config::default(), rest)
    }

    fn command() -> SignIn {
        SignIn {
            credentials: session::Credentials {
                login: user::Login::new("gadler").unwrap(),
                password: SecretBox::new(Box::new(
                    user::Password::new("hunter22").unwrap(),
                )),
            },
        }
    }

    #[tokio::test]
    async fn decodes_session_claims_from_issued_token() {
        let user_id = user::Id::new();
        let access = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &Session {
                user_id,
                expires_at: (DateTime::now() + Duration::from_secs(30 * 60))
                    .coerce(),
            },
            &EncodingKey::from_secret(b"server-side-secret"),
        )
        .unwrap();

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/sign-in/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access": access,
                "refresh": "refresh-token",
            })))
            .mount(&server)
            .await;

        let out = service(&server).execute(command()).await.unwrap();

        assert_eq!(out.session.user_id, user_id);
        assert!(out.refresh_token.is_some());
    }

    #[tokio::test]
    async fn rejection_means_wrong_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/sign-in/"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = service(&server).execute(command()).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::WrongCredentials,
        ));
    }
}
