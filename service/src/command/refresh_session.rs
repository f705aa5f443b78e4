//! [`Command`] for refreshing a [`Session`].

use common::operations::Create;
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::user::{session, Session},
    infra::{self, Authed, Backend},
    Service,
};

use super::Command;

/// [`Command`] for exchanging a [`session::RefreshToken`] for a fresh
/// [`session::Token`].
#[derive(Debug)]
pub struct RefreshSession {
    /// [`session::RefreshToken`] to exchange.
    pub refresh_token: session::RefreshToken,
}

/// Output of [`RefreshSession`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Fresh [`session::Token`] of the [`Session`].
    pub token: session::Token,

    /// [`Session`] claims decoded out of the [`Output::token`].
    pub session: Session,
}

impl<Api> Command<RefreshSession> for Service<Api>
where
    Api: Backend<
        Authed<Create<session::RefreshToken>>,
        Ok = session::Grant,
        Err = Traced<infra::Error>,
    >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: RefreshSession) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let grant = self
            .api()
            .execute(Authed::new(Create(cmd.refresh_token), None))
            .await
            .map_err(|e| {
                if e.as_ref().is_unauthorized() {
                    tracerr::new!(E::Expired)
                } else {
                    tracerr::map_from(e)
                }
            })?;

        let session = Session::decode(&grant.token)
            .ok_or_else(|| tracerr::new!(E::MalformedToken))?;

        Ok(Output {
            token: grant.token,
            session,
        })
    }
}

/// Error of [`RefreshSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Backend`] API error.
    #[display("API operation failed: {_0}")]
    Api(infra::Error),

    /// Provided [`session::RefreshToken`] is no longer accepted.
    #[display("`Session` has expired")]
    Expired,

    /// Issued [`session::Token`] doesn't carry decodable [`Session`] claims.
    #[display("Issued token doesn't carry decodable `Session` claims")]
    MalformedToken,
}

#[cfg(all(test, feature = "rest"))]
mod spec {
    use std::time::Duration;

    use common::DateTime;
    use jsonwebtoken::EncodingKey;
    use serde_json::json;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::{ExecutionError, RefreshSession};
    use crate::{
        domain::user::{self, Session},
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

    fn command() -> RefreshSession {
        RefreshSession {
            refresh_token: "refresh-token".parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn exchanges_refresh_token_for_fresh_claims() {
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
            .and(path("/auth/refresh/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access": access,
            })))
            .mount(&server)
            .await;

        let out = service(&server).execute(command()).await.unwrap();

        assert_eq!(out.session.user_id, user_id);
    }

    #[tokio::test]
    async fn rejection_means_expired_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh/"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = service(&server).execute(command()).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Expired));
    }
}
