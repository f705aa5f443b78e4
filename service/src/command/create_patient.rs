//! [`Command`] for registering a [`Patient`].

use common::{
    operations::{Authorized, Create},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{patient, Patient},
    infra::{self, Authed, Backend},
    Service,
};

use super::Command;

/// [`Command`] for registering a new [`Patient`].
#[derive(Clone, Debug)]
pub struct CreatePatient {
    /// [`patient::Draft`] to register the [`Patient`] from.
    pub draft: patient::Draft,
}

impl<Api> Command<Authed<CreatePatient>> for Service<Api>
where
    Api: Backend<
        Authed<Create<patient::Draft>>,
        Ok = Patient,
        Err = Traced<infra::Error>,
    >,
{
    type Ok = Patient;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        authed: Authed<CreatePatient>,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Authorized {
            op: cmd,
            credentials,
        } = authed;

        if cmd.draft.birth_date > Date::today() {
            return Err(tracerr::new!(E::BornInFuture));
        }

        self.api()
            .execute(Authed::new(Create(cmd.draft), credentials))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`CreatePatient`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Backend`] API error.
    #[display("API operation failed: {_0}")]
    Api(infra::Error),

    /// Provided birth [`Date`] lies in the future.
    #[display("`Patient` birth date lies in the future")]
    BornInFuture,
}

#[cfg(all(test, feature = "rest"))]
mod spec {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::{CreatePatient, ExecutionError};
    use crate::{
        domain::patient,
        infra::{
            rest::{Config, Rest},
            Authed,
        },
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

    fn draft(birth_date: &str) -> patient::Draft {
        patient::Draft {
            name: patient::Name::new("Jane Roe").unwrap(),
            birth_date: common::Date::from_iso8601(birth_date).unwrap(),
            gender: patient::Gender::Female,
            phone: None,
            email: None,
        }
    }

    fn auth() -> crate::infra::Auth {
        Some("test-token".parse().unwrap())
    }

    #[tokio::test]
    async fn registers_valid_draft() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/patients/"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": patient::Id::new(),
                "name": "Jane Roe",
                "birth_date": "1984-03-12",
                "gender": "FEMALE",
                "phone": null,
                "email": null,
                "created_at": "2024-11-02T09:30:00Z",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let cmd = CreatePatient {
            draft: draft("1984-03-12"),
        };
        let created = service(&server)
            .execute(Authed::new(cmd, auth()))
            .await
            .unwrap();

        assert_eq!(AsRef::<str>::as_ref(&created.name), "Jane Roe");
    }

    #[tokio::test]
    async fn rejects_birth_date_in_future() {
        let server = MockServer::start().await;

        let cmd = CreatePatient {
            draft: draft("2999-01-01"),
        };
        let err = service(&server)
            .execute(Authed::new(cmd, auth()))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::BornInFuture));
    }
}
