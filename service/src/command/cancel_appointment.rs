//! [`Command`] for cancelling an [`Appointment`].

use common::operations::{Authorized, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{appointment, Appointment},
    infra::{self, Authed, Backend},
    Service,
};

use super::Command;

/// [`Command`] for cancelling a scheduled [`Appointment`].
#[derive(Clone, Copy, Debug)]
pub struct CancelAppointment {
    /// ID of the [`Appointment`] to cancel.
    pub id: appointment::Id,
}

impl<Api> Command<Authed<CancelAppointment>> for Service<Api>
where
    Api: Backend<
        Authed<Update<(appointment::Id, appointment::Status)>>,
        Ok = Appointment,
        Err = Traced<infra::Error>,
    >,
{
    type Ok = Appointment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        authed: Authed<CancelAppointment>,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Authorized {
            op: cmd,
            credentials,
        } = authed;

        self.api()
            .execute(Authed::new(
                Update((cmd.id, appointment::Status::Cancelled)),
                credentials,
            ))
            .await
            .map_err(|e| {
                if e.as_ref().is_not_found() {
                    tracerr::new!(E::NotExists(cmd.id))
                } else {
                    tracerr::map_from(e)
                }
            })
    }
}

/// Error of [`CancelAppointment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Backend`] API error.
    #[display("API operation failed: {_0}")]
    Api(infra::Error),

    /// [`Appointment`] with the provided ID does not exist.
    #[display("`Appointment(id: {_0})` does not exist")]
    #[from(ignore)]
    NotExists(#[error(not(source))] appointment::Id),
}

#[cfg(all(test, feature = "rest"))]
mod spec {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::{CancelAppointment, ExecutionError};
    use crate::{
        domain::{appointment, patient},
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

    #[tokio::test]
    async fn cancels_scheduled_appointment() {
        let server = MockServer::start().await;
        let id = appointment::Id::new();
        Mock::given(method("PATCH"))
            .and(path(format!("/appointments/{id}/")))
            .and(body_json(json!({"status": "CANCELLED"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": id,
                "patient": patient::Id::new(),
                "scheduled_at": "2026-09-03T10:00:00Z",
                "status": "CANCELLED",
                "reason": null,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let cancelled = service(&server)
            .execute(Authed::new(
                CancelAppointment { id },
                Some("test-token".parse().unwrap()),
            ))
            .await
            .unwrap();

        assert_eq!(cancelled.status, appointment::Status::Cancelled);
    }

    #[tokio::test]
    async fn missing_appointment_means_not_exists() {
        let server = MockServer::start().await;
        let id = appointment::Id::new();
        Mock::given(method("PATCH"))
            .and(path(format!("/appointments/{id}/")))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = service(&server)
            .execute(Authed::new(
                CancelAppointment { id },
                Some("test-token".parse().unwrap()),
            ))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::NotExists(missing) if *missing == id,
        ));
    }
}
