//! [`Appointment`]-related [`Backend`] implementations.
//!
//! [`Backend`]: crate::infra::Backend

use common::operations::{Authorized, By, Create, Fetch, Update};
use tracerr::Traced;

use crate::{
    domain::{appointment, Appointment},
    infra::{
        backend::{self, rest::Rest, Authed},
        Backend,
    },
    read::appointment::list,
};

impl Backend<Authed<Fetch<By<list::Page, list::Selector>>>> for Rest {
    type Ok = list::Page;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized {
            op: Fetch(by),
            credentials,
        }: Authed<Fetch<By<list::Page, list::Selector>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let selector = by.into_inner();
        Ok(self
            .list::<_, _, wire::Appointment>(
                "appointments/",
                &selector,
                credentials,
            )
            .await?
            .map(Into::into))
    }
}

impl Backend<Authed<Fetch<By<Appointment, appointment::Id>>>> for Rest {
    type Ok = Appointment;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized {
            op: Fetch(by),
            credentials,
        }: Authed<Fetch<By<Appointment, appointment::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let url = self.endpoint(&format!("appointments/{id}/"))?;
        self.get::<wire::Appointment>(url, credentials)
            .await
            .map(Into::into)
    }
}

impl Backend<Authed<Create<appointment::Draft>>> for Rest {
    type Ok = Appointment;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized {
            op: Create(draft),
            credentials,
        }: Authed<Create<appointment::Draft>>,
    ) -> Result<Self::Ok, Self::Err> {
        let url = self.endpoint("appointments/")?;
        self.post::<wire::Appointment>(
            url,
            &wire::Draft::from(draft),
            credentials,
        )
        .await
        .map(Into::into)
    }
}

impl Backend<Authed<Update<(appointment::Id, appointment::Status)>>>
    for Rest
{
    type Ok = Appointment;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized {
            op: Update((id, status)),
            credentials,
        }: Authed<Update<(appointment::Id, appointment::Status)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let url = self.endpoint(&format!("appointments/{id}/"))?;
        self.patch::<wire::Appointment>(
            url,
            &wire::StatusChange { status },
            credentials,
        )
        .await
        .map(Into::into)
    }
}

mod wire {
    //! Wire representation of `appointments/` endpoint bodies.

    use common::datetime;
    use serde::{Deserialize, Serialize};

    use crate::domain::{appointment, patient};

    /// One [`Appointment`](crate::domain::Appointment) of an
    /// `appointments/` response.
    #[derive(Debug, Deserialize)]
    pub(super) struct Appointment {
        /// ID of the appointment.
        pub(super) id: appointment::Id,

        /// ID of the patient the appointment is scheduled for.
        pub(super) patient: patient::Id,

        /// When the appointment is scheduled.
        #[serde(with = "datetime::serde::rfc3339")]
        pub(super) scheduled_at: appointment::SchedulingDateTime,

        /// Status of the appointment.
        pub(super) status: appointment::Status,

        /// Reason of the appointment.
        pub(super) reason: Option<String>,
    }

    impl From<Appointment> for crate::domain::Appointment {
        #[expect(unsafe_code, reason = "invariants are preserved")]
        fn from(wire: Appointment) -> Self {
            // SAFETY: The API only returns values it validated on write.
            unsafe {
                Self {
                    id: wire.id,
                    patient_id: wire.patient,
                    scheduled_at: wire.scheduled_at,
                    status: wire.status,
                    reason: wire
                        .reason
                        .map(|r| appointment::Reason::new_unchecked(r)),
                }
            }
        }
    }

    /// Body of an `Appointment` scheduling request.
    #[derive(Debug, Serialize)]
    pub(super) struct Draft {
        /// ID of the patient the appointment is scheduled for.
        pub(super) patient: patient::Id,

        /// When the appointment is scheduled.
        #[serde(with = "datetime::serde::rfc3339")]
        pub(super) scheduled_at: appointment::SchedulingDateTime,

        /// Reason of the appointment.
        pub(super) reason: Option<String>,
    }

    impl From<appointment::Draft> for Draft {
        fn from(draft: appointment::Draft) -> Self {
            Self {
                patient: draft.patient_id,
                scheduled_at: draft.scheduled_at,
                reason: draft.reason.map(|r| r.to_string()),
            }
        }
    }

    /// Body of an `Appointment` status change request.
    #[derive(Debug, Serialize)]
    pub(super) struct StatusChange {
        /// New status of the appointment.
        pub(super) status: appointment::Status,
    }
}

#[cfg(test)]
mod spec {
    use common::operations::Update;
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::super::mock;
    use crate::{
        domain::{appointment, patient},
        infra::{backend::Authed, Backend as _},
    };

    #[tokio::test]
    async fn patches_status_on_cancellation() {
        let server = MockServer::start().await;
        let id = appointment::Id::new();
        Mock::given(method("PATCH"))
            .and(path(format!("/appointments/{id}/")))
            .and(header("authorization", mock::BEARER))
            .and(body_json(json!({"status": "CANCELLED"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": id,
                "patient": patient::Id::new(),
                "scheduled_at": "2025-06-01T14:30:00Z",
                "status": "CANCELLED",
                "reason": "Yearly check-up",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let op = Update((id, appointment::Status::Cancelled));
        let cancelled = mock::rest(&server)
            .execute(Authed::new(op, mock::auth()))
            .await
            .unwrap();

        assert_eq!(cancelled.id, id);
        assert_eq!(cancelled.status, appointment::Status::Cancelled);
    }
}
