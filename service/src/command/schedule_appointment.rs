//! [`Command`] for scheduling an [`Appointment`].

use common::{
    operations::{Authorized, Create},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Patient;
use crate::{
    domain::{appointment, Appointment},
    infra::{self, Authed, Backend},
    Service,
};

use super::Command;

/// [`Command`] for scheduling a new [`Appointment`] for a [`Patient`].
#[derive(Clone, Debug)]
pub struct ScheduleAppointment {
    /// [`appointment::Draft`] to schedule the [`Appointment`] from.
    pub draft: appointment::Draft,
}

impl<Api> Command<Authed<ScheduleAppointment>> for Service<Api>
where
    Api: Backend<
        Authed<Create<appointment::Draft>>,
        Ok = Appointment,
        Err = Traced<infra::Error>,
    >,
{
    type Ok = Appointment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        authed: Authed<ScheduleAppointment>,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Authorized {
            op: cmd,
            credentials,
        } = authed;

        if cmd.draft.scheduled_at <= DateTime::now().coerce() {
            return Err(tracerr::new!(E::ScheduledInPast));
        }

        self.api()
            .execute(Authed::new(Create(cmd.draft), credentials))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`ScheduleAppointment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Backend`] API error.
    #[display("API operation failed: {_0}")]
    Api(infra::Error),

    /// Provided [`DateTime`] of the [`Appointment`] doesn't lie in the
    /// future.
    #[display("`Appointment` cannot be scheduled in the past")]
    ScheduledInPast,
}

#[cfg(all(test, feature = "rest"))]
mod spec {
    use std::time::Duration;

    use common::DateTime;

    use super::{ExecutionError, ScheduleAppointment};
    use crate::{
        domain::{appointment, patient},
        infra::{
            rest::{Config, Rest},
            Authed,
        },
        Command as _, Service,
    };

    #[tokio::test]
    async fn rejects_scheduling_in_past() {
        // Validation fails before any request is issued, so no server is
        // required behind the base URL.
        let rest = Rest::new(&Config {
            base_url: "http://127.0.0.1:9/".parse().unwrap(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();
        let service = Service::new(crate::Config::default(), rest);

        let cmd = ScheduleAppointment {
            draft: appointment::Draft {
                patient_id: patient::Id::new(),
                scheduled_at: (DateTime::now() - Duration::from_secs(3600))
                    .coerce(),
                reason: None,
            },
        };
        let err = service
            .execute(Authed::new(cmd, Some("test-token".parse().unwrap())))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::ScheduledInPast));
    }
}
