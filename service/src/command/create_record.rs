//! [`Command`] for adding a [`Record`].

use common::{operations::{Authorized, Create}, DateTime};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Patient;
use crate::{
    domain::{record, Record},
    infra::{self, Authed, Backend},
    Service,
};

use super::Command;

/// [`Command`] for adding a new [`Record`] to a [`Patient`]'s history.
#[derive(Clone, Debug)]
pub struct CreateRecord {
    /// [`record::Draft`] to add the [`Record`] from.
    pub draft: record::Draft,
}

impl<Api> Command<Authed<CreateRecord>> for Service<Api>
where
    Api: Backend<
        Authed<Create<record::Draft>>,
        Ok = Record,
        Err = Traced<infra::Error>,
    >,
{
    type Ok = Record;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        authed: Authed<CreateRecord>,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Authorized {
            op: cmd,
            credentials,
        } = authed;

        if cmd.draft.recorded_at > DateTime::now().coerce() {
            return Err(tracerr::new!(E::RecordedInFuture));
        }

        self.api()
            .execute(Authed::new(Create(cmd.draft), credentials))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`CreateRecord`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Backend`] API error.
    #[display("API operation failed: {_0}")]
    Api(infra::Error),

    /// Provided [`DateTime`] of the [`Record`] lies in the future.
    #[display("`Record` cannot be taken in the future")]
    RecordedInFuture,
}

#[cfg(all(test, feature = "rest"))]
mod spec {
    use std::time::Duration;

    use common::DateTime;

    use super::{CreateRecord, ExecutionError};
    use crate::{
        domain::{patient, record},
        infra::{
            rest::{Config, Rest},
            Authed,
        },
        Command as _, Service,
    };

    #[tokio::test]
    async fn rejects_recording_in_future() {
        // Validation fails before any request is issued, so no server is
        // required behind the base URL.
        let rest = Rest::new(&Config {
            base_url: "http://127.0.0.1:9/".parse().unwrap(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();
        let service = Service::new(crate::Config::default(), rest);

        let cmd = CreateRecord {
            draft: record::Draft {
                patient_id: patient::Id::new(),
                kind: record::Kind::Consultation,
                title: record::Title::new("Annual checkup").unwrap(),
                note: None,
                recorded_at: (DateTime::now() + Duration::from_secs(3600))
                    .coerce(),
            },
        };
        let err = service
            .execute(Authed::new(cmd, Some("test-token".parse().unwrap())))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::RecordedInFuture));
    }
}
