//! [`Command`] for updating a [`Patient`].

use common::{
    operations::{Authorized, Update},
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

/// [`Command`] for updating an existing [`Patient`].
#[derive(Clone, Debug)]
pub struct UpdatePatient {
    /// ID of the [`Patient`] to update.
    pub id: patient::Id,

    /// [`patient::Draft`] replacing the [`Patient`]'s data.
    pub draft: patient::Draft,
}

impl<Api> Command<Authed<UpdatePatient>> for Service<Api>
where
    Api: Backend<
        Authed<Update<(patient::Id, patient::Draft)>>,
        Ok = Patient,
        Err = Traced<infra::Error>,
    >,
{
    type Ok = Patient;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        authed: Authed<UpdatePatient>,
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
            .execute(Authed::new(Update((cmd.id, cmd.draft)), credentials))
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

/// Error of [`UpdatePatient`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Backend`] API error.
    #[display("API operation failed: {_0}")]
    Api(infra::Error),

    /// Provided birth [`Date`] lies in the future.
    #[display("`Patient` birth date lies in the future")]
    BornInFuture,

    /// [`Patient`] with the provided ID does not exist.
    #[display("`Patient(id: {_0})` does not exist")]
    #[from(ignore)]
    NotExists(#[error(not(source))] patient::Id),
}
