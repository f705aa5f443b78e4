//! [`Command`] for deleting a [`Patient`].

use common::operations::{Authorized, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Patient;
use crate::{
    domain::patient,
    infra::{self, Authed, Backend},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Patient`] along with its history.
#[derive(Clone, Copy, Debug)]
pub struct DeletePatient {
    /// ID of the [`Patient`] to delete.
    pub id: patient::Id,
}

impl<Api> Command<Authed<DeletePatient>> for Service<Api>
where
    Api: Backend<
        Authed<Delete<patient::Id>>,
        Ok = (),
        Err = Traced<infra::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        authed: Authed<DeletePatient>,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Authorized {
            op: cmd,
            credentials,
        } = authed;

        self.api()
            .execute(Authed::new(Delete(cmd.id), credentials))
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

/// Error of [`DeletePatient`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Backend`] API error.
    #[display("API operation failed: {_0}")]
    Api(infra::Error),

    /// [`Patient`] with the provided ID does not exist.
    #[display("`Patient(id: {_0})` does not exist")]
    #[from(ignore)]
    NotExists(#[error(not(source))] patient::Id),
}
