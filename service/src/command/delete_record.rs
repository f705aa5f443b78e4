//! [`Command`] for deleting a [`Record`].

use common::operations::{Authorized, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Record;
use crate::{
    domain::record,
    infra::{self, Authed, Backend},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Record`] from a patient's history.
#[derive(Clone, Copy, Debug)]
pub struct DeleteRecord {
    /// ID of the [`Record`] to delete.
    pub id: record::Id,
}

impl<Api> Command<Authed<DeleteRecord>> for Service<Api>
where
    Api: Backend<
        Authed<Delete<record::Id>>,
        Ok = (),
        Err = Traced<infra::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        authed: Authed<DeleteRecord>,
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

/// Error of [`DeleteRecord`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Backend`] API error.
    #[display("API operation failed: {_0}")]
    Api(infra::Error),

    /// [`Record`] with the provided ID does not exist.
    #[display("`Record(id: {_0})` does not exist")]
    #[from(ignore)]
    NotExists(#[error(not(source))] record::Id),
}
