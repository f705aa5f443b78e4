//! [`Command`] for changing a [`User`]'s [`Role`].
//!
//! [`Role`]: user::Role

use common::operations::{Authorized, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{self, Authed, Backend},
    Service,
};

use super::Command;

/// [`Command`] for changing the [`Role`] of a [`User`].
///
/// [`Role`]: user::Role
#[derive(Clone, Copy, Debug)]
pub struct UpdateUserRole {
    /// ID of the [`User`] to change the [`Role`](user::Role) of.
    pub id: user::Id,

    /// New [`Role`](user::Role) of the [`User`].
    pub role: user::Role,
}

impl<Api> Command<Authed<UpdateUserRole>> for Service<Api>
where
    Api: Backend<
        Authed<Update<(user::Id, user::Role)>>,
        Ok = User,
        Err = Traced<infra::Error>,
    >,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        authed: Authed<UpdateUserRole>,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Authorized {
            op: cmd,
            credentials,
        } = authed;

        self.api()
            .execute(Authed::new(Update((cmd.id, cmd.role)), credentials))
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

/// Error of [`UpdateUserRole`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Backend`] API error.
    #[display("API operation failed: {_0}")]
    Api(infra::Error),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    NotExists(#[error(not(source))] user::Id),
}
