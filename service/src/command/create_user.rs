//! [`Command`] for creating a [`User`].

use common::operations::{Authorized, Create};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{self, Authed, Backend},
    Service,
};

use super::Command;

/// [`Command`] for creating a new staff [`User`].
#[derive(Clone, Debug)]
pub struct CreateUser {
    /// [`user::Draft`] to create the [`User`] from.
    pub draft: user::Draft,
}

impl<Api> Command<Authed<CreateUser>> for Service<Api>
where
    Api: Backend<
        Authed<Create<user::Draft>>,
        Ok = User,
        Err = Traced<infra::Error>,
    >,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        authed: Authed<CreateUser>,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Authorized {
            op: cmd,
            credentials,
        } = authed;

        self.api()
            .execute(Authed::new(Create(cmd.draft), credentials))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`CreateUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Backend`] API error.
    #[display("API operation failed: {_0}")]
    Api(infra::Error),
}
