//! [`Query`] definition.

pub mod appointments;
pub mod patients;
pub mod records;
pub mod stats;
pub mod users;

use common::operations::{By, Fetch};
use tracerr::Traced;

use crate::{
    infra::{self, Authed, Backend},
    Service,
};

/// [`Query`] of the [`Service`].
pub use common::Handler as Query;

/// [`Query`] [`Fetch`]ing a `W` from a [`Backend`] by a `B`.
///
/// Executed wrapped into [`Authed`], so the credentials it's performed with
/// always flow in explicitly.
#[derive(Clone, Copy, Debug)]
#[expect(clippy::module_name_repetitions, reason = "more readable")]
pub struct ApiQuery<T>(T);

impl<W, B> ApiQuery<By<W, B>> {
    /// Creates a new [`ApiQuery`] fetching a `W` by the provided `B`.
    #[must_use]
    pub fn by(by: B) -> Self {
        Self(By::new(by))
    }
}

impl<Api, W, B> Query<Authed<ApiQuery<By<W, B>>>> for Service<Api>
where
    Api: Backend<
        Authed<Fetch<By<W, B>>>,
        Ok = W,
        Err = Traced<infra::Error>,
    >,
{
    type Ok = W;
    type Err = Traced<infra::Error>;

    async fn execute(
        &self,
        authed: Authed<ApiQuery<By<W, B>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Authed {
            op: ApiQuery(by),
            credentials,
        } = authed;
        self.api()
            .execute(Authed::new(Fetch(by), credentials))
            .await
            .map_err(tracerr::wrap!())
    }
}
