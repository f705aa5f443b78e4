//! [`Backend`] implementations.
//!
//! [`Backend`]: crate::infra::Backend

mod appointment;
mod patient;
mod record;
mod session;
mod stats;
mod user;

use common::{
    pagination::{Page, Selector},
    query::Encode,
    Canonical,
};
use serde::de::DeserializeOwned;
use tracerr::Traced;

use crate::infra::backend::{self, rest::Rest, Auth};

impl Rest {
    /// Fetches one [`Page`] from the listing endpoint behind `path`,
    /// narrowed by the provided [`Selector`].
    ///
    /// The [`Selector`] is rendered into its [`Canonical`] query string, so
    /// equal selectors always request the same URL. The decoded [`Page`] is
    /// clamped to the requested limit before being returned.
    async fn list<S, F, T>(
        &self,
        path: &str,
        selector: &Selector<S, F>,
        auth: Auth,
    ) -> Result<Page<T>, Traced<backend::Error>>
    where
        S: AsRef<str>,
        F: Encode,
        T: DeserializeOwned,
    {
        let mut url = self.endpoint(path)?;
        let query = Canonical::of(selector);
        url.set_query((!query.as_str().is_empty()).then(|| query.as_str()));

        let page: Page<T> = self.get(url, auth).await?;
        Ok(page.clamped(selector.params.limit()))
    }
}

#[cfg(test)]
mod mock {
    //! Helpers shared by the implementation tests.

    use std::time::Duration;

    use wiremock::MockServer;

    use crate::infra::backend::{
        rest::{Config, Rest},
        Auth,
    };

    /// `Bearer` token the tests authorize with.
    pub(super) const TOKEN: &str = "test-token";

    /// `Authorization` header value carrying the [`TOKEN`].
    pub(super) const BEARER: &str = "Bearer test-token";

    /// Creates a new [`Rest`] client bound to the provided [`MockServer`].
    pub(super) fn rest(server: &MockServer) -> Rest {
        Rest::new(&Config {
            base_url: server.uri().parse().unwrap(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    /// Returns the [`Auth`] credentials carrying the [`TOKEN`].
    pub(super) fn auth() -> Auth {
        Some(TOKEN.parse().unwrap())
    }
}
