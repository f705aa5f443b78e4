//! Dashboard statistics [`Backend`] implementations.
//!
//! [`Backend`]: crate::infra::Backend

use common::operations::{Authorized, By, Fetch};
use tracerr::Traced;

use crate::{
    infra::{
        backend::{self, rest::Rest, Authed},
        Backend,
    },
    read::Dashboard,
};

impl Backend<Authed<Fetch<By<Dashboard, ()>>>> for Rest {
    type Ok = Dashboard;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized { op: _, credentials }: Authed<Fetch<By<Dashboard, ()>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let url = self.endpoint("dashboard/")?;
        self.get(url, credentials).await
    }
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Fetch};
    use serde_json::json;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::super::mock;
    use crate::{
        infra::{backend::Authed, Backend as _},
        read::Dashboard,
    };

    #[tokio::test]
    async fn fetches_dashboard_totals() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dashboard/"))
            .and(header("authorization", mock::BEARER))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "patients": 1280,
                "records": 9541,
                "appointments": 317,
                "users": 24,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let op = Fetch(By::<Dashboard, _>::new(()));
        let totals = mock::rest(&server)
            .execute(Authed::new(op, mock::auth()))
            .await
            .unwrap();

        assert_eq!(totals.patients, 1280);
        assert_eq!(totals.users, 24);
    }
}
