//! [`User`]-related [`Backend`] implementations.
//!
//! [`Backend`]: crate::infra::Backend

use common::operations::{Authorized, By, Create, Fetch, Update};
use secrecy::ExposeSecret as _;
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{
        backend::{self, rest::Rest, Authed},
        Backend,
    },
    read::user::list,
};

impl Backend<Authed<Fetch<By<list::Page, list::Selector>>>> for Rest {
    type Ok = list::Page;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized {
            op: Fetch(by),
            credentials,
        }: Authed<Fetch<By<list::Page, list::Selector>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let selector = by.into_inner();
        Ok(self
            .list::<_, _, wire::User>("users/", &selector, credentials)
            .await?
            .map(Into::into))
    }
}

impl Backend<Authed<Fetch<By<User, user::Id>>>> for Rest {
    type Ok = User;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized {
            op: Fetch(by),
            credentials,
        }: Authed<Fetch<By<User, user::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let url = self.endpoint(&format!("users/{id}/"))?;
        self.get::<wire::User>(url, credentials).await.map(Into::into)
    }
}

impl Backend<Authed<Create<user::Draft>>> for Rest {
    type Ok = User;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized {
            op: Create(draft),
            credentials,
        }: Authed<Create<user::Draft>>,
    ) -> Result<Self::Ok, Self::Err> {
        let url = self.endpoint("users/")?;
        let body = wire::Draft {
            name: draft.name.to_string(),
            login: draft.login.to_string(),
            password: draft.password.expose_secret().to_string(),
            role: draft.role,
        };
        self.post::<wire::User>(url, &body, credentials)
            .await
            .map(Into::into)
    }
}

impl Backend<Authed<Update<(user::Id, user::Role)>>> for Rest {
    type Ok = User;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized {
            op: Update((id, role)),
            credentials,
        }: Authed<Update<(user::Id, user::Role)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let url = self.endpoint(&format!("users/{id}/"))?;
        self.patch::<wire::User>(url, &wire::RoleChange { role }, credentials)
            .await
            .map(Into::into)
    }
}

mod wire {
    //! Wire representation of `users/` endpoint bodies.

    use common::datetime;
    use serde::{Deserialize, Serialize};

    use crate::domain::user;

    /// One [`User`](crate::domain::User) of a `users/` response.
    #[derive(Debug, Deserialize)]
    pub(super) struct User {
        /// ID of the user.
        pub(super) id: user::Id,

        /// Name of the user.
        pub(super) name: String,

        /// Login of the user.
        pub(super) login: String,

        /// Role of the user.
        pub(super) role: user::Role,

        /// When the user was created.
        #[serde(with = "datetime::serde::rfc3339")]
        pub(super) created_at: user::CreationDateTime,
    }

    impl From<User> for crate::domain::User {
        #[expect(unsafe_code, reason = "invariants are preserved")]
        fn from(wire: User) -> Self {
            // SAFETY: The API only returns values it validated on write.
            unsafe {
                Self {
                    id: wire.id,
                    name: user::Name::new_unchecked(wire.name),
                    login: user::Login::new_unchecked(wire.login),
                    role: wire.role,
                    created_at: wire.created_at,
                }
            }
        }
    }

    /// Body of a `User` creation request.
    #[derive(Debug, Serialize)]
    pub(super) struct Draft {
        /// Name of the user.
        pub(super) name: String,

        /// Login of the user.
        pub(super) login: String,

        /// Password of the user.
        pub(super) password: String,

        /// Role of the user.
        pub(super) role: user::Role,
    }

    /// Body of a `User` role change request.
    #[derive(Debug, Serialize)]
    pub(super) struct RoleChange {
        /// New role of the user.
        pub(super) role: user::Role,
    }
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Fetch, Update},
        pagination::Ordering,
    };
    use serde_json::json;
    use wiremock::{
        matchers::{header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use super::super::mock;
    use crate::{
        domain::user,
        infra::{backend::Authed, Backend as _},
        read::user::list,
    };

    #[tokio::test]
    async fn renders_descending_ordering_into_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/"))
            .and(query_param("ordering", "-created_at"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 0,
                "next": null,
                "previous": null,
                "results": [],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut selector = list::Selector::default();
        selector
            .params
            .set_ordering(Some(Ordering::descending(list::Sort::CreatedAt)));

        let op = Fetch(By::<list::Page, _>::new(selector));
        let page = mock::rest(&server)
            .execute(Authed::new(op, mock::auth()))
            .await
            .unwrap();

        assert!(page.results.is_empty());
    }

    #[tokio::test]
    async fn changes_role_via_patch() {
        let server = MockServer::start().await;
        let id = user::Id::new();
        Mock::given(method("PATCH"))
            .and(path(format!("/users/{id}/")))
            .and(header("authorization", mock::BEARER))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": id,
                "name": "Grace Adler",
                "login": "gadler",
                "role": "DOCTOR",
                "created_at": "2024-08-20T08:00:00Z",
            })))
            .mount(&server)
            .await;

        let op = Update((id, user::Role::Doctor));
        let updated = mock::rest(&server)
            .execute(Authed::new(op, mock::auth()))
            .await
            .unwrap();

        assert_eq!(updated.role, user::Role::Doctor);
        assert_eq!(updated.login.to_string(), "gadler");
    }
}
