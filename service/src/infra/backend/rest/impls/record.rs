//! [`Record`]-related [`Backend`] implementations.
//!
//! [`Backend`]: crate::infra::Backend

use common::operations::{Authorized, By, Create, Delete, Fetch};
use tracerr::Traced;

use crate::{
    domain::{record, Record},
    infra::{
        backend::{self, rest::Rest, Authed},
        Backend,
    },
    read::record::list,
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
            .list::<_, _, wire::Record>("records/", &selector, credentials)
            .await?
            .map(Into::into))
    }
}

impl Backend<Authed<Fetch<By<Record, record::Id>>>> for Rest {
    type Ok = Record;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized {
            op: Fetch(by),
            credentials,
        }: Authed<Fetch<By<Record, record::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let url = self.endpoint(&format!("records/{id}/"))?;
        self.get::<wire::Record>(url, credentials)
            .await
            .map(Into::into)
    }
}

impl Backend<Authed<Create<record::Draft>>> for Rest {
    type Ok = Record;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized {
            op: Create(draft),
            credentials,
        }: Authed<Create<record::Draft>>,
    ) -> Result<Self::Ok, Self::Err> {
        let url = self.endpoint("records/")?;
        self.post::<wire::Record>(url, &wire::Draft::from(draft), credentials)
            .await
            .map(Into::into)
    }
}

impl Backend<Authed<Delete<record::Id>>> for Rest {
    type Ok = ();
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized {
            op: Delete(id),
            credentials,
        }: Authed<Delete<record::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let url = self.endpoint(&format!("records/{id}/"))?;
        self.delete(url, credentials).await
    }
}

mod wire {
    //! Wire representation of `records/` endpoint bodies.

    use common::datetime;
    use serde::{Deserialize, Serialize};

    use crate::domain::{patient, record, user};

    /// One [`Record`](crate::domain::Record) of a `records/` response.
    #[derive(Debug, Deserialize)]
    pub(super) struct Record {
        /// ID of the record.
        pub(super) id: record::Id,

        /// ID of the patient the record belongs to.
        pub(super) patient: patient::Id,

        /// Kind of the record.
        pub(super) kind: record::Kind,

        /// Title of the record.
        pub(super) title: String,

        /// Note attached to the record.
        pub(super) note: Option<String>,

        /// When the record was taken.
        #[serde(with = "datetime::serde::rfc3339")]
        pub(super) recorded_at: record::RecordingDateTime,

        /// ID of the user who authored the record.
        pub(super) author: user::Id,
    }

    impl From<Record> for crate::domain::Record {
        #[expect(unsafe_code, reason = "invariants are preserved")]
        fn from(wire: Record) -> Self {
            // SAFETY: The API only returns values it validated on write.
            unsafe {
                Self {
                    id: wire.id,
                    patient_id: wire.patient,
                    kind: wire.kind,
                    title: record::Title::new_unchecked(wire.title),
                    note: wire.note.map(|n| record::Note::new_unchecked(n)),
                    recorded_at: wire.recorded_at,
                    author_id: wire.author,
                }
            }
        }
    }

    /// Body of a `Record` creation request.
    #[derive(Debug, Serialize)]
    pub(super) struct Draft {
        /// ID of the patient the record belongs to.
        pub(super) patient: patient::Id,

        /// Kind of the record.
        pub(super) kind: record::Kind,

        /// Title of the record.
        pub(super) title: String,

        /// Note attached to the record.
        pub(super) note: Option<String>,

        /// When the record was taken.
        #[serde(with = "datetime::serde::rfc3339")]
        pub(super) recorded_at: record::RecordingDateTime,
    }

    impl From<record::Draft> for Draft {
        fn from(draft: record::Draft) -> Self {
            Self {
                patient: draft.patient_id,
                kind: draft.kind,
                title: draft.title.to_string(),
                note: draft.note.map(|n| n.to_string()),
                recorded_at: draft.recorded_at,
            }
        }
    }
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Fetch};
    use serde_json::json;
    use wiremock::{
        matchers::{header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use super::super::mock;
    use crate::{
        domain::{patient, record},
        infra::{backend::Authed, Backend as _},
        read::record::list,
    };

    #[tokio::test]
    async fn lists_records_filtered_by_patient() {
        let server = MockServer::start().await;
        let patient_id = patient::Id::new();
        Mock::given(method("GET"))
            .and(path("/records/"))
            .and(header("authorization", mock::BEARER))
            .and(query_param("limit", "10"))
            .and(query_param("offset", "0"))
            .and(query_param("patient", patient_id.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 1,
                "next": null,
                "previous": null,
                "results": [{
                    "id": record::Id::new(),
                    "patient": patient_id,
                    "kind": "PRESCRIPTION",
                    "title": "Amoxicillin 500mg",
                    "note": "Three times a day, 7 days.",
                    "recorded_at": "2025-01-14T10:00:00Z",
                    "author": crate::domain::user::Id::new(),
                }],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let selector = list::Selector {
            params: list::Params::new(),
            filter: list::Filter {
                patient: Some(patient_id),
                kind: None,
            },
        };
        let op = Fetch(By::<list::Page, _>::new(selector));
        let page = mock::rest(&server)
            .execute(Authed::new(op, mock::auth()))
            .await
            .unwrap();

        assert_eq!(page.count, 1);
        assert_eq!(page.results[0].patient_id, patient_id);
        assert_eq!(page.results[0].kind, record::Kind::Prescription);
        assert_eq!(AsRef::<str>::as_ref(&page.results[0].title), "Amoxicillin 500mg");
    }
}
