//! [`Patient`]-related [`Backend`] implementations.
//!
//! [`Backend`]: crate::infra::Backend

use common::operations::{Authorized, By, Create, Delete, Fetch, Update};
use tracerr::Traced;

use crate::{
    domain::{patient, Patient},
    infra::{
        backend::{self, rest::Rest, Authed},
        Backend,
    },
    read::patient::list,
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
            .list::<_, _, wire::Patient>("patients/", &selector, credentials)
            .await?
            .map(Into::into))
    }
}

impl Backend<Authed<Fetch<By<Patient, patient::Id>>>> for Rest {
    type Ok = Patient;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized {
            op: Fetch(by),
            credentials,
        }: Authed<Fetch<By<Patient, patient::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let url = self.endpoint(&format!("patients/{id}/"))?;
        self.get::<wire::Patient>(url, credentials)
            .await
            .map(Into::into)
    }
}

impl Backend<Authed<Create<patient::Draft>>> for Rest {
    type Ok = Patient;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized {
            op: Create(draft),
            credentials,
        }: Authed<Create<patient::Draft>>,
    ) -> Result<Self::Ok, Self::Err> {
        let url = self.endpoint("patients/")?;
        self.post::<wire::Patient>(url, &wire::Draft::from(draft), credentials)
            .await
            .map(Into::into)
    }
}

impl Backend<Authed<Update<(patient::Id, patient::Draft)>>> for Rest {
    type Ok = Patient;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized {
            op: Update((id, draft)),
            credentials,
        }: Authed<Update<(patient::Id, patient::Draft)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let url = self.endpoint(&format!("patients/{id}/"))?;
        self.put::<wire::Patient>(url, &wire::Draft::from(draft), credentials)
            .await
            .map(Into::into)
    }
}

impl Backend<Authed<Delete<patient::Id>>> for Rest {
    type Ok = ();
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized {
            op: Delete(id),
            credentials,
        }: Authed<Delete<patient::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let url = self.endpoint(&format!("patients/{id}/"))?;
        self.delete(url, credentials).await
    }
}

mod wire {
    //! Wire representation of `patients/` endpoint bodies.

    use common::{datetime, Date};
    use serde::{Deserialize, Serialize};

    use crate::domain::patient;

    /// One [`Patient`](crate::domain::Patient) of a `patients/` response.
    #[derive(Debug, Deserialize)]
    pub(super) struct Patient {
        /// ID of the patient.
        pub(super) id: patient::Id,

        /// Full name of the patient.
        pub(super) name: String,

        /// Birth date of the patient.
        #[serde(with = "datetime::serde::iso8601")]
        pub(super) birth_date: Date,

        /// Gender of the patient.
        pub(super) gender: patient::Gender,

        /// Phone number of the patient.
        pub(super) phone: Option<String>,

        /// Email address of the patient.
        pub(super) email: Option<String>,

        /// When the patient was registered.
        #[serde(with = "datetime::serde::rfc3339")]
        pub(super) created_at: patient::CreationDateTime,
    }

    impl From<Patient> for crate::domain::Patient {
        #[expect(unsafe_code, reason = "invariants are preserved")]
        fn from(wire: Patient) -> Self {
            // SAFETY: The API only returns values it validated on write.
            unsafe {
                Self {
                    id: wire.id,
                    name: patient::Name::new_unchecked(wire.name),
                    birth_date: wire.birth_date,
                    gender: wire.gender,
                    phone: wire
                        .phone
                        .map(|n| patient::Phone::new_unchecked(n)),
                    email: wire
                        .email
                        .map(|a| patient::Email::new_unchecked(a)),
                    created_at: wire.created_at,
                }
            }
        }
    }

    /// Body of a `Patient` creation or update request.
    #[derive(Debug, Serialize)]
    pub(super) struct Draft {
        /// Full name of the patient.
        pub(super) name: String,

        /// Birth date of the patient.
        #[serde(with = "datetime::serde::iso8601")]
        pub(super) birth_date: Date,

        /// Gender of the patient.
        pub(super) gender: patient::Gender,

        /// Phone number of the patient.
        pub(super) phone: Option<String>,

        /// Email address of the patient.
        pub(super) email: Option<String>,
    }

    impl From<patient::Draft> for Draft {
        fn from(draft: patient::Draft) -> Self {
            Self {
                name: draft.name.to_string(),
                birth_date: draft.birth_date,
                gender: draft.gender,
                phone: draft.phone.map(|n| n.to_string()),
                email: draft.email.map(|a| a.to_string()),
            }
        }
    }
}
