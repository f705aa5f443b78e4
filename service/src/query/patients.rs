//! [`Query`] collection related to [`Patient`]s.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{patient, Patient},
    read,
};

use super::ApiQuery;

/// Queries one [`Page`](read::patient::list::Page) of the [`Patient`]s list.
pub type List = ApiQuery<
    By<read::patient::list::Page, read::patient::list::Selector>,
>;

/// Queries a [`Patient`] by its [`patient::Id`].
pub type ById = ApiQuery<By<Patient, patient::Id>>;
