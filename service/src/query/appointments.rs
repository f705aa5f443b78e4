//! [`Query`] collection related to [`Appointment`]s.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{appointment, Appointment},
    read,
};

use super::ApiQuery;

/// Queries one [`Page`](read::appointment::list::Page) of the
/// [`Appointment`]s list.
pub type List = ApiQuery<
    By<read::appointment::list::Page, read::appointment::list::Selector>,
>;

/// Queries an [`Appointment`] by its [`appointment::Id`].
pub type ById = ApiQuery<By<Appointment, appointment::Id>>;
