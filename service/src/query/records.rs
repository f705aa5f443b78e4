//! [`Query`] collection related to [`Record`]s.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{record, Record},
    read,
};

use super::ApiQuery;

/// Queries one [`Page`](read::record::list::Page) of the [`Record`]s list.
pub type List =
    ApiQuery<By<read::record::list::Page, read::record::list::Selector>>;

/// Queries a [`Record`] by its [`record::Id`].
pub type ById = ApiQuery<By<Record, record::Id>>;
