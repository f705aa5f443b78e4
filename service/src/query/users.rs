//! [`Query`] collection related to [`User`]s.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{user, User},
    read,
};

use super::ApiQuery;

/// Queries one [`Page`](read::user::list::Page) of the [`User`]s list.
pub type List =
    ApiQuery<By<read::user::list::Page, read::user::list::Selector>>;

/// Queries a [`User`] by its [`user::Id`].
pub type ById = ApiQuery<By<User, user::Id>>;
