//! [`Query`] collection related to dashboard statistics.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::read;

use super::ApiQuery;

/// Queries the totals displayed on the dashboard.
pub type Dashboard = ApiQuery<By<read::Dashboard, ()>>;
