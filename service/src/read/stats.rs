//! Dashboard statistics read model definition.

use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::domain::{Appointment, Patient, Record, User};

/// Totals displayed on the dashboard.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct Dashboard {
    /// Total number of [`Patient`]s.
    pub patients: u64,

    /// Total number of [`Record`]s.
    pub records: u64,

    /// Total number of [`Appointment`]s.
    pub appointments: u64,

    /// Total number of [`User`]s.
    pub users: u64,
}
