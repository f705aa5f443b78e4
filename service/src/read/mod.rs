//! Read entities definitions.

pub mod appointment;
pub mod patient;
pub mod record;
pub mod stats;
pub mod user;

pub use self::stats::Dashboard;
