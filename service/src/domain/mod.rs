//! Domain definitions.

pub mod appointment;
pub mod patient;
pub mod record;
pub mod user;

pub use self::{
    appointment::Appointment, patient::Patient, record::Record, user::User,
};
