//! [`Command`] definition.

pub mod cancel_appointment;
pub mod create_patient;
pub mod create_record;
pub mod create_user;
pub mod delete_patient;
pub mod delete_record;
pub mod refresh_session;
pub mod schedule_appointment;
pub mod sign_in;
pub mod update_patient;
pub mod update_user_role;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    cancel_appointment::CancelAppointment, create_patient::CreatePatient,
    create_record::CreateRecord, create_user::CreateUser,
    delete_patient::DeletePatient, delete_record::DeleteRecord,
    refresh_session::RefreshSession,
    schedule_appointment::ScheduleAppointment, sign_in::SignIn,
    update_patient::UpdatePatient, update_user_role::UpdateUserRole,
};
