//! [`Appointment`] read model definition.
//!
//! [`Appointment`]: crate::domain::Appointment

pub mod list {
    //! [`Appointment`]s list definitions.

    use common::{
        define_pagination,
        query::{Encode, Encoder},
        Date,
    };
    use strum::{AsRefStr, EnumString};

    use crate::domain::{appointment, patient, Appointment};

    define_pagination!(Sort, Filter, Node);

    /// Item of a [`Page`].
    pub type Node = Appointment;

    /// Field a list of [`Appointment`]s is sorted by.
    #[derive(AsRefStr, Clone, Copy, Debug, EnumString, Eq, PartialEq)]
    #[strum(serialize_all = "snake_case")]
    pub enum Sort {
        /// By [`appointment::SchedulingDateTime`].
        ScheduledAt,

        /// By [`appointment::Status`].
        Status,
    }

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Filter {
        /// [`patient::Id`] to narrow the list to the [`Appointment`]s of.
        pub patient: Option<patient::Id>,

        /// [`appointment::Status`] to narrow the list to.
        pub status: Option<appointment::Status>,

        /// Earliest [`Date`] an [`Appointment`] may be scheduled on.
        pub scheduled_after: Option<Date>,

        /// Latest [`Date`] an [`Appointment`] may be scheduled on.
        pub scheduled_before: Option<Date>,
    }

    impl Encode for Filter {
        fn encode(&self, to: &mut Encoder) {
            if let Some(patient) = self.patient {
                to.param("patient", patient);
            }
            if let Some(status) = self.status {
                to.param("status", status);
            }
            if let Some(after) = self.scheduled_after {
                to.param("scheduled_after", after.to_iso8601());
            }
            if let Some(before) = self.scheduled_before {
                to.param("scheduled_before", before.to_iso8601());
            }
        }
    }
}
