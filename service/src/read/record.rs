//! [`Record`] read model definition.
//!
//! [`Record`]: crate::domain::Record

pub mod list {
    //! [`Record`]s list definitions.

    use common::{
        define_pagination,
        query::{Encode, Encoder},
    };
    use strum::{AsRefStr, EnumString};

    use crate::domain::{patient, record, Record};

    define_pagination!(Sort, Filter, Node);

    /// Item of a [`Page`].
    pub type Node = Record;

    /// Field a list of [`Record`]s is sorted by.
    #[derive(AsRefStr, Clone, Copy, Debug, EnumString, Eq, PartialEq)]
    #[strum(serialize_all = "snake_case")]
    pub enum Sort {
        /// By [`record::Title`].
        Title,

        /// By [`record::RecordingDateTime`].
        RecordedAt,
    }

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Filter {
        /// [`patient::Id`] to narrow the list to the [`Record`]s of.
        pub patient: Option<patient::Id>,

        /// [`record::Kind`] to narrow the list to.
        pub kind: Option<record::Kind>,
    }

    impl Encode for Filter {
        fn encode(&self, to: &mut Encoder) {
            if let Some(patient) = self.patient {
                to.param("patient", patient);
            }
            if let Some(kind) = self.kind {
                to.param("kind", kind);
            }
        }
    }
}
