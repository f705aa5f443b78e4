//! [`Patient`] read model definition.
//!
//! [`Patient`]: crate::domain::Patient

pub mod list {
    //! [`Patient`]s list definitions.

    use common::{
        define_pagination,
        query::{Encode, Encoder},
    };
    use strum::{AsRefStr, EnumString};

    use crate::domain::{patient, Patient};

    define_pagination!(Sort, Filter, Node);

    /// Item of a [`Page`].
    pub type Node = Patient;

    /// Field a list of [`Patient`]s is sorted by.
    #[derive(AsRefStr, Clone, Copy, Debug, EnumString, Eq, PartialEq)]
    #[strum(serialize_all = "snake_case")]
    pub enum Sort {
        /// By [`patient::Name`].
        Name,

        /// By [`patient::BirthDate`].
        BirthDate,

        /// By [`patient::CreationDateTime`].
        CreatedAt,
    }

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Filter {
        /// [`patient::Gender`] to narrow the list to.
        pub gender: Option<patient::Gender>,
    }

    impl Encode for Filter {
        fn encode(&self, to: &mut Encoder) {
            if let Some(gender) = self.gender {
                to.param("gender", gender);
            }
        }
    }
}
