//! [`User`] read model definition.
//!
//! [`User`]: crate::domain::User

pub mod list {
    //! [`User`]s list definitions.

    use common::{
        define_pagination,
        query::{Encode, Encoder},
    };
    use strum::{AsRefStr, EnumString};

    use crate::domain::{user, User};

    define_pagination!(Sort, Filter, Node);

    /// Item of a [`Page`].
    pub type Node = User;

    /// Field a list of [`User`]s is sorted by.
    #[derive(AsRefStr, Clone, Copy, Debug, EnumString, Eq, PartialEq)]
    #[strum(serialize_all = "snake_case")]
    pub enum Sort {
        /// By [`user::Name`].
        Name,

        /// By [`user::Login`].
        Login,

        /// By [`user::CreationDateTime`].
        CreatedAt,
    }

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Filter {
        /// [`user::Role`] to narrow the list to.
        pub role: Option<user::Role>,
    }

    impl Encode for Filter {
        fn encode(&self, to: &mut Encoder) {
            if let Some(role) = self.role {
                to.param("role", role);
            }
        }
    }
}
