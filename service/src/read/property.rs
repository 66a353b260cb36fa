//! [`Property`] read model definition.
//!
//! [`Property`]: crate::domain::Property

pub mod list {
    //! [`Property`] list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::property;
    #[cfg(doc)]
    use crate::domain::Property;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = property::Id;

    /// Cursor pointing to a specific [`Property`] in a list.
    pub type Cursor = property::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`property::Name`] (or its part) to fuzzy search for.
        pub name: Option<property::Name>,

        /// Indicator whether [`property::Status::Inactive`] [`Property`]s
        /// should be listed too.
        pub include_inactive: bool,
    }

    /// Total count of [`Property`] list items.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
