//! GraphQL API definitions.

pub mod caretaker;
pub mod dashboard;
pub mod lease;
pub mod maintenance;
mod mutation;
pub mod payment;
pub mod property;
pub mod proprietor;
mod query;
pub mod scalar;
mod subscription;
pub mod technician;
pub mod user;

use crate::define_error;

pub use self::{
    caretaker::{Caretaker, Duty},
    lease::{Lease, Tenant},
    maintenance::Request as MaintenanceRequest,
    mutation::Mutation,
    payment::{Deposit, Payment},
    property::{Property, Unit},
    proprietor::{Ownership, Proprietor},
    query::Query,
    subscription::Subscription,
    technician::Technician,
    user::User,
};

/// GraphQL schema.
pub type Schema = juniper::RootNode<'static, Query, Mutation, Subscription>;

/// Defines a GraphQL enum mirroring the provided domain kind.
///
/// Both the domain kind and the GraphQL enum must have the same variants.
#[macro_export]
macro_rules! define_enum {
    (
        #[doc = $doc:literal]
        #[graphql(name = $gql_name:literal)]
        enum $name:ident for $domain:ty {
            $(
                #[doc = $variant_doc:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            Eq,
            ::juniper::GraphQLEnum,
            PartialEq,
        )]
        #[doc = $doc]
        #[graphql(name = $gql_name)]
        pub enum $name {
            $(
                #[doc = $variant_doc]
                $variant,
            )*
        }

        impl From<$domain> for $name {
            fn from(kind: $domain) -> Self {
                type D = $domain;
                match kind {
                    $( D::$variant => Self::$variant, )*
                }
            }
        }

        impl From<$name> for $domain {
            fn from(kind: $name) -> Self {
                match kind {
                    $( $name::$variant => Self::$variant, )*
                }
            }
        }
    };
}

define_error! {
    enum PrivilegeError {
        #[code = "PRIVILEGE_NOT_SUPER_ADMIN"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must be a super-admin"]
        SuperAdmin,

        #[code = "PRIVILEGE_NOT_MANAGER"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must manage the `Property`"]
        Manager,

        #[code = "PRIVILEGE_NOT_TECHNICIAN"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must be a registered technician"]
        Technician,

        #[code = "PRIVILEGE_NOT_CARETAKER"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must be a registered caretaker"]
        Caretaker,

        #[code = "PRIVILEGE_NOT_PROPRIETOR"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must be a registered proprietor"]
        Proprietor,

        #[code = "PRIVILEGE_NOT_REPORTER"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must be the reporter of the \
                     `MaintenanceRequest`"]
        Reporter,

        #[code = "PRIVILEGE_NOT_SUPERVISOR"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must supervise the `Caretaker`"]
        Supervisor,

        #[code = "PRIVILEGE_NOT_ALLOWED"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` is not allowed to do this"]
        NotAllowed,
    }
}

define_error! {
    enum PaginationError {
        #[code = "AMBIGUOUS_PAGINATION_ARGUMENTS"]
        #[status = BAD_REQUEST]
        #[message = "Ambiguous pagination arguments"]
        Ambiguous,
    }
}
