//! Domain definitions.

pub mod caretaker;
pub mod dashboard;
pub mod deposit;
pub mod lease;
pub mod maintenance;
pub mod manager;
pub mod payment;
pub mod property;
pub mod proprietor;
pub mod technician;
pub mod tenant;
pub mod unit;
pub mod user;

pub use self::{
    caretaker::Caretaker, deposit::Deposit, lease::Lease,
    maintenance::Request as MaintenanceRequest, payment::Payment,
    property::Property, proprietor::Proprietor, technician::Technician,
    tenant::Tenant, unit::Unit, user::User,
};
