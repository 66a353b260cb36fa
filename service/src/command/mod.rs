//! [`Command`] definition.

pub mod assign_caretaker;
pub mod assign_maintenance_request;
pub mod assign_property_manager;
pub mod assign_property_ownership;
pub mod assign_technician_to_property;
pub mod authorize_user_session;
pub mod auto_assign_maintenance_request;
pub mod cancel_caretaker_duty;
pub mod collect_security_deposit;
pub mod create_caretaker_duty;
pub mod create_job_update;
pub mod create_lease;
pub mod create_maintenance_request;
pub mod create_property;
pub mod create_proprietor_report;
pub mod create_rent_charge;
pub mod create_technician_category;
pub mod create_unit;
pub mod create_user_session;
pub mod ensure_super_admin;
pub mod escalate_maintenance_request;
pub mod mark_proprietor_message_read;
mod privilege;
pub mod rate_maintenance_request;
pub mod record_rent_payment;
pub mod register_caretaker;
pub mod register_proprietor;
pub mod register_technician;
pub mod register_user;
pub mod release_security_deposit;
pub mod review_caretaker_duty;
pub mod revoke_property_ownership;
pub mod send_proprietor_message;
pub mod send_proprietor_report;
pub mod start_caretaker_duty;
pub mod submit_caretaker_duty_report;
pub mod terminate_lease;
pub mod unassign_caretaker;
pub mod unassign_property_manager;
pub mod unassign_technician_from_property;
pub mod update_caretaker;
pub mod update_maintenance_request_status;
pub mod update_property;
pub mod update_proprietor_report;
pub mod update_technician_availability;
pub mod update_technician_category;
pub mod update_unit;
pub mod update_user_password;
pub mod update_user_profile;
pub mod update_user_status;
pub mod waive_rent_payment;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    assign_caretaker::AssignCaretaker,
    assign_maintenance_request::AssignMaintenanceRequest,
    assign_property_manager::AssignPropertyManager,
    assign_property_ownership::AssignPropertyOwnership,
    assign_technician_to_property::AssignTechnicianToProperty,
    authorize_user_session::AuthorizeUserSession,
    auto_assign_maintenance_request::AutoAssignMaintenanceRequest,
    cancel_caretaker_duty::CancelCaretakerDuty,
    collect_security_deposit::CollectSecurityDeposit,
    create_caretaker_duty::CreateCaretakerDuty,
    create_job_update::CreateJobUpdate, create_lease::CreateLease,
    create_maintenance_request::CreateMaintenanceRequest,
    create_property::CreateProperty,
    create_proprietor_report::CreateProprietorReport,
    create_rent_charge::CreateRentCharge,
    create_technician_category::CreateTechnicianCategory,
    create_unit::CreateUnit, create_user_session::CreateUserSession,
    ensure_super_admin::EnsureSuperAdmin,
    escalate_maintenance_request::EscalateMaintenanceRequest,
    mark_proprietor_message_read::MarkProprietorMessageRead,
    rate_maintenance_request::RateMaintenanceRequest,
    record_rent_payment::RecordRentPayment,
    register_caretaker::RegisterCaretaker,
    register_proprietor::RegisterProprietor,
    register_technician::RegisterTechnician, register_user::RegisterUser,
    release_security_deposit::ReleaseSecurityDeposit,
    review_caretaker_duty::ReviewCaretakerDuty,
    revoke_property_ownership::RevokePropertyOwnership,
    send_proprietor_message::SendProprietorMessage,
    send_proprietor_report::SendProprietorReport,
    start_caretaker_duty::StartCaretakerDuty,
    submit_caretaker_duty_report::SubmitCaretakerDutyReport,
    terminate_lease::TerminateLease, unassign_caretaker::UnassignCaretaker,
    unassign_property_manager::UnassignPropertyManager,
    unassign_technician_from_property::UnassignTechnicianFromProperty,
    update_caretaker::UpdateCaretaker,
    update_maintenance_request_status::UpdateMaintenanceRequestStatus,
    update_property::UpdateProperty,
    update_proprietor_report::UpdateProprietorReport,
    update_technician_availability::UpdateTechnicianAvailability,
    update_technician_category::UpdateTechnicianCategory,
    update_unit::UpdateUnit, update_user_password::UpdateUserPassword,
    update_user_profile::UpdateUserProfile,
    update_user_status::UpdateUserStatus,
    waive_rent_payment::WaiveRentPayment,
};
