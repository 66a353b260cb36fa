//! [`Command`] for reporting a new [`MaintenanceRequest`].

use common::{
    operations::{By, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        maintenance, manager, property,
        technician::{category, Category},
        unit, user, Caretaker, MaintenanceRequest, Property, Technician,
        Tenant, Unit, User,
    },
    infra::{database, Database},
    read::Active,
    Service,
};

use super::{privilege, Command};

/// [`Command`] for reporting a new [`MaintenanceRequest`] of a [`Property`].
///
/// Created [`MaintenanceRequest`] is assigned to the best available
/// [`Technician`] serving the [`Property`] right away. Without such, it's
/// left for the property manager to handle.
///
/// May be reported by a [`Tenant`] or a [`Caretaker`] of the [`Property`],
/// or by its manager.
#[derive(Clone, Debug)]
pub struct CreateMaintenanceRequest {
    /// ID of the [`Property`] the issue is at.
    pub property_id: property::Id,

    /// ID of the [`Unit`] the issue is at, if any.
    ///
    /// Defaults to the [`Unit`] of the reporting [`Tenant`].
    pub unit_id: Option<unit::Id>,

    /// ID of the technician [`Category`] the issue belongs to, if known.
    pub category_id: Option<category::Id>,

    /// [`maintenance::Title`] of the issue.
    pub title: maintenance::Title,

    /// [`maintenance::Description`] of the issue.
    pub description: maintenance::Description,

    /// [`maintenance::Priority`] of the issue.
    pub priority: maintenance::Priority,

    /// ID of the [`User`] reporting the issue.
    pub initiator_id: user::Id,
}

impl<Db> Command<CreateMaintenanceRequest> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Unit>, unit::Id>>,
            Ok = Option<Unit>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Category>, category::Id>>,
            Ok = Option<Category>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Tenant>, user::Id>>,
            Ok = Option<Tenant>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Caretaker>, user::Id>>,
            Ok = Option<Caretaker>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Active<manager::Assignment>>, property::Id>>,
            Ok = Option<Active<manager::Assignment>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Technician>, property::Id>>,
            Ok = Vec<Technician>,
            Err = Traced<database::Error>,
        > + Database<Insert<MaintenanceRequest>, Err = Traced<database::Error>>,
{
    type Ok = MaintenanceRequest;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateMaintenanceRequest,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateMaintenanceRequest {
            property_id,
            mut unit_id,
            category_id,
            title,
            description,
            priority,
            initiator_id,
        } = cmd;

        let initiator = privilege::initiator(self.database(), initiator_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;

        _ = self
            .database()
            .execute(Select(By::<Option<Property>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(Property::is_active)
            .ok_or(E::PropertyNotExists(property_id))
            .map_err(tracerr::wrap!())?;

        let allowed = match initiator.role {
            user::Role::Tenant => {
                let tenant = self
                    .database()
                    .execute(Select(By::<Option<Tenant>, _>::new(initiator_id)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
                    .filter(|t| t.is_active() && t.property_id == property_id);
                if let Some(t) = &tenant {
                    unit_id = unit_id.or(Some(t.unit_id));
                }
                tenant.is_some()
            }
            user::Role::Caretaker => self
                .database()
                .execute(Select(By::<Option<Caretaker>, _>::new(initiator_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .is_some_and(|c| {
                    c.is_active() && c.property_id == Some(property_id)
                }),
            user::Role::PropertyManager
            | user::Role::SuperAdmin
            | user::Role::Technician
            | user::Role::Proprietor => {
                privilege::manages(self.database(), &initiator, property_id)
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
            }
        };
        if !allowed {
            return Err(tracerr::new!(E::UserNotAllowed(initiator_id)));
        }

        if let Some(id) = unit_id {
            _ = self
                .database()
                .execute(Select(By::<Option<Unit>, _>::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .filter(|u| u.property_id == property_id)
                .ok_or(E::UnitNotExists(id))
                .map_err(tracerr::wrap!())?;
        }
        if let Some(id) = category_id {
            _ = self
                .database()
                .execute(Select(By::<Option<Category>, _>::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .filter(|c| c.is_active)
                .ok_or(E::CategoryNotExists(id))
                .map_err(tracerr::wrap!())?;
        }

        let now = DateTime::now();
        let mut request = MaintenanceRequest {
            id: maintenance::Id::new(),
            reporter_id: initiator_id,
            property_id,
            unit_id,
            category_id,
            title,
            description,
            priority,
            status: maintenance::Status::Pending,
            technician_id: None,
            response_deadline: None,
            is_escalated: false,
            escalated_at: None,
            escalation_reason: None,
            rating: None,
            created_at: now.coerce(),
            completed_at: None,
        };

        let technicians = self
            .database()
            .execute(Select(By::<Vec<Technician>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        _ = request
            .auto_assign(
                &technicians,
                self.config.maintenance_response_time,
                now,
            )
            .map_err(tracerr::from_and_wrap!(=> E))?;

        self.database()
            .execute(Insert(request.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(request)
    }
}

/// Error of [`CreateMaintenanceRequest`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Category`] with the provided ID does not exist or is inactive.
    #[display("`Category(id: {_0})` does not exist")]
    CategoryNotExists(#[error(not(source))] category::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Property`] with the provided ID does not exist or is inactive.
    #[display("`Property(id: {_0})` does not exist")]
    PropertyNotExists(#[error(not(source))] property::Id),

    /// [`MaintenanceRequest`] cannot be assigned.
    #[display("Cannot assign `MaintenanceRequest`: {_0}")]
    #[from]
    Status(maintenance::StatusError),

    /// [`Unit`] with the provided ID does not exist in the [`Property`].
    #[display("`Unit(id: {_0})` does not exist")]
    UnitNotExists(#[error(not(source))] unit::Id),

    /// [`User`] is not allowed to report issues of the [`Property`].
    #[display("`User(id: {_0})` is not allowed to report at the `Property`")]
    UserNotAllowed(#[error(not(source))] user::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use common::DateTime;
    use futures::executor::block_on;

    use crate::{
        domain::{maintenance, property, technician, tenant, user, Tenant},
        infra::database::memory::{fixture, Memory, Rows},
        Command as _,
    };

    use super::{CreateMaintenanceRequest, ExecutionError};

    fn command(
        property_id: property::Id,
        initiator_id: user::Id,
    ) -> CreateMaintenanceRequest {
        CreateMaintenanceRequest {
            property_id,
            unit_id: None,
            category_id: None,
            title: maintenance::Title::new("Broken window").unwrap(),
            description: maintenance::Description::new("Bedroom window.")
                .unwrap(),
            priority: maintenance::Priority::High,
            initiator_id,
        }
    }

    #[test]
    fn stays_unassigned_without_candidates() {
        let property = fixture::property();
        let unit = fixture::unit(property.id);
        let renter = fixture::user(user::Role::Tenant);
        let resident = Tenant {
            id: tenant::Id::new(),
            user_id: renter.id,
            property_id: property.id,
            unit_id: unit.id,
            status: tenant::Status::Active,
            moved_in_at: DateTime::now().coerce(),
            moved_out_at: None,
        };
        let svc = Memory::new(Rows {
            users: vec![renter.clone()],
            properties: vec![property.clone()],
            units: vec![unit.clone()],
            tenants: vec![resident],
            ..Rows::default()
        })
        .into_service();

        let request =
            block_on(svc.execute(command(property.id, renter.id))).unwrap();

        assert_eq!(request.status, maintenance::Status::Pending);
        assert_eq!(request.technician_id, None);
        assert_eq!(request.response_deadline, None);
        assert_eq!(request.unit_id, Some(unit.id));
        let rows = svc.database().rows();
        assert_eq!(rows.requests.len(), 1);
        assert_eq!(rows.requests[0].technician_id, None);
    }

    #[test]
    fn assigns_available_technician() {
        let property = fixture::property();
        let admin = fixture::user(user::Role::SuperAdmin);
        let worker = fixture::user(user::Role::Technician);
        let tech = fixture::technician(&worker, technician::category::Id::new());
        let link = technician::Assignment {
            id: technician::assignment::Id::new(),
            technician_id: tech.id,
            property_id: property.id,
            is_active: true,
            assigned_at: DateTime::now().coerce(),
        };
        let tech_id = tech.id;
        let svc = Memory::new(Rows {
            users: vec![admin.clone(), worker],
            properties: vec![property.clone()],
            technicians: vec![tech],
            technician_assignments: vec![link],
            ..Rows::default()
        })
        .into_service();

        let request =
            block_on(svc.execute(command(property.id, admin.id))).unwrap();

        assert_eq!(request.technician_id, Some(tech_id));
        assert!(request.response_deadline.is_some());
        assert_eq!(
            svc.database().rows().requests[0].technician_id,
            Some(tech_id),
        );
    }

    #[test]
    fn rejects_tenant_of_other_property() {
        let property = fixture::property();
        let renter = fixture::user(user::Role::Tenant);
        let svc = Memory::new(Rows {
            users: vec![renter.clone()],
            properties: vec![property.clone()],
            ..Rows::default()
        })
        .into_service();

        let err =
            block_on(svc.execute(command(property.id, renter.id))).unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::UserNotAllowed(id) if id == renter.id,
        ));
        assert!(svc.database().rows().requests.is_empty());
    }
}
