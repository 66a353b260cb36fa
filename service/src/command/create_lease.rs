//! [`Command`] for leasing a [`Unit`] to a tenant [`User`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        lease, manager, property, tenant, unit, user, Lease, Tenant, Unit,
        User,
    },
    infra::{database, Database},
    read::Active,
    Service,
};

use super::{privilege, Command};

/// [`Command`] for leasing an available [`Unit`] to a tenant [`User`].
///
/// Creates the [`Tenant`] record of the [`User`] (or reactivates a previous
/// one), and marks the [`Unit`] as [`unit::Status::Occupied`].
#[derive(Clone, Copy, Debug)]
pub struct CreateLease {
    /// ID of the tenant [`User`].
    pub user_id: user::Id,

    /// ID of the [`Unit`] to lease.
    pub unit_id: unit::Id,

    /// [`DateTime`] when the [`Lease`] starts.
    pub starts_at: lease::StartDateTime,

    /// [`DateTime`] when the [`Lease`] ends.
    pub ends_at: lease::EndDateTime,

    /// ID of the [`User`] creating the [`Lease`].
    pub initiator_id: user::Id,
}

/// Output of [`CreateLease`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Created [`Lease`].
    pub lease: Lease,

    /// [`Tenant`] of the created [`Lease`].
    pub tenant: Tenant,
}

impl<Db> Command<CreateLease> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Unit>, unit::Id>>,
            Ok = Option<Unit>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Active<manager::Assignment>>, property::Id>>,
            Ok = Option<Active<manager::Assignment>>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Unit>, unit::Id>>,
            Ok = Option<Unit>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Tenant>, user::Id>>,
            Ok = Option<Tenant>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Tenant>, tenant::Id>>,
            Ok = Option<Tenant>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Unit, unit::Id>>, Err = Traced<database::Error>>
        + Database<Lock<By<Tenant, tenant::Id>>, Err = Traced<database::Error>>
        + Database<Insert<Tenant>, Err = Traced<database::Error>>
        + Database<Update<Tenant>, Err = Traced<database::Error>>
        + Database<Insert<Lease>, Err = Traced<database::Error>>
        + Database<Update<Unit>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateLease) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateLease {
            user_id,
            unit_id,
            starts_at,
            ends_at,
            initiator_id,
        } = cmd;

        if ends_at.coerce() <= starts_at {
            return Err(tracerr::new!(E::InvalidTerm));
        }

        let initiator = privilege::initiator(self.database(), initiator_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;
        let unit = self
            .database()
            .execute(Select(By::<Option<Unit>, _>::new(unit_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UnitNotExists(unit_id))
            .map_err(tracerr::wrap!())?;
        if !privilege::manages(self.database(), &initiator, unit.property_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            return Err(tracerr::new!(E::UserNotManager(initiator_id)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent leasing of the same `Unit`.
        tx.execute(Lock(By::<Unit, _>::new(unit_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut unit = tx
            .execute(Select(By::<Option<Unit>, _>::new(unit_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UnitNotExists(unit_id))
            .map_err(tracerr::wrap!())?;
        if !unit.is_available() {
            return Err(tracerr::new!(E::UnitNotAvailable(unit_id)));
        }

        let user = tx
            .execute(Select(By::<Option<User>, _>::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(user_id))
            .map_err(tracerr::wrap!())?;
        if !user.acts_as(user::Role::Tenant) {
            return Err(tracerr::new!(E::UserNotTenant(user_id)));
        }

        let existing = tx
            .execute(Select(By::<Option<Tenant>, _>::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let tenant = if let Some(Tenant { id, .. }) = existing {
            // Avoid concurrent leasing to the same `Tenant`.
            tx.execute(Lock(By::<Tenant, _>::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
            let mut tenant = tx
                .execute(Select(By::<Option<Tenant>, tenant::Id>::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::UserNotTenant(user_id))
                .map_err(tracerr::wrap!())?;
            if tenant.is_active() {
                return Err(tracerr::new!(E::TenantOccupied(user_id)));
            }

            tenant.property_id = unit.property_id;
            tenant.unit_id = unit_id;
            tenant.status = tenant::Status::Active;
            tenant.moved_in_at = starts_at.coerce();
            tenant.moved_out_at = None;
            tx.execute(Update(tenant.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
            tenant
        } else {
            let tenant = Tenant {
                id: tenant::Id::new(),
                user_id,
                property_id: unit.property_id,
                unit_id,
                status: tenant::Status::Active,
                moved_in_at: starts_at.coerce(),
                moved_out_at: None,
            };
            tx.execute(Insert(tenant.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
            tenant
        };

        let lease = Lease {
            id: lease::Id::new(),
            tenant_id: tenant.id,
            property_id: unit.property_id,
            unit_id,
            monthly_rent: unit.monthly_rent,
            status: lease::Status::Active,
            starts_at,
            ends_at,
            created_at: DateTime::now().coerce(),
            terminated_at: None,
        };
        tx.execute(Insert(lease.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        unit.status = unit::Status::Occupied;
        tx.execute(Update(unit))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Output { lease, tenant })
    }
}

/// Error of [`CreateLease`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Lease`] ends before it starts.
    #[display("`Lease` must end after it starts")]
    InvalidTerm,

    /// Tenant [`User`] already leases another [`Unit`].
    #[display("`User(id: {_0})` already leases a `Unit`")]
    TenantOccupied(#[error(not(source))] user::Id),

    /// [`Unit`] with the provided ID does not exist.
    #[display("`Unit(id: {_0})` does not exist")]
    UnitNotExists(#[error(not(source))] unit::Id),

    /// [`Unit`] is not [`unit::Status::Available`].
    #[display("`Unit(id: {_0})` is not available")]
    UnitNotAvailable(#[error(not(source))] unit::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] does not manage the [`Property`] of the [`Unit`].
    ///
    /// [`Property`]: crate::domain::Property
    #[display("`User(id: {_0})` does not manage the `Property`")]
    UserNotManager(#[error(not(source))] user::Id),

    /// [`User`] is not an active tenant.
    #[display("`User(id: {_0})` is not a tenant")]
    UserNotTenant(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;
    use futures::executor::block_on;

    use crate::{
        domain::{lease, tenant, unit, user},
        infra::database::memory::{fixture, Memory, Rows},
        Command as _,
    };

    use super::{CreateLease, ExecutionError};

    const YEAR: Duration = Duration::from_secs(365 * 24 * 60 * 60);

    #[test]
    fn occupies_unit() {
        let property = fixture::property();
        let unit = fixture::unit(property.id);
        let manager = fixture::user(user::Role::PropertyManager);
        let renter = fixture::user(user::Role::Tenant);
        let svc = Memory::new(Rows {
            users: vec![manager.clone(), renter.clone()],
            manager_assignments: vec![fixture::manages(&manager, property.id)],
            properties: vec![property],
            units: vec![unit.clone()],
            ..Rows::default()
        })
        .into_service();

        let starts_at = DateTime::now();
        let out = block_on(svc.execute(CreateLease {
            user_id: renter.id,
            unit_id: unit.id,
            starts_at: starts_at.coerce(),
            ends_at: (starts_at + YEAR).coerce(),
            initiator_id: manager.id,
        }))
        .unwrap();

        assert_eq!(out.lease.status, lease::Status::Active);
        assert_eq!(out.lease.monthly_rent, unit.monthly_rent);
        assert_eq!(out.tenant.user_id, renter.id);
        assert_eq!(out.tenant.status, tenant::Status::Active);
        let rows = svc.database().rows();
        assert_eq!(rows.units[0].status, unit::Status::Occupied);
        assert_eq!(rows.leases.len(), 1);
        assert_eq!(rows.tenants.len(), 1);
    }

    #[test]
    fn rejects_occupied_unit() {
        let property = fixture::property();
        let mut unit = fixture::unit(property.id);
        unit.status = unit::Status::Occupied;
        let admin = fixture::user(user::Role::SuperAdmin);
        let renter = fixture::user(user::Role::Tenant);
        let svc = Memory::new(Rows {
            users: vec![admin.clone(), renter.clone()],
            properties: vec![property],
            units: vec![unit.clone()],
            ..Rows::default()
        })
        .into_service();

        let starts_at = DateTime::now();
        let err = block_on(svc.execute(CreateLease {
            user_id: renter.id,
            unit_id: unit.id,
            starts_at: starts_at.coerce(),
            ends_at: (starts_at + YEAR).coerce(),
            initiator_id: admin.id,
        }))
        .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::UnitNotAvailable(id) if id == unit.id,
        ));
        assert!(svc.database().rows().leases.is_empty());
    }

    #[test]
    fn rejects_inverted_term() {
        let svc = Memory::default().into_service();

        let starts_at = DateTime::now();
        let err = block_on(svc.execute(CreateLease {
            user_id: user::Id::new(),
            unit_id: unit::Id::new(),
            starts_at: (starts_at + YEAR).coerce(),
            ends_at: starts_at.coerce(),
            initiator_id: user::Id::new(),
        }))
        .unwrap_err();

        assert!(matches!(err.into_inner(), ExecutionError::InvalidTerm));
    }
}
