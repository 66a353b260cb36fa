//! [`Command`] for terminating a [`Lease`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
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

/// [`Command`] for terminating an active [`Lease`] before its term.
///
/// The [`Tenant`] moves out and the [`Unit`] becomes available again.
#[derive(Clone, Copy, Debug)]
pub struct TerminateLease {
    /// ID of the [`Lease`] to terminate.
    pub lease_id: lease::Id,

    /// ID of the [`User`] terminating the [`Lease`].
    pub initiator_id: user::Id,
}

impl<Db> Command<TerminateLease> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Lease>, lease::Id>>,
            Ok = Option<Lease>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Active<manager::Assignment>>, property::Id>>,
            Ok = Option<Active<manager::Assignment>>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Lease>, lease::Id>>,
            Ok = Option<Lease>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Tenant>, tenant::Id>>,
            Ok = Option<Tenant>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Unit>, unit::Id>>,
            Ok = Option<Unit>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Lease, lease::Id>>, Err = Traced<database::Error>>
        + Database<Lock<By<Tenant, tenant::Id>>, Err = Traced<database::Error>>
        + Database<Lock<By<Unit, unit::Id>>, Err = Traced<database::Error>>
        + Database<Update<Lease>, Err = Traced<database::Error>>
        + Database<Update<Tenant>, Err = Traced<database::Error>>
        + Database<Update<Unit>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Lease;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: TerminateLease,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let TerminateLease {
            lease_id,
            initiator_id,
        } = cmd;

        let initiator = privilege::initiator(self.database(), initiator_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;
        let lease = self
            .database()
            .execute(Select(By::<Option<Lease>, _>::new(lease_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::LeaseNotExists(lease_id))
            .map_err(tracerr::wrap!())?;
        if !privilege::manages(self.database(), &initiator, lease.property_id)
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

        // Avoid concurrent actions upon the same `Lease`.
        tx.execute(Lock(By::<Lease, _>::new(lease_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Lock(By::<Tenant, _>::new(lease.tenant_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Lock(By::<Unit, _>::new(lease.unit_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut lease = tx
            .execute(Select(By::<Option<Lease>, _>::new(lease_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::LeaseNotExists(lease_id))
            .map_err(tracerr::wrap!())?;
        if !lease.is_active() {
            return Err(tracerr::new!(E::LeaseNotActive(lease_id)));
        }

        let now = DateTime::now();

        lease.status = lease::Status::Terminated;
        lease.terminated_at = Some(now.coerce());
        tx.execute(Update(lease.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let tenant = tx
            .execute(Select(By::<Option<Tenant>, _>::new(lease.tenant_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(mut tenant) = tenant.filter(|t| t.unit_id == lease.unit_id)
        {
            tenant.status = tenant::Status::Inactive;
            tenant.moved_out_at = Some(now.coerce());
            tx.execute(Update(tenant))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        let unit = tx
            .execute(Select(By::<Option<Unit>, _>::new(lease.unit_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(mut unit) =
            unit.filter(|u| u.status == unit::Status::Occupied)
        {
            unit.status = unit::Status::Available;
            tx.execute(Update(unit))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(lease)
    }
}

/// Error of [`TerminateLease`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Lease`] is not [`lease::Status::Active`].
    #[display("`Lease(id: {_0})` is not active")]
    LeaseNotActive(#[error(not(source))] lease::Id),

    /// [`Lease`] with the provided ID does not exist.
    #[display("`Lease(id: {_0})` does not exist")]
    LeaseNotExists(#[error(not(source))] lease::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] does not manage the [`Property`] of the [`Lease`].
    ///
    /// [`Property`]: crate::domain::Property
    #[display("`User(id: {_0})` does not manage the `Property`")]
    UserNotManager(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;
    use futures::executor::block_on;

    use crate::{
        command::CreateLease,
        domain::{lease, tenant, unit, user},
        infra::database::memory::{fixture, Memory, Rows},
        Command as _,
    };

    use super::{ExecutionError, TerminateLease};

    #[test]
    fn frees_unit() {
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
        let created = block_on(svc.execute(CreateLease {
            user_id: renter.id,
            unit_id: unit.id,
            starts_at: starts_at.coerce(),
            ends_at: (starts_at + Duration::from_secs(30 * 24 * 60 * 60))
                .coerce(),
            initiator_id: manager.id,
        }))
        .unwrap();
        assert_eq!(
            svc.database().rows().units[0].status,
            unit::Status::Occupied,
        );

        let terminated = block_on(svc.execute(TerminateLease {
            lease_id: created.lease.id,
            initiator_id: manager.id,
        }))
        .unwrap();

        assert_eq!(terminated.status, lease::Status::Terminated);
        assert!(terminated.terminated_at.is_some());
        let rows = svc.database().rows();
        assert_eq!(rows.units[0].status, unit::Status::Available);
        assert_eq!(rows.tenants[0].status, tenant::Status::Inactive);
        assert!(rows.tenants[0].moved_out_at.is_some());
    }

    #[test]
    fn rejects_terminated_lease() {
        let property = fixture::property();
        let unit = fixture::unit(property.id);
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
        let created = block_on(svc.execute(CreateLease {
            user_id: renter.id,
            unit_id: unit.id,
            starts_at: starts_at.coerce(),
            ends_at: (starts_at + Duration::from_secs(24 * 60 * 60)).coerce(),
            initiator_id: admin.id,
        }))
        .unwrap();
        let terminate = TerminateLease {
            lease_id: created.lease.id,
            initiator_id: admin.id,
        };
        _ = block_on(svc.execute(terminate)).unwrap();

        let err = block_on(svc.execute(terminate)).unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::LeaseNotActive(id) if id == created.lease.id,
        ));
    }
}
