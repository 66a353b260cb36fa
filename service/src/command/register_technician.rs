//! [`Command`] for registering a [`Technician`].

use common::{
    operations::{By, Insert, Select},
    DateTime, Rating,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        technician::{self, category, Category},
        user, Technician, User,
    },
    infra::{database, Database},
    Service,
};

use super::{privilege, Command};

/// [`Command`] for registering a technician [`User`] as a [`Technician`]
/// of some [`Category`].
///
/// Registered [`Technician`] is available, has zero rating and no completed
/// jobs.
#[derive(Clone, Copy, Debug)]
pub struct RegisterTechnician {
    /// ID of the technician [`User`].
    pub user_id: user::Id,

    /// ID of the [`Category`] the [`Technician`] works in.
    pub category_id: category::Id,

    /// ID of the super-admin [`User`] registering the [`Technician`].
    pub initiator_id: user::Id,
}

impl<Db> Command<RegisterTechnician> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Technician>, user::Id>>,
            Ok = Option<Technician>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Category>, category::Id>>,
            Ok = Option<Category>,
            Err = Traced<database::Error>,
        > + Database<Insert<Technician>, Err = Traced<database::Error>>,
{
    type Ok = Technician;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RegisterTechnician,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RegisterTechnician {
            user_id,
            category_id,
            initiator_id,
        } = cmd;

        let initiator = privilege::initiator(self.database(), initiator_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;
        if !initiator.is_super_admin() {
            return Err(tracerr::new!(E::UserNotSuperAdmin(initiator_id)));
        }

        let user = self
            .database()
            .execute(Select(By::<Option<User>, _>::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(user_id))
            .map_err(tracerr::wrap!())?;
        if user.role != user::Role::Technician {
            return Err(tracerr::new!(E::UserNotTechnician(user_id)));
        }

        let registered = self
            .database()
            .execute(Select(By::<Option<Technician>, _>::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if registered.is_some() {
            return Err(tracerr::new!(E::AlreadyRegistered(user_id)));
        }

        _ = self
            .database()
            .execute(Select(By::<Option<Category>, _>::new(category_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|c| c.is_active)
            .ok_or(E::CategoryNotExists(category_id))
            .map_err(tracerr::wrap!())?;

        let technician = Technician {
            id: technician::Id::new(),
            user_id,
            category_id,
            is_available: true,
            average_rating: Rating::ZERO,
            ratings_count: 0,
            total_jobs_completed: 0,
            status: technician::Status::Active,
            created_at: DateTime::now().coerce(),
        };
        self.database()
            .execute(Insert(technician.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(technician)
    }
}

/// Error of [`RegisterTechnician`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`User`] is registered as a [`Technician`] already.
    #[display("`User(id: {_0})` is a `Technician` already")]
    AlreadyRegistered(#[error(not(source))] user::Id),

    /// [`Category`] with the provided ID does not exist or is inactive.
    #[display("`Category(id: {_0})` does not exist")]
    CategoryNotExists(#[error(not(source))] category::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] is not a super-admin.
    #[display("`User(id: {_0})` is not a super-admin")]
    UserNotSuperAdmin(#[error(not(source))] user::Id),

    /// [`User`] doesn't have the technician [`user::Role`].
    #[display("`User(id: {_0})` is not a technician")]
    UserNotTechnician(#[error(not(source))] user::Id),
}
