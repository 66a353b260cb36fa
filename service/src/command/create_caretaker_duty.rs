//! [`Command`] for giving a [`Duty`] to a [`Caretaker`].

use common::{
    operations::{By, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        caretaker::{self, duty, Duty},
        manager, property, user, Caretaker, User,
    },
    infra::{database, Database},
    read::Active,
    Service,
};

use super::{privilege, Command};

/// [`Command`] for a property manager to give a [`Duty`] to the
/// [`Caretaker`] of their [`Property`].
///
/// [`Property`]: crate::domain::Property
#[derive(Clone, Debug)]
pub struct CreateCaretakerDuty {
    /// ID of the [`Caretaker`] to give the [`Duty`] to.
    pub caretaker_id: caretaker::Id,

    /// [`duty::Title`] of a new [`Duty`].
    pub title: duty::Title,

    /// Description of a new [`Duty`].
    pub description: Option<duty::Text>,

    /// [`duty::Kind`] of a new [`Duty`].
    pub kind: duty::Kind,

    /// [`duty::Priority`] of a new [`Duty`].
    pub priority: duty::Priority,

    /// [`DateTime`] a new [`Duty`] should be done by.
    pub due_at: Option<duty::DueDateTime>,

    /// ID of the [`User`] giving the [`Duty`].
    pub initiator_id: user::Id,
}

impl<Db> Command<CreateCaretakerDuty> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Caretaker>, caretaker::Id>>,
            Ok = Option<Caretaker>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Active<manager::Assignment>>, property::Id>>,
            Ok = Option<Active<manager::Assignment>>,
            Err = Traced<database::Error>,
        > + Database<Insert<Duty>, Err = Traced<database::Error>>,
{
    type Ok = Duty;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateCaretakerDuty,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateCaretakerDuty {
            caretaker_id,
            title,
            description,
            kind,
            priority,
            due_at,
            initiator_id,
        } = cmd;

        let initiator = privilege::initiator(self.database(), initiator_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;
        let caretaker = self
            .database()
            .execute(Select(By::<Option<Caretaker>, _>::new(caretaker_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CaretakerNotExists(caretaker_id))
            .map_err(tracerr::wrap!())?;
        if !caretaker.is_active() {
            return Err(tracerr::new!(E::CaretakerSuspended(caretaker_id)));
        }
        let property_id = caretaker
            .property_id
            .ok_or(E::CaretakerNotAssigned(caretaker_id))
            .map_err(tracerr::wrap!())?;
        if !privilege::manages(self.database(), &initiator, property_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            return Err(tracerr::new!(E::UserNotManager(initiator_id)));
        }

        let duty = Duty {
            id: duty::Id::new(),
            caretaker_id,
            property_id,
            assigned_by: initiator_id,
            title,
            description,
            kind,
            priority,
            status: duty::Status::Pending,
            due_at,
            started_at: None,
            completed_at: None,
            report: None,
            feedback: None,
            rating: None,
            reviewed_at: None,
            created_at: DateTime::now().coerce(),
        };
        self.database()
            .execute(Insert(duty.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(duty)
    }
}

/// Error of [`CreateCaretakerDuty`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Caretaker`] looks after no [`Property`].
    ///
    /// [`Property`]: crate::domain::Property
    #[display("`Caretaker(id: {_0})` is not assigned to a `Property`")]
    CaretakerNotAssigned(#[error(not(source))] caretaker::Id),

    /// [`Caretaker`] with the provided ID does not exist.
    #[display("`Caretaker(id: {_0})` does not exist")]
    CaretakerNotExists(#[error(not(source))] caretaker::Id),

    /// [`Caretaker`] is suspended.
    #[display("`Caretaker(id: {_0})` is suspended")]
    CaretakerSuspended(#[error(not(source))] caretaker::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] does not manage the [`Property`] of the [`Caretaker`].
    ///
    /// [`Property`]: crate::domain::Property
    #[display("`User(id: {_0})` does not manage the `Property`")]
    UserNotManager(#[error(not(source))] user::Id),
}
