//! In-memory [`Database`] for testing [`Command`]s.
//!
//! Transactions share the same rows with the outer [`Memory`], so writes are
//! visible right away and [`Commit`] does nothing.
//!
//! [`Command`]: crate::Command

use std::{
    cell::{RefCell, RefMut},
    rc::Rc,
    time::Duration,
};

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Update},
    DateTime, Money, Percent, Rating,
};
use tracerr::Traced;

use crate::{
    domain::{
        caretaker, lease, maintenance, manager, property,
        proprietor::{self, message, report, Message, Ownership, Report},
        technician::{self, category, job, Category},
        tenant, unit, user, Caretaker, Lease, MaintenanceRequest, Property,
        Proprietor, Technician, Tenant, Unit, User,
    },
    infra::{database, Database},
    read::{self, Active},
    task, Config, Service,
};

/// Rows stored by a [`Memory`] [`Database`].
#[derive(Default)]
pub(crate) struct Rows {
    pub(crate) users: Vec<User>,
    pub(crate) properties: Vec<Property>,
    pub(crate) units: Vec<Unit>,
    pub(crate) tenants: Vec<Tenant>,
    pub(crate) leases: Vec<Lease>,
    pub(crate) manager_assignments: Vec<manager::Assignment>,
    pub(crate) caretakers: Vec<Caretaker>,
    pub(crate) technicians: Vec<Technician>,
    pub(crate) technician_assignments: Vec<technician::Assignment>,
    pub(crate) categories: Vec<Category>,
    pub(crate) requests: Vec<MaintenanceRequest>,
    pub(crate) job_updates: Vec<job::Update>,
    pub(crate) proprietors: Vec<Proprietor>,
    pub(crate) ownerships: Vec<Ownership>,
    pub(crate) reports: Vec<Report>,
    pub(crate) messages: Vec<Message>,

    /// Change applied to a [`MaintenanceRequest`] once it's locked, imitating
    /// a concurrent transaction committed right before the lock is taken.
    pub(crate) on_request_lock: Option<Box<dyn FnOnce(&mut MaintenanceRequest)>>,
}

/// In-memory [`Database`].
#[derive(Clone, Default)]
pub(crate) struct Memory(Rc<RefCell<Rows>>);

impl Memory {
    /// Creates a new [`Memory`] holding the provided [`Rows`].
    pub(crate) fn new(rows: Rows) -> Self {
        Self(Rc::new(RefCell::new(rows)))
    }

    /// Borrows the stored [`Rows`].
    ///
    /// The borrow must be released before executing anything upon this
    /// [`Memory`].
    pub(crate) fn rows(&self) -> RefMut<'_, Rows> {
        self.0.borrow_mut()
    }

    /// Wraps this [`Memory`] into a [`Service`] with a test [`Config`].
    pub(crate) fn into_service(self) -> Service<Self> {
        let day = Duration::from_secs(24 * 60 * 60);
        Service {
            config: Config {
                jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(
                    b"secret",
                ),
                jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(
                    b"secret",
                ),
                session_expiration: day,
                maintenance_response_time: day,
                mark_overdue: task::mark_overdue::Config {
                    interval: Duration::from_secs(60 * 60),
                },
            },
            database: self,
        }
    }
}

/// Replaces the row with the same ID, or appends the `row` if there is none.
fn upsert<T, Id: PartialEq>(rows: &mut Vec<T>, row: T, id: impl Fn(&T) -> Id) {
    let key = id(&row);
    if let Some(existing) = rows.iter_mut().find(|r| id(r) == key) {
        *existing = row;
    } else {
        rows.push(row);
    }
}

/// Implements [`Select`]ing an optional entity by one of its fields.
macro_rules! select_by {
    ($entity:ty, $by:ty, $rows:ident, |$r:ident, $id:ident| $matches:expr) => {
        impl Database<Select<By<Option<$entity>, $by>>> for Memory {
            type Ok = Option<$entity>;
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                Select(by): Select<By<Option<$entity>, $by>>,
            ) -> Result<Self::Ok, Self::Err> {
                let $id = by.into_inner();
                Ok(self.0.borrow().$rows.iter().find(|$r| $matches).cloned())
            }
        }
    };
}

/// Implements [`Insert`]ing, [`Update`]ing and [`Lock`]ing an entity.
macro_rules! writes {
    ($entity:ty, $id:ty, $rows:ident) => {
        impl Database<Insert<$entity>> for Memory {
            type Ok = ();
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                Insert(row): Insert<$entity>,
            ) -> Result<Self::Ok, Self::Err> {
                upsert(&mut self.0.borrow_mut().$rows, row, |r| r.id);
                Ok(())
            }
        }

        impl Database<Update<$entity>> for Memory {
            type Ok = ();
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                Update(row): Update<$entity>,
            ) -> Result<Self::Ok, Self::Err> {
                upsert(&mut self.0.borrow_mut().$rows, row, |r| r.id);
                Ok(())
            }
        }

        impl Database<Lock<By<$entity, $id>>> for Memory {
            type Ok = ();
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                _: Lock<By<$entity, $id>>,
            ) -> Result<Self::Ok, Self::Err> {
                Ok(())
            }
        }
    };
}

select_by!(User, user::Id, users, |r, id| r.id == id);
select_by!(Property, property::Id, properties, |r, id| r.id == id);
select_by!(Unit, unit::Id, units, |r, id| r.id == id);
select_by!(Tenant, tenant::Id, tenants, |r, id| r.id == id);
select_by!(Tenant, user::Id, tenants, |r, id| r.user_id == id);
select_by!(Lease, lease::Id, leases, |r, id| r.id == id);
select_by!(Caretaker, caretaker::Id, caretakers, |r, id| r.id == id);
select_by!(Caretaker, user::Id, caretakers, |r, id| r.user_id == id);
select_by!(Caretaker, property::Id, caretakers, |r, id| {
    r.property_id == Some(id)
});
select_by!(Technician, technician::Id, technicians, |r, id| r.id == id);
select_by!(Technician, user::Id, technicians, |r, id| r.user_id == id);
select_by!(Category, category::Id, categories, |r, id| r.id == id);
select_by!(MaintenanceRequest, maintenance::Id, requests, |r, id| {
    r.id == id
});
select_by!(Proprietor, proprietor::Id, proprietors, |r, id| r.id == id);
select_by!(Proprietor, user::Id, proprietors, |r, id| r.user_id == id);
select_by!(Report, report::Id, reports, |r, id| r.id == id);
select_by!(Message, message::Id, messages, |r, id| r.id == id);

writes!(Property, property::Id, properties);
writes!(Unit, unit::Id, units);
writes!(Tenant, tenant::Id, tenants);
writes!(Lease, lease::Id, leases);
writes!(manager::Assignment, manager::Id, manager_assignments);
writes!(Caretaker, caretaker::Id, caretakers);
writes!(Technician, technician::Id, technicians);
writes!(Report, report::Id, reports);
writes!(Message, message::Id, messages);

impl Database<Select<By<Option<Active<manager::Assignment>>, property::Id>>>
    for Memory
{
    type Ok = Option<Active<manager::Assignment>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Active<manager::Assignment>>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .0
            .borrow()
            .manager_assignments
            .iter()
            .find(|a| a.property_id == id && a.is_active())
            .cloned()
            .map(Active))
    }
}

impl Database<Select<By<Vec<Technician>, property::Id>>> for Memory {
    type Ok = Vec<Technician>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Technician>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let rows = self.0.borrow();
        Ok(rows
            .technicians
            .iter()
            .filter(|t| {
                rows.technician_assignments.iter().any(|a| {
                    a.technician_id == t.id && a.property_id == id && a.is_active
                })
            })
            .cloned()
            .collect())
    }
}

impl Database<Select<By<Vec<Active<Ownership>>, property::Id>>> for Memory {
    type Ok = Vec<Active<Ownership>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Active<Ownership>>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .0
            .borrow()
            .ownerships
            .iter()
            .filter(|o| o.property_id == id && o.is_active)
            .cloned()
            .map(Active)
            .collect())
    }
}

impl Database<Select<By<Vec<job::Update>, maintenance::Id>>> for Memory {
    type Ok = Vec<job::Update>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<job::Update>, maintenance::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .0
            .borrow()
            .job_updates
            .iter()
            .rev()
            .filter(|u| u.request_id == id)
            .cloned()
            .collect())
    }
}

impl Database<Insert<job::Update>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(update): Insert<job::Update>,
    ) -> Result<Self::Ok, Self::Err> {
        self.0.borrow_mut().job_updates.push(update);
        Ok(())
    }
}

impl Database<Select<By<Vec<Message>, read::proprietor::Messages>>> for Memory {
    type Ok = Vec<Message>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Message>, read::proprietor::Messages>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::proprietor::Messages {
            proprietor_id,
            unread_only,
        } = by.into_inner();
        Ok(self
            .0
            .borrow()
            .messages
            .iter()
            .rev()
            .filter(|m| m.proprietor_id == proprietor_id)
            .filter(|m| !unread_only || !m.is_read)
            .cloned()
            .collect())
    }
}

impl Database<Select<By<read::proprietor::UnreadMessagesCount, proprietor::Id>>>
    for Memory
{
    type Ok = read::proprietor::UnreadMessagesCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::proprietor::UnreadMessagesCount, proprietor::Id>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let count = self
            .0
            .borrow()
            .messages
            .iter()
            .filter(|m| m.proprietor_id == id && !m.is_read)
            .count();
        Ok(i32::try_from(count).unwrap_or(i32::MAX).into())
    }
}

impl Database<Insert<MaintenanceRequest>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(request): Insert<MaintenanceRequest>,
    ) -> Result<Self::Ok, Self::Err> {
        upsert(&mut self.0.borrow_mut().requests, request, |r| r.id);
        Ok(())
    }
}

impl Database<Update<MaintenanceRequest>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(request): Update<MaintenanceRequest>,
    ) -> Result<Self::Ok, Self::Err> {
        upsert(&mut self.0.borrow_mut().requests, request, |r| r.id);
        Ok(())
    }
}

impl Database<Lock<By<MaintenanceRequest, maintenance::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<MaintenanceRequest, maintenance::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let mut rows = self.0.borrow_mut();
        if let Some(change) = rows.on_request_lock.take() {
            if let Some(request) = rows.requests.iter_mut().find(|r| r.id == id)
            {
                change(request);
            }
        }
        Ok(())
    }
}

impl Database<Transact> for Memory {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

/// Builders of valid entities to fill [`Rows`] with.
pub(crate) mod fixture {
    use super::{
        caretaker, maintenance, manager, message, property, proprietor,
        report, technician, unit, user, Caretaker, DateTime,
        MaintenanceRequest, Message, Money, Ownership, Percent, Property,
        Proprietor, Rating, Report, Technician, Unit, User,
    };

    /// Active [`User`] with the provided [`user::Role`].
    pub(crate) fn user(role: user::Role) -> User {
        let password = user::Password::new("correct-horse").unwrap();
        User {
            id: user::Id::new(),
            name: user::Name::new("Jane Doe").unwrap(),
            email: user::Email::new("jane@example.com").unwrap(),
            phone: None,
            role,
            status: user::Status::Active,
            password_hash: user::PasswordHash::new(&password).unwrap(),
            created_at: DateTime::now().coerce(),
        }
    }

    /// Active [`Property`].
    pub(crate) fn property() -> Property {
        Property {
            id: property::Id::new(),
            name: property::Name::new("Sunrise Court").unwrap(),
            address: property::Address::new("12 Ngong Road, Nairobi").unwrap(),
            description: None,
            kind: property::Kind::Apartment,
            status: property::Status::Active,
            created_at: DateTime::now().coerce(),
        }
    }

    /// Available [`Unit`] of the provided [`Property`].
    pub(crate) fn unit(property_id: property::Id) -> Unit {
        Unit {
            id: unit::Id::new(),
            property_id,
            number: unit::Number::new("A-1").unwrap(),
            monthly_rent: "25000.00KES".parse::<Money>().unwrap(),
            status: unit::Status::Available,
            created_at: DateTime::now().coerce(),
        }
    }

    /// Active assignment of the `manager` to the [`Property`].
    pub(crate) fn manages(
        manager: &User,
        property_id: property::Id,
    ) -> manager::Assignment {
        manager::Assignment {
            id: manager::Id::new(),
            manager_id: manager.id,
            property_id,
            status: manager::Status::Active,
            assigned_at: DateTime::now().coerce(),
        }
    }

    /// Active [`Caretaker`] profile of the provided [`User`], optionally
    /// looking after a [`Property`].
    pub(crate) fn caretaker(
        user: &User,
        property_id: Option<property::Id>,
    ) -> Caretaker {
        let now = DateTime::now();
        Caretaker {
            id: caretaker::Id::new(),
            user_id: user.id,
            property_id,
            manager_id: None,
            status: caretaker::Status::Active,
            performance_rating: None,
            hired_at: now.coerce(),
            assigned_at: property_id.map(|_| now.coerce()),
        }
    }

    /// Available active [`Technician`] profile of the provided [`User`].
    pub(crate) fn technician(
        user: &User,
        category_id: technician::category::Id,
    ) -> Technician {
        Technician {
            id: technician::Id::new(),
            user_id: user.id,
            category_id,
            is_available: true,
            average_rating: Rating::ZERO,
            ratings_count: 0,
            total_jobs_completed: 0,
            status: technician::Status::Active,
            created_at: DateTime::now().coerce(),
        }
    }

    /// Pending [`MaintenanceRequest`] reported by the `reporter`, assigned to
    /// the provided [`Technician`], if any.
    pub(crate) fn request(
        reporter: &User,
        property_id: property::Id,
        technician_id: Option<technician::Id>,
    ) -> MaintenanceRequest {
        MaintenanceRequest {
            id: maintenance::Id::new(),
            reporter_id: reporter.id,
            property_id,
            unit_id: None,
            category_id: None,
            title: maintenance::Title::new("Leaking tap").unwrap(),
            description: maintenance::Description::new("Kitchen tap drips.")
                .unwrap(),
            priority: maintenance::Priority::Medium,
            status: maintenance::Status::Pending,
            technician_id,
            response_deadline: None,
            is_escalated: false,
            escalated_at: None,
            escalation_reason: None,
            rating: None,
            created_at: DateTime::now().coerce(),
            completed_at: None,
        }
    }

    /// Active [`Proprietor`] profile of the provided [`User`].
    pub(crate) fn proprietor(user: &User) -> Proprietor {
        Proprietor {
            id: proprietor::Id::new(),
            user_id: user.id,
            business_name: None,
            registration_number: None,
            status: proprietor::Status::Active,
            created_at: DateTime::now().coerce(),
        }
    }

    /// Active whole [`Ownership`] of the [`Property`] by the [`Proprietor`].
    pub(crate) fn owns(
        proprietor_id: proprietor::Id,
        property_id: property::Id,
    ) -> Ownership {
        Ownership {
            id: proprietor::ownership::Id::new(),
            proprietor_id,
            property_id,
            percentage: Percent::ONE_HUNDRED,
            is_active: true,
            assigned_at: DateTime::now().coerce(),
        }
    }

    /// Draft [`Report`] about the [`Property`] for the [`Proprietor`].
    pub(crate) fn report(
        proprietor_id: proprietor::Id,
        property_id: property::Id,
        author: &User,
    ) -> Report {
        let now = DateTime::now();
        Report {
            id: report::Id::new(),
            proprietor_id,
            property_id,
            kind: report::Kind::Monthly,
            title: report::Title::new("March 2025").unwrap(),
            description: None,
            status: report::Status::Draft,
            created_by: author.id,
            created_at: now.coerce(),
            updated_at: now.coerce(),
            sent_at: None,
        }
    }

    /// Unread [`Message`] from the super-admin to the [`Proprietor`].
    pub(crate) fn message(
        sender: &User,
        proprietor_id: proprietor::Id,
    ) -> Message {
        Message {
            id: message::Id::new(),
            proprietor_id,
            sender_id: sender.id,
            subject: message::Subject::new("Annual meeting"),
            body: message::Body::new("The meeting moves to Friday.").unwrap(),
            kind: message::Kind::Notification,
            is_read: false,
            read_at: None,
            created_at: DateTime::now().coerce(),
        }
    }
}
