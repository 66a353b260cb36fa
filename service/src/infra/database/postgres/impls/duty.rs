//! [`caretaker::Duty`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        caretaker::{self, duty, Duty},
        property,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of the `caretaker_duties` table, in the order [`from_row()`]
/// expects.
const COLUMNS: &str = "\
    id, caretaker_id, property_id, assigned_by, \
    title, description, kind, priority, status, \
    due_at, started_at, completed_at, \
    report, feedback, rating, reviewed_at, created_at";

/// Builds a [`Duty`] out of the provided [`Row`].
fn from_row(row: &Row) -> Duty {
    Duty {
        id: row.get("id"),
        caretaker_id: row.get("caretaker_id"),
        property_id: row.get("property_id"),
        assigned_by: row.get("assigned_by"),
        title: row.get("title"),
        description: row.get("description"),
        kind: row.get("kind"),
        priority: row.get("priority"),
        status: row.get("status"),
        due_at: row.get("due_at"),
        started_at: row.get("started_at"),
        completed_at: row.get("completed_at"),
        report: row.get("report"),
        feedback: row.get("feedback"),
        rating: row.get("rating"),
        reviewed_at: row.get("reviewed_at"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Duty>, duty::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Duty>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Duty>, duty::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM caretaker_duties \
             WHERE id = $1::UUID",
        );
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Duty>, caretaker::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Duty>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Duty>, caretaker::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let caretaker_id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM caretaker_duties \
             WHERE caretaker_id = $1::UUID \
             ORDER BY created_at DESC",
        );
        Ok(self
            .query(&sql, &[&caretaker_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Duty>, Vec<property::Id>>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Duty>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Duty>, Vec<property::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let property_ids = by.into_inner();
        if property_ids.is_empty() {
            return Ok(vec![]);
        }

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM caretaker_duties \
             WHERE property_id = ANY($1::UUID[]) \
             ORDER BY created_at DESC",
        );
        Ok(self
            .query(&sql, &[&property_ids])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Duty>, property::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Vec<Duty>, Vec<property::Id>>>,
        Ok = Vec<Duty>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Duty>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Duty>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Select(By::new(vec![by.into_inner()])))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Duty>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Duty>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(duty): Insert<Duty>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(duty)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Duty>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(duty): Update<Duty>,
    ) -> Result<Self::Ok, Self::Err> {
        let Duty {
            id,
            caretaker_id,
            property_id,
            assigned_by,
            title,
            description,
            kind,
            priority,
            status,
            due_at,
            started_at,
            completed_at,
            report,
            feedback,
            rating,
            reviewed_at,
            created_at,
        } = duty;

        const SQL: &str = "\
            INSERT INTO caretaker_duties (\
                id, caretaker_id, property_id, assigned_by, \
                title, description, kind, priority, status, \
                due_at, started_at, completed_at, \
                report, feedback, rating, reviewed_at, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::UUID, \
                $5::VARCHAR, $6::TEXT, $7::INT2, $8::INT2, $9::INT2, \
                $10::TIMESTAMPTZ, $11::TIMESTAMPTZ, $12::TIMESTAMPTZ, \
                $13::TEXT, $14::TEXT, $15::NUMERIC, $16::TIMESTAMPTZ, \
                $17::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET title = EXCLUDED.title, \
                description = EXCLUDED.description, \
                kind = EXCLUDED.kind, \
                priority = EXCLUDED.priority, \
                status = EXCLUDED.status, \
                due_at = EXCLUDED.due_at, \
                started_at = EXCLUDED.started_at, \
                completed_at = EXCLUDED.completed_at, \
                report = EXCLUDED.report, \
                feedback = EXCLUDED.feedback, \
                rating = EXCLUDED.rating, \
                reviewed_at = EXCLUDED.reviewed_at";
        self.exec(
            SQL,
            &[
                &id,
                &caretaker_id,
                &property_id,
                &assigned_by,
                &title,
                &description,
                &kind,
                &priority,
                &status,
                &due_at,
                &started_at,
                &completed_at,
                &report,
                &feedback,
                &rating,
                &reviewed_at,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<By<Duty, duty::DueDateTime>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(by): Update<By<Duty, duty::DueDateTime>>,
    ) -> Result<Self::Ok, Self::Err> {
        let due_before = by.into_inner();

        const SQL: &str = "\
            UPDATE caretaker_duties \
            SET status = $1::INT2 \
            WHERE status = $2::INT2 \
              AND due_at < $3::TIMESTAMPTZ";
        self.exec(
            SQL,
            &[&duty::Status::Overdue, &duty::Status::Pending, &due_before],
        )
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Lock<By<Duty, duty::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Duty, duty::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: duty::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM caretaker_duties \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
