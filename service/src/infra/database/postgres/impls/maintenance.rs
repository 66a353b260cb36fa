//! [`MaintenanceRequest`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{maintenance, property, MaintenanceRequest},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Columns of the `maintenance_requests` table, in the order [`from_row()`]
/// expects.
const COLUMNS: &str = "\
    id, reporter_id, property_id, unit_id, category_id, \
    title, description, priority, status, \
    technician_id, response_deadline, \
    is_escalated, escalated_at, escalation_reason, \
    rating, created_at, completed_at";

/// Builds a [`MaintenanceRequest`] out of the provided [`Row`].
fn from_row(row: &Row) -> MaintenanceRequest {
    MaintenanceRequest {
        id: row.get("id"),
        reporter_id: row.get("reporter_id"),
        property_id: row.get("property_id"),
        unit_id: row.get("unit_id"),
        category_id: row.get("category_id"),
        title: row.get("title"),
        description: row.get("description"),
        priority: row.get("priority"),
        status: row.get("status"),
        technician_id: row.get("technician_id"),
        response_deadline: row.get("response_deadline"),
        is_escalated: row.get("is_escalated"),
        escalated_at: row.get("escalated_at"),
        escalation_reason: row.get("escalation_reason"),
        rating: row.get("rating"),
        created_at: row.get("created_at"),
        completed_at: row.get("completed_at"),
    }
}

impl<C> Database<Select<By<Option<MaintenanceRequest>, maintenance::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<MaintenanceRequest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<MaintenanceRequest>, maintenance::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM maintenance_requests \
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

impl<C>
    Database<
        Select<By<Vec<MaintenanceRequest>, read::maintenance::ReportedBy>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<MaintenanceRequest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<MaintenanceRequest>, read::maintenance::ReportedBy>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::maintenance::ReportedBy(reporter_id) = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM maintenance_requests \
             WHERE reporter_id = $1::UUID \
             ORDER BY created_at DESC",
        );
        Ok(self
            .query(&sql, &[&reporter_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C>
    Database<
        Select<By<Vec<MaintenanceRequest>, read::maintenance::OfProperty>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<MaintenanceRequest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<MaintenanceRequest>, read::maintenance::OfProperty>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::maintenance::OfProperty {
            property_id,
            status,
        } = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM maintenance_requests \
             WHERE property_id = $1::UUID \
               AND ($2::INT2 IS NULL OR status = $2::INT2) \
             ORDER BY created_at DESC",
        );
        Ok(self
            .query(&sql, &[&property_id, &status])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C>
    Database<
        Select<By<Vec<MaintenanceRequest>, read::maintenance::AssignedTo>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<MaintenanceRequest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<MaintenanceRequest>, read::maintenance::AssignedTo>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::maintenance::AssignedTo {
            technician_id,
            status,
        } = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM maintenance_requests \
             WHERE technician_id = $1::UUID \
               AND ($2::INT2 IS NULL OR status = $2::INT2) \
             ORDER BY created_at DESC",
        );
        Ok(self
            .query(&sql, &[&technician_id, &status])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C>
    Database<
        Select<By<Vec<MaintenanceRequest>, read::maintenance::EscalationView>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<MaintenanceRequest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<MaintenanceRequest>, read::maintenance::EscalationView>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::maintenance::EscalationView { property_id } =
            by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM maintenance_requests \
             WHERE property_id = $1::UUID \
               AND status IN ($2::INT2, $3::INT2) \
               AND (technician_id IS NULL OR is_escalated) \
             ORDER BY COALESCE(escalated_at, created_at) ASC",
        );
        Ok(self
            .query(
                &sql,
                &[
                    &property_id,
                    &maintenance::Status::Pending,
                    &maintenance::Status::InProgress,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<MaintenanceRequest>, Vec<property::Id>>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<MaintenanceRequest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<MaintenanceRequest>, Vec<property::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let property_ids = by.into_inner();
        if property_ids.is_empty() {
            return Ok(vec![]);
        }

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM maintenance_requests \
             WHERE property_id = ANY($1::UUID[])",
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

impl<C> Database<Insert<MaintenanceRequest>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Update<MaintenanceRequest>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(request): Insert<MaintenanceRequest>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(request))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<MaintenanceRequest>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(request): Update<MaintenanceRequest>,
    ) -> Result<Self::Ok, Self::Err> {
        let MaintenanceRequest {
            id,
            reporter_id,
            property_id,
            unit_id,
            category_id,
            title,
            description,
            priority,
            status,
            technician_id,
            response_deadline,
            is_escalated,
            escalated_at,
            escalation_reason,
            rating,
            created_at,
            completed_at,
        } = request;

        const SQL: &str = "\
            INSERT INTO maintenance_requests (\
                id, reporter_id, property_id, unit_id, category_id, \
                title, description, priority, status, \
                technician_id, response_deadline, \
                is_escalated, escalated_at, escalation_reason, \
                rating, created_at, completed_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::UUID, $5::UUID, \
                $6::VARCHAR, $7::TEXT, $8::INT2, $9::INT2, \
                $10::UUID, $11::TIMESTAMPTZ, \
                $12::BOOLEAN, $13::TIMESTAMPTZ, $14::TEXT, \
                $15::NUMERIC, $16::TIMESTAMPTZ, $17::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET category_id = EXCLUDED.category_id, \
                title = EXCLUDED.title, \
                description = EXCLUDED.description, \
                priority = EXCLUDED.priority, \
                status = EXCLUDED.status, \
                technician_id = EXCLUDED.technician_id, \
                response_deadline = EXCLUDED.response_deadline, \
                is_escalated = EXCLUDED.is_escalated, \
                escalated_at = EXCLUDED.escalated_at, \
                escalation_reason = EXCLUDED.escalation_reason, \
                rating = EXCLUDED.rating, \
                completed_at = EXCLUDED.completed_at";
        self.exec(
            SQL,
            &[
                &id,
                &reporter_id,
                &property_id,
                &unit_id,
                &category_id,
                &title,
                &description,
                &priority,
                &status,
                &technician_id,
                &response_deadline,
                &is_escalated,
                &escalated_at,
                &escalation_reason,
                &rating,
                &created_at,
                &completed_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<MaintenanceRequest, maintenance::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<MaintenanceRequest, maintenance::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: maintenance::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM maintenance_requests \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
