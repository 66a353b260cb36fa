//! [`Payment`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Money,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{payment, property, tenant, Payment},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of the `rent_payments` table, in the order [`from_row()`]
/// expects.
const COLUMNS: &str = "\
    id, tenant_id, lease_id, property_id, unit_id, \
    amount, amount_currency, amount_paid, amount_paid_currency, \
    due_at, paid_at, method, reference, status, created_at";

/// Builds a [`Payment`] out of the provided [`Row`].
fn from_row(row: &Row) -> Payment {
    Payment {
        id: row.get("id"),
        tenant_id: row.get("tenant_id"),
        lease_id: row.get("lease_id"),
        property_id: row.get("property_id"),
        unit_id: row.get("unit_id"),
        amount: Money {
            amount: row.get("amount"),
            currency: row.get("amount_currency"),
        },
        amount_paid: Money {
            amount: row.get("amount_paid"),
            currency: row.get("amount_paid_currency"),
        },
        due_at: row.get("due_at"),
        paid_at: row.get("paid_at"),
        method: row.get("method"),
        reference: row.get("reference"),
        status: row.get("status"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Payment>, payment::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Payment>, payment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM rent_payments \
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

impl<C> Database<Select<By<Vec<Payment>, tenant::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Payment>, tenant::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let tenant_id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM rent_payments \
             WHERE tenant_id = $1::UUID \
             ORDER BY due_at DESC",
        );
        Ok(self
            .query(&sql, &[&tenant_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Payment>, Vec<property::Id>>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Payment>, Vec<property::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let property_ids = by.into_inner();
        if property_ids.is_empty() {
            return Ok(vec![]);
        }

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM rent_payments \
             WHERE property_id = ANY($1::UUID[]) \
             ORDER BY due_at DESC",
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

impl<C> Database<Select<By<Vec<Payment>, property::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Vec<Payment>, Vec<property::Id>>>,
        Ok = Vec<Payment>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Payment>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Select(By::new(vec![by.into_inner()])))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Payment>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Payment>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(payment): Insert<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(payment))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Payment>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(payment): Update<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        let Payment {
            id,
            tenant_id,
            lease_id,
            property_id,
            unit_id,
            amount,
            amount_paid,
            due_at,
            paid_at,
            method,
            reference,
            status,
            created_at,
        } = payment;

        const SQL: &str = "\
            INSERT INTO rent_payments (\
                id, tenant_id, lease_id, property_id, unit_id, \
                amount, amount_currency, \
                amount_paid, amount_paid_currency, \
                due_at, paid_at, method, reference, status, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::UUID, $5::UUID, \
                $6::NUMERIC, $7::INT2, \
                $8::NUMERIC, $9::INT2, \
                $10::TIMESTAMPTZ, $11::TIMESTAMPTZ, $12::INT2, \
                $13::VARCHAR, $14::INT2, $15::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET amount = EXCLUDED.amount, \
                amount_currency = EXCLUDED.amount_currency, \
                amount_paid = EXCLUDED.amount_paid, \
                amount_paid_currency = EXCLUDED.amount_paid_currency, \
                due_at = EXCLUDED.due_at, \
                paid_at = EXCLUDED.paid_at, \
                method = EXCLUDED.method, \
                reference = EXCLUDED.reference, \
                status = EXCLUDED.status";
        self.exec(
            SQL,
            &[
                &id,
                &tenant_id,
                &lease_id,
                &property_id,
                &unit_id,
                &amount.amount,
                &amount.currency,
                &amount_paid.amount,
                &amount_paid.currency,
                &due_at,
                &paid_at,
                &method,
                &reference,
                &status,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<By<Payment, payment::DueDateTime>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(by): Update<By<Payment, payment::DueDateTime>>,
    ) -> Result<Self::Ok, Self::Err> {
        let due_before = by.into_inner();

        const SQL: &str = "\
            UPDATE rent_payments \
            SET status = $1::INT2 \
            WHERE status IN ($2::INT2, $3::INT2) \
              AND due_at < $4::TIMESTAMPTZ";
        self.exec(
            SQL,
            &[
                &payment::Status::Overdue,
                &payment::Status::Pending,
                &payment::Status::Partial,
                &due_before,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Lock<By<Payment, payment::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Payment, payment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: payment::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM rent_payments \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
