//! [`Proprietor`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{proprietor, user, Proprietor},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of the `proprietors` table, in the order [`from_row()`] expects.
const COLUMNS: &str = "\
    id, user_id, business_name, registration_number, status, created_at";

/// Builds a [`Proprietor`] out of the provided [`Row`].
fn from_row(row: &Row) -> Proprietor {
    Proprietor {
        id: row.get("id"),
        user_id: row.get("user_id"),
        business_name: row.get("business_name"),
        registration_number: row.get("registration_number"),
        status: row.get("status"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Proprietor>, proprietor::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Proprietor>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Proprietor>, proprietor::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM proprietors \
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

impl<C> Database<Select<By<Option<Proprietor>, user::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Proprietor>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Proprietor>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user_id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM proprietors \
             WHERE user_id = $1::UUID",
        );
        Ok(self
            .query_opt(&sql, &[&user_id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Insert<Proprietor>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Proprietor>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(proprietor): Insert<Proprietor>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(proprietor))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Proprietor>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(proprietor): Update<Proprietor>,
    ) -> Result<Self::Ok, Self::Err> {
        let Proprietor {
            id,
            user_id,
            business_name,
            registration_number,
            status,
            created_at,
        } = proprietor;

        const SQL: &str = "\
            INSERT INTO proprietors (\
                id, user_id, business_name, registration_number, \
                status, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, $4::VARCHAR, \
                $5::INT2, $6::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET business_name = EXCLUDED.business_name, \
                registration_number = EXCLUDED.registration_number, \
                status = EXCLUDED.status";
        self.exec(
            SQL,
            &[
                &id,
                &user_id,
                &business_name,
                &registration_number,
                &status,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Proprietor, proprietor::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Proprietor, proprietor::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: proprietor::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM proprietors \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

mod ownership {
    //! [`proprietor::Ownership`]-related [`Database`] implementations.

    use common::operations::{By, Insert, Select, Update};
    use tokio_postgres::Row;
    use tracerr::Traced;

    use crate::{
        domain::{
            property,
            proprietor::{self, ownership, Ownership},
        },
        infra::{
            database::{self, postgres::Connection, Postgres},
            Database,
        },
        read::Active,
    };

    /// Columns of the `property_ownerships` table, in the order
    /// [`from_row()`] expects.
    const COLUMNS: &str = "\
        id, proprietor_id, property_id, percentage, is_active, assigned_at";

    /// Builds an [`Ownership`] out of the provided [`Row`].
    fn from_row(row: &Row) -> Ownership {
        Ownership {
            id: row.get("id"),
            proprietor_id: row.get("proprietor_id"),
            property_id: row.get("property_id"),
            percentage: row.get("percentage"),
            is_active: row.get("is_active"),
            assigned_at: row.get("assigned_at"),
        }
    }

    impl<C> Database<Select<By<Option<Ownership>, ownership::Id>>>
        for Postgres<C>
    where
        C: Connection,
    {
        type Ok = Option<Ownership>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<Option<Ownership>, ownership::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            let id = by.into_inner();

            let sql = format!(
                "SELECT {COLUMNS} \
                 FROM property_ownerships \
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

    impl<C> Database<Select<By<Vec<Active<Ownership>>, proprietor::Id>>>
        for Postgres<C>
    where
        C: Connection,
    {
        type Ok = Vec<Active<Ownership>>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<Vec<Active<Ownership>>, proprietor::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            let proprietor_id = by.into_inner();

            let sql = format!(
                "SELECT {COLUMNS} \
                 FROM property_ownerships \
                 WHERE proprietor_id = $1::UUID \
                   AND is_active \
                 ORDER BY assigned_at ASC",
            );
            Ok(self
                .query(&sql, &[&proprietor_id])
                .await
                .map_err(tracerr::wrap!())?
                .iter()
                .map(from_row)
                .map(Active)
                .collect())
        }
    }

    impl<C> Database<Select<By<Vec<Active<Ownership>>, property::Id>>>
        for Postgres<C>
    where
        C: Connection,
    {
        type Ok = Vec<Active<Ownership>>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<Vec<Active<Ownership>>, property::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            let property_id = by.into_inner();

            let sql = format!(
                "SELECT {COLUMNS} \
                 FROM property_ownerships \
                 WHERE property_id = $1::UUID \
                   AND is_active \
                 ORDER BY assigned_at ASC",
            );
            Ok(self
                .query(&sql, &[&property_id])
                .await
                .map_err(tracerr::wrap!())?
                .iter()
                .map(from_row)
                .map(Active)
                .collect())
        }
    }

    impl<C> Database<Insert<Ownership>> for Postgres<C>
    where
        C: Connection,
        Self: Database<Update<Ownership>, Ok = (), Err = Traced<database::Error>>,
    {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Insert(ownership): Insert<Ownership>,
        ) -> Result<Self::Ok, Self::Err> {
            self.execute(Update(ownership))
                .await
                .map_err(tracerr::wrap!())
        }
    }

    impl<C> Database<Update<Ownership>> for Postgres<C>
    where
        C: Connection,
    {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Update(ownership): Update<Ownership>,
        ) -> Result<Self::Ok, Self::Err> {
            let Ownership {
                id,
                proprietor_id,
                property_id,
                percentage,
                is_active,
                assigned_at,
            } = ownership;

            const SQL: &str = "\
                INSERT INTO property_ownerships (\
                    id, proprietor_id, property_id, percentage, \
                    is_active, assigned_at\
                ) \
                VALUES (\
                    $1::UUID, $2::UUID, $3::UUID, $4::NUMERIC, \
                    $5::BOOLEAN, $6::TIMESTAMPTZ\
                ) \
                ON CONFLICT (id) DO UPDATE \
                SET percentage = EXCLUDED.percentage, \
                    is_active = EXCLUDED.is_active, \
                    assigned_at = EXCLUDED.assigned_at";
            self.exec(
                SQL,
                &[
                    &id,
                    &proprietor_id,
                    &property_id,
                    &percentage,
                    &is_active,
                    &assigned_at,
                ],
            )
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
        }
    }
}

mod report {
    //! [`proprietor::Report`]-related [`Database`] implementations.

    use common::operations::{By, Insert, Lock, Select, Update};
    use tokio_postgres::Row;
    use tracerr::Traced;

    use crate::{
        domain::proprietor::{report, Report},
        infra::{
            database::{self, postgres::Connection, Postgres},
            Database,
        },
        read,
    };

    /// Columns of the `proprietor_reports` table, in the order
    /// [`from_row()`] expects.
    const COLUMNS: &str = "\
        id, proprietor_id, property_id, kind, title, description, status, \
        created_by, created_at, updated_at, sent_at";

    /// Builds a [`Report`] out of the provided [`Row`].
    fn from_row(row: &Row) -> Report {
        Report {
            id: row.get("id"),
            proprietor_id: row.get("proprietor_id"),
            property_id: row.get("property_id"),
            kind: row.get("kind"),
            title: row.get("title"),
            description: row.get("description"),
            status: row.get("status"),
            created_by: row.get("created_by"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            sent_at: row.get("sent_at"),
        }
    }

    impl<C> Database<Select<By<Option<Report>, report::Id>>> for Postgres<C>
    where
        C: Connection,
    {
        type Ok = Option<Report>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<Option<Report>, report::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            let id = by.into_inner();

            let sql = format!(
                "SELECT {COLUMNS} \
                 FROM proprietor_reports \
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

    impl<C> Database<Select<By<Vec<Report>, read::proprietor::Reports>>>
        for Postgres<C>
    where
        C: Connection,
    {
        type Ok = Vec<Report>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<Vec<Report>, read::proprietor::Reports>>,
        ) -> Result<Self::Ok, Self::Err> {
            let read::proprietor::Reports {
                proprietor_id,
                property_id,
            } = by.into_inner();

            let sql = format!(
                "SELECT {COLUMNS} \
                 FROM proprietor_reports \
                 WHERE proprietor_id = $1::UUID \
                   AND ($2::UUID IS NULL OR property_id = $2::UUID) \
                 ORDER BY created_at DESC",
            );
            Ok(self
                .query(&sql, &[&proprietor_id, &property_id])
                .await
                .map_err(tracerr::wrap!())?
                .iter()
                .map(from_row)
                .collect())
        }
    }

    impl<C> Database<Insert<Report>> for Postgres<C>
    where
        C: Connection,
        Self: Database<Update<Report>, Ok = (), Err = Traced<database::Error>>,
    {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Insert(report): Insert<Report>,
        ) -> Result<Self::Ok, Self::Err> {
            self.execute(Update(report))
                .await
                .map_err(tracerr::wrap!())
        }
    }

    impl<C> Database<Update<Report>> for Postgres<C>
    where
        C: Connection,
    {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Update(report): Update<Report>,
        ) -> Result<Self::Ok, Self::Err> {
            let Report {
                id,
                proprietor_id,
                property_id,
                kind,
                title,
                description,
                status,
                created_by,
                created_at,
                updated_at,
                sent_at,
            } = report;

            const SQL: &str = "\
                INSERT INTO proprietor_reports (\
                    id, proprietor_id, property_id, kind, title, \
                    description, status, created_by, created_at, \
                    updated_at, sent_at\
                ) \
                VALUES (\
                    $1::UUID, $2::UUID, $3::UUID, $4::INT2, $5::VARCHAR, \
                    $6::TEXT, $7::INT2, $8::UUID, $9::TIMESTAMPTZ, \
                    $10::TIMESTAMPTZ, $11::TIMESTAMPTZ\
                ) \
                ON CONFLICT (id) DO UPDATE \
                SET title = EXCLUDED.title, \
                    description = EXCLUDED.description, \
                    status = EXCLUDED.status, \
                    updated_at = EXCLUDED.updated_at, \
                    sent_at = EXCLUDED.sent_at";
            self.exec(
                SQL,
                &[
                    &id,
                    &proprietor_id,
                    &property_id,
                    &kind,
                    &title,
                    &description,
                    &status,
                    &created_by,
                    &created_at,
                    &updated_at,
                    &sent_at,
                ],
            )
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
        }
    }

    impl<C> Database<Lock<By<Report, report::Id>>> for Postgres<C>
    where
        C: Connection,
    {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Lock(by): Lock<By<Report, report::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            let id: report::Id = by.into_inner();

            const SQL: &str = "\
                SELECT id \
                FROM proprietor_reports \
                WHERE id = $1::UUID \
                FOR UPDATE";
            self.query(SQL, &[&id])
                .await
                .map_err(tracerr::wrap!())
                .map(drop)
        }
    }
}

mod message {
    //! [`proprietor::Message`]-related [`Database`] implementations.

    use common::operations::{By, Insert, Lock, Select, Update};
    use tokio_postgres::Row;
    use tracerr::Traced;

    use crate::{
        domain::proprietor::{self, message, Message},
        infra::{
            database::{self, postgres::Connection, Postgres},
            Database,
        },
        read,
    };

    /// Columns of the `proprietor_messages` table, in the order
    /// [`from_row()`] expects.
    const COLUMNS: &str = "\
        id, proprietor_id, sender_id, subject, body, kind, is_read, read_at, \
        created_at";

    /// Builds a [`Message`] out of the provided [`Row`].
    fn from_row(row: &Row) -> Message {
        Message {
            id: row.get("id"),
            proprietor_id: row.get("proprietor_id"),
            sender_id: row.get("sender_id"),
            subject: row.get("subject"),
            body: row.get("body"),
            kind: row.get("kind"),
            is_read: row.get("is_read"),
            read_at: row.get("read_at"),
            created_at: row.get("created_at"),
        }
    }

    impl<C> Database<Select<By<Option<Message>, message::Id>>> for Postgres<C>
    where
        C: Connection,
    {
        type Ok = Option<Message>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<Option<Message>, message::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            let id = by.into_inner();

            let sql = format!(
                "SELECT {COLUMNS} \
                 FROM proprietor_messages \
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

    impl<C> Database<Select<By<Vec<Message>, read::proprietor::Messages>>>
        for Postgres<C>
    where
        C: Connection,
    {
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

            let sql = format!(
                "SELECT {COLUMNS} \
                 FROM proprietor_messages \
                 WHERE proprietor_id = $1::UUID \
                   AND (NOT $2::BOOLEAN OR NOT is_read) \
                 ORDER BY created_at DESC",
            );
            Ok(self
                .query(&sql, &[&proprietor_id, &unread_only])
                .await
                .map_err(tracerr::wrap!())?
                .iter()
                .map(from_row)
                .collect())
        }
    }

    impl<C>
        Database<
            Select<
                By<read::proprietor::UnreadMessagesCount, proprietor::Id>,
            >,
        > for Postgres<C>
    where
        C: Connection,
    {
        type Ok = read::proprietor::UnreadMessagesCount;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<
                By<read::proprietor::UnreadMessagesCount, proprietor::Id>,
            >,
        ) -> Result<Self::Ok, Self::Err> {
            let proprietor_id = by.into_inner();

            const SQL: &str = "\
                SELECT COUNT(*)::INT4 \
                FROM proprietor_messages \
                WHERE proprietor_id = $1::UUID \
                  AND NOT is_read";
            self.query_opt(SQL, &[&proprietor_id])
                .await
                .map_err(tracerr::wrap!())
                .map(|row| row.map_or(0, |r| r.get::<_, i32>(0)).into())
        }
    }

    impl<C> Database<Insert<Message>> for Postgres<C>
    where
        C: Connection,
        Self: Database<Update<Message>, Ok = (), Err = Traced<database::Error>>,
    {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Insert(message): Insert<Message>,
        ) -> Result<Self::Ok, Self::Err> {
            self.execute(Update(message))
                .await
                .map_err(tracerr::wrap!())
        }
    }

    impl<C> Database<Update<Message>> for Postgres<C>
    where
        C: Connection,
    {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Update(message): Update<Message>,
        ) -> Result<Self::Ok, Self::Err> {
            let Message {
                id,
                proprietor_id,
                sender_id,
                subject,
                body,
                kind,
                is_read,
                read_at,
                created_at,
            } = message;

            const SQL: &str = "\
                INSERT INTO proprietor_messages (\
                    id, proprietor_id, sender_id, subject, body, kind, \
                    is_read, read_at, created_at\
                ) \
                VALUES (\
                    $1::UUID, $2::UUID, $3::UUID, $4::VARCHAR, $5::TEXT, \
                    $6::INT2, $7::BOOLEAN, $8::TIMESTAMPTZ, $9::TIMESTAMPTZ\
                ) \
                ON CONFLICT (id) DO UPDATE \
                SET is_read = EXCLUDED.is_read, \
                    read_at = EXCLUDED.read_at";
            self.exec(
                SQL,
                &[
                    &id,
                    &proprietor_id,
                    &sender_id,
                    &subject,
                    &body,
                    &kind,
                    &is_read,
                    &read_at,
                    &created_at,
                ],
            )
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
        }
    }

    impl<C> Database<Lock<By<Message, message::Id>>> for Postgres<C>
    where
        C: Connection,
    {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Lock(by): Lock<By<Message, message::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            let id: message::Id = by.into_inner();

            const SQL: &str = "\
                SELECT id \
                FROM proprietor_messages \
                WHERE id = $1::UUID \
                FOR UPDATE";
            self.query(SQL, &[&id])
                .await
                .map_err(tracerr::wrap!())
                .map(drop)
        }
    }
}
