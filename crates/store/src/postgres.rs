use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::Id;
use domain::{Filter, Order, Predicate, Status};
use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};

use crate::{OrderRepository, Result, StoreError, Written};

const COLUMNS: &str = "id, client_id, pickup_point_id, status, status_updated, weight, cost";

/// PostgreSQL-backed order repository.
///
/// Identifiers are stored as `BIGINT`; the `u64` bit pattern is kept as-is so
/// values above `i64::MAX` round-trip unchanged.
#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    /// Creates a new PostgreSQL order repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_order(row: &PgRow) -> Result<Order> {
        let status: String = row.try_get("status")?;
        let status = status
            .parse::<Status>()
            .map_err(|e| StoreError::InvalidRow(e.to_string()))?;

        Ok(Order::from_parts(
            decode_id(row.try_get("id")?),
            decode_id(row.try_get("client_id")?),
            decode_id(row.try_get("pickup_point_id")?),
            status,
            row.try_get::<DateTime<Utc>, _>("status_updated")?,
            decode_amount("weight", row.try_get("weight")?)?,
            decode_amount("cost", row.try_get("cost")?)?,
        ))
    }

    fn push_predicates(builder: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
        builder.push(" WHERE TRUE");
        for predicate in filter.predicates() {
            match predicate {
                Predicate::Id(id) => {
                    builder.push(" AND id = ").push_bind(encode_id(id));
                }
                Predicate::ClientId(id) => {
                    builder.push(" AND client_id = ").push_bind(encode_id(id));
                }
                Predicate::PickupPointId(id) => {
                    builder.push(" AND pickup_point_id = ").push_bind(encode_id(id));
                }
                Predicate::Status(status) => {
                    builder.push(" AND status = ").push_bind(status.as_str());
                }
            }
        }
    }

    async fn upsert_in<'c, E>(executor: E, order: &Order) -> Result<Written>
    where
        E: sqlx::Executor<'c, Database = Postgres>,
    {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO orders (id, client_id, pickup_point_id, status, weight, cost, status_updated)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            ON CONFLICT (id) DO UPDATE SET
                client_id = EXCLUDED.client_id,
                pickup_point_id = EXCLUDED.pickup_point_id,
                status = EXCLUDED.status,
                weight = EXCLUDED.weight,
                cost = EXCLUDED.cost,
                status_updated = GREATEST(orders.status_updated, EXCLUDED.status_updated)
            RETURNING {COLUMNS}, (xmax <> 0) AS existed
            "#
        ))
        .bind(encode_id(order.id()))
        .bind(encode_id(order.client_id()))
        .bind(encode_id(order.pickup_point_id()))
        .bind(order.status().as_str())
        .bind(i64::from(order.weight()))
        .bind(i64::from(order.cost()))
        .fetch_one(executor)
        .await?;

        Ok(Written {
            order: Self::row_to_order(&row)?,
            existed: row.try_get("existed")?,
        })
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn get(&self, id: Id) -> Result<Order> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM orders WHERE id = $1"))
            .bind(encode_id(id))
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Self::row_to_order(&row),
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn delete(&self, id: Id) -> Result<()> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(encode_id(id))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, order), fields(order_id = %order.id()))]
    async fn insert(&self, order: &Order) -> Result<Written> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(&format!(
            r#"
            INSERT INTO orders (id, client_id, pickup_point_id, status, weight, cost, status_updated)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            ON CONFLICT (id) DO NOTHING
            RETURNING {COLUMNS}
            "#
        ))
        .bind(encode_id(order.id()))
        .bind(encode_id(order.client_id()))
        .bind(encode_id(order.pickup_point_id()))
        .bind(order.status().as_str())
        .bind(i64::from(order.weight()))
        .bind(i64::from(order.cost()))
        .fetch_optional(&mut *tx)
        .await?;

        let written = match inserted {
            Some(row) => Written {
                order: Self::row_to_order(&row)?,
                existed: false,
            },
            None => {
                let row = sqlx::query(&format!("SELECT {COLUMNS} FROM orders WHERE id = $1"))
                    .bind(encode_id(order.id()))
                    .fetch_one(&mut *tx)
                    .await?;
                Written {
                    order: Self::row_to_order(&row)?,
                    existed: true,
                }
            }
        };

        tx.commit().await?;
        Ok(written)
    }

    #[tracing::instrument(skip(self, order), fields(order_id = %order.id()))]
    async fn upsert(&self, order: &Order) -> Result<Written> {
        let mut tx = self.pool.begin().await?;
        let written = Self::upsert_in(&mut *tx, order).await?;
        tx.commit().await?;
        Ok(written)
    }

    #[tracing::instrument(skip(self, orders), fields(count = orders.len()))]
    async fn upsert_batch(&self, orders: &[Order]) -> Result<Vec<Order>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await?;

        let mut stored = Vec::with_capacity(orders.len());
        for order in orders {
            stored.push(Self::upsert_in(&mut *tx, order).await?.order);
        }

        tx.commit().await?;
        Ok(stored)
    }

    async fn query(&self, filter: &Filter, offset: u64, limit: i64) -> Result<Vec<Order>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM orders"));
        Self::push_predicates(&mut builder, filter);
        builder.push(" ORDER BY id ASC");

        if limit > 0 {
            builder.push(" LIMIT ").push_bind(limit);
        }
        if offset > 0 {
            builder
                .push(" OFFSET ")
                .push_bind(i64::try_from(offset).unwrap_or(i64::MAX));
        }

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_order).collect()
    }

    async fn delete_by(&self, filter: &Filter) -> Result<u64> {
        let mut builder = QueryBuilder::<Postgres>::new("DELETE FROM orders");
        Self::push_predicates(&mut builder, filter);

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

fn encode_id(id: Id) -> i64 {
    id.get() as i64
}

fn decode_id(raw: i64) -> Id {
    Id::new(raw as u64)
}

fn decode_amount(column: &str, raw: i64) -> Result<u32> {
    u32::try_from(raw).map_err(|_| StoreError::InvalidRow(format!("{column} out of range: {raw}")))
}
