//! PostgreSQL store
//!
//! Enum columns are TEXT with CHECK constraints and are parsed back through
//! the shared models' `FromStr`; a value that fails to parse is reported as
//! [`StoreError::Corrupt`].

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::models::{City, PickupPoint, Product, ProductType, Reception, Role};
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use uuid::Uuid;

use super::{DateRange, JoinedRow, PvzStore, StoreError, StoreResult, UserRecord};
use crate::config::Config;

/// Store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct ReceptionRow {
    id: Uuid,
    pvz_id: Uuid,
    date_time: DateTime<Utc>,
    status: String,
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    reception_id: Uuid,
    date_time: DateTime<Utc>,
    product_type: String,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct JoinRow {
    pvz_id: Uuid,
    registration_date: DateTime<Utc>,
    city: String,
    reception_id: Option<Uuid>,
    reception_date_time: Option<DateTime<Utc>>,
    reception_status: Option<String>,
    product_id: Option<Uuid>,
    product_date_time: Option<DateTime<Utc>>,
    product_type: Option<String>,
}

fn parse<T: FromStr>(raw: &str) -> StoreResult<T>
where
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| StoreError::Corrupt(e.to_string()))
}

impl TryFrom<ReceptionRow> for Reception {
    type Error = StoreError;

    fn try_from(row: ReceptionRow) -> StoreResult<Self> {
        Ok(Reception {
            id: row.id,
            date_time: row.date_time,
            pvz_id: row.pvz_id,
            status: parse(&row.status)?,
        })
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = StoreError;

    fn try_from(row: ProductRow) -> StoreResult<Self> {
        Ok(Product {
            id: row.id,
            date_time: row.date_time,
            product_type: parse(&row.product_type)?,
            reception_id: row.reception_id,
        })
    }
}

impl TryFrom<UserRow> for UserRecord {
    type Error = StoreError;

    fn try_from(row: UserRow) -> StoreResult<Self> {
        Ok(UserRecord {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            role: parse(&row.role)?,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<JoinRow> for JoinedRow {
    type Error = StoreError;

    fn try_from(row: JoinRow) -> StoreResult<Self> {
        let pvz = PickupPoint {
            id: row.pvz_id,
            registration_date: row.registration_date,
            city: parse(&row.city)?,
        };
        let reception = match (row.reception_id, row.reception_date_time, row.reception_status) {
            (Some(id), Some(date_time), Some(status)) => Some(Reception {
                id,
                date_time,
                pvz_id: row.pvz_id,
                status: parse(&status)?,
            }),
            _ => None,
        };
        let product = match (&reception, row.product_id, row.product_date_time, row.product_type) {
            (Some(r), Some(id), Some(date_time), Some(product_type)) => Some(Product {
                id,
                date_time,
                product_type: parse(&product_type)?,
                reception_id: r.id,
            }),
            _ => None,
        };
        Ok(JoinedRow {
            pvz,
            reception,
            product,
        })
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect with the configured pool limits and run pending migrations
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let options = PgConnectOptions::from_str(&config.database_url)?.options([(
            "statement_timeout",
            config.db_statement_timeout.as_millis().to_string(),
        )]);

        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_acquire_timeout)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Database(e.into()))?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PvzStore for PgStore {
    async fn create_pickup_point(&self, city: City, now: DateTime<Utc>) -> StoreResult<PickupPoint> {
        let pvz = PickupPoint {
            id: Uuid::new_v4(),
            registration_date: now,
            city,
        };
        sqlx::query("INSERT INTO pvz (id, registration_date, city) VALUES ($1, $2, $3)")
            .bind(pvz.id)
            .bind(pvz.registration_date)
            .bind(city.as_str())
            .execute(&self.pool)
            .await?;
        Ok(pvz)
    }

    async fn open_reception(&self, pvz_id: Uuid, now: DateTime<Utc>) -> StoreResult<Reception> {
        let row: ReceptionRow = sqlx::query_as(
            "INSERT INTO receptions (id, pvz_id, date_time, status) \
             VALUES ($1, $2, $3, 'in_progress') \
             RETURNING id, pvz_id, date_time, status",
        )
        .bind(Uuid::new_v4())
        .bind(pvz_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::ReceptionAlreadyOpen
            } else if is_foreign_key_violation(&e) {
                StoreError::PickupPointNotFound
            } else {
                StoreError::Database(e)
            }
        })?;
        row.try_into()
    }

    async fn close_open_reception(&self, pvz_id: Uuid, now: DateTime<Utc>) -> StoreResult<Reception> {
        let row: Option<ReceptionRow> = sqlx::query_as(
            "UPDATE receptions SET status = 'close', closed_at = $2 \
             WHERE pvz_id = $1 AND status = 'in_progress' \
             RETURNING id, pvz_id, date_time, status",
        )
        .bind(pvz_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or(StoreError::NoActiveReception)?.try_into()
    }

    async fn add_product(
        &self,
        pvz_id: Uuid,
        product_type: ProductType,
        now: DateTime<Utc>,
    ) -> StoreResult<Product> {
        // FOR SHARE blocks a concurrent close until the insert commits.
        let row: Option<ProductRow> = sqlx::query_as(
            "INSERT INTO products (id, reception_id, date_time, product_type) \
             SELECT $1, r.id, $3, $4 FROM receptions r \
             WHERE r.pvz_id = $2 AND r.status = 'in_progress' \
             FOR SHARE \
             RETURNING id, reception_id, date_time, product_type",
        )
        .bind(Uuid::new_v4())
        .bind(pvz_id)
        .bind(now)
        .bind(product_type.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or(StoreError::NoActiveReception)?.try_into()
    }

    async fn remove_last_product(&self, pvz_id: Uuid) -> StoreResult<Product> {
        let mut tx = self.pool.begin().await?;

        let reception_id: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM receptions \
             WHERE pvz_id = $1 AND status = 'in_progress' \
             FOR UPDATE",
        )
        .bind(pvz_id)
        .fetch_optional(&mut *tx)
        .await?;
        let reception_id = reception_id.ok_or(StoreError::NoActiveReception)?;

        let row: Option<ProductRow> = sqlx::query_as(
            "DELETE FROM products WHERE id = ( \
                 SELECT id FROM products WHERE reception_id = $1 \
                 ORDER BY date_time DESC, seq DESC LIMIT 1 \
             ) \
             RETURNING id, reception_id, date_time, product_type",
        )
        .bind(reception_id)
        .fetch_optional(&mut *tx)
        .await?;
        let row = row.ok_or(StoreError::NoProductsToDelete)?;

        tx.commit().await?;
        row.try_into()
    }

    async fn joined_rows(&self, range: DateRange) -> StoreResult<Vec<JoinedRow>> {
        let rows: Vec<JoinRow> = sqlx::query_as(
            "SELECT p.id AS pvz_id, p.registration_date, p.city, \
                    r.id AS reception_id, r.date_time AS reception_date_time, \
                    r.status AS reception_status, \
                    pr.id AS product_id, pr.date_time AS product_date_time, pr.product_type \
             FROM pvz p \
             LEFT JOIN receptions r ON r.pvz_id = p.id \
                  AND ($1::timestamptz IS NULL OR r.date_time >= $1) \
                  AND ($2::timestamptz IS NULL OR r.date_time <= $2) \
             LEFT JOIN products pr ON pr.reception_id = r.id \
             ORDER BY p.seq DESC, r.seq DESC, pr.seq DESC",
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(JoinedRow::try_from).collect()
    }

    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> StoreResult<UserRecord> {
        let row: UserRow = sqlx::query_as(
            "INSERT INTO users (id, email, password_hash, role, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, email, password_hash, role, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::UserAlreadyExists
            } else {
                StoreError::Database(e)
            }
        })?;
        row.try_into()
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, email, password_hash, role, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(UserRecord::try_from).transpose()
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
