//! Persistent store
//!
//! [`PvzStore`] is the only seam between the services and storage. Every
//! state-machine guard (one open reception per pickup point, products only
//! on open receptions, LIFO removal) is enforced by a single atomic store
//! operation, never by a read followed by a write in the service layer.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::models::{City, PickupPoint, Product, ProductType, Reception, Role};
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store-level errors
///
/// Business variants describe which guard rejected the operation; the
/// `Database` variant carries infrastructure failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("pickup point not found")]
    PickupPointNotFound,

    #[error("pickup point already has a reception in progress")]
    ReceptionAlreadyOpen,

    #[error("no reception in progress")]
    NoActiveReception,

    #[error("reception has no products")]
    NoProductsToDelete,

    #[error("user already exists")]
    UserAlreadyExists,

    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Inclusive bounds on reception start time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start.is_none_or(|s| t >= s) && self.end.is_none_or(|e| t <= e)
    }
}

/// One row of `pvz LEFT JOIN receptions(in range) LEFT JOIN products`
///
/// Rows are emitted in descending insertion order at every level, which is
/// the tie-break the aggregation relies on for equal timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedRow {
    pub pvz: PickupPoint,
    pub reception: Option<Reception>,
    pub product: Option<Product>,
}

/// Stored user including the password hash
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait PvzStore: Send + Sync + 'static {
    async fn create_pickup_point(&self, city: City, now: DateTime<Utc>) -> StoreResult<PickupPoint>;

    /// Atomically open a reception. Fails with `ReceptionAlreadyOpen` when
    /// one is in progress and `PickupPointNotFound` for an unknown pickup point.
    async fn open_reception(&self, pvz_id: Uuid, now: DateTime<Utc>) -> StoreResult<Reception>;

    /// Close the reception in progress. `NoActiveReception` when none is.
    async fn close_open_reception(&self, pvz_id: Uuid, now: DateTime<Utc>) -> StoreResult<Reception>;

    /// Append a product to the reception in progress.
    async fn add_product(
        &self,
        pvz_id: Uuid,
        product_type: ProductType,
        now: DateTime<Utc>,
    ) -> StoreResult<Product>;

    /// Delete and return the newest product of the reception in progress.
    /// `NoActiveReception` when none is open, `NoProductsToDelete` when it is empty.
    async fn remove_last_product(&self, pvz_id: Uuid) -> StoreResult<Product>;

    /// Flat join feeding the listing aggregation. Every pickup point appears
    /// at least once; only receptions started within `range` are joined.
    async fn joined_rows(&self, range: DateRange) -> StoreResult<Vec<JoinedRow>>;

    /// Insert a user. `UserAlreadyExists` on a duplicate email.
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> StoreResult<UserRecord>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;

    /// Liveness probe used by `/health`
    async fn ping(&self) -> StoreResult<()>;
}
