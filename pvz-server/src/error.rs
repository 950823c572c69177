//! Store-to-API error mapping
//!
//! Business variants of [`StoreError`] map to their error codes and pass
//! through to the client. Infrastructure failures are logged here and
//! reach the client only as an opaque internal error.

use shared::error::{AppError, ErrorCode};

use crate::db::StoreError;

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::PickupPointNotFound => AppError::new(ErrorCode::PickupPointNotFound),
            StoreError::ReceptionAlreadyOpen => AppError::new(ErrorCode::ReceptionAlreadyOpen),
            StoreError::NoActiveReception => AppError::new(ErrorCode::NoActiveReception),
            StoreError::NoProductsToDelete => AppError::new(ErrorCode::NoProductsToDelete),
            StoreError::UserAlreadyExists => AppError::new(ErrorCode::UserAlreadyExists),
            StoreError::Database(sqlx::Error::PoolTimedOut) => {
                tracing::error!("Database pool acquire timed out");
                AppError::new(ErrorCode::TimeoutError)
            }
            StoreError::Database(db_err) => {
                tracing::error!(error = %db_err, "Store database error");
                AppError::new(ErrorCode::DatabaseError)
            }
            StoreError::Corrupt(detail) => {
                tracing::error!(%detail, "Corrupt row in store");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}
