//! Domain services
//!
//! Services validate raw input, call exactly one guarded store operation
//! and translate its outcome into [`AppError`] codes. Handlers stay thin.

pub mod account;
pub mod aggregate;
pub mod ledger;
pub mod pickup_point;
pub mod reception;

use shared::error::{AppError, AppResult, ErrorCode};
use uuid::Uuid;

/// Parse a pickup point id supplied in a body or path
pub fn parse_pvz_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        AppError::with_message(ErrorCode::ValidationFailed, "invalid pvz_id")
            .with_detail("field", "pvzId")
    })
}
