//! Shared types for the PVZ service
//!
//! Domain models (pickup points, receptions, products, users), the nested
//! read model returned by the listing endpoint, and the unified error system.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode};
