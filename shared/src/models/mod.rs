//! Data models
//!
//! Shared between the server and its clients (via API).
//! Wire names follow the public API: camelCase fields, lowercase enum tags.
//! All IDs are `Uuid`, all timestamps are UTC.

pub mod pickup_point;
pub mod product;
pub mod reception;
pub mod user;
pub mod view;

// Re-exports
pub use pickup_point::*;
pub use product::*;
pub use reception::*;
pub use user::*;
pub use view::*;

/// Returned when a wire string does not name a known enum variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
