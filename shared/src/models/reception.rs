//! Reception Model (goods-receiving session)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ParseEnumError;

/// Reception status
///
/// `Open` moves to `Closed` exactly once; `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReceptionStatus {
    #[serde(rename = "in_progress")]
    Open,
    #[serde(rename = "close")]
    Closed,
}

impl ReceptionStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ReceptionStatus::Open => "in_progress",
            ReceptionStatus::Closed => "close",
        }
    }

    pub const fn is_open(&self) -> bool {
        matches!(self, ReceptionStatus::Open)
    }

    /// Open -> Closed. `None` when already closed.
    pub const fn close(self) -> Option<ReceptionStatus> {
        match self {
            ReceptionStatus::Open => Some(ReceptionStatus::Closed),
            ReceptionStatus::Closed => None,
        }
    }
}

impl fmt::Display for ReceptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReceptionStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(ReceptionStatus::Open),
            "close" => Ok(ReceptionStatus::Closed),
            other => Err(ParseEnumError::new("reception status", other)),
        }
    }
}

/// Reception record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reception {
    pub id: Uuid,
    /// Start time
    pub date_time: DateTime<Utc>,
    pub pvz_id: Uuid,
    pub status: ReceptionStatus,
}

/// Open reception payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionCreate {
    pub pvz_id: String,
}
