//! Pickup Point Model (PVZ)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ParseEnumError;

/// Cities where pickup points may be opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    #[serde(rename = "Moscow")]
    Moscow,
    #[serde(rename = "Saint Petersburg")]
    SaintPetersburg,
    #[serde(rename = "Kazan")]
    Kazan,
}

impl City {
    pub const ALL: [City; 3] = [City::Moscow, City::SaintPetersburg, City::Kazan];

    /// Wire and storage representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            City::Moscow => "Moscow",
            City::SaintPetersburg => "Saint Petersburg",
            City::Kazan => "Kazan",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for City {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        City::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("city", s))
    }
}

/// Pickup point. Created once by a moderator, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupPoint {
    pub id: Uuid,
    /// Set at creation, immutable
    pub registration_date: DateTime<Utc>,
    pub city: City,
}

/// Create pickup point payload
///
/// `city` is kept as a raw string so an unknown city is reported as a
/// validation error instead of a body rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupPointCreate {
    pub city: String,
}
