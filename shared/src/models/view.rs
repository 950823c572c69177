//! Nested read model returned by the pickup point listing

use serde::{Deserialize, Serialize};

use super::{PickupPoint, Product, Reception};

/// One listing entry: a pickup point with its receptions in range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupPointView {
    pub pvz: PickupPoint,
    pub receptions: Vec<ReceptionView>,
}

/// A reception with all of its products
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceptionView {
    pub reception: Reception,
    pub products: Vec<Product>,
}
