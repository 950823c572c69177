//! Pickup point creation

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{City, PickupPoint};

use crate::db::PvzStore;
use crate::metrics::{PVZ_CREATED_TOTAL, counter};

pub fn parse_city(raw: &str) -> AppResult<City> {
    raw.parse().map_err(|_| {
        AppError::new(ErrorCode::InvalidCity).with_detail("city", raw)
    })
}

pub async fn create(store: &dyn PvzStore, city: &str) -> AppResult<PickupPoint> {
    let city = parse_city(city)?;
    let pvz = store.create_pickup_point(city, shared::util::now()).await?;

    counter!(PVZ_CREATED_TOTAL).increment(1);
    tracing::info!(pvz_id = %pvz.id, city = %pvz.city, "Pickup point created");
    Ok(pvz)
}
