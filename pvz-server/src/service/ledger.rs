//! Product ledger
//!
//! Products of a reception form a stack ordered by creation time (ties by
//! insertion order). Only the reception in progress accepts pushes and pops.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Product, ProductType};
use uuid::Uuid;

use crate::db::{PvzStore, StoreError};
use crate::metrics::{PRODUCTS_ADDED_TOTAL, counter};

pub fn parse_product_type(raw: &str) -> AppResult<ProductType> {
    raw.parse().map_err(|_| {
        AppError::new(ErrorCode::InvalidProductType).with_detail("type", raw)
    })
}

/// Push a product onto the reception in progress
pub async fn add(store: &dyn PvzStore, pvz_id: Uuid, product_type: &str) -> AppResult<Product> {
    let product_type = parse_product_type(product_type)?;
    let product = store
        .add_product(pvz_id, product_type, shared::util::now())
        .await?;

    counter!(PRODUCTS_ADDED_TOTAL).increment(1);
    tracing::info!(
        pvz_id = %pvz_id,
        reception_id = %product.reception_id,
        product_id = %product.id,
        "Product added"
    );
    Ok(product)
}

/// Pop the newest product of the reception in progress
///
/// Without a reception in progress this is a conflict (`ReceptionNotOpen`),
/// unlike `add` and `close` which report `NoActiveReception`; an empty
/// reception reports `NoProductsToDelete`.
pub async fn remove_last(store: &dyn PvzStore, pvz_id: Uuid) -> AppResult<Product> {
    let product = store.remove_last_product(pvz_id).await.map_err(|e| match e {
        StoreError::NoActiveReception => AppError::new(ErrorCode::ReceptionNotOpen),
        other => other.into(),
    })?;

    tracing::info!(
        pvz_id = %pvz_id,
        reception_id = %product.reception_id,
        product_id = %product.id,
        "Product removed"
    );
    Ok(product)
}
