//! Product endpoints

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use shared::error::AppError;
use shared::models::{Product, ProductCreate};

use crate::service::{ledger, parse_pvz_id};
use crate::state::AppState;

use super::{ApiResult, JsonBody};

/// POST /products
pub async fn add(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ProductCreate>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let pvz_id = parse_pvz_id(&req.pvz_id)?;
    let product = ledger::add(state.store.as_ref(), pvz_id, &req.product_type).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// POST /pvz/{pvzId}/delete_last_product
pub async fn delete_last(
    State(state): State<AppState>,
    Path(pvz_id): Path<String>,
) -> ApiResult<Product> {
    let pvz_id = parse_pvz_id(&pvz_id)?;
    let product = ledger::remove_last(state.store.as_ref(), pvz_id).await?;
    Ok(Json(product))
}
