//! Reception endpoints

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use shared::error::AppError;
use shared::models::{Reception, ReceptionCreate};

use crate::service::{parse_pvz_id, reception};
use crate::state::AppState;

use super::{ApiResult, JsonBody};

/// POST /receptions
pub async fn open(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ReceptionCreate>,
) -> Result<(StatusCode, Json<Reception>), AppError> {
    let pvz_id = parse_pvz_id(&req.pvz_id)?;
    let reception = reception::open(state.store.as_ref(), pvz_id).await?;
    Ok((StatusCode::CREATED, Json(reception)))
}

/// POST /pvz/{pvzId}/close_last_reception
pub async fn close_last(
    State(state): State<AppState>,
    Path(pvz_id): Path<String>,
) -> ApiResult<Reception> {
    let pvz_id = parse_pvz_id(&pvz_id)?;
    let reception = reception::close(state.store.as_ref(), pvz_id).await?;
    Ok(Json(reception))
}
