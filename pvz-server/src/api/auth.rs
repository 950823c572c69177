//! Authentication endpoints: dummy login, register, login

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use shared::error::AppError;
use shared::models::{DummyLoginRequest, LoginRequest, RegisterRequest, TokenResponse, User};

use crate::service::account;
use crate::state::AppState;

use super::{ApiResult, JsonBody};

/// POST /dummyLogin
pub async fn dummy_login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<DummyLoginRequest>,
) -> ApiResult<TokenResponse> {
    let token = account::dummy_login(&state.jwt, &req.role)?;
    Ok(Json(TokenResponse { token }))
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = account::register(state.store.as_ref(), &req.email, &req.password, &req.role).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<TokenResponse> {
    let token = account::login(state.store.as_ref(), &state.jwt, &req.email, &req.password).await?;
    Ok(Json(TokenResponse { token }))
}
