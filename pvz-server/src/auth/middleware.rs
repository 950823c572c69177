//! Authentication middleware
//!
//! [`require_auth`] verifies the bearer token and injects [`CurrentUser`];
//! [`gate`] maps the matched route to an [`Operation`] and checks the
//! caller's role against the capability table.

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::AppError;

use crate::auth::{CurrentUser, JwtError, JwtService, Operation};
use crate::security_log;
use crate::state::AppState;

/// Require a valid `Authorization: Bearer <token>` header
///
/// | Error | HTTP status |
/// |-------|-------------|
/// | No Authorization header | 401 NotAuthenticated |
/// | Token expired | 401 TokenExpired |
/// | Invalid token | 401 TokenInvalid |
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // CORS preflight
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("auth_missing", uri = %req.uri());
            return Err(AppError::unauthorized());
        }
    };

    let user = state
        .jwt
        .validate_token(token)
        .and_then(CurrentUser::try_from);

    match user {
        Ok(user) => {
            req.extensions_mut().insert(user.clone());
            let mut response = next.run(req).await;
            // Read back by the request logger, which sits outside this layer.
            response.extensions_mut().insert(user);
            Ok(response)
        }
        Err(e) => {
            security_log!("auth_failed", error = %e, uri = %req.uri());
            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// Role gate, attached with `route_layer` so the matched path is known
pub async fn gate(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::unauthorized)?;

    let template = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str())
        .unwrap_or_default();

    let Some(operation) = Operation::for_route(req.method(), template) else {
        // A protected route without a table entry is a wiring bug: deny.
        security_log!("unmapped_route", method = %req.method(), path = template);
        return Err(AppError::forbidden("Operation not permitted"));
    };

    if !operation.is_allowed(user.role) {
        security_log!(
            "permission_denied",
            user_id = %user.id,
            role = user.role.as_str(),
            operation = ?operation
        );
        return Err(AppError::forbidden(format!(
            "Role {} may not perform this operation",
            user.role
        )));
    }

    Ok(next.run(req).await)
}
