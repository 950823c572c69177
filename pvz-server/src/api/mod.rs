//! HTTP API

pub mod auth;
pub mod extract;
pub mod health;
pub mod middleware;
pub mod product;
pub mod pvz;
pub mod reception;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::middleware as axum_middleware;
use axum::routing::{get, post};
use shared::error::AppError;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::{gate, require_auth};
use crate::state::AppState;

pub use extract::JsonBody;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Routes without middleware or state
///
/// Public: token issuance, health, metrics. Everything else requires a
/// bearer token and passes the role gate.
pub fn build_router(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/dummyLogin", post(auth::dummy_login))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics));

    // route_layer: the gate needs MatchedPath; require_auth (added last)
    // runs first and injects CurrentUser.
    let protected = Router::new()
        .route("/pvz", post(pvz::create).get(pvz::list))
        .route("/receptions", post(reception::open))
        .route("/products", post(product::add))
        .route(
            "/pvz/{pvzId}/close_last_reception",
            post(reception::close_last),
        )
        .route("/pvz/{pvzId}/delete_last_product", post(product::delete_last))
        .route_layer(axum_middleware::from_fn(gate))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    public.merge(protected)
}

/// Fully configured application, used by the server and by tests
pub fn build_app(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    build_router(&state)
        // Deadline: dropping the handler future cancels in-flight store calls
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.request_timeout,
        ))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        // Set must wrap Propagate so the id exists before it is copied back
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, XRequestId))
        .with_state(state)
}
