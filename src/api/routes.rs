//! HTTP API route definitions.

use axum::{
    http::{header, HeaderValue},
    routing::get,
    Router,
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use super::handlers::{graphite, AppState};

/// Path of the relay endpoint.
pub const GRAPHITE_ROUTE: &str = "/api/graphite";

/// Create the API router.
///
/// Permissive cross-origin headers are set on every response, errors included.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(GRAPHITE_ROUTE, get(graphite))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, PUT, DELETE"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type, Authorization"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
