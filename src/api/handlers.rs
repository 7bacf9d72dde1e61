//! HTTP API handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::UpstreamError;
use crate::upstream::GraphiteClient;

/// Application state shared with handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Upstream client; cheap to clone, shares one connection pool.
    pub client: GraphiteClient,
}

impl AppState {
    /// Create new app state.
    pub fn new(client: GraphiteClient) -> Self {
        Self { client }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Fixed failure message.
    pub error: String,
}

impl IntoResponse for UpstreamError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Graphite relay handler - mirrors the upstream status and JSON body.
pub async fn graphite(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Value>), UpstreamError> {
    let response = state.client.fetch().await?;
    Ok((response.status, Json(response.body)))
}
