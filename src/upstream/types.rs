//! Types exchanged with the upstream helper API.

use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;

/// Body POSTed to the upstream helper.
///
/// Field order is part of the wire format: `path` then `payload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphiteQuery {
    /// Graphite render path, including its query string.
    pub path: String,
    /// Request body the helper forwards to Graphite; always empty.
    pub payload: String,
}

impl GraphiteQuery {
    /// Query for a render path with an empty forwarded payload.
    pub fn render(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            payload: String::new(),
        }
    }
}

/// Decoded upstream response.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    /// Status code the upstream answered with.
    pub status: StatusCode,
    /// Body, forwarded verbatim.
    pub body: Value,
}
