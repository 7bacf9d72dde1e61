//! Unified error types for the proxy.

use strum::IntoStaticStr;
use thiserror::Error;

/// Process-level error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Upstream relay error.
    #[error("upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// HTTP client construction error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while relaying a request to the upstream.
///
/// The `Display` text is the exact message returned to callers; the wrapped
/// source carries the detail for logs.
#[derive(Error, Debug, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum UpstreamError {
    /// Outbound payload could not be encoded.
    #[error("Failed to marshal JSON")]
    Serialize(#[source] serde_json::Error),

    /// Upstream could not be reached.
    #[error("Failed to make API request")]
    Request(#[source] reqwest::Error),

    /// Response body stream failed mid-read.
    #[error("Failed to read response body")]
    ReadBody(#[source] reqwest::Error),

    /// Response body is not JSON.
    #[error("Failed to parse JSON response")]
    Decode(#[source] serde_json::Error),
}

impl UpstreamError {
    /// Stable label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
