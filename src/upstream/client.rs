//! Upstream helper API client wrapper.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::error::{AppError, UpstreamError};
use crate::metrics;

use super::types::{GraphiteQuery, UpstreamResponse};

/// Client for the Graphite helper endpoint.
#[derive(Debug, Clone)]
pub struct GraphiteClient {
    /// HTTP client for upstream requests.
    http: reqwest::Client,
    /// Full upstream URL, query string included.
    upstream_url: String,
    /// Render path placed in every payload.
    graphite_path: String,
}

impl GraphiteClient {
    /// Create a new client from config.
    ///
    /// No request timeout is applied unless `upstream_timeout_ms` is set.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let mut builder = reqwest::Client::builder()
            // Keep connections alive for reuse
            .tcp_keepalive(Duration::from_secs(30))
            .pool_idle_timeout(Duration::from_secs(90));

        if let Some(ms) = config.upstream_timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }

        Ok(Self {
            http: builder.build()?,
            upstream_url: config.upstream_url.clone(),
            graphite_path: config.graphite_path.clone(),
        })
    }

    /// Get the upstream URL.
    pub fn upstream_url(&self) -> &str {
        &self.upstream_url
    }

    /// Payload sent on every fetch.
    pub fn query(&self) -> GraphiteQuery {
        GraphiteQuery::render(self.graphite_path.as_str())
    }

    /// POST the payload upstream and decode the whole response body as JSON.
    ///
    /// The body is read to completion before returning, on success and on
    /// decode failure alike, so the connection goes back to the pool.
    #[instrument(skip(self), fields(url = %self.upstream_url))]
    pub async fn fetch(&self) -> Result<UpstreamResponse, UpstreamError> {
        let result = self.round_trip().await;

        match &result {
            Ok(response) => metrics::inc_upstream_responses(response.status.as_u16()),
            Err(e) => {
                warn!(kind = e.kind(), error = ?e, "Upstream relay failed");
                metrics::inc_upstream_failures(e.kind());
            }
        }

        result
    }

    async fn round_trip(&self) -> Result<UpstreamResponse, UpstreamError> {
        let _timer = metrics::timer_upstream();

        let body = serde_json::to_vec(&self.query()).map_err(UpstreamError::Serialize)?;

        let response = self
            .http
            .post(&self.upstream_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(UpstreamError::Request)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(UpstreamError::ReadBody)?;

        debug!(status = %status, len = bytes.len(), "Upstream responded");

        let body = serde_json::from_slice(&bytes).map_err(UpstreamError::Decode)?;

        Ok(UpstreamResponse { status, body })
    }
}
