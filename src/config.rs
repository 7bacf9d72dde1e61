//! Application configuration loaded from environment variables.
//!
//! Every field has a default matching the fixed upstream, render path and port,
//! so an empty environment needs no configuration at all.

use serde::Deserialize;
use url::Url;

/// Default upstream helper endpoint (a mock API).
pub const DEFAULT_UPSTREAM_URL: &str = "https://553f5731-6546-4660-bca9-42e8866c0cf9.mock.pstmn.io/v1/vpchelper/?host=vigilant-vino-iamr-02&action=GET&aws_region=us-east-2&service=graphite";

/// Default Graphite render path sent in the `path` field of the payload.
pub const DEFAULT_GRAPHITE_PATH: &str = "/render/?target=virgil.gov-vigilant-nat-01.host.hostalive.perfdata.pl.value&format=json&from=-90d&to=-30d";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Upstream ===
    /// URL the fixed payload is POSTed to.
    #[serde(default = "default_upstream_url")]
    pub upstream_url: String,

    /// Graphite render path forwarded in the payload.
    #[serde(default = "default_graphite_path")]
    pub graphite_path: String,

    /// Optional whole-request timeout for upstream calls.
    #[serde(default)]
    pub upstream_timeout_ms: Option<u64>,

    // === Server Configuration ===
    /// HTTP listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Port for the Prometheus exporter; disabled when unset.
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_upstream_url() -> String {
    DEFAULT_UPSTREAM_URL.to_string()
}

fn default_graphite_path() -> String {
    DEFAULT_GRAPHITE_PATH.to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upstream_url: default_upstream_url(),
            graphite_path: default_graphite_path(),
            upstream_timeout_ms: None,
            port: default_port(),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        let url = Url::parse(&self.upstream_url)
            .map_err(|e| format!("UPSTREAM_URL is not a valid URL: {}", e))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "UPSTREAM_URL must use http or https, got {}",
                url.scheme()
            ));
        }

        if self.graphite_path.is_empty() {
            return Err("GRAPHITE_PATH is required".to_string());
        }

        if !self.graphite_path.starts_with('/') {
            return Err("GRAPHITE_PATH must start with /".to_string());
        }

        if self.port == 0 {
            return Err("PORT must be non-zero".to_string());
        }

        Ok(())
    }

    /// Host portion of the upstream URL, for log lines.
    pub fn upstream_host(&self) -> Option<String> {
        Url::parse(&self.upstream_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
    }
}
