//! Single-endpoint Graphite relay.
//!
//! `GET /api/graphite` POSTs a fixed render query to an upstream helper API
//! and mirrors the upstream's status code and JSON body back to the caller:
//!
//! ```text
//! client ──GET /api/graphite──▶ proxy ──POST {"path": ..., "payload": ""}──▶ upstream
//! client ◀──── status + JSON ── proxy ◀────────────── status + JSON ──────── upstream
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`upstream`]: Outbound payload and upstream client
//! - [`api`]: HTTP router and relay handler
//! - [`availability`]: UP/DOWN classification of host-alive datapoints
//! - [`metrics`]: Upstream latency and outcome metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod availability;
pub mod config;
pub mod error;
pub mod metrics;
pub mod upstream;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
