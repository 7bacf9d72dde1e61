//! Upstream module for the Graphite helper API.
//!
//! This module handles:
//! - The fixed outbound payload
//! - The HTTP client that relays it

pub mod client;
pub mod types;

pub use client::GraphiteClient;
pub use types::{GraphiteQuery, UpstreamResponse};
