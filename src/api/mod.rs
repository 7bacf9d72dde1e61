//! HTTP API module exposing the Graphite relay endpoint.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
