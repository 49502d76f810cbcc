//! HTTP endpoint handlers for the exporter.
//!
//! Only `/metrics` is served.

pub mod metrics;

use axum::{routing::get, Router};

use crate::state::SharedState;

// Re-export handlers
pub use metrics::{metrics_handler, scrape, MetricsError};

/// Builds the HTTP router with all exporter routes.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}
