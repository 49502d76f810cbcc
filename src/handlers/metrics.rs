//! Metrics endpoint handler for Prometheus scraping.
//!
//! Every request runs a fresh sampling pass and renders the result in the
//! Prometheus text format. Nothing is cached between requests.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::time::Instant;
use tracing::{debug, error, instrument};

use crate::metrics::{encode_text, render_snapshots};
use crate::process::{ProcessSnapshot, SamplerError};
use crate::state::SharedState;

/// Error type for metrics endpoint failures.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("failed to encode metrics: {0}")]
    EncodingFailed(#[from] prometheus::Error),
}

impl IntoResponse for MetricsError {
    fn into_response(self) -> Response {
        error!("{}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to encode metrics",
        )
            .into_response()
    }
}

/// Handler for the /metrics endpoint.
#[instrument(skip(state))]
pub async fn metrics_handler(State(state): State<SharedState>) -> Result<Response, MetricsError> {
    debug!("Processing /metrics request");
    let body = scrape(&state).await?;
    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response())
}

/// Runs one sample-and-render cycle and returns the exposition text.
///
/// A sampler failure is logged and yields a body without process series.
pub async fn scrape(state: &SharedState) -> Result<String, MetricsError> {
    let start = Instant::now();

    let mut families = match sample_blocking(state).await {
        Ok(snapshots) => {
            state
                .telemetry
                .scrapes_total
                .with_label_values(&["success"])
                .inc();
            state.telemetry.matched_processes.set(snapshots.len() as f64);
            debug!(
                "Matched {} processes for '{}'",
                snapshots.len(),
                state.target
            );
            render_snapshots(&snapshots)?
        }
        Err(e) => {
            error!("Error retrieving processes: {}", e);
            state
                .telemetry
                .scrapes_total
                .with_label_values(&["error"])
                .inc();
            Vec::new()
        }
    };

    state
        .telemetry
        .scrape_duration_seconds
        .set(start.elapsed().as_secs_f64());

    if state.enable_telemetry {
        families.extend(state.telemetry.gather());
    }

    let body = encode_text(&families)?;
    debug!(
        "Metrics request completed: {} bytes, {:.3}ms",
        body.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(body)
}

/// Walks the process table on the blocking pool.
async fn sample_blocking(state: &SharedState) -> Result<Vec<ProcessSnapshot>, SamplerError> {
    let sampler = state.sampler.clone();
    let target = state.target.clone();
    tokio::task::spawn_blocking(move || sampler.sample(&target))
        .await
        .map_err(|e| SamplerError::Aborted(e.to_string()))?
}
