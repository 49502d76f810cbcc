//! Application state management for the exporter.
//!
//! This module defines the shared application state that is passed
//! to HTTP handlers. Nothing in it is mutated by a scrape except the
//! exporter's own atomic counters.

use std::sync::Arc;

use crate::metrics::ExporterMetrics;
use crate::process::ProcessSampler;

/// Type alias for shared application state.
pub type SharedState = Arc<AppState>;

/// Global application state shared across requests.
pub struct AppState {
    /// Command-line substring selecting the processes to export.
    pub target: String,
    /// Source of process snapshots.
    pub sampler: Arc<dyn ProcessSampler>,
    /// Operational metrics about the exporter itself.
    pub telemetry: ExporterMetrics,
    /// Whether telemetry families are appended to scrape responses.
    pub enable_telemetry: bool,
}

impl AppState {
    pub fn new(
        target: impl Into<String>,
        sampler: Arc<dyn ProcessSampler>,
        enable_telemetry: bool,
    ) -> prometheus::Result<Self> {
        Ok(Self {
            target: target.into(),
            sampler,
            telemetry: ExporterMetrics::new()?,
            enable_telemetry,
        })
    }
}
