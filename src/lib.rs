//! proc-check-exporter library
//!
//! Samples the processes whose command line contains a target substring and
//! exposes them as Prometheus gauges on `/metrics`.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use proc_check_exporter::handlers::router;
//! use proc_check_exporter::process::ProcfsSampler;
//! use proc_check_exporter::state::AppState;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let state = Arc::new(AppState::new("nginx", Arc::new(ProcfsSampler::default()), true)?);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8081").await?;
//! axum::serve(listener, router(state)).await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod handlers;
pub mod metrics;
pub mod process;
pub mod state;

// Re-export main types for convenience
pub use process::{ProcessSampler, ProcessSnapshot, ProcfsSampler, SamplerError};
pub use state::{AppState, SharedState};
