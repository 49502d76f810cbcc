//! proc-check-exporter - version 0.1.0
//!
//! Entry point: resolves configuration, initializes logging and serves
//! `/metrics` until a shutdown signal arrives.

use clap::Parser;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tracing::level_filters::LevelFilter;
use tracing::{error, info};

use proc_check_exporter::cli::{Args, Commands, LogLevel};
use proc_check_exporter::commands::command_test;
use proc_check_exporter::config::{
    render_config, resolve_config, validate_effective_config, Config, USAGE,
};
use proc_check_exporter::handlers::router;
use proc_check_exporter::process::ProcfsSampler;
use proc_check_exporter::state::AppState;

/// Initializes tracing logging subsystem with configured log level.
fn setup_logging(args: &Args) {
    let log_level = match args.log_level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    info!("Logging initialized with level: {:?}", args.log_level);
}

/// Resolves and validates configuration.
/// Exits the process with error code 1 if it is unusable.
fn load_validated_config(args: &Args) -> Config {
    let config = match resolve_config(args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ Configuration invalid: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        eprintln!("{}", USAGE);
        std::process::exit(1);
    }
    config
}

/// Resolves once SIGINT or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), shutting down gracefully...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }
}

/// Main application entry point.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.show_config {
        let config = resolve_config(&args)?;
        println!("{}", render_config(&config, &args.config_format)?);
        return Ok(());
    }

    let config = load_validated_config(&args);

    if args.check_config {
        println!("✅ Configuration is valid");
        return Ok(());
    }

    setup_logging(&args);

    let target = config.target()?.to_string();
    let sampler = Arc::new(ProcfsSampler::new(config.proc_root()));

    if let Some(Commands::Test {
        iterations,
        verbose,
    }) = &args.command
    {
        return command_test(sampler.as_ref(), &target, *iterations, *verbose);
    }

    info!(
        "Starting proc-check-exporter (built {})",
        env!("VERGEN_BUILD_TIMESTAMP")
    );

    let state = Arc::new(AppState::new(
        target.clone(),
        sampler,
        config.enable_telemetry.unwrap_or(true),
    )?);
    let app = router(state);

    let addr = config.listen_addr()?;

    let listener = TcpListener::bind(addr).await.map_err(|e| {
        error!("Failed to bind {}: {}", addr, e);
        e
    })?;
    info!(
        "Starting exporter on http://{}/metrics for process '{}' (procfs: {})",
        addr,
        target,
        config.proc_root().display()
    );

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
                return Err(e.into());
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received, exiting...");
        }
    }

    info!("proc-check-exporter stopped gracefully");
    Ok(())
}
