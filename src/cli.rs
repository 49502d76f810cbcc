//! CLI arguments and subcommands for proc-check-exporter.
//!
//! This module defines the command-line interface structure using the clap library.

use clap::{Parser, Subcommand, ValueEnum};
use std::net::IpAddr;
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Default, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, Default, ValueEnum)]
pub enum ConfigFormat {
    #[default]
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug, Default)]
#[command(
    name = "proc-check-exporter",
    about = "Prometheus exporter for processes matching a command-line substring",
    long_about = "Prometheus exporter for processes matching a command-line substring.\n\n\
                  On every scrape of /metrics the process table is walked, processes whose \
                  command line contains the target substring are sampled, and their existence, \
                  CPU usage, resident memory and arguments are exported as gauges.",
    version,
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Substring to look for in process command lines
    #[arg(long)]
    pub process: Option<String>,

    /// HTTP listen port
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Bind to specific interface/IP
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Mount point of the proc filesystem to sample
    #[arg(long)]
    pub proc_root: Option<PathBuf>,

    /// Disable internal proc_check_exporter_* metrics
    #[arg(long)]
    pub disable_telemetry: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sample matching processes and print the rendered metrics without serving
    Test {
        /// Number of sampling passes
        #[arg(short = 'n', long, default_value_t = 1)]
        iterations: usize,

        /// Show a per-process summary
        #[arg(long)]
        verbose: bool,
    },
}
