//! Configuration management for proc-check-exporter.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use tracing::info;

// Default configuration constants
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Usage line printed when the exporter cannot start.
pub const USAGE: &str = "Usage: proc-check-exporter --process <substring>";

/// Errors raised while resolving or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no target process given (set --process or `process` in the config file)")]
    MissingProcess,

    #[error("target process substring must not be empty")]
    EmptyProcess,

    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid bind address '{0}'")]
    InvalidBind(String),

    #[error("failed to serialize config: {0}")]
    Serialize(String),
}

/// Effective exporter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Substring matched against process command lines
    #[serde(alias = "process-name", alias = "process_name")]
    pub process: Option<String>,

    // Server configuration
    pub port: Option<u16>,
    pub bind: Option<String>,

    /// Mount point of the proc filesystem
    #[serde(alias = "proc-root")]
    pub proc_root: Option<PathBuf>,

    // Feature flags
    #[serde(alias = "enable-telemetry")]
    pub enable_telemetry: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            process: None,
            port: Some(DEFAULT_PORT),
            bind: Some(DEFAULT_BIND_ADDR.to_string()),
            proc_root: Some(PathBuf::from(DEFAULT_PROC_ROOT)),
            enable_telemetry: Some(true),
        }
    }
}

impl Config {
    /// Validated target substring.
    pub fn target(&self) -> Result<&str, ConfigError> {
        match self.process.as_deref() {
            None => Err(ConfigError::MissingProcess),
            Some("") => Err(ConfigError::EmptyProcess),
            Some(p) => Ok(p),
        }
    }

    /// Socket address to listen on; IPv6 binds need no brackets.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let bind = self.bind.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        let ip: IpAddr = bind
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind.to_string()))?;
        Ok(SocketAddr::new(ip, self.port.unwrap_or(DEFAULT_PORT)))
    }

    pub fn proc_root(&self) -> PathBuf {
        self.proc_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROC_ROOT))
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), ConfigError> {
    cfg.target()?;
    cfg.listen_addr()?;
    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, ConfigError> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(process) = &args.process {
        config.process = Some(process.clone());
    }

    if let Some(bind_ip) = args.bind {
        config.bind = Some(bind_ip.to_string());
    }

    // Only override port if the user supplied it on the CLI.
    if let Some(cli_port) = args.port {
        config.port = Some(cli_port);
    }

    if let Some(root) = &args.proc_root {
        config.proc_root = Some(root.clone());
    }

    if args.disable_telemetry {
        config.enable_telemetry = Some(false);
    }

    Ok(config)
}

/// Configuration loading with multiple format support
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            // Try default locations
            let defaults = [
                "/etc/proc-check-exporter/config.yaml",
                "/etc/proc-check-exporter/config.yml",
                "/etc/proc-check-exporter/config.json",
                "./proc-check-exporter.yaml",
                "./proc-check-exporter.yml",
                "./proc-check-exporter.json",
            ];

            match defaults.iter().find(|p| Path::new(p).exists()) {
                Some(p) => PathBuf::from(p),
                None => return Ok(Config::default()),
            }
        }
    };

    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;

    let parse_err = |message: String| ConfigError::Parse {
        path: path.clone(),
        message,
    };

    let config: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| parse_err(e.to_string()))?,
        Some("toml") => toml::from_str(&content).map_err(|e| parse_err(e.to_string()))?,
        // Default to YAML
        _ => serde_yaml::from_str(&content).map_err(|e| parse_err(e.to_string()))?,
    };

    info!("Loaded configuration from: {}", path.display());
    Ok(merge_defaults(config))
}

/// Fills unset fields of a loaded file with built-in defaults.
fn merge_defaults(cfg: Config) -> Config {
    let defaults = Config::default();
    Config {
        process: cfg.process,
        port: cfg.port.or(defaults.port),
        bind: cfg.bind.or(defaults.bind),
        proc_root: cfg.proc_root.or(defaults.proc_root),
        enable_telemetry: cfg.enable_telemetry.or(defaults.enable_telemetry),
    }
}

/// Renders configuration in the requested format
pub fn render_config(config: &Config, format: &ConfigFormat) -> Result<String, ConfigError> {
    match format {
        ConfigFormat::Json => {
            serde_json::to_string_pretty(config).map_err(|e| ConfigError::Serialize(e.to_string()))
        }
        ConfigFormat::Toml => {
            toml::to_string_pretty(config).map_err(|e| ConfigError::Serialize(e.to_string()))
        }
        ConfigFormat::Yaml => {
            serde_yaml::to_string(config).map_err(|e| ConfigError::Serialize(e.to_string()))
        }
    }
}
