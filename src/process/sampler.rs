//! Point-in-time sampling of processes whose command line matches a filter.

use std::io;
use std::path::PathBuf;
use tracing::{debug, instrument, warn};

use crate::process::cpu::{cpu_percent, parse_cpu_times, read_uptime};
use crate::process::memory::parse_statm_rss;
use crate::process::scanner::{
    collect_proc_entries, join_command_line, matches_filter, read_cmdline_args,
    read_process_name, ProcEntry,
};

/// Facts about one matching process, captured during a single scrape.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessSnapshot {
    pub pid: u32,
    pub name: Option<String>,
    pub command_line: String,
    pub cpu_percent: Option<f64>,
    pub resident_memory_bytes: Option<u64>,
    pub arguments: Option<Vec<String>>,
}

/// Failure that prevents a sampling pass as a whole.
#[derive(Debug, thiserror::Error)]
pub enum SamplerError {
    #[error("cannot enumerate processes under {}: {source}", path.display())]
    Enumeration {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("sampling task did not complete: {0}")]
    Aborted(String),
}

/// Source of process snapshots.
pub trait ProcessSampler: Send + Sync {
    /// Returns every running process whose command line contains `filter`.
    fn sample(&self, filter: &str) -> Result<Vec<ProcessSnapshot>, SamplerError>;
}

/// Sampler backed by a Linux procfs mount.
#[derive(Debug, Clone)]
pub struct ProcfsSampler {
    root: PathBuf,
}

impl ProcfsSampler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn snapshot(
        &self,
        entry: &ProcEntry,
        filter: &str,
        uptime: Option<f64>,
    ) -> Option<ProcessSnapshot> {
        let args = match read_cmdline_args(&entry.proc_path) {
            Ok(a) => a,
            Err(e) => {
                debug!("Skipping pid {}: cannot read cmdline: {}", entry.pid, e);
                return None;
            }
        };

        let command_line = join_command_line(&args);
        if !matches_filter(&command_line, filter) {
            return None;
        }

        let cpu_percent = match (parse_cpu_times(&entry.proc_path), uptime) {
            (Ok(times), Some(up)) => Some(cpu_percent(&times, up)),
            (Err(e), _) => {
                debug!("Failed to read CPU times for pid {}: {}", entry.pid, e);
                None
            }
            (Ok(_), None) => None,
        };

        let resident_memory_bytes = match parse_statm_rss(&entry.proc_path) {
            Ok(v) => Some(v),
            Err(e) => {
                debug!("Failed to read memory for pid {}: {}", entry.pid, e);
                None
            }
        };

        Some(ProcessSnapshot {
            pid: entry.pid,
            name: read_process_name(&entry.proc_path),
            command_line,
            cpu_percent,
            resident_memory_bytes,
            arguments: Some(args),
        })
    }
}

impl Default for ProcfsSampler {
    fn default() -> Self {
        Self::new("/proc")
    }
}

impl ProcessSampler for ProcfsSampler {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn sample(&self, filter: &str) -> Result<Vec<ProcessSnapshot>, SamplerError> {
        let entries =
            collect_proc_entries(&self.root).map_err(|source| SamplerError::Enumeration {
                path: self.root.clone(),
                source,
            })?;

        let uptime = match read_uptime(&self.root) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("Cannot read system uptime, CPU usage unavailable: {}", e);
                None
            }
        };

        let snapshots: Vec<ProcessSnapshot> = entries
            .iter()
            .filter_map(|entry| self.snapshot(entry, filter, uptime))
            .collect();

        debug!(
            "Sampled {} process entries, {} matched",
            entries.len(),
            snapshots.len()
        );
        Ok(snapshots)
    }
}
