//! CPU statistics parsing for process metrics.
//!
//! This module parses CPU time and start time from `/proc/<pid>/stat` and
//! derives the lifetime CPU utilization percentage of a process.

use once_cell::sync::Lazy;
use std::fs;
use std::io;
use std::path::Path;

/// Get system clock ticks per second (usually 100, but can vary).
fn get_clk_tck() -> f64 {
    #[cfg(unix)]
    {
        // SAFETY: sysconf is safe to call with _SC_CLK_TCK
        // Returns -1 on error, 0 if undefined - both are handled by the > 0 check
        unsafe {
            let tck = libc::sysconf(libc::_SC_CLK_TCK);
            if tck > 0 {
                return tck as f64;
            }
        }
    }
    100.0
}

/// System clock ticks per second (for CPU time calculation).
pub static CLK_TCK: Lazy<f64> = Lazy::new(get_clk_tck);

/// CPU times of a single process, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuTimes {
    pub user_seconds: f64,
    pub system_seconds: f64,
    /// Start time in seconds since system boot.
    pub start_seconds: f64,
}

impl CpuTimes {
    pub fn total_seconds(&self) -> f64 {
        self.user_seconds + self.system_seconds
    }
}

/// Parses utime, stime and starttime from /proc/<pid>/stat.
///
/// The comm field may contain spaces and parentheses, so fields are counted
/// from the last `)`.
pub fn parse_cpu_times(proc_path: &Path) -> io::Result<CpuTimes> {
    let content = fs::read_to_string(proc_path.join("stat"))?;
    parse_stat_line(&content)
}

fn parse_stat_line(content: &str) -> io::Result<CpuTimes> {
    let rest = content
        .rfind(')')
        .map(|i| &content[i + 1..])
        .ok_or_else(|| io::Error::other("Invalid stat format"))?;

    // rest[0] is field 3 (state); field N lives at index N - 3.
    let parts: Vec<&str> = rest.split_whitespace().collect();
    if parts.len() <= 19 {
        return Err(io::Error::other("Invalid stat format"));
    }

    let field = |idx: usize, what: &str| -> io::Result<f64> {
        parts[idx]
            .parse::<u64>()
            .map(|v| v as f64 / *CLK_TCK)
            .map_err(|_| io::Error::other(format!("Failed to parse {} field", what)))
    };

    Ok(CpuTimes {
        user_seconds: field(11, "utime")?,
        system_seconds: field(12, "stime")?,
        start_seconds: field(19, "starttime")?,
    })
}

/// Reads system uptime in seconds from `<root>/uptime`.
pub fn read_uptime(root: &Path) -> io::Result<f64> {
    let content = fs::read_to_string(root.join("uptime"))?;
    content
        .split_whitespace()
        .next()
        .ok_or_else(|| io::Error::other("Invalid uptime format: no fields found"))?
        .parse::<f64>()
        .map_err(|e| io::Error::other(format!("Failed to parse uptime: {}", e)))
}

/// CPU utilization over the lifetime of the process, in percent.
/// Values above 100 are possible for multi-threaded processes.
pub fn cpu_percent(times: &CpuTimes, uptime_seconds: f64) -> f64 {
    let elapsed = uptime_seconds - times.start_seconds;
    if elapsed <= 0.0 {
        return 0.0;
    }
    100.0 * times.total_seconds() / elapsed
}
