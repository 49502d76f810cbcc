//! Process scanning utilities for discovering and reading process entries from /proc.
//!
//! This module provides functions to enumerate the pid directories of a procfs
//! root and read the command line and name of a single process.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Process entry representing a directory in /proc filesystem.
#[derive(Debug, Clone)]
pub struct ProcEntry {
    pub pid: u32,
    pub proc_path: PathBuf,
}

/// Scans a procfs root for process entries with numeric PIDs.
///
/// Only a failure to list `root` itself is an error. Entries that vanish or
/// cannot be inspected while iterating are skipped.
pub fn collect_proc_entries(root: &Path) -> io::Result<Vec<ProcEntry>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(root)?.flatten() {
        let p = entry.path();
        let name = match p.file_name().and_then(|s| s.to_str()) {
            Some(v) => v,
            None => continue,
        };
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        let pid: u32 = match name.parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        out.push(ProcEntry { pid, proc_path: p });
    }
    Ok(out)
}

/// Reads the argument vector from `/proc/<pid>/cmdline`.
///
/// Kernel threads have an empty cmdline and yield an empty list.
pub fn read_cmdline_args(proc_path: &Path) -> io::Result<Vec<String>> {
    let content = fs::read(proc_path.join("cmdline"))?;
    Ok(split_cmdline(&content))
}

/// Splits raw NUL-separated cmdline bytes into arguments.
pub fn split_cmdline(content: &[u8]) -> Vec<String> {
    if content.is_empty() {
        return Vec::new();
    }
    let trimmed = content.strip_suffix(&[0u8]).unwrap_or(content);
    trimmed
        .split(|&b| b == 0u8)
        .map(|s| String::from_utf8_lossy(s).into_owned())
        .collect()
}

/// Joins arguments into the single-line command line used for matching.
/// Empty arguments are dropped so they do not produce double spaces.
pub fn join_command_line(args: &[String]) -> String {
    args.iter()
        .filter(|a| !a.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Length at which the kernel truncates `comm`.
const COMM_TRUNCATED_LEN: usize = 15;

/// Reads process name from comm file or extracts from cmdline.
///
/// A `comm` of 15 or more characters may be truncated; it is then widened
/// from argv[0]: its basename when that starts with `comm`, otherwise the
/// whole argv[0].
pub fn read_process_name(proc_path: &Path) -> Option<String> {
    if let Ok(s) = fs::read_to_string(proc_path.join("comm")) {
        let t = s.trim();
        if !t.is_empty() {
            if t.chars().count() >= COMM_TRUNCATED_LEN {
                if let Some(first) = read_argv0(proc_path) {
                    return Some(extend_truncated_name(t, &first));
                }
            }
            return Some(t.into());
        }
    }

    let first = read_argv0(proc_path)?;
    Path::new(&first)
        .file_name()
        .and_then(|n| n.to_str())
        .map(|s| s.to_string())
}

fn read_argv0(proc_path: &Path) -> Option<String> {
    read_cmdline_args(proc_path)
        .ok()?
        .into_iter()
        .next()
        .filter(|a| !a.is_empty())
}

fn extend_truncated_name(comm: &str, argv0: &str) -> String {
    let base = Path::new(argv0)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(argv0);
    if base.starts_with(comm) {
        base.to_string()
    } else {
        argv0.to_string()
    }
}

/// Case-sensitive plain substring match of the filter against a command line.
pub fn matches_filter(command_line: &str, filter: &str) -> bool {
    command_line.contains(filter)
}
