//! Integration tests for the procfs-backed sampler.
//!
//! These tests build a synthetic procfs tree in a temporary directory and
//! verify matching, per-field fallbacks and enumeration failures.

use proc_check_exporter::process::cpu::CLK_TCK;
use proc_check_exporter::process::memory::PAGE_SIZE;
use proc_check_exporter::{ProcessSampler, ProcfsSampler, SamplerError};
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

/// Writes a stat line with the given utime/stime/starttime (in ticks).
fn stat_line(pid: u32, comm: &str, utime: u64, stime: u64, start: u64) -> String {
    format!(
        "{pid} ({comm}) S 1 {pid} {pid} 0 -1 4194304 0 0 0 0 {utime} {stime} 0 0 20 0 1 0 {start} 12345678 250 18446744073709551615"
    )
}

fn write_proc(root: &Path, pid: u32, cmdline: &[u8], comm: Option<&str>) -> std::path::PathBuf {
    let dir = root.join(pid.to_string());
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("cmdline"), cmdline).unwrap();
    if let Some(c) = comm {
        fs::write(dir.join("comm"), format!("{c}\n")).unwrap();
    }
    dir
}

/// Builds:
/// - 100 `foo-server --verbose` with full stat/statm
/// - 200 `barfoo` with full stat/statm
/// - 300 `foo-worker` without stat/statm
/// - 400 without cmdline (exited mid-scan)
/// - 500 kernel thread with empty cmdline
fn fake_procfs() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");
    let root = dir.path();
    fs::write(root.join("uptime"), "1000.00 3000.00\n").unwrap();
    fs::create_dir(root.join("self")).unwrap();

    let p = write_proc(root, 100, b"foo-server\0--verbose\0", Some("foo-server"));
    fs::write(p.join("stat"), stat_line(100, "foo-server", 100, 100, 0)).unwrap();
    fs::write(p.join("statm"), "1000 250 100 10 0 300 0\n").unwrap();

    let p = write_proc(root, 200, b"barfoo\0", Some("barfoo"));
    fs::write(p.join("stat"), stat_line(200, "barfoo", 0, 0, 0)).unwrap();
    fs::write(p.join("statm"), "10 5 1 1 0 1 0\n").unwrap();

    write_proc(root, 300, b"/usr/bin/foo-worker\0", None);

    fs::create_dir(root.join("400")).unwrap();

    write_proc(root, 500, b"", Some("kworker/0:1"));

    dir
}

fn sorted_pids(sampler: &ProcfsSampler, filter: &str) -> Vec<u32> {
    let mut pids: Vec<u32> = sampler
        .sample(filter)
        .unwrap()
        .into_iter()
        .map(|s| s.pid)
        .collect();
    pids.sort();
    pids
}

#[test]
fn test_substring_matching() {
    let dir = fake_procfs();
    let sampler = ProcfsSampler::new(dir.path());

    assert_eq!(sorted_pids(&sampler, "foo"), vec![100, 200, 300]);
    assert_eq!(sorted_pids(&sampler, "foo-"), vec![100, 300]);
    assert_eq!(sorted_pids(&sampler, "foo "), Vec::<u32>::new());
    assert_eq!(sorted_pids(&sampler, "--verbose"), vec![100]);
    assert_eq!(sorted_pids(&sampler, "FOO"), Vec::<u32>::new());
}

#[test]
fn test_snapshot_fields() {
    let dir = fake_procfs();
    let sampler = ProcfsSampler::new(dir.path());

    let snaps = sampler.sample("foo-server").unwrap();
    assert_eq!(snaps.len(), 1);
    let s = &snaps[0];
    assert_eq!(s.pid, 100);
    assert_eq!(s.name.as_deref(), Some("foo-server"));
    assert_eq!(s.command_line, "foo-server --verbose");
    assert_eq!(
        s.arguments,
        Some(vec!["foo-server".to_string(), "--verbose".to_string()])
    );
    assert_eq!(s.resident_memory_bytes, Some(250 * *PAGE_SIZE));

    let expected_cpu = 100.0 * (200.0 / *CLK_TCK) / 1000.0;
    let cpu = s.cpu_percent.expect("cpu percent should be available");
    assert!((cpu - expected_cpu).abs() < 1e-6, "got {cpu}");
}

#[test]
fn test_unreadable_fields_are_omitted() {
    let dir = fake_procfs();
    let sampler = ProcfsSampler::new(dir.path());

    let snaps = sampler.sample("foo-worker").unwrap();
    assert_eq!(snaps.len(), 1);
    let s = &snaps[0];
    assert_eq!(s.pid, 300);
    // No comm file: name falls back to argv[0] basename
    assert_eq!(s.name.as_deref(), Some("foo-worker"));
    assert_eq!(s.cpu_percent, None);
    assert_eq!(s.resident_memory_bytes, None);
    assert_eq!(s.arguments, Some(vec!["/usr/bin/foo-worker".to_string()]));
}

#[test]
fn test_truncated_comm_is_widened_from_argv0() {
    let dir = fake_procfs();
    write_proc(
        dir.path(),
        600,
        b"/usr/bin/prometheus-node-exporter\0--web\0",
        Some("prometheus-node"),
    );
    let sampler = ProcfsSampler::new(dir.path());

    let snaps = sampler.sample("node-exporter").unwrap();
    assert_eq!(snaps.len(), 1);
    assert_eq!(snaps[0].pid, 600);
    assert_eq!(snaps[0].name.as_deref(), Some("prometheus-node-exporter"));
}

#[test]
fn test_missing_uptime_drops_cpu_only() {
    let dir = fake_procfs();
    fs::remove_file(dir.path().join("uptime")).unwrap();
    let sampler = ProcfsSampler::new(dir.path());

    let snaps = sampler.sample("foo-server").unwrap();
    assert_eq!(snaps.len(), 1);
    assert_eq!(snaps[0].cpu_percent, None);
    assert!(snaps[0].resident_memory_bytes.is_some());
}

#[test]
fn test_no_match_returns_empty() {
    let dir = fake_procfs();
    let sampler = ProcfsSampler::new(dir.path());
    assert!(sampler.sample("postgres").unwrap().is_empty());
}

#[test]
fn test_enumeration_failure() {
    let dir = tempdir().expect("Failed to create temp dir");
    let sampler = ProcfsSampler::new(dir.path().join("missing"));
    match sampler.sample("foo") {
        Err(SamplerError::Enumeration { path, .. }) => {
            assert_eq!(path, dir.path().join("missing"));
        }
        other => panic!("expected enumeration failure, got {:?}", other),
    }
}

#[cfg(target_os = "linux")]
#[test]
fn test_live_procfs_finds_own_process() {
    let sampler = ProcfsSampler::default();
    let exe = std::env::args().next().unwrap();
    let own = std::process::id();
    let snaps = sampler.sample(&exe).unwrap();
    assert!(snaps.iter().any(|s| s.pid == own));
}
