//! Prometheus metrics definitions for proc-check-exporter.
//!
//! Process metrics are rendered into a registry created for each scrape, so
//! concurrent scrapes never share series. The exporter's own operational
//! metrics live in a long-lived registry owned by [`ExporterMetrics`].

use prometheus::proto::MetricFamily;
use prometheus::{CounterVec, Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};

use crate::process::ProcessSnapshot;

/// Buffer capacity for metrics encoding.
const BUFFER_CAP: usize = 16 * 1024;

pub const PROCESS_EXISTS: &str = "process_exists";
pub const PROCESS_CPU_USAGE: &str = "process_cpu_usage";
pub const PROCESS_MEMORY_USAGE_BYTES: &str = "process_memory_usage_bytes";
pub const PROCESS_ARG: &str = "process_arg";

/// Per-scrape process metric schema.
pub struct ProcessMetrics {
    pub process_exists: GaugeVec,             // labels: pid, name
    pub process_cpu_usage: GaugeVec,          // labels: pid, name
    pub process_memory_usage_bytes: GaugeVec, // labels: pid, name
    pub process_arg: GaugeVec,                // labels: pid, name, index, value
}

impl ProcessMetrics {
    /// Creates the process metric families and registers them with `registry`.
    pub fn new(registry: &Registry) -> prometheus::Result<Self> {
        let process_exists = GaugeVec::new(
            Opts::new(
                PROCESS_EXISTS,
                "Whether the process exists (1 = exists, 0 = does not)",
            ),
            &["pid", "name"],
        )?;
        let process_cpu_usage = GaugeVec::new(
            Opts::new(PROCESS_CPU_USAGE, "CPU usage percentage of the process"),
            &["pid", "name"],
        )?;
        let process_memory_usage_bytes = GaugeVec::new(
            Opts::new(
                PROCESS_MEMORY_USAGE_BYTES,
                "Memory usage of the process in bytes",
            ),
            &["pid", "name"],
        )?;
        let process_arg = GaugeVec::new(
            Opts::new(PROCESS_ARG, "Command-line arguments of the process"),
            &["pid", "name", "index", "value"],
        )?;

        registry.register(Box::new(process_exists.clone()))?;
        registry.register(Box::new(process_cpu_usage.clone()))?;
        registry.register(Box::new(process_memory_usage_bytes.clone()))?;
        registry.register(Box::new(process_arg.clone()))?;

        Ok(Self {
            process_exists,
            process_cpu_usage,
            process_memory_usage_bytes,
            process_arg,
        })
    }

    /// Sets one series per available fact of every snapshot.
    ///
    /// An empty slice produces the `process_exists{pid="",name=""} 0` sentinel.
    pub fn record(&self, snapshots: &[ProcessSnapshot]) {
        for p in snapshots {
            let pid = p.pid.to_string();
            let name = p.name.as_deref().unwrap_or("");

            self.process_exists
                .with_label_values(&[pid.as_str(), name])
                .set(1.0);

            if let Some(cpu) = p.cpu_percent {
                self.process_cpu_usage
                    .with_label_values(&[pid.as_str(), name])
                    .set(cpu);
            }

            if let Some(rss) = p.resident_memory_bytes {
                self.process_memory_usage_bytes
                    .with_label_values(&[pid.as_str(), name])
                    .set(rss as f64);
            }

            if let Some(args) = &p.arguments {
                for (i, arg) in args.iter().enumerate() {
                    let index = i.to_string();
                    self.process_arg
                        .with_label_values(&[
                            pid.as_str(),
                            name,
                            index.as_str(),
                            arg.as_str(),
                        ])
                        .set(1.0);
                }
            }
        }

        if snapshots.is_empty() {
            self.process_exists.with_label_values(&["", ""]).set(0.0);
        }
    }
}

/// Renders snapshots into metric families using a fresh registry.
pub fn render_snapshots(snapshots: &[ProcessSnapshot]) -> prometheus::Result<Vec<MetricFamily>> {
    let registry = Registry::new();
    let metrics = ProcessMetrics::new(&registry)?;
    metrics.record(snapshots);
    Ok(registry.gather())
}

/// Encodes metric families in the Prometheus text exposition format.
pub fn encode_text(families: &[MetricFamily]) -> prometheus::Result<String> {
    let mut buffer = Vec::with_capacity(BUFFER_CAP);
    TextEncoder::new().encode(families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

/// Operational metrics about the exporter itself.
pub struct ExporterMetrics {
    registry: Registry,
    pub scrapes_total: CounterVec, // labels: result
    pub scrape_duration_seconds: Gauge,
    pub matched_processes: Gauge,
}

impl ExporterMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let scrapes_total = CounterVec::new(
            Opts::new(
                "proc_check_exporter_scrapes_total",
                "Total number of /metrics scrapes by sampling result",
            ),
            &["result"],
        )?;
        let scrape_duration_seconds = Gauge::new(
            "proc_check_exporter_scrape_duration_seconds",
            "Time spent sampling processes and rendering the last scrape",
        )?;
        let matched_processes = Gauge::new(
            "proc_check_exporter_matched_processes",
            "Number of processes matched by the last successful scrape",
        )?;

        registry.register(Box::new(scrapes_total.clone()))?;
        registry.register(Box::new(scrape_duration_seconds.clone()))?;
        registry.register(Box::new(matched_processes.clone()))?;

        Ok(Self {
            registry,
            scrapes_total,
            scrape_duration_seconds,
            matched_processes,
        })
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }
}
