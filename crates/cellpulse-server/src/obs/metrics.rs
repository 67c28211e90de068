//! In-process metrics registry for cellpulse.
//!
//! Counter/gauge/histogram families with dynamic labels backed by `DashMap`
//! shards of atomics, so the simulator task and request handlers can record
//! concurrently without a registry-wide lock. Label pairs keep the order the
//! family declares them in; rows are sorted at render time so the exposition
//! output is deterministic.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

use cellpulse_core::{MetricsSink, Result};

type LabelKey = Vec<(String, String)>;

fn key(labels: &[(&str, &str)]) -> LabelKey {
    labels.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_str(key: &LabelKey) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

fn header(out: &mut String, name: &str, help: &str, kind: &str) -> std::fmt::Result {
    writeln!(out, "# HELP {} {}", name, help)?;
    writeln!(out, "# TYPE {} {}", name, kind)
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self.map.entry(key(labels)).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value; 0 for a label set never incremented.
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, help: &str, out: &mut String) -> std::fmt::Result {
        header(out, name, help, "counter")?;
        let mut rows: Vec<(LabelKey, u64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        rows.sort();
        for (k, val) in rows {
            writeln!(out, "{}{{{}}} {}", name, label_str(&k), val)?;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<LabelKey, AtomicI64>,
}

impl GaugeVec {
    /// Overwrite the current reading.
    pub fn set(&self, labels: &[(&str, &str)], v: i64) {
        let gauge = self.map.entry(key(labels)).or_insert_with(|| AtomicI64::new(0));
        gauge.store(v, Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> Option<i64> {
        self.map.get(&key(labels)).map(|g| g.load(Ordering::Relaxed))
    }

    fn render(&self, name: &str, help: &str, out: &mut String) -> std::fmt::Result {
        header(out, name, help, "gauge")?;
        let mut rows: Vec<(LabelKey, i64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        rows.sort();
        for (k, val) in rows {
            writeln!(out, "{}{{{}}} {}", name, label_str(&k), val)?;
        }
        Ok(())
    }
}

// Bucket upper bounds in microseconds, rendered as seconds:
// 5ms, 10ms, 25ms, 50ms, 75ms, 100ms, 250ms, 500ms, 750ms, 1s, 2.5s, 5s, 7.5s, 10s
const BUCKETS_MICROS: [u64; 14] = [
    5_000, 10_000, 25_000, 50_000, 75_000, 100_000, 250_000, 500_000, 750_000,
    1_000_000, 2_500_000, 5_000_000, 7_500_000, 10_000_000,
];

fn micros_as_secs(micros: u64) -> String {
    format!("{:?}", micros as f64 / 1_000_000.0)
}

struct AtomicHistogram {
    count: AtomicU64,
    sum_micros: AtomicU64,
    buckets: [AtomicU64; BUCKETS_MICROS.len()],
}

impl Default for AtomicHistogram {
    fn default() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum_micros: AtomicU64::new(0),
            buckets: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<LabelKey, AtomicHistogram>,
}

impl HistogramVec {
    /// Observe a duration. Stored at microsecond resolution.
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let hist = self.map.entry(key(labels)).or_default();
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum_micros.fetch_add(micros, Ordering::Relaxed);

        // Cumulative: every bucket whose bound covers the value.
        for (i, &b) in BUCKETS_MICROS.iter().enumerate() {
            if micros <= b {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Number of observations for a label set.
    pub fn count(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&key(labels))
            .map(|h| h.count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format (unit: seconds).
    fn render(&self, name: &str, help: &str, out: &mut String) -> std::fmt::Result {
        header(out, name, help, "histogram")?;
        let mut keys: Vec<LabelKey> = self.map.iter().map(|r| r.key().clone()).collect();
        keys.sort();

        for k in keys {
            let Some(hist) = self.map.get(&k) else { continue };
            let labels = label_str(&k);
            let prefix = if labels.is_empty() { String::new() } else { format!("{},", labels) };

            for (i, &le) in BUCKETS_MICROS.iter().enumerate() {
                let count = hist.buckets[i].load(Ordering::Relaxed);
                writeln!(out, "{}_bucket{{{}le=\"{}\"}} {}", name, prefix, micros_as_secs(le), count)?;
            }
            let count = hist.count.load(Ordering::Relaxed);
            writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, count)?;

            let sum = hist.sum_micros.load(Ordering::Relaxed);
            writeln!(out, "{}_sum{{{}}} {}", name, labels, micros_as_secs(sum))?;
            writeln!(out, "{}_count{{{}}} {}", name, labels, count)?;
        }
        Ok(())
    }
}

/// Every family cellpulse exposes. Names are kept stable for existing
/// dashboards.
#[derive(Default)]
pub struct CellMetrics {
    pub app_status: GaugeVec,
    pub app_errors: GaugeVec,
    pub http_requests: CounterVec,
    pub http_errors: CounterVec,
    pub request_latency: HistogramVec,
}

impl CellMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render all families.
    pub fn render_text(&self) -> Result<String> {
        let mut out = String::new();
        self.app_status
            .render("app_status", "Status of each app (1=active, 0=inactive)", &mut out)?;
        self.app_errors.render("app_errors", "Number of errors per app", &mut out)?;
        self.http_requests
            .render("flask_http_request_total", "Total HTTP requests", &mut out)?;
        self.http_errors
            .render("flask_http_request_errors_total", "Total HTTP errors", &mut out)?;
        self.request_latency
            .render("flask_request_latency_seconds", "Request latency", &mut out)?;
        Ok(out)
    }
}

impl MetricsSink for CellMetrics {
    fn inc_request(&self, method: &str, endpoint: &str) {
        self.http_requests.inc(&[("method", method), ("endpoint", endpoint)]);
    }

    fn inc_request_error(&self, method: &str, endpoint: &str) {
        self.http_errors.inc(&[("method", method), ("endpoint", endpoint)]);
    }

    fn observe_latency(&self, endpoint: &str, latency: Duration) {
        self.request_latency.observe(&[("endpoint", endpoint)], latency);
    }

    fn set_app_status(&self, app: &str, up: bool) {
        self.app_status.set(&[("app", app)], if up { 1 } else { 0 });
    }

    fn set_app_errors(&self, app: &str, errors: u64) {
        self.app_errors
            .set(&[("app", app)], i64::try_from(errors).unwrap_or(i64::MAX));
    }

    fn render(&self) -> Result<String> {
        self.render_text()
    }
}
