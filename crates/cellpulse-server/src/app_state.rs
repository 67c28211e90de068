//! Shared application state for cellpulse.
//!
//! Built once at startup and handed to the router. The same metrics sink is
//! given to the simulator task, so `/metrics` sees what the simulator
//! publishes without anything reading the status store directly.

use std::sync::Arc;

use cellpulse_core::{MetricsSink, NoopMetrics};

use crate::config::TelemetrySection;
use crate::obs::{CellMetrics, NoopTracer, Tracer};

#[derive(Clone)]
pub struct AppState {
    metrics: Arc<dyn MetricsSink>,
    tracer: Arc<dyn Tracer>,
}

impl AppState {
    pub fn new(metrics: Arc<dyn MetricsSink>, tracer: Arc<dyn Tracer>) -> Self {
        Self { metrics, tracer }
    }

    /// No metrics, no spans.
    pub fn uninstrumented() -> Self {
        Self::new(Arc::new(NoopMetrics), Arc::new(NoopTracer))
    }

    pub fn metrics(&self) -> &dyn MetricsSink {
        self.metrics.as_ref()
    }

    pub fn tracer(&self) -> &dyn Tracer {
        self.tracer.as_ref()
    }
}

/// Registry-backed sink, or the inert one when metrics are disabled.
pub fn metrics_sink(cfg: &TelemetrySection) -> Arc<dyn MetricsSink> {
    if cfg.metrics_enabled {
        Arc::new(CellMetrics::new())
    } else {
        tracing::warn!("metrics disabled; /metrics will be empty");
        Arc::new(NoopMetrics)
    }
}
