//! Observability: the metrics registry behind `/metrics`, the endpoint span
//! capability, and the logging/span-export bootstrap.

pub mod metrics;
pub mod telemetry;
pub mod tracer;

pub use metrics::CellMetrics;
pub use telemetry::Telemetry;
pub use tracer::{NoopTracer, SpanTracer, Tracer};
