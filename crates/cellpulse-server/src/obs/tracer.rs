//! Endpoint span capability.
//!
//! Handlers ask a `Tracer` for a span and instrument their body with it.
//! `SpanTracer` creates real `tracing` spans, which the OpenTelemetry layer
//! exports when it is installed. `NoopTracer` hands out disabled spans.

use tracing::Span;

pub trait Tracer: Send + Sync {
    /// Span for one endpoint invocation. `name` becomes the exported span
    /// name.
    fn span(&self, name: &'static str) -> Span;
}

/// Spans recorded through the global subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpanTracer;

impl Tracer for SpanTracer {
    fn span(&self, name: &'static str) -> Span {
        tracing::info_span!("endpoint", otel.name = name)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    fn span(&self, _name: &'static str) -> Span {
        Span::none()
    }
}
