//! Logging and span export bootstrap.
//!
//! Installs the global `tracing` subscriber (env filter + fmt). With the
//! `otel` feature and `telemetry.tracing_enabled`, an OTLP/gRPC batch
//! exporter is attached through `tracing-opentelemetry` and endpoint spans
//! are exported. In every other case, including an exporter that fails to
//! build, endpoint spans are inert.

use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cellpulse_core::error::{CellPulseError, Result};

use crate::config::TelemetrySection;
use crate::obs::tracer::{NoopTracer, Tracer};

pub struct Telemetry {
    tracer: Arc<dyn Tracer>,
    #[cfg(feature = "otel")]
    provider: Option<opentelemetry_sdk::trace::TracerProvider>,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn subscriber_err(e: impl std::fmt::Display) -> CellPulseError {
    CellPulseError::Telemetry(format!("subscriber init failed: {e}"))
}

impl Telemetry {
    /// Must run inside the tokio runtime (the batch exporter spawns on it).
    #[cfg(not(feature = "otel"))]
    pub fn init(cfg: &TelemetrySection) -> Result<Self> {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt::layer())
            .try_init()
            .map_err(subscriber_err)?;

        if cfg.tracing_enabled {
            tracing::warn!("built without the `otel` feature; endpoint spans are inert");
        }
        Ok(Self { tracer: Arc::new(NoopTracer) })
    }

    /// Must run inside the tokio runtime (the batch exporter spawns on it).
    #[cfg(feature = "otel")]
    pub fn init(cfg: &TelemetrySection) -> Result<Self> {
        use crate::obs::tracer::SpanTracer;

        let mut provider = None;
        let mut layer = None;
        let mut install_err = None;
        if cfg.tracing_enabled {
            match otlp::install(cfg) {
                Ok((p, tracer)) => {
                    layer = Some(tracing_opentelemetry::layer().with_tracer(tracer));
                    provider = Some(p);
                }
                Err(e) => install_err = Some(e),
            }
        }

        tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt::layer())
            .with(layer)
            .try_init()
            .map_err(subscriber_err)?;

        if let Some(e) = install_err {
            tracing::warn!(error = %e, "span export unavailable; endpoint spans are inert");
        }

        let tracer: Arc<dyn Tracer> = if provider.is_some() {
            tracing::info!(
                service = %cfg.service_name,
                endpoint = %cfg.otlp_endpoint,
                "span export enabled"
            );
            Arc::new(SpanTracer)
        } else {
            Arc::new(NoopTracer)
        };
        Ok(Self { tracer, provider })
    }

    pub fn tracer(&self) -> Arc<dyn Tracer> {
        Arc::clone(&self.tracer)
    }

    /// Flush pending spans.
    pub fn shutdown(self) {
        #[cfg(feature = "otel")]
        if let Some(provider) = self.provider {
            if let Err(e) = provider.shutdown() {
                tracing::warn!(error = %e, "tracer provider shutdown failed");
            }
        }
    }
}

#[cfg(feature = "otel")]
mod otlp {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::{Tracer, TracerProvider};
    use opentelemetry_sdk::{runtime, Resource};

    use cellpulse_core::error::{CellPulseError, Result};

    use crate::config::TelemetrySection;

    /// Provider with `service.name` resource and a batching OTLP/gRPC
    /// exporter. A plain `http://` endpoint gives an insecure channel.
    pub(super) fn install(cfg: &TelemetrySection) -> Result<(TracerProvider, Tracer)> {
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(cfg.otlp_endpoint.clone())
            .build()
            .map_err(|e| CellPulseError::Telemetry(format!("otlp exporter: {e}")))?;

        let provider = TracerProvider::builder()
            .with_batch_exporter(exporter, runtime::Tokio)
            .with_resource(Resource::new([KeyValue::new(
                "service.name",
                cfg.service_name.clone(),
            )]))
            .build();

        opentelemetry::global::set_tracer_provider(provider.clone());
        let tracer = provider.tracer(env!("CARGO_PKG_NAME"));
        Ok((provider, tracer))
    }
}
