use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use cellpulse_core::error::{CellPulseError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default)]
    pub simulation: SimulationSection,

    #[serde(default)]
    pub telemetry: TelemetrySection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            simulation: SimulationSection::default(),
            telemetry: TelemetrySection::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        self.simulation.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .map_err(|e| CellPulseError::Config(format!("listen must be a socket address: {e}")))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSection {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default = "default_apps")]
    pub apps: Vec<String>,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            apps: default_apps(),
        }
    }
}

impl SimulationSection {
    pub fn validate(&self) -> Result<()> {
        if !(100..=3_600_000).contains(&self.interval_ms) {
            return Err(CellPulseError::Config(
                "simulation.interval_ms must be between 100 and 3600000".into(),
            ));
        }
        if self.apps.is_empty() {
            return Err(CellPulseError::Config("simulation.apps must not be empty".into()));
        }
        for (i, app) in self.apps.iter().enumerate() {
            if app.trim().is_empty() {
                return Err(CellPulseError::Config("simulation.apps entries must not be blank".into()));
            }
            if self.apps[..i].contains(app) {
                return Err(CellPulseError::Config(format!("simulation.apps has duplicate entry: {app}")));
            }
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetrySection {
    #[serde(default = "default_service_name")]
    pub service_name: String,

    #[serde(default = "default_otlp_endpoint")]
    pub otlp_endpoint: String,

    #[serde(default = "default_true")]
    pub tracing_enabled: bool,

    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

impl Default for TelemetrySection {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            otlp_endpoint: default_otlp_endpoint(),
            tracing_enabled: true,
            metrics_enabled: true,
        }
    }
}

impl TelemetrySection {
    pub fn validate(&self) -> Result<()> {
        if self.service_name.trim().is_empty() {
            return Err(CellPulseError::Config("telemetry.service_name must not be empty".into()));
        }
        if !(self.otlp_endpoint.starts_with("http://") || self.otlp_endpoint.starts_with("https://")) {
            return Err(CellPulseError::Config(
                "telemetry.otlp_endpoint must be an http(s) URL".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:5000".into()
}
fn default_interval_ms() -> u64 {
    5000
}
fn default_apps() -> Vec<String> {
    ["WhatsApp", "Instagram", "Gmail"].map(String::from).to_vec()
}
fn default_service_name() -> String {
    "my-cellphone-app".into()
}
fn default_otlp_endpoint() -> String {
    "http://otel-collector:4317".into()
}
fn default_true() -> bool {
    true
}
