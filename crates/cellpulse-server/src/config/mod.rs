//! Service config loader (strict parsing, then environment overrides).

pub mod schema;

use std::fs;

use cellpulse_core::error::{CellPulseError, Result};

pub use schema::{AppConfig, SimulationSection, TelemetrySection};

/// Path of an optional YAML config file.
pub const ENV_CONFIG: &str = "CELLPULSE_CONFIG";
pub const ENV_LISTEN: &str = "CELLPULSE_LISTEN";
pub const ENV_METRICS_ENABLED: &str = "CELLPULSE_METRICS_ENABLED";
pub const ENV_TRACING_ENABLED: &str = "CELLPULSE_TRACING_ENABLED";
pub const ENV_SERVICE_NAME: &str = "OTEL_SERVICE_NAME";
pub const ENV_OTLP_ENDPOINT: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| CellPulseError::Config(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<AppConfig> {
    let cfg: AppConfig = serde_yaml::from_str(s)
        .map_err(|e| CellPulseError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// File (when `CELLPULSE_CONFIG` is set) or defaults, then env overrides.
///
/// `env` is the variable lookup, normally `|k| std::env::var(k).ok()`.
pub fn load<F>(env: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = match env(ENV_CONFIG) {
        Some(path) => load_from_file(&path)?,
        None => AppConfig::default(),
    };
    apply_env(&mut cfg, &env)?;
    cfg.validate()?;
    Ok(cfg)
}

fn apply_env<F>(cfg: &mut AppConfig, env: &F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = env(ENV_LISTEN) {
        cfg.listen = v;
    }
    if let Some(v) = env(ENV_SERVICE_NAME) {
        cfg.telemetry.service_name = v;
    }
    if let Some(v) = env(ENV_OTLP_ENDPOINT) {
        cfg.telemetry.otlp_endpoint = v;
    }
    if let Some(v) = env(ENV_METRICS_ENABLED) {
        cfg.telemetry.metrics_enabled = parse_flag(ENV_METRICS_ENABLED, &v)?;
    }
    if let Some(v) = env(ENV_TRACING_ENABLED) {
        cfg.telemetry.tracing_enabled = parse_flag(ENV_TRACING_ENABLED, &v)?;
    }
    Ok(())
}

fn parse_flag(name: &str, v: &str) -> Result<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(CellPulseError::Config(format!("{name} must be a boolean, got {other:?}"))),
    }
}
