//! Shared error type across cellpulse crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, CellPulseError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum CellPulseError {
    #[error("invalid config: {0}")]
    Config(String),
    #[error("metrics: {0}")]
    Metrics(String),
    #[error("telemetry: {0}")]
    Telemetry(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal: {0}")]
    Internal(String),
}

impl CellPulseError {
    /// Stable short code, used as a structured log field.
    pub fn code(&self) -> &'static str {
        match self {
            CellPulseError::Config(_) => "CONFIG",
            CellPulseError::Metrics(_) => "METRICS",
            CellPulseError::Telemetry(_) => "TELEMETRY",
            CellPulseError::Io(_) => "IO",
            CellPulseError::Internal(_) => "INTERNAL",
        }
    }
}

impl From<std::fmt::Error> for CellPulseError {
    fn from(e: std::fmt::Error) -> Self {
        CellPulseError::Metrics(format!("render failed: {e}"))
    }
}
