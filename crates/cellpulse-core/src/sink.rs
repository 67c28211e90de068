//! Metrics capability.
//!
//! The simulator and the HTTP middleware record through this trait and never
//! touch a concrete registry. Implementations must be safe to call from many
//! tasks at once without external locking, and recording must never fail.

use std::time::Duration;

use crate::error::Result;

pub trait MetricsSink: Send + Sync {
    /// One completed HTTP request.
    fn inc_request(&self, method: &str, endpoint: &str);
    /// One completed HTTP request that ended with a server error.
    fn inc_request_error(&self, method: &str, endpoint: &str);
    fn observe_latency(&self, endpoint: &str, latency: Duration);

    fn set_app_status(&self, app: &str, up: bool);
    fn set_app_errors(&self, app: &str, errors: u64);

    /// Serialize everything recorded so far in the text exposition format.
    fn render(&self) -> Result<String>;
}

/// Inert sink used when metrics are disabled. Renders an empty document.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn inc_request(&self, _method: &str, _endpoint: &str) {}
    fn inc_request_error(&self, _method: &str, _endpoint: &str) {}
    fn observe_latency(&self, _endpoint: &str, _latency: Duration) {}
    fn set_app_status(&self, _app: &str, _up: bool) {}
    fn set_app_errors(&self, _app: &str, _errors: u64) {}

    fn render(&self) -> Result<String> {
        Ok(String::new())
    }
}
