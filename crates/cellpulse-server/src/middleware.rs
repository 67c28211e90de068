//! Per-request metrics.
//!
//! Runs around every routed request: latency histogram keyed by path,
//! request counter keyed by (method, path), and the error counter for
//! responses with status >= 500. The response passes through untouched.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tokio::time::Instant;
use tracing::Instrument;

use crate::app_state::AppState;

pub async fn track_requests(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().as_str().to_owned();
    let path = req.uri().path().to_owned();
    let span = tracing::info_span!("http_request", %method, %path);

    let started = Instant::now();
    let response = next.run(req).instrument(span.clone()).await;
    let latency = started.elapsed();
    let status = response.status().as_u16();

    let metrics = state.metrics();
    metrics.observe_latency(&path, latency);
    metrics.inc_request(&method, &path);
    if status >= 500 {
        metrics.inc_request_error(&method, &path);
    }

    span.in_scope(|| {
        tracing::debug!(status, latency_us = latency.as_micros() as u64, "request completed");
    });
    response
}
