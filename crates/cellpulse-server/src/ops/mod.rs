//! HTTP endpoints.
//!
//! - `/`        : fixed JSON message
//! - `/metrics` : Prometheus text format

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::app_state::AppState;

pub const HOME_MESSAGE: &str = "My Cellphone App.";
pub const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub async fn home(State(state): State<AppState>) -> Json<Value> {
    let span = state.tracer().span("home-endpoint");
    span.in_scope(|| Json(json!({ "message": HOME_MESSAGE })))
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let span = state.tracer().span("metrics-endpoint");
    span.in_scope(|| match state.metrics().render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, code = e.code(), "metrics endpoint error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    })
}
