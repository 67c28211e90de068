//! Axum router wiring.

use axum::{middleware, routing::get, Router};

use crate::{app_state::AppState, middleware::track_requests, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ops::home))
        .route("/metrics", get(ops::metrics))
        .layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .with_state(state)
}
