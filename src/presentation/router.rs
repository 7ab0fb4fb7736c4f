// Router for the dashboard API
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{get_charts, get_state, health_check, stream_charts};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/state", get(get_state))
        .route("/charts", get(get_charts))
        .route("/charts/stream", get(stream_charts))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
