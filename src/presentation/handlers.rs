// HTTP request handlers
use crate::domain::channel::Channel;
use crate::domain::chart::ChartData;
use crate::domain::series::SeriesSnapshot;
use crate::presentation::app_state::AppState;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use chrono::SecondsFormat;
use futures::stream::Stream;
use futures::StreamExt;
use serde::Serialize;
use std::sync::Arc;
use tokio_stream::wrappers::WatchStream;

#[derive(Debug, Serialize)]
pub struct SnapshotView {
    pub version: u64,
    pub timestamps: Vec<String>,
    pub luminosity_values: Vec<f64>,
    pub temperature_values: Vec<f64>,
    pub humidity_values: Vec<f64>,
    pub misaligned: Vec<Channel>,
}

impl From<&SeriesSnapshot> for SnapshotView {
    fn from(snapshot: &SeriesSnapshot) -> Self {
        let state = &snapshot.state;
        Self {
            version: snapshot.version,
            timestamps: state
                .timestamps
                .iter()
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, false))
                .collect(),
            luminosity_values: state.luminosity_values.clone(),
            temperature_values: state.temperature_values.clone(),
            humidity_values: state.humidity_values.clone(),
            misaligned: state.misaligned_channels(),
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current series snapshot
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<SnapshotView> {
    Json(SnapshotView::from(state.current().as_ref()))
}

/// Chart view-models for the current snapshot
pub async fn get_charts(State(state): State<Arc<AppState>>) -> Json<Vec<ChartData>> {
    Json(state.chart_service.build_charts(&state.current()))
}

/// Server-sent `charts` event for the current snapshot and every later version
pub async fn stream_charts(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let chart_service = state.chart_service.clone();
    let stream = WatchStream::new(state.snapshots.clone()).map(move |snapshot| {
        let charts = chart_service.build_charts(&snapshot);
        Event::default()
            .event("charts")
            .id(snapshot.version.to_string())
            .json_data(&charts)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
