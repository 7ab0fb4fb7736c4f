// Application state for HTTP handlers
use crate::application::chart_service::ChartService;
use crate::domain::series::SeriesSnapshot;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Clone)]
pub struct AppState {
    pub snapshots: watch::Receiver<Arc<SeriesSnapshot>>,
    pub chart_service: ChartService,
}

impl AppState {
    pub fn current(&self) -> Arc<SeriesSnapshot> {
        self.snapshots.borrow().clone()
    }
}
