// Main entry point - Dependency injection, polling task and server setup
use std::sync::Arc;

use anyhow::Context;
use sensor_dashboard::application::broker_client::BrokerClient;
use sensor_dashboard::application::chart_service::ChartService;
use sensor_dashboard::application::polling_service::PollingService;
use sensor_dashboard::infrastructure::config::load_config;
use sensor_dashboard::infrastructure::fiware_broker::FiwareBroker;
use sensor_dashboard::presentation::app_state::AppState;
use sensor_dashboard::presentation::router::router;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_config().context("Failed to load configuration")?;
    let options = config.polling_options()?;

    // Create broker client (infrastructure layer)
    let broker: Arc<dyn BrokerClient> = Arc::new(
        FiwareBroker::new(&config.broker, &config.device).context("Failed to build HTTP client")?,
    );

    // Create services (application layer)
    let polling_service = PollingService::new(broker, config.thresholds, options);
    let state = Arc::new(AppState {
        snapshots: polling_service.subscribe(),
        chart_service: ChartService::new(config.thresholds),
    });

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut poll_shutdown = shutdown_rx.clone();
    let poller = tokio::spawn(polling_service.run(async move {
        let _ = poll_shutdown.wait_for(|stop| *stop).await;
    }));

    // Start server (presentation layer)
    let addr = config.server.resolve_addr().await?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(
        %addr,
        device = %config.device.entity_urn(),
        "Starting sensor-dashboard"
    );

    let mut server_shutdown = shutdown_rx;
    let server = axum::serve(listener, router(state)).with_graceful_shutdown(async move {
        let _ = server_shutdown.wait_for(|stop| *stop).await;
    });

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown requested");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                tracing::error!("Unable to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        }
    });

    server.await?;
    poller.await?;

    Ok(())
}
