use parley::application::SignalingCoordinator;
use parley::config::Config;
use parley::infrastructure::persistence::InMemoryCallStore;
use parley::interface::api::{build_router, init_metrics, update_active_calls, AppState};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Starting Parley signaling coordinator");

    // Load configuration
    let config = Config::load()?;
    info!("Configuration loaded: {:?}", config);

    // Wire the store and the coordinator
    let store = Arc::new(InMemoryCallStore::new());
    let coordinator = Arc::new(SignalingCoordinator::new(store));

    // Initialize metrics exporter
    info!("Initializing Prometheus metrics exporter");
    let prometheus_handle = init_metrics();

    // Active-calls gauge updater
    let gauge_coordinator = coordinator.clone();
    tokio::spawn(async move {
        loop {
            update_active_calls(gauge_coordinator.active_count().await);
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
    });
    info!("Metrics updater task started");

    // Unanswered-call sweeper: deployment policy, off unless configured
    if let Some(timeout_secs) = config.signaling.unanswered_timeout_secs {
        let sweep_coordinator = coordinator.clone();
        let interval = config.signaling.sweep_interval_secs;
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(interval)).await;
                match sweep_coordinator
                    .sweep_unanswered(chrono::Duration::seconds(timeout_secs as i64))
                    .await
                {
                    Ok(0) => {}
                    Ok(swept) => info!("Sweeper ended {} unanswered calls", swept),
                    Err(e) => warn!("Sweep failed: {}", e),
                }
            }
        });
        info!(
            "Unanswered-call sweeper enabled ({}s deadline, every {}s)",
            timeout_secs, config.signaling.sweep_interval_secs
        );
    }

    // Start the API server
    let state = AppState { coordinator };
    let app = build_router(state, prometheus_handle);
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))
            .await?;
    info!(
        "Signaling API listening on {}:{}",
        config.server.host, config.server.port
    );

    axum::serve(listener, app).await?;

    Ok(())
}
