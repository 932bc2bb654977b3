use anyhow::Result;
use ground_stations::StationRegistry;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod feed;
mod routes;

use config::GatewayConfig;
use feed::{spawn_poller, SimulatedFeed, SnapshotStore};
use routes::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "bulan_gateway=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env();

    let feed = Arc::new(SimulatedFeed::from_config(&config)?);
    let store = Arc::new(SnapshotStore::new());
    let stations = StationRegistry::with_bulan_network();
    tracing::info!("   Loaded {} ground stations", stations.len());

    let poller = spawn_poller(feed.clone(), store.clone(), config.poll_interval);
    tracing::info!(
        "   Polling every {:?} (simulated fetch delay {:?})",
        config.poll_interval,
        config.fetch_delay
    );

    let state = AppState {
        feed,
        store,
        stations: Arc::new(stations),
    };

    let app = routes::api_routes(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.bind_addr();
    tracing::info!("🛰️  BULAN Gateway starting on {}", addr);
    tracing::info!("   Constellation: BULAN ({} satellites)", config.fleet_size);
    match config.seed {
        Some(seed) => tracing::info!("   Telemetry seed: {}", seed),
        None => tracing::info!("   Telemetry seed: entropy"),
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    poller.shutdown().await;
    tracing::info!("BULAN Gateway stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
