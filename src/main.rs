use ngxpulse::config::Config;
use ngxpulse::services::coordinator::RefreshCoordinator;
use ngxpulse::sources::{MarketDataAdapter, NgxQuoteClient, SimulatedFeed};
use ngxpulse::{api, AppState};
use std::sync::Arc;
use tokio::sync::watch;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ngxpulse=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let state = AppState::new(config.clone());

    let adapter: Arc<dyn MarketDataAdapter> = match &config.upstream_url {
        Some(url) => Arc::new(NgxQuoteClient::new(url.clone())?),
        None => Arc::new(SimulatedFeed::new()),
    };
    info!("Market data source: {}", adapter.name());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let coordinator = RefreshCoordinator::new(
        adapter,
        Arc::clone(&state.registry),
        Arc::clone(&state.history),
        Arc::clone(&state.signals),
        Arc::clone(&state.summary),
        Arc::clone(&state.accuracy),
        &config,
    );
    let coordinator_handle = tokio::spawn(coordinator.run(shutdown_rx));

    let app = api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!("Failed to listen for shutdown signal: {}", err);
            }
            info!("Shutdown signal received");
        })
        .await?;

    shutdown_tx.send(true).ok();
    coordinator_handle.await?;

    Ok(())
}
