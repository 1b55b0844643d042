use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use bikeshare_server::config::DashboardConfig;
use bikeshare_server::gbfs::{FeedSource, GbfsClient, GbfsConfig, MockFeedSource};
use bikeshare_server::refresh::{Refresher, StateCell};
use bikeshare_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = DashboardConfig::from_env()?;

    match &config.mock_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "Serving feed files from disk");
            let source = MockFeedSource::new(dir)?;
            serve(source, config).await
        }
        None => {
            let source = GbfsClient::new(GbfsConfig::default())?;
            serve(source, config).await
        }
    }
}

async fn serve<S: FeedSource + 'static>(
    source: S,
    config: DashboardConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let cell = StateCell::new();

    // First tick fires immediately
    let refresher = Arc::new(Refresher::new(
        source,
        config.discovery_url.clone(),
        config.language.clone(),
        cell.clone(),
    ));
    let refresh_task = refresher.spawn(config.refresh_interval);

    let state = AppState::new(cell, config.title.clone(), config.refresh_interval);
    let app = create_router(state, &config.static_dir);

    let addr = config.bind_addr;
    info!(
        %addr,
        discovery_url = %config.discovery_url,
        refresh_secs = config.refresh_interval.as_secs(),
        "{} listening on http://{addr}",
        config.title
    );
    info!("  GET  /                    - Dashboard page");
    info!("  GET  /fragment/dashboard  - Dashboard panel fragment");
    info!("  GET  /api/dashboard       - Dashboard state as JSON");
    info!("  GET  /api/stations        - Sorted station table");
    info!("  GET  /health              - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    refresh_task.abort();
    Ok(())
}
