//! Bothive — multi-tenant document chat and appointment booking server.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod routes;
mod state;

use state::AppState;

fn resolve_data_dir() -> PathBuf {
    std::env::var("BOTHIVE_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

/// Evict idle sessions on a fixed interval for the life of the process.
fn start_session_sweeper(state: Arc<AppState>) {
    let interval = state.config.sweep_interval();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // First tick completes immediately; skip it.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            state.sessions.sweep_expired();
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = bothive_core::BothiveConfig::from_env(&data_dir)?;
    let port = config.port;

    let state = Arc::new(AppState::new(config).map_err(|e| anyhow::anyhow!("startup: {}", e))?);

    start_session_sweeper(state.clone());

    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Bothive server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
