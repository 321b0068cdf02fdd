//! vc-tracker: voice presence relay.
//!
//! Bootstraps configuration and tracing, then serves the relay over HTTP
//! until the process is killed. Shutdown is a hard stop by design: state is
//! in-memory only and subscribers reconnect with a fresh full-state replay.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use vc_tracker::adapters::http::{relay_routes, RelayState};
use vc_tracker::config::AppConfig;
use vc_tracker::relay::Relay;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_filter)),
        )
        .init();

    if config.tracker.is_open() {
        tracing::warn!(
            "no tracker secret configured; accepting updates unauthenticated \
             (set VC_TRACKER__TRACKER__SECRET to require one)"
        );
    }

    let relay = Arc::new(Relay::from_config(&config.tracker));
    let router = relay_routes(
        RelayState::new(relay),
        &config.server.cors_origins_list(),
    );

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "vc-tracker listening");

    axum::serve(listener, router).await?;
    Ok(())
}
