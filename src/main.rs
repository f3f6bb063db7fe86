//! beverage-tally server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints and
//! flushes state on shutdown.

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use beverage_tally::api;
use beverage_tally::app_state::AppState;
use beverage_tally::config::TallyConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = TallyConfig::from_env().context("invalid LISTEN_ADDR")?;
    tracing::info!(
        addr = %config.listen_addr,
        data_dir = %config.data_dir.display(),
        persistence = config.persistence_enabled,
        "starting beverage-tally"
    );

    let app_state = AppState::build(&config).context("failed to open state storage")?;
    app_state.session_service.resume().await;
    let session_service = std::sync::Arc::clone(&app_state.session_service);

    let app = api::build_app(app_state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .context("server error")?;

    session_service.shutdown().await;
    tracing::info!("shutdown complete");
    Ok(())
}

/// Installs the global subscriber. `RUST_LOG` filters (default `info`);
/// `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable, waiting for ctrl-c");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    tracing::info!("shutdown signal received");
}
