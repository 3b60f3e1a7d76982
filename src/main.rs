//! Showcase Cache diagnostic server
//!
//! Builds the cache domains and exposes the debug HTTP surface for
//! interactive inspection. Does nothing in production mode.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use showcase_cache::debug::{create_router, DebugState};
use showcase_cache::source::{DataSource, FixtureSource};
use showcase_cache::{CacheMonitor, CacheRegistry, Config};

/// Main entry point for the diagnostic server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Refuse to start in production
/// 4. Build the monitor, cache registry and data source
/// 5. Start periodic performance reporting
/// 6. Serve the debug router until SIGINT/SIGTERM, then tear caches down
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "showcase_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: environment={:?}, port={}, report_interval={}m",
        config.environment, config.debug_port, config.report_interval_minutes
    );

    if !config.environment.is_diagnostic() {
        warn!("Debug surface is disabled in production; set APP_ENV=development to enable it");
        return Ok(());
    }

    let monitor = Arc::new(CacheMonitor::new());
    let registry = CacheRegistry::new(&config.cache, Some(Arc::clone(&monitor)));
    info!("Cache domains initialized");

    let source: Arc<dyn DataSource> = match &config.fixture_path {
        Some(path) => Arc::new(FixtureSource::from_path(path)?),
        None => Arc::new(FixtureSource::default()),
    };

    let report_handle = monitor.start_periodic_reporting(
        registry.clone(),
        config.report_interval_minutes,
        config.environment,
    );

    let app = create_router(DebugState::new(registry.clone(), source, monitor));

    let addr = SocketAddr::from(([127, 0, 0, 1], config.debug_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("Debug surface listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving debug surface")?;

    if let Some(handle) = report_handle {
        handle.abort();
    }
    registry.destroy().await;
    info!("Shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
