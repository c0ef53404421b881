//! FAIRWAY — Golf round tracker with a USGA-style handicap engine
//!
//! Entry point. Loads configuration, initialises structured logging,
//! connects the SQLite store (running migrations), and serves the
//! HTTP API with graceful shutdown.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use fairway::api;
use fairway::config::AppConfig;
use fairway::storage::SqliteStore;

const BANNER: &str = r#"
  _____ _    ___ ____ __        ___ __   __
 |  ___/ \  |_ _|  _ \\ \      / / \\ \ / /
 | |_ / _ \  | || |_) |\ \ /\ / / _ \\ V /
 |  _/ ___ \ | ||  _ <  \ V  V / ___ \| |
 |_|/_/   \_\___|_| \_\  \_/\_/_/   \_\_|

  Golf round tracker / handicap index
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::load("config.toml")?;

    init_logging(&cfg);

    println!("{BANNER}");
    info!(
        host = %cfg.server.host,
        port = cfg.server.port,
        database = %cfg.database.url,
        "FAIRWAY starting up"
    );

    // Store owns the pool and migrations; everything downstream sees
    // it through the RoundStore trait.
    let store = SqliteStore::connect(&cfg.database.url)
        .await
        .context("Failed to open database")?;

    let app = api::build_router(Arc::new(store));

    let addr = format!("{}:{}", cfg.server.host, cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Listening on http://{addr}. Press Ctrl+C to stop.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("FAIRWAY shut down cleanly.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    } else {
        info!("Shutdown signal received.");
    }
}

/// Initialise the `tracing` subscriber.
fn init_logging(cfg: &AppConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fairway=info"));

    if cfg.logging.json {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
