//! Release Radar - tracks upstream repositories and their latest release.
//!
//! The library holds the reconciliation core (`services`), its SQLite
//! storage (`db`), the exposed operations (`commands`) and the JSON API
//! (`server`). The binary wires them together from `config`.

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod server;
pub mod services;

use commands::AppState;
use config::AppConfig;
use error::AppError;
use tokio_util::sync::CancellationToken;

/// Run the service until Ctrl-C.
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let pool = db::initialize(&config.database).await?;
    log::info!("[db] Using database {}", config.database.display());

    let mut state = AppState::with_github(pool, config.github_client_config())?;
    if config.sync_interval_secs > 0 {
        state.start_background_sync(config.sync_interval_secs);
    }

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for shutdown signal: {}", e);
            return;
        }
        log::info!("Shutdown requested");
        signal_token.cancel();
    });

    server::serve(config.bind, state.clone(), shutdown).await?;

    if let Some(handle) = &state.sync_handle {
        // The loop may already be gone; nothing left to stop then.
        let _ = handle.stop().await;
    }

    Ok(())
}
