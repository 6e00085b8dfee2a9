pub mod advice;
pub mod chart;
pub mod commands;
pub mod config;
pub mod db;
pub mod gemini;
pub mod i18n;
pub mod markdown;
pub mod models;
pub mod state;
pub mod storage;

#[cfg(test)]
mod test_utils;

use config::AppConfig;
use db::AppState;
use state::Session;
use std::sync::Arc;

/// Load configuration, open the store and serve until Ctrl-C
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  let config = AppConfig::from_env()?;
  let pool = db::initialize_db(&config.database_url).await?;

  let records = storage::load_health_records(&pool).await?;
  tracing::info!(count = records.len(), "Loaded health records");

  let state = Arc::new(AppState::new(pool, config.gemini, Session::new(records)));
  let app = commands::router(state);

  let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
  tracing::info!("Parent guide listening on {}", config.bind_addr);

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  tracing::info!("Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!("Failed to listen for shutdown signal: {}", e);
  }
}
