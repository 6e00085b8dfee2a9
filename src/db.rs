use crate::config::GeminiConfig;
use crate::gemini::{GeminiClient, GeminiError};
use crate::state::Session;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Mutex as AsyncMutex;

pub type DbPool = SqlitePool;

/// Shared state behind every command
pub struct AppState {
  pub db: DbPool,
  gemini: Option<GeminiClient>,
  /// Never held across an `.await`
  session: Mutex<Session>,
  /// Serializes record-list writes so saves land in the order they are applied
  record_writes: AsyncMutex<()>,
}

impl AppState {
  pub fn new(db: DbPool, gemini: GeminiConfig, session: Session) -> Self {
    let gemini = match GeminiClient::from_config(&gemini) {
      Ok(client) => Some(client),
      Err(e) => {
        tracing::warn!("Gemini client unavailable: {}", e);
        None
      }
    };

    Self {
      db,
      gemini,
      session: Mutex::new(session),
      record_writes: AsyncMutex::new(()),
    }
  }

  /// Lock the session. A poisoned lock still yields the state, since every
  /// reducer step leaves it consistent.
  pub fn session(&self) -> MutexGuard<'_, Session> {
    self.session.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Held from snapshotting the record list until the saved list is applied
  pub async fn lock_record_writes(&self) -> tokio::sync::MutexGuard<'_, ()> {
    self.record_writes.lock().await
  }

  pub fn gemini(&self) -> Result<&GeminiClient, GeminiError> {
    self.gemini.as_ref().ok_or(GeminiError::MissingApiKey)
  }
}

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(database_url: &str) -> Result<DbPool, Box<dyn std::error::Error>> {
  tracing::info!("Initializing database at: {}", database_url);

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(database_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  tracing::info!("Database initialized successfully");

  Ok(pool)
}
