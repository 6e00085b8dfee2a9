//! Key-value persistence for client-owned collections
//!
//! The health-record list is stored as one JSON document under a fixed key and
//! rewritten in full on every change. There is no partial update and no
//! schema versioning for the document itself.

use crate::db::DbPool;
use crate::i18n::Language;
use crate::models::{FeedbackKind, HealthRecord};
use chrono::Utc;
use thiserror::Error;

/// Storage key for the health-record list
pub const HEALTH_RECORDS_KEY: &str = "healthRecords";

#[derive(Error, Debug)]
pub enum StorageError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

async fn get_value(pool: &DbPool, key: &str) -> Result<Option<String>, StorageError> {
  let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
    .bind(key)
    .fetch_optional(pool)
    .await?;
  Ok(value)
}

async fn put_value(pool: &DbPool, key: &str, value: &str) -> Result<(), StorageError> {
  sqlx::query(
    r#"
    INSERT INTO kv_store (key, value, updated_at)
    VALUES (?1, ?2, CURRENT_TIMESTAMP)
    ON CONFLICT(key) DO UPDATE SET
      value = excluded.value,
      updated_at = excluded.updated_at
    "#,
  )
  .bind(key)
  .bind(value)
  .execute(pool)
  .await?;
  Ok(())
}

/// Load the stored records, newest first. A corrupt document loads as an
/// empty list.
pub async fn load_health_records(pool: &DbPool) -> Result<Vec<HealthRecord>, StorageError> {
  let Some(raw) = get_value(pool, HEALTH_RECORDS_KEY).await? else {
    return Ok(Vec::new());
  };

  match serde_json::from_str(&raw) {
    Ok(records) => Ok(records),
    Err(e) => {
      tracing::warn!(error = %e, "Failed to parse stored health records; starting empty");
      Ok(Vec::new())
    }
  }
}

/// Replace the stored list with `records`
pub async fn save_health_records(
  pool: &DbPool,
  records: &[HealthRecord],
) -> Result<(), StorageError> {
  let json = serde_json::to_string(records)?;
  put_value(pool, HEALTH_RECORDS_KEY, &json).await?;
  tracing::debug!(count = records.len(), "Saved health records");
  Ok(())
}

pub async fn insert_feedback(
  pool: &DbPool,
  kind: FeedbackKind,
  message: &str,
  language: Language,
) -> Result<i64, StorageError> {
  let result = sqlx::query(
    r#"
    INSERT INTO feedback (kind, message, language, created_at)
    VALUES (?1, ?2, ?3, ?4)
    "#,
  )
  .bind(kind.as_str())
  .bind(message)
  .bind(language.code())
  .bind(Utc::now())
  .execute(pool)
  .await?;

  Ok(result.last_insert_rowid())
}
