//! Test utilities and helpers for unit and router testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - In-process router requests
//! - Helper assertions

use crate::config::GeminiConfig;
use crate::db::AppState;
use crate::models::{AgeGroup, HealthRecord};
use crate::models::health_record::compute_bmi;
use crate::state::Session;
use axum::{
  body::Body,
  http::{header, Request, StatusCode},
  Router,
};
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceExt;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) so every query sees the same in-memory database
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Infant record dated 1/15/2024 with BMI computed from the inputs
pub fn mock_health_record(id: u64, weight: f64, height: f64) -> HealthRecord {
  HealthRecord {
    id,
    date: "1/15/2024".to_string(),
    age_group: AgeGroup::Infant,
    weight,
    height,
    bmi: compute_bmi(weight, height),
  }
}

/// Body of a successful `generateContent` call carrying `text`
pub fn gemini_text_response(text: &str) -> String {
  serde_json::json!({
    "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
  })
  .to_string()
}

/// App state over a fresh in-memory database. `gemini_base` points the AI
/// client at a mock server; `None` leaves the API key unset.
pub async fn test_app_state(gemini_base: Option<String>) -> Arc<AppState> {
  let gemini = match gemini_base {
    Some(api_base) => GeminiConfig {
      api_key: Some("test-key".to_string()),
      api_base,
      ..GeminiConfig::default()
    },
    None => GeminiConfig::default(),
  };

  Arc::new(AppState::new(setup_test_db().await, gemini, Session::default()))
}

/// ---------------------------------------------------------------------------
/// Router Helpers
/// ---------------------------------------------------------------------------

async fn into_parts(app: Router, request: Request<Body>) -> (StatusCode, Option<String>, String) {
  let response = app.oneshot(request).await.expect("Router failed");
  let status = response.status();
  let content_type = response
    .headers()
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .map(str::to_string);
  let bytes = response
    .into_body()
    .collect()
    .await
    .expect("Failed to read body")
    .to_bytes();

  (status, content_type, String::from_utf8_lossy(&bytes).into_owned())
}

fn parse_body(body: &str) -> serde_json::Value {
  if body.is_empty() {
    serde_json::Value::Null
  } else {
    serde_json::from_str(body).unwrap_or(serde_json::Value::String(body.to_string()))
  }
}

/// GET returning status, content type and raw body
pub async fn get_raw(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
  let request = Request::builder()
    .uri(uri)
    .body(Body::empty())
    .expect("Failed to build request");
  into_parts(app, request).await
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
  let (status, _, body) = get_raw(app, uri).await;
  (status, parse_body(&body))
}

pub async fn send_json(
  app: Router,
  method: &str,
  uri: &str,
  payload: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
  let request = Request::builder()
    .method(method)
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(payload.to_string()))
    .expect("Failed to build request");
  let (status, _, body) = into_parts(app, request).await;
  (status, parse_body(&body))
}

pub async fn send_empty(app: Router, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
  let request = Request::builder()
    .method(method)
    .uri(uri)
    .body(Body::empty())
    .expect("Failed to build request");
  let (status, _, body) = into_parts(app, request).await;
  (status, parse_body(&body))
}

/// ---------------------------------------------------------------------------
/// Assertion Helpers
/// ---------------------------------------------------------------------------

/// Assert that two floating point values are approximately equal
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<String> =
      sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .fetch_all(&pool)
        .await
        .unwrap();

    assert!(tables.contains(&"kv_store".to_string()));
    assert!(tables.contains(&"feedback".to_string()));

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_health_record_bmi() {
    let record = mock_health_record(1, 10.0, 75.0);
    assert_approx_eq!(record.bmi, 17.8, 1e-9);
    assert_eq!(record.age_group, AgeGroup::Infant);
  }

  #[tokio::test]
  async fn test_app_state_without_key_has_no_client() {
    let state = test_app_state(None).await;
    assert!(state.gemini().is_err());
  }
}
