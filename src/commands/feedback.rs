use super::CommandError;
use crate::db::AppState;
use crate::models::NewFeedback;
use crate::storage;
use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct FeedbackReceipt {
  pub id: i64,
  pub message: &'static str,
}

pub async fn submit_feedback(
  State(state): State<Arc<AppState>>,
  Json(feedback): Json<NewFeedback>,
) -> Result<(StatusCode, Json<FeedbackReceipt>), CommandError> {
  let language = state.session().language;
  let messages = language.messages();

  if !feedback.is_long_enough() {
    return Err(CommandError::validation(messages.feedback_too_short));
  }

  let id = storage::insert_feedback(&state.db, feedback.kind, feedback.message.trim(), language)
    .await
    .map_err(|e| {
      tracing::error!("Failed to store feedback: {}", e);
      CommandError::internal(messages.feedback_error)
    })?;

  tracing::info!(id, kind = feedback.kind.as_str(), "Feedback received");

  Ok((
    StatusCode::CREATED,
    Json(FeedbackReceipt {
      id,
      message: messages.feedback_success,
    }),
  ))
}
