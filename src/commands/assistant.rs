use super::CommandError;
use crate::db::AppState;
use crate::gemini::{InlineImage, MAX_ASSISTANT_IMAGES};
use crate::markdown::{parse_markdown, to_html, Block};
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct AssistantRequest {
  pub prompt: String,
  /// `data:image/*;base64,` URLs
  #[serde(default)]
  pub images: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AssistantReply {
  /// Raw markdown from the model
  pub text: String,
  pub blocks: Vec<Block>,
  pub html: String,
}

/// Answer a free-form question, optionally about attached photos
pub async fn ask_assistant(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AssistantRequest>,
) -> Result<Json<AssistantReply>, CommandError> {
  let language = state.session().language;
  let messages = language.messages();

  let prompt = body.prompt.trim();
  if prompt.is_empty() {
    return Err(CommandError::validation(messages.prompt_required));
  }
  if body.images.len() > MAX_ASSISTANT_IMAGES {
    return Err(CommandError::validation(messages.image_limit_error));
  }

  let images = body
    .images
    .iter()
    .map(|url| InlineImage::from_data_url(url))
    .collect::<Result<Vec<_>, _>>()
    .map_err(|e| {
      tracing::debug!("Rejected attachment: {}", e);
      CommandError::validation(messages.invalid_image)
    })?;

  tracing::info!(images = images.len(), "Assistant question received");

  let client = state.gemini().map_err(|e| {
    tracing::error!("Assistant unavailable: {}", e);
    CommandError::upstream(messages.assistant_error)
  })?;

  let text = client
    .get_assistant_response(prompt, images, language)
    .await
    .map_err(|e| {
      tracing::error!("Error getting assistant response: {}", e);
      CommandError::upstream(messages.assistant_error)
    })?;

  let blocks = parse_markdown(&text);
  let html = to_html(&blocks);
  Ok(Json(AssistantReply { text, blocks, html }))
}
