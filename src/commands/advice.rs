use super::CommandError;
use crate::advice::{parse_advice, AdviceFlavor, IconedAdvice, ParsedAdvice};
use crate::db::AppState;
use crate::models::Topic;
use crate::state::{Action, Slot};
use axum::{
  extract::{Path, State},
  response::Json,
};
use serde::Serialize;
use std::sync::Arc;

/// A slot plus its structured form once the text is ready
#[derive(Debug, Serialize)]
pub struct AdviceView {
  #[serde(flatten)]
  pub slot: Slot,
  pub parsed: Option<IconedAdvice>,
}

impl AdviceView {
  pub fn new(slot: Slot, flavor: AdviceFlavor) -> Self {
    let parsed = slot
      .ready()
      .map(|text| parse_advice(text, flavor).with_icons(flavor));
    Self { slot, parsed }
  }
}

#[derive(Debug, Serialize)]
pub struct ShareContent {
  pub title: &'static str,
  pub text: String,
}

/// ---------------------------------------------------------------------------
/// Topical Advice
/// ---------------------------------------------------------------------------

pub async fn get_advice(
  State(state): State<Arc<AppState>>,
  Path(topic): Path<Topic>,
) -> Json<AdviceView> {
  let slot = state.session().advice(topic).clone();
  Json(AdviceView::new(slot, AdviceFlavor::General))
}

/// Generate (or regenerate) advice for `topic` in the session's language and
/// age group
pub async fn generate_advice(
  State(state): State<Arc<AppState>>,
  Path(topic): Path<Topic>,
) -> Result<Json<AdviceView>, CommandError> {
  let (request, language, age_group) = {
    let mut session = state.session();
    if topic.is_tracker() {
      return Err(CommandError::validation(session.language.messages().tracker_has_no_advice));
    }
    session.apply(Action::SelectTopic(Some(topic)));
    (session.begin_advice(topic), session.language, session.age_group)
  };

  let messages = language.messages();
  let title = messages.topic_title(topic);

  let result = match state.gemini() {
    Ok(client) => client.get_advice(age_group, title, language).await,
    Err(e) => Err(e),
  };

  let result = result.map_err(|e| {
    tracing::error!(topic = %topic, "Error generating advice: {}", e);
    messages.advice_error(title)
  });

  let applied = state.session().apply(Action::AdviceReceived {
    topic,
    request,
    result: result.clone(),
  });

  if !applied {
    tracing::debug!(topic = %topic, "Discarding stale advice response");
    return Err(CommandError::superseded());
  }

  match result {
    Ok(text) => {
      let view = AdviceView::new(Slot::Ready { value: text }, AdviceFlavor::General);
      tracing::info!(
        topic = %topic,
        tips = view.parsed.as_ref().map_or(0, |p| p.tips.len()),
        "Advice generated"
      );
      Ok(Json(view))
    }
    Err(message) => Err(CommandError::upstream(message)),
  }
}

/// ---------------------------------------------------------------------------
/// Sharing
/// ---------------------------------------------------------------------------

/// Share title and plain-text summary of the ready advice for `topic`. The
/// tracker topic shares its BMI advice.
pub async fn share_advice(
  State(state): State<Arc<AppState>>,
  Path(topic): Path<Topic>,
) -> Result<Json<ShareContent>, CommandError> {
  let (text, flavor, language) = {
    let session = state.session();
    let (slot, flavor) = if topic.is_tracker() {
      (&session.bmi_advice, AdviceFlavor::Bmi)
    } else {
      (session.advice(topic), AdviceFlavor::General)
    };
    (slot.ready().cloned(), flavor, session.language)
  };

  let parsed: Option<ParsedAdvice> = text
    .map(|t| parse_advice(&t, flavor))
    .filter(|p| !p.is_empty());

  let Some(parsed) = parsed else {
    return Err(CommandError::not_found("No advice to share yet"));
  };

  Ok(Json(ShareContent {
    title: language.messages().share_title,
    text: parsed.share_text(),
  }))
}

#[cfg(test)]
mod tests {
  use crate::commands::router;
  use crate::i18n::Language;
  use crate::models::Topic;
  use crate::state::Action;
  use crate::test_utils::{gemini_text_response, get_json, send_empty, test_app_state};
  use axum::http::StatusCode;

  const ADVICE_PATH: &str = "/models/gemini-2.5-flash:generateContent";

  #[tokio::test]
  async fn test_generate_advice_parses_tags() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", ADVICE_PATH)
      .with_status(200)
      .with_body(gemini_text_response(
        "[INTRODUCTION] Toddlers are curious.\n[FOOD] Offer small portions.\n[CLOSING] Have fun!",
      ))
      .create_async()
      .await;

    let state = test_app_state(Some(server.url())).await;
    let (status, body) = send_empty(router(state.clone()), "POST", "/advice/food").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["parsed"]["leading_text"], "Toddlers are curious.");
    assert_eq!(body["parsed"]["tips"][0]["category"], "FOOD");
    assert_eq!(body["parsed"]["tips"][0]["icon"], "food");
    assert_eq!(body["parsed"]["leading_icon"], "sparkles");
    assert_eq!(state.session().selected_topic, Some(Topic::Food));
    mock.assert_async().await;

    let (_, cached) = get_json(router(state), "/advice/food").await;
    assert_eq!(cached["parsed"]["tips"][0]["text"], "Offer small portions.");
  }

  #[tokio::test]
  async fn test_superseded_advice_is_discarded() {
    let mut server = mockito::Server::new_async().await;
    let state = test_app_state(Some(server.url())).await;
    let racing = state.clone();
    server
      .mock("POST", ADVICE_PATH)
      .with_status(200)
      .with_body_from_request(move |_| {
        racing.session().begin_advice(Topic::Food);
        gemini_text_response("[FOOD] From the first request.").into_bytes()
      })
      .create_async()
      .await;

    let (status, body) = send_empty(router(state.clone()), "POST", "/advice/food").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Request was superseded by a newer one");
    assert!(state.session().advice(Topic::Food).is_loading());
  }

  #[tokio::test]
  async fn test_upstream_failure_returns_translated_error() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("POST", ADVICE_PATH)
      .with_status(500)
      .with_body(r#"{"error": {"message": "boom"}}"#)
      .create_async()
      .await;

    let state = test_app_state(Some(server.url())).await;
    state.session().apply(Action::SetLanguage(Language::Chinese));

    let (status, body) = send_empty(router(state.clone()), "POST", "/advice/games").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "未能为 游戏与活动 生成建议，请重试。");

    let (_, slot) = get_json(router(state), "/advice/games").await;
    assert_eq!(slot["status"], "failed");
    assert!(slot["parsed"].is_null());
  }

  #[tokio::test]
  async fn test_missing_api_key_is_an_advice_error() {
    let state = test_app_state(None).await;
    let (status, body) = send_empty(router(state), "POST", "/advice/care").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
      body["error"],
      "Failed to generate advice for Health & Daily Care. Please try again."
    );
  }

  #[tokio::test]
  async fn test_tracker_topic_is_rejected() {
    let state = test_app_state(None).await;
    let (status, _) = send_empty(router(state), "POST", "/advice/health").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  }

  #[tokio::test]
  async fn test_unknown_topic_is_rejected() {
    let state = test_app_state(None).await;
    let (status, _) = get_json(router(state), "/advice/cooking").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn test_share_ready_advice() {
    let state = test_app_state(None).await;
    {
      let mut session = state.session();
      let request = session.begin_advice(Topic::Behavior);
      session.apply(Action::AdviceReceived {
        topic: Topic::Behavior,
        request,
        result: Ok("[INTRODUCTION] Hi\n[EMOTION] Name feelings\n[CLOSING] Bye".to_string()),
      });
    }

    let (status, body) = get_json(router(state), "/share/behavior").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Parenting Tip from AiParent");
    assert_eq!(body["text"], "Hi\n\n• Name feelings\n\nBye");
  }

  #[tokio::test]
  async fn test_share_without_advice() {
    let state = test_app_state(None).await;
    let (status, _) = get_json(router(state), "/share/food").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
