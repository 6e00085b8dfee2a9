use super::CommandError;
use crate::db::AppState;
use crate::gemini::QuickTip;
use crate::state::Action;
use axum::{extract::State, response::Json};
use std::sync::Arc;

/// Fetch a fresh question/answer pair for the session's age group
pub async fn fetch_quick_tip(
  State(state): State<Arc<AppState>>,
) -> Result<Json<QuickTip>, CommandError> {
  let (request, language, age_group) = {
    let mut session = state.session();
    (session.begin_quick_tip(), session.language, session.age_group)
  };

  let result = match state.gemini() {
    Ok(client) => client.get_quick_tip(age_group, language).await,
    Err(e) => Err(e),
  };
  let result = result.map_err(|e| {
    tracing::error!("Error fetching quick tip: {}", e);
    language.messages().quick_tip_error.to_string()
  });

  if !state.session().apply(Action::QuickTipReceived {
    request,
    result: result.clone(),
  }) {
    return Err(CommandError::superseded());
  }

  result.map(Json).map_err(CommandError::upstream)
}

#[cfg(test)]
mod tests {
  use crate::commands::router;
  use crate::models::AgeGroup;
  use crate::state::{Action, Slot};
  use crate::test_utils::{gemini_text_response, send_empty, test_app_state};
  use axum::http::StatusCode;

  const TIP_PATH: &str = "/models/gemini-2.5-flash-lite:generateContent";

  #[tokio::test]
  async fn test_quick_tip_is_cached_in_session() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("POST", TIP_PATH)
      .with_status(200)
      .with_body(gemini_text_response(
        r#"{"question": "How much sleep?", "answer": "About 12 hours."}"#,
      ))
      .create_async()
      .await;

    let state = test_app_state(Some(server.url())).await;
    let (status, body) = send_empty(router(state.clone()), "POST", "/quick-tip").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question"], "How much sleep?");
    assert_eq!(
      state.session().quick_tip.ready().map(|tip| tip.answer.clone()),
      Some("About 12 hours.".to_string())
    );
  }

  #[tokio::test]
  async fn test_tip_for_previous_age_group_is_discarded() {
    let mut server = mockito::Server::new_async().await;
    let state = test_app_state(Some(server.url())).await;
    let racing = state.clone();
    server
      .mock("POST", TIP_PATH)
      .with_status(200)
      .with_body_from_request(move |_| {
        racing.session().apply(Action::SetAgeGroup(AgeGroup::Teen));
        gemini_text_response(r#"{"question": "When to wean?", "answer": "Around 6 months."}"#)
          .into_bytes()
      })
      .create_async()
      .await;

    let (status, _) = send_empty(router(state.clone()), "POST", "/quick-tip").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(state.session().quick_tip, Slot::Idle);
  }

  #[tokio::test]
  async fn test_malformed_tip_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("POST", TIP_PATH)
      .with_status(200)
      .with_body(gemini_text_response("Sorry, no tip today."))
      .create_async()
      .await;

    let state = test_app_state(Some(server.url())).await;
    let (status, body) = send_empty(router(state), "POST", "/quick-tip").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Failed to get a quick tip. Please try again.");
  }
}
