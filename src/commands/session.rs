use super::CommandError;
use crate::db::AppState;
use crate::i18n::Language;
use crate::models::{AgeGroup, Topic};
use crate::state::{Action, Session};
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
  pub language: Language,
  pub age_group: AgeGroup,
  pub selected_topic: Option<Topic>,
}

impl From<&Session> for SessionView {
  fn from(session: &Session) -> Self {
    Self {
      language: session.language,
      age_group: session.age_group,
      selected_topic: session.selected_topic,
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct SetLanguage {
  pub language: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAgeGroup {
  pub age_group: AgeGroup,
}

#[derive(Debug, Deserialize)]
pub struct SelectTopic {
  pub topic: Option<Topic>,
}

fn apply_and_view(state: &AppState, action: Action) -> SessionView {
  let mut session = state.session();
  session.apply(action);
  SessionView::from(&*session)
}

pub async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionView> {
  Json(SessionView::from(&*state.session()))
}

/// Unsupported codes are rejected here; prompts never see them
pub async fn set_language(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SetLanguage>,
) -> Result<Json<SessionView>, CommandError> {
  let language: Language = body.language.parse().map_err(CommandError::validation)?;
  tracing::info!(language = %language, "Language changed");
  Ok(Json(apply_and_view(&state, Action::SetLanguage(language))))
}

pub async fn set_age_group(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SetAgeGroup>,
) -> Json<SessionView> {
  tracing::info!(age_group = %body.age_group, "Age group changed");
  Json(apply_and_view(&state, Action::SetAgeGroup(body.age_group)))
}

pub async fn select_topic(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SelectTopic>,
) -> Json<SessionView> {
  Json(apply_and_view(&state, Action::SelectTopic(body.topic)))
}
