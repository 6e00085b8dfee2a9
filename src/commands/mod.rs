pub mod advice;
pub mod assistant;
pub mod feedback;
pub mod health;
pub mod quick_tip;
pub mod session;

use crate::db::AppState;
use crate::i18n::Language;
use crate::models::{AgeGroup, Topic};
use axum::{
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Json, Response},
  routing::{get, post, put},
  Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// ---------------------------------------------------------------------------
/// Errors
/// ---------------------------------------------------------------------------

/// Error returned by a command, rendered as `{ "error": message }`
#[derive(Debug)]
pub struct CommandError {
  pub status: StatusCode,
  pub message: String,
}

impl CommandError {
  /// Local validation failure; nothing was sent upstream
  pub fn validation(message: impl Into<String>) -> Self {
    Self {
      status: StatusCode::UNPROCESSABLE_ENTITY,
      message: message.into(),
    }
  }

  /// The AI service failed
  pub fn upstream(message: impl Into<String>) -> Self {
    Self {
      status: StatusCode::BAD_GATEWAY,
      message: message.into(),
    }
  }

  /// A newer request replaced this one before it completed
  pub fn superseded() -> Self {
    Self {
      status: StatusCode::CONFLICT,
      message: "Request was superseded by a newer one".to_string(),
    }
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    Self {
      status: StatusCode::NOT_FOUND,
      message: message.into(),
    }
  }

  pub fn internal(message: impl Into<String>) -> Self {
    Self {
      status: StatusCode::INTERNAL_SERVER_ERROR,
      message: message.into(),
    }
  }
}

impl IntoResponse for CommandError {
  fn into_response(self) -> Response {
    (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
  }
}

/// ---------------------------------------------------------------------------
/// Router
/// ---------------------------------------------------------------------------

pub fn router(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/catalog", get(catalog))
    .route("/session", get(session::get_session))
    .route("/session/language", put(session::set_language))
    .route("/session/age-group", put(session::set_age_group))
    .route("/session/topic", put(session::select_topic))
    .route("/advice/:topic", get(advice::get_advice).post(advice::generate_advice))
    .route("/share/:topic", get(advice::share_advice))
    .route(
      "/health-records",
      get(health::list_health_records).post(health::add_health_record),
    )
    .route("/health-records/chart", get(health::get_growth_chart))
    .route("/health-records/chart.svg", get(health::get_growth_chart_svg))
    .route("/bmi-advice", get(health::get_bmi_advice))
    .route("/quick-tip", post(quick_tip::fetch_quick_tip))
    .route("/assistant", post(assistant::ask_assistant))
    .route("/feedback", post(feedback::submit_feedback))
    .layer(CorsLayer::permissive())
    .with_state(state)
}

/// ---------------------------------------------------------------------------
/// Health & Catalog
/// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
  pub ok: bool,
  pub message: &'static str,
}

async fn health() -> Json<HealthResponse> {
  Json(HealthResponse {
    ok: true,
    message: "Parent guide service is alive",
  })
}

#[derive(Debug, Serialize)]
pub struct AgeGroupEntry {
  pub id: AgeGroup,
  pub label: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicEntry {
  pub id: Topic,
  pub title: &'static str,
  pub description: &'static str,
  pub color: &'static str,
  pub is_tracker: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
  pub language: Language,
  pub age_groups: Vec<AgeGroupEntry>,
  pub topics: Vec<TopicEntry>,
}

/// Age groups and topics, labelled in the session language
async fn catalog(State(state): State<Arc<AppState>>) -> Json<Catalog> {
  let language = state.session().language;
  let messages = language.messages();

  Json(Catalog {
    language,
    age_groups: AgeGroup::ALL
      .into_iter()
      .map(|id| AgeGroupEntry {
        id,
        label: messages.age_group_label(id),
      })
      .collect(),
    topics: Topic::ALL
      .into_iter()
      .map(|id| TopicEntry {
        id,
        title: messages.topic_title(id),
        description: id.description(),
        color: id.color(),
        is_tracker: id.is_tracker(),
      })
      .collect(),
  })
}
