use super::advice::AdviceView;
use super::CommandError;
use crate::advice::AdviceFlavor;
use crate::chart::{project, render_svg, ChartFrame, ChartLabels, Projection};
use crate::db::AppState;
use crate::models::{AgeGroup, HealthRecord, Measurement};
use crate::state::Action;
use crate::storage;
use axum::{
  extract::{Query, State},
  http::{header, StatusCode},
  response::{IntoResponse, Json, Response},
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct RecordsQuery {
  /// Defaults to the session's age group
  pub age_group: Option<AgeGroup>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedRecord {
  pub record: HealthRecord,
  pub bmi_advice: AdviceView,
}

/// Records for the requested age group, oldest first (chart order)
fn chart_records(state: &AppState, query: RecordsQuery) -> (Vec<HealthRecord>, ChartLabels) {
  let session = state.session();
  let age_group = query.age_group.unwrap_or(session.age_group);
  let mut records: Vec<HealthRecord> =
    session.records_for(age_group).into_iter().cloned().collect();
  records.reverse();

  let messages = session.language.messages();
  let labels = ChartLabels {
    date: messages.chart_date.to_string(),
    weight: messages.chart_weight.to_string(),
    height: messages.chart_height.to_string(),
    bmi: messages.chart_bmi.to_string(),
  };
  (records, labels)
}

/// ---------------------------------------------------------------------------
/// Records
/// ---------------------------------------------------------------------------

pub async fn list_health_records(
  State(state): State<Arc<AppState>>,
  Query(query): Query<RecordsQuery>,
) -> Json<Vec<HealthRecord>> {
  let session = state.session();
  let age_group = query.age_group.unwrap_or(session.age_group);
  Json(session.records_for(age_group).into_iter().cloned().collect())
}

/// Validate and store a measurement for the session's age group, then ask
/// for a BMI assessment of it. The session only sees the record once it is
/// saved.
pub async fn add_health_record(
  State(state): State<Arc<AppState>>,
  Json(measurement): Json<Measurement>,
) -> Result<(StatusCode, Json<AddedRecord>), CommandError> {
  let write = state.lock_record_writes().await;

  let (record, records, language) = {
    let session = state.session();
    let language = session.language;
    let record = HealthRecord::create(
      measurement,
      session.age_group,
      session.newest_record_id(),
      Local::now(),
    )
    .map_err(|e| {
      tracing::debug!("Rejected measurement: {}", e);
      CommandError::validation(language.messages().invalid_measurement)
    })?;

    let records = session.records_with(&record);
    (record, records, language)
  };

  storage::save_health_records(&state.db, &records)
    .await
    .map_err(|e| {
      tracing::error!("Failed to save health records: {}", e);
      CommandError::internal("Failed to save health records")
    })?;

  let request = {
    let mut session = state.session();
    session.apply(Action::RecordAdded(record.clone()));
    session.begin_bmi_advice()
  };
  drop(write);

  tracing::info!(id = record.id, bmi = record.bmi, "Health record added");

  let result = match state.gemini() {
    Ok(client) => {
      client
        .get_bmi_advice(record.age_group, record.weight, record.height, record.bmi, language)
        .await
    }
    Err(e) => Err(e),
  };
  let result = result.map_err(|e| {
    tracing::error!("Error generating BMI advice: {}", e);
    language.messages().bmi_error.to_string()
  });

  let bmi_advice = {
    let mut session = state.session();
    if !session.apply(Action::BmiAdviceReceived { request, result }) {
      tracing::debug!("Discarding stale BMI advice response");
    }
    session.bmi_advice.clone()
  };

  Ok((
    StatusCode::CREATED,
    Json(AddedRecord {
      record,
      bmi_advice: AdviceView::new(bmi_advice, AdviceFlavor::Bmi),
    }),
  ))
}

pub async fn get_bmi_advice(State(state): State<Arc<AppState>>) -> Json<AdviceView> {
  let slot = state.session().bmi_advice.clone();
  Json(AdviceView::new(slot, AdviceFlavor::Bmi))
}

/// ---------------------------------------------------------------------------
/// Growth Chart
/// ---------------------------------------------------------------------------

pub async fn get_growth_chart(
  State(state): State<Arc<AppState>>,
  Query(query): Query<RecordsQuery>,
) -> Response {
  let (records, _) = chart_records(&state, query);
  Json(project(&records, ChartFrame::default())).into_response()
}

/// SVG rendering of the chart; 204 while fewer than two records exist
pub async fn get_growth_chart_svg(
  State(state): State<Arc<AppState>>,
  Query(query): Query<RecordsQuery>,
) -> Response {
  let (records, labels) = chart_records(&state, query);
  let frame = ChartFrame::default();

  match project(&records, frame) {
    Projection::InsufficientData => StatusCode::NO_CONTENT.into_response(),
    Projection::Chart(chart) => (
      [(header::CONTENT_TYPE, "image/svg+xml")],
      render_svg(&chart, frame, &labels),
    )
      .into_response(),
  }
}
