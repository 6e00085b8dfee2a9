use super::AgeGroup;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One weight/height measurement. Immutable once created.
///
/// Field names are camelCase so the persisted list keeps the same shape as the
/// browser build (`ageGroup`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
  /// Creation time in milliseconds, bumped to stay strictly increasing
  pub id: u64,
  /// Local calendar date, `M/D/YYYY`
  pub date: String,
  pub age_group: AgeGroup,
  /// Kilograms
  pub weight: f64,
  /// Centimetres
  pub height: f64,
  /// Rounded to one decimal at creation, never recomputed
  pub bmi: f64,
}

/// Raw form input before validation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Measurement {
  pub weight: f64,
  pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MeasurementError {
  #[error("Weight must be a positive number")]
  InvalidWeight,

  #[error("Height must be a positive number")]
  InvalidHeight,
}

impl Measurement {
  pub fn validate(self) -> Result<Self, MeasurementError> {
    if !(self.weight.is_finite() && self.weight > 0.0) {
      return Err(MeasurementError::InvalidWeight);
    }
    if !(self.height.is_finite() && self.height > 0.0) {
      return Err(MeasurementError::InvalidHeight);
    }
    Ok(self)
  }
}

/// BMI = kg / m^2, rounded to one decimal place
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> f64 {
  let height_m = height_cm / 100.0;
  let bmi = weight_kg / (height_m * height_m);
  (bmi * 10.0).round() / 10.0
}

/// Millisecond timestamp id, strictly greater than the newest existing id
pub fn next_record_id(now_millis: i64, newest_existing: Option<u64>) -> u64 {
  let candidate = u64::try_from(now_millis).unwrap_or(0);
  match newest_existing {
    Some(prev) if candidate <= prev => prev + 1,
    _ => candidate,
  }
}

impl HealthRecord {
  /// Validate a measurement and stamp it into a new record
  pub fn create(
    measurement: Measurement,
    age_group: AgeGroup,
    newest_existing_id: Option<u64>,
    now: DateTime<Local>,
  ) -> Result<Self, MeasurementError> {
    let Measurement { weight, height } = measurement.validate()?;

    Ok(Self {
      id: next_record_id(now.timestamp_millis(), newest_existing_id),
      date: now.format("%-m/%-d/%Y").to_string(),
      age_group,
      weight,
      height,
      bmi: compute_bmi(weight, height),
    })
  }
}
