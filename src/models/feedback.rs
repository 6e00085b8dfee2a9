use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
  #[default]
  Suggestion,
  Bug,
  General,
}

impl FeedbackKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      FeedbackKind::Suggestion => "suggestion",
      FeedbackKind::Bug => "bug",
      FeedbackKind::General => "general",
    }
  }
}

/// Feedback form payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFeedback {
  #[serde(default)]
  pub kind: FeedbackKind,
  pub message: String,
}

/// Minimum trimmed message length accepted by the form
pub const MIN_FEEDBACK_CHARS: usize = 10;

impl NewFeedback {
  pub fn is_long_enough(&self) -> bool {
    self.message.trim().chars().count() >= MIN_FEEDBACK_CHARS
  }
}
