//! Session state and its reducer
//!
//! Every mutation goes through [`Session::apply`]. Requests to the AI service
//! reserve a [`RequestId`] up front; a completion is applied only while its
//! slot is still loading under that same id. Anything else is a stale response
//! and is dropped.

use crate::gemini::QuickTip;
use crate::i18n::Language;
use crate::models::{AgeGroup, HealthRecord, Topic};
use serde::Serialize;
use std::collections::HashMap;

/// Generation token for one outbound request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RequestId(u64);

/// State cell for one kind of request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Slot<T = String> {
  Idle,
  Loading {
    request: RequestId,
  },
  Ready {
    value: T,
  },
  /// Carries the translated, user-facing message
  Failed {
    message: String,
  },
}

impl<T> Default for Slot<T> {
  fn default() -> Self {
    Slot::Idle
  }
}

impl<T> Slot<T> {
  pub fn is_loading(&self) -> bool {
    matches!(self, Slot::Loading { .. })
  }

  pub fn ready(&self) -> Option<&T> {
    match self {
      Slot::Ready { value } => Some(value),
      _ => None,
    }
  }

  /// Apply a completion if `request` is still the one in flight
  fn complete(&mut self, request: RequestId, result: Result<T, String>) -> bool {
    match self {
      Slot::Loading { request: current } if *current == request => {
        *self = match result {
          Ok(value) => Slot::Ready { value },
          Err(message) => Slot::Failed { message },
        };
        true
      }
      _ => false,
    }
  }
}

#[derive(Debug, Clone)]
pub enum Action {
  SetLanguage(Language),
  SetAgeGroup(AgeGroup),
  SelectTopic(Option<Topic>),
  AdviceRequested {
    topic: Topic,
    request: RequestId,
  },
  AdviceReceived {
    topic: Topic,
    request: RequestId,
    result: Result<String, String>,
  },
  BmiAdviceRequested {
    request: RequestId,
  },
  BmiAdviceReceived {
    request: RequestId,
    result: Result<String, String>,
  },
  QuickTipRequested {
    request: RequestId,
  },
  QuickTipReceived {
    request: RequestId,
    result: Result<QuickTip, String>,
  },
  /// Prepends; the list stays newest first
  RecordAdded(HealthRecord),
  RecordsLoaded(Vec<HealthRecord>),
}

#[derive(Debug, Default)]
pub struct Session {
  pub language: Language,
  pub age_group: AgeGroup,
  pub selected_topic: Option<Topic>,
  advice: HashMap<Topic, Slot>,
  pub bmi_advice: Slot,
  pub quick_tip: Slot<QuickTip>,
  /// Newest first
  pub health_records: Vec<HealthRecord>,
  last_request: u64,
}

impl Session {
  pub fn new(health_records: Vec<HealthRecord>) -> Self {
    Self {
      health_records,
      ..Self::default()
    }
  }

  pub fn next_request_id(&mut self) -> RequestId {
    self.last_request += 1;
    RequestId(self.last_request)
  }

  pub fn advice(&self, topic: Topic) -> &Slot {
    static IDLE: Slot = Slot::Idle;
    self.advice.get(&topic).unwrap_or(&IDLE)
  }

  /// Records for one age group, newest first
  pub fn records_for(&self, age_group: AgeGroup) -> Vec<&HealthRecord> {
    self
      .health_records
      .iter()
      .filter(|r| r.age_group == age_group)
      .collect()
  }

  /// The record list as it will be once `record` is added
  pub fn records_with(&self, record: &HealthRecord) -> Vec<HealthRecord> {
    let mut records = Vec::with_capacity(self.health_records.len() + 1);
    records.push(record.clone());
    records.extend(self.health_records.iter().cloned());
    records
  }

  pub fn newest_record_id(&self) -> Option<u64> {
    self.health_records.iter().map(|r| r.id).max()
  }

  /// Reserve a token and mark the topic's slot as loading
  pub fn begin_advice(&mut self, topic: Topic) -> RequestId {
    let request = self.next_request_id();
    self.apply(Action::AdviceRequested { topic, request });
    request
  }

  pub fn begin_bmi_advice(&mut self) -> RequestId {
    let request = self.next_request_id();
    self.apply(Action::BmiAdviceRequested { request });
    request
  }

  pub fn begin_quick_tip(&mut self) -> RequestId {
    let request = self.next_request_id();
    self.apply(Action::QuickTipRequested { request });
    request
  }

  /// Returns false when the action was a stale completion and changed nothing
  pub fn apply(&mut self, action: Action) -> bool {
    match action {
      Action::SetLanguage(language) => {
        if language != self.language {
          self.language = language;
          self.advice.clear();
          self.bmi_advice = Slot::Idle;
          self.quick_tip = Slot::Idle;
        }
        true
      }
      Action::SetAgeGroup(age_group) => {
        if age_group != self.age_group {
          self.age_group = age_group;
          self.advice.clear();
          self.bmi_advice = Slot::Idle;
          self.quick_tip = Slot::Idle;
        }
        true
      }
      Action::SelectTopic(topic) => {
        self.selected_topic = topic;
        true
      }
      Action::AdviceRequested { topic, request } => {
        self.advice.insert(topic, Slot::Loading { request });
        true
      }
      Action::AdviceReceived { topic, request, result } => self
        .advice
        .get_mut(&topic)
        .is_some_and(|slot| slot.complete(request, result)),
      Action::BmiAdviceRequested { request } => {
        self.bmi_advice = Slot::Loading { request };
        true
      }
      Action::BmiAdviceReceived { request, result } => self.bmi_advice.complete(request, result),
      Action::QuickTipRequested { request } => {
        self.quick_tip = Slot::Loading { request };
        true
      }
      Action::QuickTipReceived { request, result } => self.quick_tip.complete(request, result),
      Action::RecordAdded(record) => {
        self.health_records.insert(0, record);
        true
      }
      Action::RecordsLoaded(records) => {
        self.health_records = records;
        true
      }
    }
  }
}
