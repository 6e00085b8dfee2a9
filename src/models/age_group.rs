use serde::{Deserialize, Serialize};
use std::fmt;

/// Child age buckets used to scope every advice request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AgeGroup {
  #[default]
  #[serde(rename = "0-1")]
  Infant,
  #[serde(rename = "1-3")]
  Toddler,
  #[serde(rename = "3-5")]
  Preschool,
  #[serde(rename = "6-8")]
  EarlySchool,
  #[serde(rename = "9-12")]
  Preteen,
  #[serde(rename = "13-16")]
  Teen,
}

impl AgeGroup {
  pub const ALL: [AgeGroup; 6] = [
    AgeGroup::Infant,
    AgeGroup::Toddler,
    AgeGroup::Preschool,
    AgeGroup::EarlySchool,
    AgeGroup::Preteen,
    AgeGroup::Teen,
  ];

  pub fn id(&self) -> &'static str {
    match self {
      AgeGroup::Infant => "0-1",
      AgeGroup::Toddler => "1-3",
      AgeGroup::Preschool => "3-5",
      AgeGroup::EarlySchool => "6-8",
      AgeGroup::Preteen => "9-12",
      AgeGroup::Teen => "13-16",
    }
  }

  /// English label embedded in prompts
  pub fn label(&self) -> &'static str {
    match self {
      AgeGroup::Infant => "0 - 1 Year",
      AgeGroup::Toddler => "1 - 3 Years",
      AgeGroup::Preschool => "3 - 5 Years",
      AgeGroup::EarlySchool => "6 - 8 Years",
      AgeGroup::Preteen => "9 - 12 Years",
      AgeGroup::Teen => "13 - 16+ Years",
    }
  }
}

impl fmt::Display for AgeGroup {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.id())
  }
}
