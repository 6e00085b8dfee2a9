use serde::{Deserialize, Serialize};
use std::fmt;

/// Advice topics shown on the landing grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
  Care,
  Food,
  Teaching,
  Behavior,
  Games,
  /// BMI & growth tracker; never requests topical advice
  Health,
}

impl Topic {
  pub const ALL: [Topic; 6] = [
    Topic::Care,
    Topic::Food,
    Topic::Teaching,
    Topic::Behavior,
    Topic::Games,
    Topic::Health,
  ];

  pub fn id(&self) -> &'static str {
    match self {
      Topic::Care => "care",
      Topic::Food => "food",
      Topic::Teaching => "teaching",
      Topic::Behavior => "behavior",
      Topic::Games => "games",
      Topic::Health => "health",
    }
  }

  pub fn is_tracker(&self) -> bool {
    matches!(self, Topic::Health)
  }

  pub fn description(&self) -> &'static str {
    match self {
      Topic::Care => "Guidance on sleep, hygiene, and wellness routines.",
      Topic::Food => "Tips for balanced meals, feeding schedules, and healthy eating habits.",
      Topic::Teaching => {
        "Strategies for cognitive development, learning activities, and school readiness."
      }
      Topic::Behavior => "Advice on managing emotions, discipline, and building social connections.",
      Topic::Games => "Fun, age-appropriate activities to stimulate growth and bonding.",
      Topic::Health => "Record and track your baby's growth milestones like weight, height, and BMI.",
    }
  }

  /// Accent color name used by the front end
  pub fn color(&self) -> &'static str {
    match self {
      Topic::Care => "rose",
      Topic::Food => "amber",
      Topic::Teaching => "indigo",
      Topic::Behavior => "teal",
      Topic::Games => "violet",
      Topic::Health => "emerald",
    }
  }
}

impl fmt::Display for Topic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.id())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_only_health_is_tracker() {
    let trackers: Vec<_> = Topic::ALL.into_iter().filter(|t| t.is_tracker()).collect();
    assert_eq!(trackers, vec![Topic::Health]);
  }

  #[test]
  fn test_serde_uses_topic_id() {
    for topic in Topic::ALL {
      let json = serde_json::to_string(&topic).unwrap();
      assert_eq!(json, format!("\"{}\"", topic.id()));
      assert_eq!(serde_json::from_str::<Topic>(&json).unwrap(), topic);
    }
  }
}
