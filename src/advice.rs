//! Tagged advice text parsing
//!
//! The AI service is asked to prefix every line with a bracketed tag
//! (`[SLEEP] ...`, `[DISCLAIMER] ...`). This module turns that loosely
//! followed convention into a structured record that is always safe to render.
//! Nothing here returns an error: untagged text degrades to a flat list of
//! `GENERAL` tips and garbage degrades to an empty record.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Bracketed uppercase tag at line start, then the payload
static TAGGED_LINE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\[([A-Z]+)\]\s*(.*)$").expect("tagged line pattern"));

/// Leading list marker (`*`, `-`, `1.`) followed by whitespace
static LIST_MARKER: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[*\-\d.]+\s+").expect("list marker pattern"));

/// ---------------------------------------------------------------------------
/// Categories & Flavors
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AdviceCategory {
  Sleep,
  Hygiene,
  Play,
  Food,
  Learning,
  Communication,
  Emotion,
  Safety,
  Routine,
  Diet,
  Activity,
  General,
}

impl AdviceCategory {
  pub fn tag(&self) -> &'static str {
    match self {
      AdviceCategory::Sleep => "SLEEP",
      AdviceCategory::Hygiene => "HYGIENE",
      AdviceCategory::Play => "PLAY",
      AdviceCategory::Food => "FOOD",
      AdviceCategory::Learning => "LEARNING",
      AdviceCategory::Communication => "COMMUNICATION",
      AdviceCategory::Emotion => "EMOTION",
      AdviceCategory::Safety => "SAFETY",
      AdviceCategory::Routine => "ROUTINE",
      AdviceCategory::Diet => "DIET",
      AdviceCategory::Activity => "ACTIVITY",
      AdviceCategory::General => "GENERAL",
    }
  }
}

const GENERAL_CATEGORIES: &[AdviceCategory] = &[
  AdviceCategory::Sleep,
  AdviceCategory::Hygiene,
  AdviceCategory::Play,
  AdviceCategory::Food,
  AdviceCategory::Learning,
  AdviceCategory::Communication,
  AdviceCategory::Emotion,
  AdviceCategory::Safety,
  AdviceCategory::Routine,
  AdviceCategory::General,
];

const BMI_CATEGORIES: &[AdviceCategory] = &[
  AdviceCategory::Diet,
  AdviceCategory::Activity,
  AdviceCategory::General,
];

/// Which prompt produced the text, and therefore which tags are valid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceFlavor {
  /// Topical advice: `[INTRODUCTION]` ... `[CLOSING]`
  General,
  /// Growth assessment: `[ASSESSMENT]` ... `[DISCLAIMER]`
  Bmi,
}

/// How a recognized tag is routed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagRole {
  Leading,
  Trailing,
  Tip(AdviceCategory),
}

impl AdviceFlavor {
  pub fn leading_tag(&self) -> &'static str {
    match self {
      AdviceFlavor::General => "INTRODUCTION",
      AdviceFlavor::Bmi => "ASSESSMENT",
    }
  }

  pub fn trailing_tag(&self) -> &'static str {
    match self {
      AdviceFlavor::General => "CLOSING",
      AdviceFlavor::Bmi => "DISCLAIMER",
    }
  }

  pub fn categories(&self) -> &'static [AdviceCategory] {
    match self {
      AdviceFlavor::General => GENERAL_CATEGORIES,
      AdviceFlavor::Bmi => BMI_CATEGORIES,
    }
  }

  fn classify(&self, tag: &str) -> Option<TagRole> {
    if tag == self.leading_tag() {
      return Some(TagRole::Leading);
    }
    if tag == self.trailing_tag() {
      return Some(TagRole::Trailing);
    }
    self
      .categories()
      .iter()
      .find(|c| c.tag() == tag)
      .map(|c| TagRole::Tip(*c))
  }

  /// Icon name for a tip. Categories outside this flavor fall back to the
  /// flavor's GENERAL icon.
  pub fn icon(&self, category: AdviceCategory) -> &'static str {
    match (self, category) {
      (AdviceFlavor::General, AdviceCategory::Sleep) => "moon",
      (AdviceFlavor::General, AdviceCategory::Hygiene) => "sparkles",
      (AdviceFlavor::General, AdviceCategory::Play) => "puzzle-piece",
      (AdviceFlavor::General, AdviceCategory::Food) => "food",
      (AdviceFlavor::General, AdviceCategory::Learning) => "book-open",
      (AdviceFlavor::General, AdviceCategory::Communication) => "chat-bubble",
      (AdviceFlavor::General, AdviceCategory::Emotion) => "heart",
      (AdviceFlavor::General, AdviceCategory::Safety) => "shield-check",
      (AdviceFlavor::General, AdviceCategory::Routine) => "clock",
      (AdviceFlavor::General, _) => "light-bulb",
      (AdviceFlavor::Bmi, AdviceCategory::Diet) => "food",
      (AdviceFlavor::Bmi, AdviceCategory::Activity) => "fire",
      (AdviceFlavor::Bmi, _) => "heart",
    }
  }

  pub fn leading_icon(&self) -> Option<&'static str> {
    match self {
      AdviceFlavor::General => None,
      AdviceFlavor::Bmi => Some("sparkles"),
    }
  }

  pub fn trailing_icon(&self) -> Option<&'static str> {
    match self {
      AdviceFlavor::General => None,
      AdviceFlavor::Bmi => Some("shield-check"),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Parsed Structure
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceLine {
  pub category: AdviceCategory,
  pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAdvice {
  /// Introduction (general) or assessment (BMI)
  pub leading_text: Option<String>,
  pub tips: Vec<AdviceLine>,
  /// Closing (general) or disclaimer (BMI)
  pub trailing_text: Option<String>,
}

impl ParsedAdvice {
  /// Nothing worth rendering; the caller shows its empty state
  pub fn is_empty(&self) -> bool {
    self.leading_text.is_none() && self.tips.is_empty()
  }

  /// Canonical tagged form. Parsing it again yields an equal record.
  pub fn to_tagged_text(&self, flavor: AdviceFlavor) -> String {
    let mut lines = Vec::with_capacity(self.tips.len() + 2);
    if let Some(leading) = &self.leading_text {
      lines.push(format!("[{}] {}", flavor.leading_tag(), leading));
    }
    for tip in &self.tips {
      lines.push(format!("[{}] {}", tip.category.tag(), tip.text));
    }
    if let Some(trailing) = &self.trailing_text {
      lines.push(format!("[{}] {}", flavor.trailing_tag(), trailing));
    }
    lines.join("\n")
  }

  /// Plain-text summary handed to the share sheet or clipboard
  pub fn share_text(&self) -> String {
    let tips = self
      .tips
      .iter()
      .map(|tip| format!("• {}", tip.text))
      .collect::<Vec<_>>()
      .join("\n");

    [
      self.leading_text.as_deref().unwrap_or(""),
      tips.as_str(),
      self.trailing_text.as_deref().unwrap_or(""),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join("\n\n")
  }

  /// Attach the flavor's icons for rendering
  pub fn with_icons(self, flavor: AdviceFlavor) -> IconedAdvice {
    IconedAdvice {
      leading_icon: self.leading_text.as_ref().and(flavor.leading_icon()),
      leading_text: self.leading_text,
      tips: self
        .tips
        .into_iter()
        .map(|tip| IconedLine {
          icon: flavor.icon(tip.category),
          category: tip.category,
          text: tip.text,
        })
        .collect(),
      trailing_icon: self.trailing_text.as_ref().and(flavor.trailing_icon()),
      trailing_text: self.trailing_text,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconedLine {
  pub category: AdviceCategory,
  pub icon: &'static str,
  pub text: String,
}

/// [`ParsedAdvice`] as sent to the front end, icons resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconedAdvice {
  pub leading_text: Option<String>,
  pub leading_icon: Option<&'static str>,
  pub tips: Vec<IconedLine>,
  pub trailing_text: Option<String>,
  pub trailing_icon: Option<&'static str>,
}

/// ---------------------------------------------------------------------------
/// Parsing
/// ---------------------------------------------------------------------------

/// A line that carries a tag from the active vocabulary
fn match_tagged<'a>(line: &'a str, flavor: AdviceFlavor) -> Option<(TagRole, &'a str)> {
  let caps = TAGGED_LINE.captures(line)?;
  let tag = caps.get(1)?.as_str();
  let payload = caps.get(2).map(|m| m.as_str().trim_end()).unwrap_or("");
  flavor.classify(tag).map(|role| (role, payload))
}

/// Structure AI advice text according to `flavor`'s tag vocabulary
pub fn parse_advice(text: &str, flavor: AdviceFlavor) -> ParsedAdvice {
  let lines: Vec<&str> = text
    .split('\n')
    .map(str::trim)
    .filter(|line| !line.is_empty())
    .collect();

  let tagged: Vec<Option<(TagRole, &str)>> =
    lines.iter().map(|line| match_tagged(line, flavor)).collect();

  let mut parsed = ParsedAdvice::default();

  if tagged.iter().any(Option::is_some) {
    for (role, payload) in tagged.into_iter().flatten() {
      match role {
        TagRole::Leading => parsed.leading_text = Some(payload.to_string()),
        TagRole::Trailing => parsed.trailing_text = Some(payload.to_string()),
        TagRole::Tip(category) => parsed.tips.push(AdviceLine {
          category,
          text: payload.to_string(),
        }),
      }
    }
  } else {
    parsed.tips = lines
      .into_iter()
      .map(|line| AdviceLine {
        category: AdviceCategory::General,
        text: LIST_MARKER.replace(line, "").into_owned(),
      })
      .collect();
  }

  parsed
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
