//! Languages and the user-facing strings the service itself returns
//!
//! Page copy lives in the front end. Only strings that originate here (error
//! messages, share titles, localized topic titles for prompts and the catalog)
//! are kept in Rust.

use crate::models::{AgeGroup, Topic};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
  #[default]
  #[serde(rename = "en")]
  English,
  #[serde(rename = "my")]
  Burmese,
  #[serde(rename = "zh")]
  Chinese,
}

impl Language {
  pub const ALL: [Language; 3] = [Language::English, Language::Burmese, Language::Chinese];

  pub fn code(&self) -> &'static str {
    match self {
      Language::English => "en",
      Language::Burmese => "my",
      Language::Chinese => "zh",
    }
  }

  /// Language name written into prompts
  pub fn prompt_name(&self) -> &'static str {
    match self {
      Language::English => "English",
      Language::Burmese => "Burmese",
      Language::Chinese => "Chinese (Simplified)",
    }
  }

  pub fn messages(&self) -> &'static Messages {
    match self {
      Language::English => &EN,
      Language::Burmese => &MY,
      Language::Chinese => &ZH,
    }
  }
}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.code())
  }
}

impl FromStr for Language {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Language::ALL
      .into_iter()
      .find(|lang| lang.code() == s)
      .ok_or_else(|| format!("Unsupported language: {}", s))
  }
}

/// Static, pre-translated strings for one language
#[derive(Debug)]
pub struct Messages {
  /// Contains a `{topic}` placeholder
  advice_error: &'static str,
  pub bmi_error: &'static str,
  pub quick_tip_error: &'static str,
  pub assistant_error: &'static str,
  pub image_limit_error: &'static str,
  pub invalid_image: &'static str,
  pub feedback_error: &'static str,
  pub feedback_success: &'static str,
  pub share_title: &'static str,
  pub invalid_measurement: &'static str,
  pub feedback_too_short: &'static str,
  pub prompt_required: &'static str,
  pub tracker_has_no_advice: &'static str,
  age_groups: [&'static str; 6],
  topics: [&'static str; 6],
  pub chart_date: &'static str,
  pub chart_weight: &'static str,
  pub chart_height: &'static str,
  pub chart_bmi: &'static str,
}

impl Messages {
  pub fn advice_error(&self, topic_title: &str) -> String {
    self.advice_error.replace("{topic}", topic_title)
  }

  pub fn age_group_label(&self, group: AgeGroup) -> &'static str {
    let index = AgeGroup::ALL.iter().position(|g| *g == group).unwrap_or(0);
    self.age_groups[index]
  }

  pub fn topic_title(&self, topic: Topic) -> &'static str {
    let index = Topic::ALL.iter().position(|t| *t == topic).unwrap_or(0);
    self.topics[index]
  }
}

// Form-validation strings were English-only in the browser build; the other
// languages reuse them until translations exist.
const INVALID_MEASUREMENT: &str = "Please enter valid weight and height.";
const FEEDBACK_TOO_SHORT: &str = "Please enter a message of at least 10 characters.";
const PROMPT_REQUIRED: &str = "Please describe your question first.";
const TRACKER_HAS_NO_ADVICE: &str = "The health tracker does not generate topical advice.";

static EN: Messages = Messages {
  advice_error: "Failed to generate advice for {topic}. Please try again.",
  bmi_error: "Failed to generate BMI advice. Please try again.",
  quick_tip_error: "Failed to get a quick tip. Please try again.",
  assistant_error: "Sorry, I couldn't generate a response. Please try again.",
  image_limit_error: "You can upload a maximum of 3 images.",
  invalid_image: "Please attach images only.",
  feedback_error: "Something went wrong. Please try again.",
  feedback_success: "Your feedback has been received. We appreciate your input!",
  share_title: "Parenting Tip from AiParent",
  invalid_measurement: INVALID_MEASUREMENT,
  feedback_too_short: FEEDBACK_TOO_SHORT,
  prompt_required: PROMPT_REQUIRED,
  tracker_has_no_advice: TRACKER_HAS_NO_ADVICE,
  age_groups: ["0-1 Yr", "1-3 Yrs", "3-5 Yrs", "6-8 Yrs", "9-12 Yrs", "13-16+ Yrs"],
  topics: [
    "Health & Daily Care",
    "Food & Nutrition",
    "Learning & Education",
    "Behavior & Social Skills",
    "Games & Activities",
    "BMI & Health Tracker",
  ],
  chart_date: "Date",
  chart_weight: "Weight",
  chart_height: "Height",
  chart_bmi: "BMI",
};

static MY: Messages = Messages {
  advice_error: "{topic} အတွက် အကြံဉာဏ်ထုတ်ရန် ပျက်ကွက်ပါသည်။",
  bmi_error: "BMI အကြံဉာဏ်ထုတ်ရန် ပျက်ကွက်ပါသည်။",
  quick_tip_error: "အကြံပြုချက် ရယူရန် ပျက်ကွက်ပါသည်။ ထပ်ကြိုးစားကြည့်ပါ။",
  assistant_error: "တောင်းပန်ပါသည်။ တုံ့ပြန်မှုတစ်ခု ထုတ်လုပ်နိုင်ခြင်းမရှိပါ။ ထပ်ကြိုးစားကြည့်ပါ။",
  image_limit_error: "သင်သည် အများဆုံး ပုံ ၃ ပုံသာ တင်နိုင်ပါသည်။",
  invalid_image: "ကျေးဇူးပြု၍ ပုံများကိုသာ ပူးတွဲပါ။",
  feedback_error: "တစ်ခုခုမှားယွင်းသွားသည်။ ထပ်ကြိုးစားကြည့်ပါ။",
  feedback_success: "Your feedback has been received. We appreciate your input!",
  share_title: "AiParent မှ မိဘအုပ်ထိန်းမှုဆိုင်ရာ အကြံပြုချက်",
  invalid_measurement: INVALID_MEASUREMENT,
  feedback_too_short: FEEDBACK_TOO_SHORT,
  prompt_required: PROMPT_REQUIRED,
  tracker_has_no_advice: TRACKER_HAS_NO_ADVICE,
  age_groups: ["၀-၁ နှစ်", "၁-၃ နှစ်", "၃-၅ နှစ်", "၆-၈ နှစ်", "၉-၁၂ နှစ်", "၁၃-၁၆+ နှစ်"],
  topics: [
    "ကျန်းမာရေးနှင့်နေ့စဉ်စောင့်ရှောက်မှု",
    "အစားအစာနှင့်အာဟာရ",
    "သင်ယူခြင်းနှင့်ပညာရေး",
    "အမူအကျင့်နှင့်လူမှုရေးကျွမ်းကျင်မှု",
    "ဂိမ်းများနှင့် လှုပ်ရှားမှုများ",
    "BMI နှင့် ကျန်းမာရေးမှတ်တမ်း",
  ],
  chart_date: "Date",
  chart_weight: "ကိုယ်အလေးချိန်",
  chart_height: "အရပ်",
  chart_bmi: "BMI",
};

static ZH: Messages = Messages {
  advice_error: "未能为 {topic} 生成建议，请重试。",
  bmi_error: "未能生成BMI建议，请重试。",
  quick_tip_error: "获取快速问答失败，请重试。",
  assistant_error: "抱歉，无法生成回应。请再试一次。",
  image_limit_error: "您最多只能上传3张图片。",
  invalid_image: "请只上传图片。",
  feedback_error: "出了点问题。请再试一次。",
  feedback_success: "Your feedback has been received. We appreciate your input!",
  share_title: "来自 AiParent 的育儿技巧",
  invalid_measurement: INVALID_MEASUREMENT,
  feedback_too_short: FEEDBACK_TOO_SHORT,
  prompt_required: PROMPT_REQUIRED,
  tracker_has_no_advice: TRACKER_HAS_NO_ADVICE,
  age_groups: ["0-1 岁", "1-3 岁", "3-5 岁", "6-8 岁", "9-12 岁", "13-16+ 岁"],
  topics: [
    "健康与日常护理",
    "食品与营养",
    "学习与教育",
    "行为与社交技能",
    "游戏与活动",
    "BMI与健康追踪器",
  ],
  chart_date: "Date",
  chart_weight: "Weight",
  chart_height: "Height",
  chart_bmi: "BMI",
};

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_language_codes() {
    assert_eq!("zh".parse::<Language>(), Ok(Language::Chinese));
    assert!("fr".parse::<Language>().is_err());
  }

  #[test]
  fn test_advice_error_substitutes_topic() {
    let msg = Language::English.messages().advice_error("Food & Nutrition");
    assert_eq!(msg, "Failed to generate advice for Food & Nutrition. Please try again.");

    let zh = Language::Chinese.messages();
    assert!(zh.advice_error(zh.topic_title(Topic::Food)).contains("食品与营养"));
  }

  #[test]
  fn test_every_language_labels_every_group_and_topic() {
    for lang in Language::ALL {
      let messages = lang.messages();
      for group in AgeGroup::ALL {
        assert!(!messages.age_group_label(group).is_empty());
      }
      for topic in Topic::ALL {
        assert!(!messages.topic_title(topic).is_empty());
      }
    }
  }

  #[test]
  fn test_serde_uses_code() {
    assert_eq!(serde_json::to_string(&Language::Burmese).unwrap(), r#""my""#);
  }
}
