//! Generative AI integration
//!
//! This module handles communication with the Gemini `generateContent` API for
//! topical advice, BMI assessments, quick tips and the multimodal assistant.

use crate::config::GeminiConfig;
use crate::i18n::Language;
use crate::models::AgeGroup;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;
use url::Url;

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

/// Maximum number of images attached to one assistant request
pub const MAX_ASSISTANT_IMAGES: usize = 3;

static DATA_URL: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^data:(image/[A-Za-z0-9.+\-]+);base64,([A-Za-z0-9+/=\s]+)$")
    .expect("data url pattern")
});

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum GeminiError {
  #[error("API key not configured")]
  MissingApiKey,

  #[error("Request failed: {0}")]
  Request(String),

  #[error("API error: {0}")]
  Api(String),

  #[error("Parse error: {0}")]
  Parse(String),

  #[error("Invalid image: {0}")]
  InvalidImage(String),

  #[error("Too many images: {0} (max 3)")]
  TooManyImages(usize),
}

/// ---------------------------------------------------------------------------
/// Gemini API Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
  contents: Vec<Content>,
  #[serde(skip_serializing_if = "Option::is_none")]
  system_instruction: Option<Content>,
  #[serde(skip_serializing_if = "Option::is_none")]
  generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
  #[serde(skip_serializing_if = "Option::is_none")]
  role: Option<String>,
  #[serde(default)]
  parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Part {
  Text {
    text: String,
    /// Set on reasoning summaries, which are not part of the answer
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    thought: bool,
  },
  InlineData {
    #[serde(rename = "inlineData")]
    inline_data: InlineImage,
  },
  /// Anything else the API may return (function calls, executable code)
  Other(serde_json::Value),
}

impl Part {
  fn text(text: impl Into<String>) -> Self {
    Part::Text {
      text: text.into(),
      thought: false,
    }
  }
}

/// An image sent inline with a prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
  pub mime_type: String,
  /// Base64 payload, without the `data:` prefix
  pub data: String,
}

impl InlineImage {
  /// Parse a `data:image/<type>;base64,<payload>` URL as produced by a
  /// browser `FileReader`
  pub fn from_data_url(url: &str) -> Result<Self, GeminiError> {
    let caps = DATA_URL
      .captures(url.trim())
      .ok_or_else(|| GeminiError::InvalidImage("expected a base64 image data URL".to_string()))?;

    Ok(Self {
      mime_type: caps[1].to_string(),
      data: caps[2].split_whitespace().collect(),
    })
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
  response_mime_type: String,
  response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
  usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
  content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
  #[serde(default)]
  pub prompt_token_count: u32,
  #[serde(default)]
  pub candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
  error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
  message: String,
}

/// ---------------------------------------------------------------------------
/// Structured Responses
/// ---------------------------------------------------------------------------

/// A common parenting question with a short answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickTip {
  pub question: String,
  pub answer: String,
}

/// ---------------------------------------------------------------------------
/// Prompts
/// ---------------------------------------------------------------------------

const ADVICE_PROMPT: &str = include_str!("prompts/advice.txt");
const BMI_ADVICE_PROMPT: &str = include_str!("prompts/bmi_advice.txt");
const QUICK_TIP_PROMPT: &str = include_str!("prompts/quick_tip.txt");
const ASSISTANT_SYSTEM_PROMPT: &str = include_str!("prompts/assistant_system.txt");

/// Substitute `{name}` placeholders
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
  values.iter().fold(template.to_string(), |acc, (key, value)| {
    acc.replace(&format!("{{{}}}", key), value)
  })
}

fn quick_tip_schema(language: Language) -> serde_json::Value {
  let name = language.prompt_name();
  serde_json::json!({
    "type": "OBJECT",
    "properties": {
      "question": {
        "type": "STRING",
        "description": format!("A common parenting question in {}.", name)
      },
      "answer": {
        "type": "STRING",
        "description": format!("A concise, helpful answer to the question in {}.", name)
      }
    },
    "required": ["question", "answer"]
  })
}

/// ---------------------------------------------------------------------------
/// Gemini Client
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct GeminiClient {
  client: Client,
  api_key: String,
  api_base: String,
  model: String,
  lite_model: String,
}

impl GeminiClient {
  pub fn from_config(config: &GeminiConfig) -> Result<Self, GeminiError> {
    let api_key = config.api_key.clone().ok_or(GeminiError::MissingApiKey)?;

    Ok(Self {
      client: Client::new(),
      api_key,
      api_base: config.api_base.trim_end_matches('/').to_string(),
      model: config.model.clone(),
      lite_model: config.lite_model.clone(),
    })
  }

  fn endpoint(&self, model: &str) -> Result<Url, GeminiError> {
    Url::parse(&format!("{}/models/{}:generateContent", self.api_base, model))
      .map_err(|e| GeminiError::Request(e.to_string()))
  }

  /// Call `generateContent` and return the text of the first candidate
  async fn generate(
    &self,
    model: &str,
    request: &GenerateContentRequest,
  ) -> Result<String, GeminiError> {
    let response = self
      .client
      .post(self.endpoint(model)?)
      .header("x-goog-api-key", &self.api_key)
      .header("content-type", "application/json")
      .json(request)
      .send()
      .await
      .map_err(|e| GeminiError::Request(e.to_string()))?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| GeminiError::Request(e.to_string()))?;

    if !status.is_success() {
      if let Ok(error_resp) = serde_json::from_str::<GeminiErrorResponse>(&body) {
        return Err(GeminiError::Api(error_resp.error.message));
      }
      return Err(GeminiError::Api(format!("HTTP {}: {}", status, body)));
    }

    let parsed: GenerateContentResponse =
      serde_json::from_str(&body).map_err(|e| GeminiError::Parse(e.to_string()))?;

    if let Some(usage) = &parsed.usage_metadata {
      tracing::debug!(
        model,
        prompt_tokens = usage.prompt_token_count,
        output_tokens = usage.candidates_token_count,
        "Gemini call completed"
      );
    }

    let text: String = parsed
      .candidates
      .into_iter()
      .next()
      .and_then(|c| c.content)
      .map(|content| {
        content
          .parts
          .into_iter()
          .filter_map(|part| match part {
            Part::Text { text, thought: false } => Some(text),
            _ => None,
          })
          .collect()
      })
      .unwrap_or_default();

    if text.trim().is_empty() {
      return Err(GeminiError::Parse("No text content in response".to_string()));
    }
    Ok(text)
  }

  fn text_request(prompt: String) -> GenerateContentRequest {
    GenerateContentRequest {
      contents: vec![Content {
        role: Some("user".to_string()),
        parts: vec![Part::text(prompt)],
      }],
      system_instruction: None,
      generation_config: None,
    }
  }

  /// Tagged topical advice (`[INTRODUCTION]`, category tips, `[CLOSING]`)
  pub async fn get_advice(
    &self,
    age_group: AgeGroup,
    topic_title: &str,
    language: Language,
  ) -> Result<String, GeminiError> {
    let prompt = fill_template(
      ADVICE_PROMPT,
      &[
        ("age_group", age_group.label()),
        ("topic", topic_title),
        ("language", language.prompt_name()),
      ],
    );
    self.generate(&self.model, &Self::text_request(prompt)).await
  }

  /// Tagged growth assessment (`[ASSESSMENT]`, tips, `[DISCLAIMER]`)
  pub async fn get_bmi_advice(
    &self,
    age_group: AgeGroup,
    weight: f64,
    height: f64,
    bmi: f64,
    language: Language,
  ) -> Result<String, GeminiError> {
    let prompt = fill_template(
      BMI_ADVICE_PROMPT,
      &[
        ("age_group", age_group.label()),
        ("weight", &weight.to_string()),
        ("height", &height.to_string()),
        ("bmi", &bmi.to_string()),
        ("language", language.prompt_name()),
      ],
    );
    self.generate(&self.model, &Self::text_request(prompt)).await
  }

  /// Question/answer pair constrained to a JSON schema
  pub async fn get_quick_tip(
    &self,
    age_group: AgeGroup,
    language: Language,
  ) -> Result<QuickTip, GeminiError> {
    let prompt = fill_template(
      QUICK_TIP_PROMPT,
      &[("age_group", age_group.label()), ("language", language.prompt_name())],
    );
    let mut request = Self::text_request(prompt);
    request.generation_config = Some(GenerationConfig {
      response_mime_type: "application/json".to_string(),
      response_schema: quick_tip_schema(language),
    });

    let text = self.generate(&self.lite_model, &request).await?;
    let json_str = extract_json(&text)?;
    serde_json::from_str(&json_str).map_err(|e| GeminiError::Parse(format!("{}: {}", e, json_str)))
  }

  /// Free-form markdown guidance for a prompt plus optional images
  pub async fn get_assistant_response(
    &self,
    prompt: &str,
    images: Vec<InlineImage>,
    language: Language,
  ) -> Result<String, GeminiError> {
    if images.len() > MAX_ASSISTANT_IMAGES {
      return Err(GeminiError::TooManyImages(images.len()));
    }

    let mut parts = vec![Part::text(prompt)];
    parts.extend(images.into_iter().map(|inline_data| Part::InlineData { inline_data }));

    let request = GenerateContentRequest {
      contents: vec![Content {
        role: Some("user".to_string()),
        parts,
      }],
      system_instruction: Some(Content {
        role: None,
        parts: vec![Part::text(fill_template(
          ASSISTANT_SYSTEM_PROMPT,
          &[("language", language.prompt_name())],
        ))],
      }),
      generation_config: None,
    };

    self.generate(&self.model, &request).await
  }
}

/// Extract JSON from a model response (handles markdown code blocks)
fn extract_json(text: &str) -> Result<String, GeminiError> {
  if text.trim().starts_with('{') {
    return Ok(text.trim().to_string());
  }

  if let Some(start) = text.find("```json") {
    let start = start + 7;
    if let Some(end) = text[start..].find("```") {
      return Ok(text[start..start + end].trim().to_string());
    }
  }

  if let Some(start) = text.find("```") {
    let start = start + 3;
    // Skip language identifier if present
    let content_start = text[start..]
      .find('\n')
      .map(|i| start + i + 1)
      .unwrap_or(start);
    if let Some(end) = text[content_start..].find("```") {
      return Ok(text[content_start..content_start + end].trim().to_string());
    }
  }

  if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
    if start < end {
      return Ok(text[start..=end].to_string());
    }
  }

  Err(GeminiError::Parse("Could not extract JSON from response".to_string()))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
