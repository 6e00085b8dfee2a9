use std::env;
use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

/// ---------------------------------------------------------------------------
/// Defaults
/// ---------------------------------------------------------------------------

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_LITE_MODEL: &str = "gemini-2.5-flash-lite";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_DATABASE_URL: &str = "sqlite://parent-guide.db?mode=rwc";

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("Invalid bind address {0}: {1}")]
  InvalidAddress(String, String),

  #[error("Invalid Gemini API base {0}: {1}")]
  InvalidApiBase(String, String),
}

/// Settings for the generative AI service
#[derive(Debug, Clone)]
pub struct GeminiConfig {
  /// Missing keys are tolerated at startup; AI commands then fail
  pub api_key: Option<String>,
  pub api_base: String,
  /// Advice, BMI advice and assistant replies
  pub model: String,
  /// Quick tips
  pub lite_model: String,
}

impl Default for GeminiConfig {
  fn default() -> Self {
    Self {
      api_key: None,
      api_base: DEFAULT_GEMINI_API_BASE.to_string(),
      model: DEFAULT_GEMINI_MODEL.to_string(),
      lite_model: DEFAULT_GEMINI_LITE_MODEL.to_string(),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub bind_addr: SocketAddr,
  pub database_url: String,
  pub gemini: GeminiConfig,
}

fn non_empty_var(name: &str) -> Option<String> {
  env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
  /// Read configuration from the process environment (call `dotenvy::dotenv`
  /// first to pick up a `.env` file)
  pub fn from_env() -> Result<Self, ConfigError> {
    let addr = non_empty_var("PARENT_GUIDE_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
    let bind_addr = addr.parse().map_err(|e: std::net::AddrParseError| {
      ConfigError::InvalidAddress(addr.clone(), e.to_string())
    })?;

    let api_base =
      non_empty_var("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string());
    Url::parse(&api_base)
      .map_err(|e| ConfigError::InvalidApiBase(api_base.clone(), e.to_string()))?;

    Ok(Self {
      bind_addr,
      database_url: non_empty_var("PARENT_GUIDE_DATABASE_URL")
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
      gemini: GeminiConfig {
        api_key: non_empty_var("GEMINI_API_KEY").or_else(|| non_empty_var("API_KEY")),
        api_base: api_base.trim_end_matches('/').to_string(),
        model: non_empty_var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        lite_model: non_empty_var("GEMINI_LITE_MODEL")
          .unwrap_or_else(|| DEFAULT_GEMINI_LITE_MODEL.to_string()),
      },
    })
  }
}
