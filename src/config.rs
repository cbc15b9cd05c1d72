//! Client configuration parsed from environment variables.
//!
//! The base URL and endpoint path are deployment details. The proxy has
//! shipped under both `/chat/` and `/anthropic/`, so the chat path is
//! configurable alongside the base URL.

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/core";
pub const DEFAULT_CHAT_PATH: &str = "/chat/";
pub const HEALTH_PATH: &str = "/health/";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaslanConfig {
    pub base_url: String,
    pub chat_path: String,
    pub model: String,
    pub max_tokens: u32,
}

impl Default for RaslanConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_owned(),
            chat_path: DEFAULT_CHAT_PATH.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl RaslanConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `RASLAN_API_URL`: proxy base URL, default `http://localhost:8000/api/core`
    /// - `RASLAN_CHAT_PATH`: chat endpoint path, default `/chat/`
    /// - `RASLAN_MODEL`: model identifier forwarded to the provider
    /// - `RASLAN_MAX_TOKENS`: default 1024
    ///
    /// # Errors
    ///
    /// Returns an error if `RASLAN_MAX_TOKENS` is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("RASLAN_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_owned());
        let chat_path = std::env::var("RASLAN_CHAT_PATH").unwrap_or_else(|_| DEFAULT_CHAT_PATH.to_owned());
        let model = std::env::var("RASLAN_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_owned());
        let max_tokens = match std::env::var("RASLAN_MAX_TOKENS") {
            Ok(raw) => parse_max_tokens(&raw)?,
            Err(_) => DEFAULT_MAX_TOKENS,
        };

        Ok(Self::new(base_url, chat_path, model, max_tokens))
    }

    /// Build a config from explicit values, normalizing the URL parts.
    #[must_use]
    pub fn new(base_url: String, chat_path: String, model: String, max_tokens: u32) -> Self {
        Self {
            base_url: normalize_base_url(&base_url),
            chat_path: normalize_path(&chat_path),
            model,
            max_tokens,
        }
    }

    #[must_use]
    pub fn health_url(&self) -> String {
        format!("{}{HEALTH_PATH}", self.base_url)
    }

    #[must_use]
    pub fn chat_url(&self) -> String {
        format!("{}{}", self.base_url, self.chat_path)
    }
}

/// Parse a max-tokens override. Zero is rejected because the provider does.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for non-numeric or zero input.
pub fn parse_max_tokens(raw: &str) -> Result<u32, ConfigError> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidValue { var: "RASLAN_MAX_TOKENS", value: raw.to_owned() }),
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('/') { trimmed.to_owned() } else { format!("/{trimmed}") }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
