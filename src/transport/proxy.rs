//! Backend proxy client.
//!
//! Thin HTTP wrapper over the proxy's `/health/` and chat endpoints. The
//! proxy forwards chat bodies to the model provider unchanged and relays its
//! response, so replies arrive in the provider's `content` block shape.
//! Pure parsing lives in `parse_chat_reply` and `parse_health` for
//! testability.

use tracing::debug;

use super::types::{ChatReply, ChatRequest, ChatTransport, HealthStatus, TransportError};
use crate::config::RaslanConfig;

// =============================================================================
// CLIENT
// =============================================================================

pub struct ProxyClient {
    http: reqwest::Client,
    health_url: String,
    chat_url: String,
}

impl ProxyClient {
    /// Build a client for the proxy described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &RaslanConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, health_url: config.health_url(), chat_url: config.chat_url() })
    }

    #[must_use]
    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }
}

#[async_trait::async_trait]
impl ChatTransport for ProxyClient {
    async fn check_health(&self) -> Result<HealthStatus, TransportError> {
        let response = self
            .http
            .get(&self.health_url)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status { status: status.as_u16(), body: None });
        }

        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        parse_health(&text)
    }

    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, TransportError> {
        debug!(url = %self.chat_url, turns = request.messages.len(), "sending chat request");

        let response = self
            .http
            .post(&self.chat_url)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        // Body text is best-effort on failure; the status alone still reports.
        let text = response.text().await;

        if !status.is_success() {
            return Err(TransportError::Status { status: status.as_u16(), body: text.ok() });
        }

        let text = text.map_err(|e| TransportError::Request(e.to_string()))?;
        parse_chat_reply(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Deserialize)]
struct ApiResponse {
    #[serde(default)]
    content: Vec<ApiContentBlock>,
}

#[derive(serde::Deserialize)]
struct ApiContentBlock {
    #[serde(default)]
    text: Option<String>,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_chat_reply(json: &str) -> Result<ChatReply, TransportError> {
    let api: ApiResponse = serde_json::from_str(json).map_err(|e| TransportError::Parse(e.to_string()))?;

    api.content
        .into_iter()
        .next()
        .and_then(|block| block.text)
        .map(|content| ChatReply { content })
        .ok_or(TransportError::EmptyReply)
}

fn parse_health(json: &str) -> Result<HealthStatus, TransportError> {
    serde_json::from_str(json).map_err(|e| TransportError::Parse(e.to_string()))
}

#[cfg(test)]
#[path = "proxy_test.rs"]
mod tests;
