//! Transport types: chat turns, proxy request/response shapes, and errors.

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by proxy calls. The only error kind that crosses the
/// transport boundary.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The proxy returned a non-success HTTP status.
    #[error("HTTP {status}{}", body_suffix(.body))]
    Status { status: u16, body: Option<String> },

    /// The response body could not be deserialized.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The chat response carried no text content.
    #[error("empty reply from model")]
    EmptyReply,

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

#[allow(clippy::ref_option)]
fn body_suffix(body: &Option<String>) -> String {
    match body.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => format!(": {text}"),
        _ => String::new(),
    }
}

// =============================================================================
// MESSAGES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

// =============================================================================
// REQUEST / RESPONSE
// =============================================================================

/// Body of the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<Message>,
}

/// Assistant text extracted from a chat response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub content: String,
}

/// Liveness response. `status` is opaque text for display.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

// =============================================================================
// TRANSPORT TRAIT
// =============================================================================

/// Async seam over the backend proxy. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    /// Query the proxy liveness endpoint.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] on network failure or non-success status.
    async fn check_health(&self) -> Result<HealthStatus, TransportError>;

    /// Send the ordered turn history and return the assistant reply.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] on network failure, non-success status,
    /// or a response without text content.
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, TransportError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
