//! CompletionClient trait — the abstraction over the chat-completion transport.
//!
//! A client knows how to send one assembled conversation to an
//! OpenAI-compatible `/chat/completions` endpoint and hand back the extracted
//! message text. The widget runtime calls `complete()` without knowing which
//! transport is behind it, which is also what makes the poll loop testable
//! with scripted mocks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::message::ChatMessage;

/// The wire payload of a single completion request:
/// `{ "model": <string>, "messages": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model to use (e.g., "gpt-3.5-turbo")
    pub model: String,

    /// The assembled conversation messages
    pub messages: Vec<ChatMessage>,
}

/// The core transport trait.
///
/// One fetch cycle issues exactly one `complete()` call; the call itself is
/// the sole suspension point of the cycle. Implementations must enforce the
/// configured request timeout and signal it as [`ClientError::Timeout`].
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// A human-readable name for this client (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a request and return the validated, quote-normalized message text.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<String, ClientError>;

    /// Health check — can we reach the endpoint?
    async fn health_check(&self) -> std::result::Result<bool, ClientError> {
        Ok(true)
    }
}
