//! OpenAI-compatible client implementation.
//!
//! Issues one POST per fetch cycle and classifies the outcome for the retry
//! policy: transport errors and timeouts are transient, a 401 is terminal,
//! any other non-200 is logged with its body and retried.

use std::time::Duration;

use async_trait::async_trait;
use chatmirror_config::WidgetConfig;
use chatmirror_core::error::ClientError;
use chatmirror_core::{CompletionClient, CompletionRequest};
use tracing::{debug, warn};

use crate::response;

/// A client for OpenAI-compatible chat-completion endpoints.
pub struct OpenAiCompatClient {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatClient {
    /// Create a new client against the given completions URL.
    ///
    /// The timeout covers the whole request; the transport reports an
    /// exceeded deadline as [`ClientError::Timeout`].
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Build a client from the widget configuration.
    pub fn from_config(config: &WidgetConfig) -> Self {
        Self::new(
            config.endpoint.clone(),
            config.api_key.clone().unwrap_or_default(),
            config.time_out(),
        )
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<String, ClientError> {
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Timeout(e.to_string())
                } else {
                    ClientError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 401 {
            return Err(ClientError::Unauthorized(
                "invalid or missing API key".into(),
            ));
        }

        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            warn!(status, body = %body, "Endpoint returned error");
            return Err(ClientError::Api {
                status_code: status,
                message: body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        response::extract_message(&body)
    }

    async fn health_check(&self) -> std::result::Result<bool, ClientError> {
        // A bare completions URL rejects GET, but any HTTP answer at all
        // proves the endpoint is reachable.
        self.client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(true)
    }
}
