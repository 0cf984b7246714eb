//! Response body parsing and validation.
//!
//! The expected shape is `{"choices": [{"message": {"content": <string>}}]}`.
//! Anything else — unparseable JSON, an empty choices list, a first choice
//! without textual content — is an invalid response. The caller treats parse
//! and schema violations identically, so both map to
//! [`ClientError::InvalidResponse`].

use chatmirror_core::error::ClientError;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    content: Option<String>,
}

/// Parse a raw response body and extract the first choice's message text.
pub fn extract_message(body: &str) -> Result<String, ClientError> {
    let response: ApiResponse = serde_json::from_str(body)
        .map_err(|e| ClientError::InvalidResponse(format!("Failed to parse response: {e}")))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ClientError::InvalidResponse("No choices in response".into()))?;

    let content = choice
        .message
        .content
        .ok_or_else(|| ClientError::InvalidResponse("First choice has no content".into()))?;

    Ok(normalize_quotes(&content).to_string())
}

/// The model sometimes likes to return a quoted string. Strip one outermost
/// matching pair of double quotes plus any whitespace padding around and
/// inside it; inner quotes survive.
fn normalize_quotes(content: &str) -> &str {
    let trimmed = content.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        return trimmed[1..trimmed.len() - 1].trim();
    }
    content
}
