//! Error types for the ChatMirror domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.
//!
//! The retry policy hangs off this taxonomy: [`ClientError::Unauthorized`] is
//! the single terminal failure, every other client error is transient and
//! retried at the fixed retry delay.

use thiserror::Error;

/// The top-level error type for all ChatMirror operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Client errors ---
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    // --- Template errors ---
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures of a single completion request, classified for the retry policy.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("API request failed: {message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Whether the fetch cycle may retry after this failure.
    ///
    /// Only a 401 stops the polling loop; hammering a bad credential is the
    /// one thing the retry policy must never do.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ClientError::Unauthorized(_))
    }
}

#[derive(Debug, Clone, Error)]
pub enum TemplateError {
    #[error("Unknown template variable: {{{{{0}}}}}")]
    UnknownVariable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_status_and_body() {
        let err = Error::Client(ClientError::Api {
            status_code: 503,
            message: "service unavailable".into(),
        });
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("service unavailable"));
    }

    #[test]
    fn unauthorized_is_terminal() {
        assert!(!ClientError::Unauthorized("bad key".into()).is_retryable());
        assert!(ClientError::Timeout("5s elapsed".into()).is_retryable());
        assert!(
            ClientError::Api {
                status_code: 500,
                message: String::new(),
            }
            .is_retryable()
        );
        assert!(ClientError::InvalidResponse("not json".into()).is_retryable());
    }

    #[test]
    fn template_error_names_the_variable() {
        let err = TemplateError::UnknownVariable("moonphase".into());
        assert!(err.to_string().contains("{{moonphase}}"));
    }
}
