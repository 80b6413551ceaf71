//! Domain-level error types for employee-directory.
//!
//! All errors are typed with `thiserror` and provide meaningful context
//! without exposing transport internals to end users.

use thiserror::Error;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// The request never produced an HTTP response (connect, DNS, read).
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request exceeded the configured timeout.
    #[error("Request timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    /// The server returned a non-empty GraphQL `errors` array.
    #[error("GraphQL error: {}", .messages.join("; "))]
    GraphQl { messages: Vec<String> },

    /// The response body did not match the expected shape.
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// A create request is already outstanding.
    #[error("A submit is already in progress")]
    SubmitInProgress,

    /// Configuration or environment error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// JSON serialization or parsing failed.
    #[error("JSON parse error: {message}")]
    JsonParse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// IO operation failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl AppError {
    /// Create a transport error from a reqwest error.
    pub fn transport(err: reqwest::Error) -> Self {
        Self::Transport {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Create a malformed-response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a JSON parse error.
    pub fn json_parse(err: serde_json::Error) -> Self {
        Self::JsonParse {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an IO error with context.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }

    /// Whether this error came from talking to the GraphQL server.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. }
                | Self::Http { .. }
                | Self::Timeout { .. }
                | Self::GraphQl { .. }
                | Self::MalformedResponse { .. }
        )
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_error_joins_messages() {
        let err = AppError::GraphQl {
            messages: vec!["email taken".into(), "bad position".into()],
        };
        assert_eq!(err.to_string(), "GraphQL error: email taken; bad position");
    }

    #[test]
    fn test_transport_grouping() {
        assert!(AppError::Timeout { after_ms: 10 }.is_transport());
        assert!(AppError::malformed("missing data").is_transport());
        assert!(!AppError::SubmitInProgress.is_transport());
        assert!(!AppError::Config {
            message: "x".into()
        }
        .is_transport());
    }
}
