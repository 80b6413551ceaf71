//! GraphQL transport over HTTP.
//!
//! Every operation is a JSON `POST` of `{ query, variables? }` to a single
//! configured endpoint. The transport returns the decoded response body;
//! interpreting `data`/`errors` is left to the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;

use crate::domain::{ApiConfig, AppError, Result};

/// Something that can execute a GraphQL document.
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    /// Send `document` with optional `variables` and return the response body.
    ///
    /// # Errors
    /// Returns a transport-class [`AppError`] on network failure, non-2xx
    /// status or an undecodable body.
    async fn execute(&self, document: &str, variables: Option<Value>) -> Result<Value>;
}

/// Wire body for a GraphQL-over-HTTP request.
#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<Value>,
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpTransport {
    /// Build a transport for the configured endpoint.
    ///
    /// # Errors
    /// Returns error if the endpoint is not a valid URL or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| AppError::Config {
            message: format!("Invalid API endpoint '{}': {e}", config.endpoint),
        })?;

        let timeout = Duration::from_secs(config.request_timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AppError::transport)?;

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    fn classify(&self, err: reqwest::Error) -> AppError {
        if err.is_timeout() {
            tracing::warn!(endpoint = %self.endpoint, "GraphQL request timed out");
            AppError::Timeout {
                after_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            tracing::warn!(endpoint = %self.endpoint, error = %err, "GraphQL request failed");
            AppError::transport(err)
        }
    }

    /// The URL every request is sent to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl GraphqlTransport for HttpTransport {
    async fn execute(&self, document: &str, variables: Option<Value>) -> Result<Value> {
        let body = GraphqlRequest {
            query: document,
            variables,
        };

        tracing::debug!(endpoint = %self.endpoint, "POST GraphQL document");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "GraphQL endpoint returned an error status");
            return Err(AppError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| AppError::malformed(format!("response body is not JSON: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_omits_missing_variables() {
        let body = GraphqlRequest {
            query: "query { employees { id } }",
            variables: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"query":"query { employees { id } }"}"#);
    }

    #[test]
    fn test_request_includes_variables() {
        let body = GraphqlRequest {
            query: "mutation",
            variables: Some(serde_json::json!({"input": {"name": "Ada"}})),
        };
        let json: Value = serde_json::to_value(&body).unwrap();
        assert_eq!(json["variables"]["input"]["name"], "Ada");
    }

    #[test]
    fn test_endpoint_used_verbatim() {
        let config = ApiConfig {
            endpoint: "http://localhost:4000/query".into(),
            request_timeout_secs: 5,
        };
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.endpoint().as_str(), "http://localhost:4000/query");
    }

    #[test]
    fn test_invalid_endpoint_is_config_error() {
        let config = ApiConfig {
            endpoint: "not a url".into(),
            request_timeout_secs: 5,
        };
        assert!(matches!(
            HttpTransport::new(&config),
            Err(AppError::Config { .. })
        ));
    }
}
