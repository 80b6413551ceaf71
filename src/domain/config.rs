//! Application configuration.
//!
//! Contains the API and UI settings that are resolved once at startup
//! and injected into the sync component.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// GraphQL API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Full URL that both queries and mutations are POSTed to.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:8080/query".to_string()
}

const fn default_request_timeout() -> u64 {
    10
}

/// Banner behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long success/error banners stay visible, in milliseconds.
    #[serde(default = "default_status_clear_ms")]
    pub status_clear_ms: u64,

    /// Banner text shown after a successful create.
    #[serde(default = "default_success_message")]
    pub success_message: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            status_clear_ms: default_status_clear_ms(),
            success_message: default_success_message(),
        }
    }
}

const fn default_status_clear_ms() -> u64 {
    3000
}

fn default_success_message() -> String {
    "Employee added successfully!".to_string()
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// GraphQL API configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// Banner configuration.
    #[serde(default)]
    pub ui: UiConfig,
}

impl AppConfig {
    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".employee-directory")
    }

    /// Get the default config file path.
    #[must_use]
    pub fn default_config_file() -> PathBuf {
        Self::default_data_dir().join("config.toml")
    }

    /// Request timeout as a duration.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }

    /// Banner lifetime as a duration.
    #[must_use]
    pub const fn status_clear_delay(&self) -> Duration {
        Duration::from_millis(self.ui.status_clear_ms)
    }

    /// Override the endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api.endpoint = endpoint.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api.endpoint, "http://localhost:8080/query");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.status_clear_delay(), Duration::from_millis(3000));
        assert_eq!(config.ui.success_message, "Employee added successfully!");
    }

    #[test]
    fn test_default_config_file_location() {
        let path = AppConfig::default_config_file();
        assert!(path.ends_with(".employee-directory/config.toml"));
    }

    #[test]
    fn test_with_endpoint() {
        let config = AppConfig::default().with_endpoint("https://api.example.com/graphql");
        assert_eq!(config.api.endpoint, "https://api.example.com/graphql");
    }
}
