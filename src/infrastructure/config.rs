//! Configuration file management.
//!
//! Handles loading and saving TOML configuration files, and layering
//! environment and command-line overrides on top.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppConfig, AppError, Result};

/// Environment variables that override the API endpoint, in priority order.
pub const ENDPOINT_ENV_VARS: [&str; 2] = ["EMPLOYEE_API_URL", "VITE_API_URL"];

/// Default configuration file content.
const DEFAULT_CONFIG: &str = r#"# Employee Directory Configuration
# Auto-generated - edit as needed

[api]
# GraphQL endpoint. Queries and mutations are both POSTed to this exact URL.
# Overridden by EMPLOYEE_API_URL or --endpoint.
endpoint = "http://localhost:8080/query"

# Per-request timeout in seconds (default: 10)
request_timeout_secs = 10

[ui]
# How long success/error banners stay visible, in milliseconds (default: 3000)
status_clear_ms = 3000

# Banner shown after an employee is created
success_message = "Employee added successfully!"
"#;

/// Load configuration from file or fall back to defaults.
///
/// # Errors
/// Returns error if file exists but cannot be read or parsed.
pub fn load_config() -> Result<AppConfig> {
    let config_path = config_file_path();

    if config_path.exists() {
        load_config_from_file(&config_path)
    } else {
        Ok(AppConfig::default())
    }
}

/// Load configuration from a specific file.
///
/// # Errors
/// Returns error if file cannot be read or parsed.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read config file: {}", path.display()), e))?;

    toml::from_str(&content).map_err(|e| AppError::Config {
        message: format!("Failed to parse config file: {e}"),
    })
}

/// Resolve the effective configuration: defaults, then the config file
/// (`path` or the default location), then environment, then `endpoint`.
///
/// # Errors
/// Returns error if the config file exists but is invalid.
pub fn resolve_config(path: Option<&Path>, endpoint: Option<&str>) -> Result<AppConfig> {
    let config = match path {
        Some(path) if path.exists() => load_config_from_file(path)?,
        Some(path) => {
            tracing::warn!(path = %path.display(), "Config file not found, using defaults");
            AppConfig::default()
        }
        None => load_config()?,
    };

    let config = apply_env_overrides(config, |key| std::env::var(key).ok());

    Ok(match endpoint {
        Some(endpoint) => config.with_endpoint(endpoint),
        None => config,
    })
}

/// Apply endpoint overrides from the environment.
///
/// `lookup` is the variable source; the first non-blank variable in
/// [`ENDPOINT_ENV_VARS`] wins.
pub fn apply_env_overrides(
    config: AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> AppConfig {
    let found = ENDPOINT_ENV_VARS.iter().find_map(|key| {
        lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(|v| (*key, v))
    });

    match found {
        Some((key, endpoint)) => {
            tracing::debug!(var = key, endpoint = %endpoint, "Endpoint overridden from environment");
            config.with_endpoint(endpoint)
        }
        None => config,
    }
}

/// Save configuration to `config_path`.
///
/// # Errors
/// Returns error if file cannot be written.
pub fn save_config(config_path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::io("Failed to create config directory", e))?;
    }

    let content = toml::to_string_pretty(config).map_err(|e| AppError::Config {
        message: format!("Failed to serialize config: {e}"),
    })?;

    fs::write(config_path, content).map_err(|e| {
        AppError::io(
            format!("Failed to write config file: {}", config_path.display()),
            e,
        )
    })?;

    tracing::info!(path = %config_path.display(), "Configuration saved");

    Ok(())
}

/// Create the default configuration file at `path` if it doesn't exist.
///
/// Returns `true` when a new file was written.
///
/// # Errors
/// Returns error if file cannot be created.
pub fn ensure_config_exists(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::io("Failed to create config directory", e))?;
    }

    fs::write(path, DEFAULT_CONFIG)
        .map_err(|e| AppError::io("Failed to create default config", e))?;

    tracing::info!(path = %path.display(), "Created default configuration");

    Ok(true)
}

/// Get the path to the default configuration file.
#[must_use]
pub fn config_file_path() -> PathBuf {
    AppConfig::default_config_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_parses() {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = AppConfig::default().with_endpoint("http://10.0.0.5:9000/graphql");

        save_config(&path, &config).unwrap();
        let loaded = load_config_from_file(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[ui]\nstatus_clear_ms = 500\n").unwrap();

        let loaded = load_config_from_file(&path).unwrap();

        assert_eq!(loaded.ui.status_clear_ms, 500);
        assert_eq!(loaded.api.endpoint, "http://localhost:8080/query");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api\nendpoint = ").unwrap();

        assert!(matches!(
            load_config_from_file(&path),
            Err(AppError::Config { .. })
        ));
    }

    #[test]
    fn test_env_override_priority() {
        let config = apply_env_overrides(AppConfig::default(), |key| match key {
            "EMPLOYEE_API_URL" => Some("http://primary/query".into()),
            "VITE_API_URL" => Some("http://legacy".into()),
            _ => None,
        });
        assert_eq!(config.api.endpoint, "http://primary/query");

        let config = apply_env_overrides(AppConfig::default(), |key| match key {
            "EMPLOYEE_API_URL" => Some("   ".into()),
            "VITE_API_URL" => Some("http://legacy".into()),
            _ => None,
        });
        assert_eq!(config.api.endpoint, "http://legacy");

        let config = apply_env_overrides(AppConfig::default(), |_| None);
        assert_eq!(config.api.endpoint, "http://localhost:8080/query");
    }

    #[test]
    fn test_resolve_cli_endpoint_wins() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api]\nendpoint = \"http://from-file\"\n").unwrap();

        let config = resolve_config(Some(&path), Some("http://from-cli/query")).unwrap();
        assert_eq!(config.api.endpoint, "http://from-cli/query");
    }

    #[test]
    fn test_ensure_config_exists_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert!(ensure_config_exists(&path).unwrap());
        assert!(!ensure_config_exists(&path).unwrap());
        assert!(load_config_from_file(&path).is_ok());
    }
}
