//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use std::time::Duration;
use serde::{Deserialize, Serialize};

/// Environment variable that overrides the backend base URL outright
pub const API_URL_ENV: &str = "VIP_TRANSFER_API_URL";

/// Port the backend listens on when only a host is known
pub const DEFAULT_API_PORT: u16 = 5000;

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub api: ApiConfig,
    pub polling: PollingConfig,
    pub session: SessionConfig,
    pub i18n: I18nConfig,
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub host: Option<String>,
    pub port: u16,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

/// Refresh loop configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PollingConfig {
    pub interval_ms: u64,
    pub enabled: bool,
}

/// Session persistence configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    pub storage_path: String,
    pub token_ttl_days: i64,
}

/// Internationalization configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct I18nConfig {
    pub default_language: String,
    pub supported_languages: Vec<String>,
    pub translations_dir: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: Option<String>,
}

impl Settings {
    /// Load settings from defaults, the configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("VIPTRANSFER").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::TransferError> {
        super::validation::validate_settings(self)
    }

    /// Base URL for every API request
    pub fn api_base_url(&self) -> String {
        let env_override = std::env::var(API_URL_ENV).ok();
        resolve_api_url(
            env_override.as_deref().or(self.api.base_url.as_deref()),
            self.api.host.as_deref(),
            self.api.port,
        )
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.polling.interval_ms)
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Resolve the backend base URL: explicit override, then host, then localhost
pub fn resolve_api_url(explicit: Option<&str>, host: Option<&str>, port: u16) -> String {
    if let Some(url) = explicit.map(str::trim).filter(|u| !u.is_empty()) {
        return url.trim_end_matches('/').to_string();
    }

    match host.map(str::trim).filter(|h| !h.is_empty()) {
        Some(host) => format!("http://{}:{}/api", host, port),
        None => format!("http://localhost:{}/api", DEFAULT_API_PORT),
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: None,
                host: None,
                port: DEFAULT_API_PORT,
                timeout_seconds: 30,
                user_agent: format!("vip-transfer/{}", env!("CARGO_PKG_VERSION")),
            },
            polling: PollingConfig {
                interval_ms: 5000,
                enabled: true,
            },
            session: SessionConfig {
                storage_path: ".vip-transfer/session.json".to_string(),
                token_ttl_days: 7,
            },
            i18n: I18nConfig {
                default_language: "az".to_string(),
                supported_languages: vec![
                    "az".to_string(),
                    "en".to_string(),
                    "ru".to_string(),
                    "tr".to_string(),
                ],
                translations_dir: "translations".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_url_wins() {
        assert_eq!(
            resolve_api_url(Some("https://transfers.example.com/api/"), Some("10.0.0.5"), 5000),
            "https://transfers.example.com/api"
        );
    }

    #[test]
    fn test_host_based_url() {
        assert_eq!(resolve_api_url(None, Some("10.0.0.5"), 5000), "http://10.0.0.5:5000/api");
        assert_eq!(resolve_api_url(Some("  "), Some("box"), 8080), "http://box:8080/api");
    }

    #[test]
    fn test_localhost_fallback() {
        assert_eq!(resolve_api_url(None, None, 7000), "http://localhost:5000/api");
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.polling.interval_ms, 5000);
        assert_eq!(settings.poll_interval(), Duration::from_secs(5));
        assert_eq!(settings.session.token_ttl_days, 7);
        assert_eq!(settings.i18n.default_language, "az");
    }
}
