//! Configuration management for the FraudGuard client
//!
//! This module handles loading and validating configuration from environment variables
//! and TOML files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// API connection configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Session and navigation configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every request path is appended to
    pub base_url: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// User agent string
    pub user_agent: String,

    /// Keep session cookies between requests
    pub enable_cookies: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            request_timeout_secs: 30,
            user_agent: format!("fraudguard/{}", env!("CARGO_PKG_VERSION")),
            enable_cookies: true,
        }
    }
}

/// Session and navigation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Route the user is sent to when the session cannot be refreshed
    pub login_path: String,

    /// Routes where a 401 is expected and never triggers a refresh
    pub public_routes: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            login_path: String::from("/auth"),
            public_routes: vec![String::from("/"), String::from("/auth")],
        }
    }
}

impl SessionConfig {
    /// Exact match against the configured public routes
    pub fn is_public_route(&self, route: &str) -> bool {
        self.public_routes.iter().any(|r| r == route)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let base_url = std::env::var("FRAUDGUARD_API_URL").unwrap_or(defaults.api.base_url);

        let request_timeout_secs = std::env::var("FRAUDGUARD_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.api.request_timeout_secs);

        let user_agent = std::env::var("FRAUDGUARD_USER_AGENT").unwrap_or(defaults.api.user_agent);

        let login_path =
            std::env::var("FRAUDGUARD_LOGIN_PATH").unwrap_or(defaults.session.login_path);

        let level = std::env::var("FRAUDGUARD_LOG_LEVEL").unwrap_or(defaults.logging.level);

        let format = std::env::var("FRAUDGUARD_LOG_FORMAT").unwrap_or(defaults.logging.format);

        Ok(Self {
            api: ApiConfig {
                base_url,
                request_timeout_secs,
                user_agent,
                enable_cookies: true,
            },
            session: SessionConfig {
                login_path,
                public_routes: defaults.session.public_routes,
            },
            logging: LoggingConfig { level, format },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid base_url: {}", self.api.base_url))?;

        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("base_url must use http or https, got {}", url.scheme());
        }

        if self.api.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if !self.session.login_path.starts_with('/') {
            anyhow::bail!("login_path must start with '/'");
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!("log format must be 'text' or 'json'");
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }
}
