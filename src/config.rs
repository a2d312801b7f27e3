//! Configuration loading and constants.
//!
//! Loads application configuration from a TOML file and defines constants for
//! default paths, logging defaults, and HTTP response headers. `AppConfig` is
//! the root configuration struct containing all settings.

use serde::Deserialize;
use std::path::Path;

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "myapp=debug,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Application name reported in API responses
pub const APP_NAME: &str = "myapp";

// =============================================================================
// HTTP Response Cache Control
// =============================================================================

/// Both endpoints write an audit row on every hit, so responses must never be
/// served from an upstream cache.
pub const CACHE_CONTROL_AUDITED: &str = "no-store";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    pub http: HttpServerConfig,
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL, e.g. "sqlite://data/myapp.db"
    pub url: String,
    /// Maximum pool connections (default: 5)
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
}

impl DatabaseConfig {
    fn default_max_connections() -> u32 {
        5
    }

    /// Human-readable backend label for the welcome response.
    ///
    /// Matches the configured URL against the substring "azure" to decide
    /// between the hosted and local label. Cosmetic only; it does not change
    /// which driver is used.
    pub fn label(&self) -> &'static str {
        if self.url.contains("azure") {
            "Azure PostgreSQL"
        } else {
            "SQLite"
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;

        if config.database.url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "database.url must not be empty".to_string(),
            ));
        }

        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
