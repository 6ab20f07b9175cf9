//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::utils::url::normalize_server_url;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Feed endpoint and TLS settings
    #[serde(default)]
    pub connector: ConnectorConfig,

    /// Ingestion forwarder settings
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        self.connector.validate()?;
        if self.ingest.batch_size == 0 {
            return Err(AppError::validation("ingest.batch_size must be > 0"));
        }
        if let Some(dir) = &self.ingest.output_dir {
            if dir.as_os_str().is_empty() {
                return Err(AppError::validation("ingest.output_dir is empty"));
            }
        }
        Ok(())
    }
}

/// TLS verification policy for the feed request.
///
/// Deserializes from either a boolean or a path to a PEM CA bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VerifySsl {
    Enabled(bool),
    CaBundle(PathBuf),
}

impl Default for VerifySsl {
    fn default() -> Self {
        VerifySsl::Enabled(true)
    }
}

/// Connection settings for the feed server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Feed server address; a scheme is added when missing
    #[serde(default = "defaults::server_url")]
    pub server_url: String,

    /// Certificate verification; unset means verify
    #[serde(default)]
    pub verify_ssl: Option<VerifySsl>,

    /// Request timeout in seconds; unset leaves the transport default
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// User-facing error messages
    #[serde(default)]
    pub messages: ErrorMessages,
}

impl ConnectorConfig {
    /// Build a connector config for the given server with defaults elsewhere.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Self::default()
        }
    }

    /// Effective TLS policy.
    pub fn verify_ssl(&self) -> VerifySsl {
        self.verify_ssl.clone().unwrap_or_default()
    }

    /// Server URL with scheme and without surrounding slashes.
    pub fn base_url(&self) -> String {
        normalize_server_url(&self.server_url)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server_url.trim().is_empty() {
            return Err(AppError::validation("connector.server_url is empty"));
        }
        let parsed = url::Url::parse(&self.base_url())?;
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(AppError::validation(format!(
                "connector.server_url has no host: {}",
                self.server_url
            )));
        }
        if self.timeout_secs == Some(0) {
            return Err(AppError::validation(
                "connector.timeout_secs must be > 0",
            ));
        }
        if let VerifySsl::CaBundle(path) = self.verify_ssl() {
            if !path.exists() {
                return Err(AppError::validation(format!(
                    "connector.verify_ssl CA bundle not found: {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            server_url: defaults::server_url(),
            verify_ssl: None,
            timeout_secs: None,
            messages: ErrorMessages::default(),
        }
    }
}

/// Ingestion forwarder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Directory for batch files; the forwarder is unavailable when unset
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Indicators per forwarded batch
    #[serde(default = "defaults::batch_size")]
    pub batch_size: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            batch_size: defaults::batch_size(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

/// User-facing error message strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessages {
    #[serde(default = "defaults::err_invalid_credentials")]
    pub invalid_credentials: String,
    #[serde(default = "defaults::err_rate_limited")]
    pub rate_limited: String,
    #[serde(default = "defaults::err_invalid_token")]
    pub invalid_token: String,
    #[serde(default = "defaults::err_ssl_error")]
    pub ssl_error: String,
    #[serde(default = "defaults::err_time_out")]
    pub time_out: String,
}

impl Default for ErrorMessages {
    fn default() -> Self {
        Self {
            invalid_credentials: defaults::err_invalid_credentials(),
            rate_limited: defaults::err_rate_limited(),
            invalid_token: defaults::err_invalid_token(),
            ssl_error: defaults::err_ssl_error(),
            time_out: defaults::err_time_out(),
        }
    }
}

mod defaults {
    // Connector defaults
    pub fn server_url() -> String {
        "https://talosintelligence.com".into()
    }

    // Ingest defaults
    pub fn batch_size() -> usize {
        1000
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }

    // Error defaults
    pub fn err_invalid_credentials() -> String {
        "Authentication failed due to invalid credentials".into()
    }
    pub fn err_rate_limited() -> String {
        "Rate limit was exceeded".into()
    }
    pub fn err_invalid_token() -> String {
        "Token is invalid or expired".into()
    }
    pub fn err_ssl_error() -> String {
        "SSL certificate validation failed".into()
    }
    pub fn err_time_out() -> String {
        "The request timed out while trying to connect to the remote server".into()
    }
}
