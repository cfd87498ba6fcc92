//! Configuration file parser for ~/.config/palavra/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are ignored by serde, though we log a warning when the file
//! contains potential typos.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::feed::FEED_URL;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    /// A value parsed but is not usable (e.g. a non-HTTP feed URL).
    #[error("Invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP server listens on.
    pub bind_address: String,

    /// Upstream word-of-the-day feed.
    pub feed_url: String,

    /// SQLite file holding subscribers. Relative to the config directory
    /// when not absolute; `None` means `subscribers.db` there.
    pub database_path: Option<PathBuf>,

    /// Directory of static front-end files served at `/`.
    pub static_dir: Option<PathBuf>,

    /// Upstream request timeout in seconds. 0 (the default) sets none and
    /// leaves it to the transport.
    pub request_timeout_secs: u64,

    /// Fallback recipient list for the digest, one address per line.
    pub recipients_file: PathBuf,

    /// SMTP relay for digest delivery (implicit TLS).
    pub smtp_host: String,
    pub smtp_port: u16,

    /// Digest sender and SMTP login. Falls back to `EMAIL_ADDRESS`.
    pub sender_address: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8888".to_string(),
            feed_url: FEED_URL.to_string(),
            database_path: None,
            static_dir: None,
            request_timeout_secs: 0,
            recipients_file: PathBuf::from("users.txt"),
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 465,
            sender_address: None,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 9] = [
        "bind_address",
        "feed_url",
        "database_path",
        "static_dir",
        "request_timeout_secs",
        "recipients_file",
        "smtp_host",
        "smtp_port",
        "sender_address",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    /// - Unusable `feed_url` → `Err(ConfigError::Invalid)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        tracing::info!(path = %path.display(), bind = %config.bind_address, "Loaded configuration");
        Ok(config)
    }

    /// Checks values serde cannot: the feed URL must be absolute http(s).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.feed_url).map_err(|e| ConfigError::Invalid {
            key: "feed_url",
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ConfigError::Invalid {
                key: "feed_url",
                reason: format!("unsupported scheme {scheme} (only http/https allowed)"),
            }),
        }
    }

    /// Resolves the subscriber database location against `config_dir`.
    pub fn resolve_database_path(&self, config_dir: &Path) -> PathBuf {
        match &self.database_path {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => config_dir.join(p),
            None => config_dir.join("subscribers.db"),
        }
    }

    /// Builds the shared upstream HTTP client.
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        let mut builder =
            reqwest::Client::builder().user_agent(concat!("palavra/", env!("CARGO_PKG_VERSION")));
        if self.request_timeout_secs > 0 {
            builder = builder.timeout(std::time::Duration::from_secs(self.request_timeout_secs));
        }
        builder.build()
    }
}

// ============================================================================
// Tests
// ============================================================================
