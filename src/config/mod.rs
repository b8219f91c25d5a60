//! Configuration module for walletwatch
//!
//! Provides layered configuration loading from files, environment variables,
//! and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`WALLETWATCH_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)

pub mod error;
pub mod feeds;
pub mod logging;
pub mod stream;

pub use error::ConfigError;
pub use feeds::FeedConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use stream::{Direction, Network, StreamConfig};

// Re-export ReconnectConfig from the stream layer it configures.
pub use crate::stream::ReconnectConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the walletwatch monitor.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WatchConfig {
    /// Stream endpoint settings
    pub stream: StreamConfig,
    /// Reconnection policy settings
    pub reconnect: ReconnectConfig,
    /// Display feed capacities
    pub feeds: FeedConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl WatchConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports WALLETWATCH_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(base_url) = std::env::var("WALLETWATCH_BASE_URL") {
            self.stream.base_url = base_url;
        }
        if let Ok(network) = std::env::var("WALLETWATCH_NETWORK") {
            if let Ok(n) = network.parse() {
                self.stream.network = n;
            }
        }
        if let Ok(direction) = std::env::var("WALLETWATCH_DIRECTION") {
            if let Ok(d) = direction.parse() {
                self.stream.direction = d;
            }
        }
        if let Ok(wallets) = std::env::var("WALLETWATCH_WALLETS") {
            if let Ok(w) = wallets.parse() {
                self.stream.wallets = w;
            }
        }
        if let Ok(max_attempts) = std::env::var("WALLETWATCH_MAX_ATTEMPTS") {
            if let Ok(m) = max_attempts.parse() {
                self.reconnect.max_attempts = m;
            }
        }
        if let Ok(level) = std::env::var("WALLETWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("WALLETWATCH_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stream.base_url.is_empty() {
            return Err(ConfigError::Validation {
                field: "stream.base_url".to_string(),
                message: "base URL cannot be empty".to_string(),
            });
        }
        if !self.stream.base_url.starts_with("http://")
            && !self.stream.base_url.starts_with("https://")
        {
            return Err(ConfigError::Validation {
                field: "stream.base_url".to_string(),
                message: "base URL must start with http:// or https://".to_string(),
            });
        }
        if self.stream.wallets == 0 {
            return Err(ConfigError::Validation {
                field: "stream.wallets".to_string(),
                message: "wallet count must be non-zero".to_string(),
            });
        }
        if self.feeds.activity_capacity == 0 {
            return Err(ConfigError::Validation {
                field: "feeds.activity_capacity".to_string(),
                message: "capacity must be non-zero".to_string(),
            });
        }
        if self.feeds.alert_capacity == 0 {
            return Err(ConfigError::Validation {
                field: "feeds.alert_capacity".to_string(),
                message: "capacity must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}
