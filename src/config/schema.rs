//! Configuration schema types
//!
//! This module defines the configuration structure for Veil.

use serde::{Deserialize, Serialize};

/// Main Veil configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section has defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VeilConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Streaming engine settings
    #[serde(default)]
    pub stream: StreamConfig,

    /// Session store settings
    #[serde(default)]
    pub session: SessionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl VeilConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.stream.validate()?;
        self.session.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Streaming de-anonymization settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Maximum number of characters held back while a match is unresolved.
    /// Exceeding it flushes the oldest retained text raw.
    #[serde(default = "default_max_retain_size")]
    pub max_retain_size: usize,

    /// Country code assumed for 9-digit national phone numbers
    #[serde(default = "default_country_code")]
    pub default_country_code: String,

    /// Retain trailing digit runs that look like a phone or IBAN still being
    /// typed, even when no known entry matches them yet
    #[serde(default = "default_true")]
    pub entity_shape_retention: bool,
}

impl StreamConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retain_size < MIN_RETAIN_SIZE {
            return Err(format!(
                "stream.max_retain_size must be >= {MIN_RETAIN_SIZE}, got {}",
                self.max_retain_size
            ));
        }
        if self.max_retain_size > MAX_RETAIN_SIZE {
            return Err(format!(
                "stream.max_retain_size must be <= {MAX_RETAIN_SIZE}, got {}",
                self.max_retain_size
            ));
        }

        let code = &self.default_country_code;
        if code.is_empty() || code.len() > 3 || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!(
                "stream.default_country_code must be 1-3 digits without '+', got '{code}'"
            ));
        }
        Ok(())
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            max_retain_size: default_max_retain_size(),
            default_country_code: default_country_code(),
            entity_shape_retention: true,
        }
    }
}

/// Session store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Lifetime of a stored anonymization map, in seconds
    #[serde(default = "default_session_ttl_seconds")]
    pub ttl_seconds: u64,
}

impl SessionConfig {
    fn validate(&self) -> Result<(), String> {
        if self.ttl_seconds == 0 {
            return Err("session.ttl_seconds must be > 0".to_string());
        }
        Ok(())
    }

    /// Returns the TTL as a [`std::time::Duration`]
    pub fn ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.ttl_seconds)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_session_ttl_seconds(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path is required when local_enabled = true".to_string());
        }

        Ok(())
    }

    /// Console-only logging, used by the CLI before a config file is loaded
    pub fn console_only() -> Self {
        Self {
            local_enabled: false,
            local_path: String::new(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

const MIN_RETAIN_SIZE: usize = 16;
const MAX_RETAIN_SIZE: usize = 65_536;

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_retain_size() -> usize {
    200
}

fn default_country_code() -> String {
    "34".to_string()
}

fn default_session_ttl_seconds() -> u64 {
    3600
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = VeilConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.stream.max_retain_size, 200);
        assert_eq!(config.stream.default_country_code, "34");
        assert_eq!(config.session.ttl_seconds, 3600);
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig {
            log_level: "info".to_string(),
        };
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_stream_config_validation() {
        let mut config = StreamConfig::default();
        assert!(config.validate().is_ok());

        config.max_retain_size = 4;
        assert!(config.validate().is_err());

        config.max_retain_size = 1_000_000;
        assert!(config.validate().is_err());

        config.max_retain_size = 200;
        config.default_country_code = "+34".to_string();
        assert!(config.validate().is_err());

        config.default_country_code = "1".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_session_config_validation() {
        let config = SessionConfig { ttl_seconds: 0 };
        assert!(config.validate().is_err());
        assert_eq!(
            SessionConfig::default().ttl(),
            std::time::Duration::from_secs(3600)
        );
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());

        config.local_rotation = "hourly".to_string();
        config.local_enabled = true;
        config.local_path = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: VeilConfig = toml::from_str("").unwrap();
        assert!(config.validate().is_ok());
        assert!(config.stream.entity_shape_retention);
    }
}
