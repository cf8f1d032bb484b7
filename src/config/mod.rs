//! Configuration management for Veil.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Veil uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `VEIL_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`StreamConfig`] - Streaming engine settings (retention cap, phone country code)
//! - [`SessionConfig`] - Session store settings (map TTL)
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [stream]
//! max_retain_size = 200
//! default_country_code = "34"
//! entity_shape_retention = true
//!
//! [session]
//! ttl_seconds = 3600
//!
//! [logging]
//! local_enabled = true
//! local_path = "${VEIL_LOG_DIR}"
//! local_rotation = "daily"
//! ```
//!
//! # Validation
//!
//! ```rust,no_run
//! use veil::config::load_config;
//!
//! # fn example() {
//! match load_config("veil.toml") {
//!     Ok(config) => println!("Retention cap: {}", config.stream.max_retain_size),
//!     Err(e) => eprintln!("Configuration error: {}", e),
//! }
//! # }
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default};
pub use schema::{ApplicationConfig, LoggingConfig, SessionConfig, StreamConfig, VeilConfig};
