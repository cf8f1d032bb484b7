//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Veil configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                println!();
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Max Retain Size: {} chars", config.stream.max_retain_size);
        println!(
            "  Default Country Code: +{}",
            config.stream.default_country_code
        );
        println!(
            "  Entity Shape Retention: {}",
            config.stream.entity_shape_retention
        );
        println!("  Session TTL: {}s", config.session.ttl_seconds);
        if config.logging.local_enabled {
            println!(
                "  File Logging: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        } else {
            println!("  File Logging: disabled");
        }
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[stream]\nmax_retain_size = 64\n").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        assert_eq!(ValidateArgs {}.execute(&path).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_validate_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[session]\nttl_seconds = 0\n").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        assert_eq!(ValidateArgs {}.execute(&path).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_validate_missing_file() {
        assert_eq!(
            ValidateArgs {}
                .execute("nonexistent-veil.toml")
                .await
                .unwrap(),
            2
        );
    }
}
