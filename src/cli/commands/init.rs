//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "veil.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Veil configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Validate configuration: veil validate-config");
                println!("  3. Try it: echo 'Hola Juan Pérez' | veil deanonymize --map map.json");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Veil Configuration File
# Streaming de-anonymization of LLM replies

[application]
log_level = "info"

[stream]
max_retain_size = 200
default_country_code = "34"
entity_shape_retention = true

[session]
ttl_seconds = 3600

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Veil Configuration File
# Streaming de-anonymization of LLM replies
#
# Every setting has a default; delete what you do not need to change.
# Any value can be overridden with VEIL_<SECTION>_<KEY>, for example
# VEIL_STREAM_MAX_RETAIN_SIZE=400. ${VAR} references are expanded from the
# environment when the file is loaded.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Streaming Engine
# ============================================================================
[stream]
# Most characters held back while a placeholder may still be completing
# (16-65536). Past this, the oldest held text is released unresolved.
max_retain_size = 200

# Country code assumed for 9-digit phone numbers, without '+'
default_country_code = "34"

# Hold back trailing digit runs that look like a phone number or IBAN
# still being written, even when no known placeholder matches yet
entity_shape_retention = true

# ============================================================================
# Session Store
# ============================================================================
[session]
# Lifetime of a stored anonymization map, in seconds
ttl_seconds = 3600

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable JSON file logging
local_enabled = false

# Log directory
local_path = "./logs"

# Log rotation (daily, hourly, never)
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VeilConfig;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "veil.toml".to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.output, "veil.toml");
        assert!(!args.with_examples);
        assert!(!args.force);
    }

    #[test]
    fn test_generated_configs_parse_and_validate() {
        for content in [
            InitArgs::generate_minimal_config(),
            InitArgs::generate_config_with_examples(),
        ] {
            let config: VeilConfig = toml::from_str(&content).unwrap();
            assert!(config.validate().is_ok());
            assert_eq!(config.stream.max_retain_size, 200);
        }
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("veil.toml");
        std::fs::write(&output, "# existing").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().into_owned(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);

        let forced = InitArgs { force: true, ..args };
        assert_eq!(forced.execute().await.unwrap(), 0);
        assert!(std::fs::read_to_string(&output)
            .unwrap()
            .contains("[stream]"));
    }
}
