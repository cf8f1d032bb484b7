//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::VeilConfig;
use crate::domain::errors::VeilError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into VeilConfig
/// 4. Applies environment variable overrides (VEIL_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use veil::config::loader::load_config;
///
/// let config = load_config("veil.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<VeilConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(VeilError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        VeilError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: VeilConfig = toml::from_str(&contents)
        .map_err(|e| VeilError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        VeilError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Loads configuration from `path` if it exists, otherwise starts from the
/// defaults. Environment overrides and validation apply either way.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<VeilConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(path = %path.display(), "Configuration file not found, using defaults");
    let mut config = VeilConfig::default();
    apply_env_overrides(&mut config);
    config.validate().map_err(|e| {
        VeilError::Configuration(format!("Configuration validation failed: {}", e))
    })?;
    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| VeilError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        // Comment lines are passed through untouched
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(VeilError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using VEIL_* prefix
///
/// Environment variables follow the pattern: VEIL_<SECTION>_<KEY>
/// For example: VEIL_STREAM_MAX_RETAIN_SIZE, VEIL_SESSION_TTL_SECONDS
fn apply_env_overrides(config: &mut VeilConfig) {
    if let Ok(val) = std::env::var("VEIL_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Stream overrides
    if let Ok(val) = std::env::var("VEIL_STREAM_MAX_RETAIN_SIZE") {
        if let Ok(size) = val.parse() {
            config.stream.max_retain_size = size;
        }
    }
    if let Ok(val) = std::env::var("VEIL_STREAM_DEFAULT_COUNTRY_CODE") {
        config.stream.default_country_code = val.trim_start_matches('+').to_string();
    }
    if let Ok(val) = std::env::var("VEIL_STREAM_ENTITY_SHAPE_RETENTION") {
        config.stream.entity_shape_retention = val.parse().unwrap_or(true);
    }

    // Session overrides
    if let Ok(val) = std::env::var("VEIL_SESSION_TTL_SECONDS") {
        if let Ok(ttl) = val.parse() {
            config.session.ttl_seconds = ttl;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("VEIL_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("VEIL_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("VEIL_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}
