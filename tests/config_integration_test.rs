//! Integration tests for configuration loading and validation
//!
//! Tests that touch `VEIL_*` environment variables hold `ENV_MUTEX` so they
//! do not observe each other's overrides.

use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;
use veil::config::{load_config, load_config_or_default, VeilConfig};
use veil::deanonymization::StreamDeanonymizer;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("VEIL_APPLICATION_LOG_LEVEL");
    std::env::remove_var("VEIL_STREAM_MAX_RETAIN_SIZE");
    std::env::remove_var("VEIL_STREAM_DEFAULT_COUNTRY_CODE");
    std::env::remove_var("VEIL_STREAM_ENTITY_SHAPE_RETENTION");
    std::env::remove_var("VEIL_SESSION_TTL_SECONDS");
    std::env::remove_var("TEST_VEIL_LOG_DIR");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]
log_level = "debug"

[stream]
max_retain_size = 500
default_country_code = "52"
entity_shape_retention = false

[session]
ttl_seconds = 900

[logging]
local_enabled = true
local_path = "/tmp/veil"
local_rotation = "hourly"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.stream.max_retain_size, 500);
    assert_eq!(config.stream.default_country_code, "52");
    assert!(!config.stream.entity_shape_retention);
    assert_eq!(config.session.ttl_seconds, 900);
    assert_eq!(config.session.ttl().as_secs(), 900);
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_path, "/tmp/veil");
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_empty_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config("");
    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.stream.max_retain_size, 200);
    assert_eq!(config.stream.default_country_code, "34");
    assert!(config.stream.entity_shape_retention);
    assert_eq!(config.session.ttl_seconds, 3600);
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_VEIL_LOG_DIR", "/var/log/veil");

    let temp_file = write_config(
        r#"
[logging]
local_enabled = true
local_path = "${TEST_VEIL_LOG_DIR}"
"#,
    );
    let result = load_config(temp_file.path());
    cleanup_env_vars();

    assert_eq!(result.unwrap().logging.local_path, "/var/log/veil");
}

#[test]
fn test_missing_substituted_var_is_an_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config("[logging]\nlocal_path = \"${TEST_VEIL_LOG_DIR}\"\n");
    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_VEIL_LOG_DIR"));
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("VEIL_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("VEIL_STREAM_MAX_RETAIN_SIZE", "64");
    std::env::set_var("VEIL_STREAM_DEFAULT_COUNTRY_CODE", "+44");
    std::env::set_var("VEIL_SESSION_TTL_SECONDS", "120");

    let temp_file = write_config("[stream]\nmax_retain_size = 300\n");
    let from_file = load_config(temp_file.path());
    let from_defaults = load_config_or_default("nonexistent-veil.toml");
    cleanup_env_vars();

    for config in [from_file.unwrap(), from_defaults.unwrap()] {
        assert_eq!(config.application.log_level, "trace");
        assert_eq!(config.stream.max_retain_size, 64);
        assert_eq!(config.stream.default_country_code, "44");
        assert_eq!(config.session.ttl_seconds, 120);
    }
}

#[test]
fn test_invalid_config_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let cases = [
        ("[application]\nlog_level = \"loud\"\n", "log_level"),
        ("[stream]\nmax_retain_size = 8\n", "max_retain_size"),
        ("[stream]\nmax_retain_size = 1000000\n", "max_retain_size"),
        ("[stream]\ndefault_country_code = \"+34\"\n", "default_country_code"),
        ("[session]\nttl_seconds = 0\n", "ttl_seconds"),
        ("[logging]\nlocal_rotation = \"weekly\"\n", "local_rotation"),
    ];

    for (contents, field) in cases {
        let temp_file = write_config(contents);
        let err = load_config(temp_file.path()).unwrap_err();
        assert!(
            err.to_string().contains(field),
            "expected error about {field}, got: {err}"
        );
    }
}

#[test]
fn test_malformed_toml_is_an_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config("[stream\nmax_retain_size = ");
    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse TOML"));
}

#[test]
fn test_config_drives_phone_variants() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config("[stream]\ndefault_country_code = \"52\"\n");
    let config: VeilConfig = load_config(temp_file.path()).unwrap();

    let map = [("612 345 678".to_string(), "687654321".to_string())]
        .into_iter()
        .collect();
    let mut engine = StreamDeanonymizer::from_map(&map, &config.stream);
    let mut output = engine.process_fragment("Llama al +52 612 345 678 o al +34 612 345 678.");
    output.push_str(&engine.finalize());

    assert_eq!(output, "Llama al 687654321 o al +34 687654321.");
}
