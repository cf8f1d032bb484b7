//! Integration tests for logging functionality
//!
//! A process can install only one global subscriber, so a single test
//! initializes logging.

use std::collections::HashMap;
use tempfile::TempDir;
use veil::config::{LoggingConfig, StreamConfig};
use veil::deanonymization::StreamDeanonymizer;
use veil::logging::init_logging;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
    assert_eq!(config.local_path, "./logs");
}

#[test]
fn test_file_logging_never_records_values() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };

    let guard = init_logging("debug", &config).expect("Failed to initialize logging");
    assert!(log_path.exists());

    let mut map = HashMap::new();
    map.insert("Juan Pérez".to_string(), "María González".to_string());
    let small = StreamConfig {
        max_retain_size: 16,
        ..StreamConfig::default()
    };
    let mut engine = StreamDeanonymizer::from_map(&map, &small);
    engine.process_fragment("Hola Juan Pérez, ");
    engine.process_fragment("");
    engine.process_fragment("x".repeat(40).as_str());
    engine.finalize();

    // dropping the guard flushes the non-blocking writer
    drop(guard);

    let contents = std::fs::read_to_string(log_path.join("veil.log")).unwrap();
    assert!(contents.contains("Placeholder restored"));
    assert!(contents.contains("Empty fragment rejected"));
    assert!(!contents.contains("María"));
    assert!(!contents.contains("Juan"));

    // a second subscriber cannot be installed
    assert!(init_logging("info", &LoggingConfig::console_only()).is_err());
}

#[test]
fn test_invalid_log_level_is_rejected() {
    // fails before touching the global subscriber
    assert!(init_logging("loud", &LoggingConfig::console_only()).is_err());
}
