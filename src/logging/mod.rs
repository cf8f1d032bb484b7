//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human-readable console logs on stderr
//! - JSON-formatted file logs with rotation
//! - Configurable log levels
//!
//! Plaintext fake or real values never reach a log line; use
//! [`crate::deanonymization::audit::fingerprint`] when a value must be
//! correlated across events.
//!
//! # Example
//!
//! ```no_run
//! use veil::logging::init_logging;
//! use veil::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log a liveness fallback: retained text was flushed raw because the
/// retention cap was exceeded
///
/// # Example
///
/// ```no_run
/// use veil::log_liveness_fallback;
///
/// log_liveness_fallback!(12, 200);
/// ```
#[macro_export]
macro_rules! log_liveness_fallback {
    ($flushed_chars:expr, $max_retain:expr) => {
        tracing::warn!(
            flushed_chars = $flushed_chars,
            max_retain_size = $max_retain,
            "Retention cap exceeded, flushing oldest text unresolved"
        );
    };
}

/// Log a single placeholder replacement
///
/// # Example
///
/// ```no_run
/// use veil::log_replacement;
///
/// log_replacement!("PHONE", "3f2a9c01b7d4");
/// ```
#[macro_export]
macro_rules! log_replacement {
    ($entity_label:expr, $fingerprint:expr) => {
        tracing::debug!(
            entity_type = $entity_label,
            real_fingerprint = %$fingerprint,
            "Placeholder restored"
        );
    };
}

/// Log a session lifecycle event
///
/// # Example
///
/// ```no_run
/// use veil::log_session_event;
///
/// log_session_event!("session-123", "opened");
/// ```
#[macro_export]
macro_rules! log_session_event {
    ($session_id:expr, $event:expr) => {
        tracing::info!(
            session_id = %$session_id,
            event = $event,
            "Session event"
        );
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_macros_compile() {
        log_liveness_fallback!(3usize, 200usize);
        log_replacement!("EMAIL", "abcdef012345");
        log_session_event!("session-1", "finalized");
    }
}
