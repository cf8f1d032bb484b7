//! Domain error types
//!
//! This module defines the error hierarchy for Veil.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Veil error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum VeilError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Session store errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Streaming engine errors
    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Session store errors
///
/// Every failure of the store surfaces as a "map unavailable" condition to
/// the caller; the engine itself is never constructed in that case.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No anonymization map is stored for the session (missing or expired)
    #[error("Anonymization map unavailable for session {0}")]
    MapUnavailable(String),

    /// The backing store failed
    #[error("Session store backend failure: {0}")]
    Backend(String),

    /// The map handed to the store cannot be used
    #[error("Invalid anonymization map: {0}")]
    InvalidMap(String),
}

impl SessionError {
    /// Returns true if the caller should treat the error as "not found"
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::MapUnavailable(_) | Self::Backend(_))
    }
}

/// Streaming engine errors
///
/// None of these terminate a stream; the caller drops the offending
/// fragment and keeps feeding the engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StreamError {
    /// The transport delivered a fragment that cannot be processed
    #[error("Malformed fragment rejected: {0}")]
    MalformedFragment(String),

    /// A fragment arrived after `finalize()` was called
    #[error("Stream already finalized")]
    AlreadyFinalized,
}

// Conversion from std::io::Error
impl From<std::io::Error> for VeilError {
    fn from(err: std::io::Error) -> Self {
        VeilError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for VeilError {
    fn from(err: serde_json::Error) -> Self {
        VeilError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for VeilError {
    fn from(err: toml::de::Error) -> Self {
        VeilError::Configuration(format!("TOML parse error: {err}"))
    }
}
