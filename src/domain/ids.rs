//! Domain identifier types with validation
//!
//! Newtype wrappers keep session identifiers from being confused with the
//! free-form strings (fake and real values) that flow through the engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Session identifier newtype wrapper
///
/// Identifies one conversation whose anonymization map lives in the
/// session store.
///
/// # Examples
///
/// ```
/// use veil::domain::ids::SessionId;
/// use std::str::FromStr;
///
/// let session_id = SessionId::from_str("7d44b88c-4199-4bad-97dc-d78268e01398").unwrap();
/// assert_eq!(session_id.as_str(), "7d44b88c-4199-4bad-97dc-d78268e01398");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a new SessionId from a string
    ///
    /// Returns `Err` if the identifier is blank or contains whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Session ID cannot be empty".to_string());
        }
        if id.chars().any(char::is_whitespace) {
            return Err(format!("Session ID cannot contain whitespace: '{id}'"));
        }
        Ok(Self(id))
    }

    /// Generates a fresh random session identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the session ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
