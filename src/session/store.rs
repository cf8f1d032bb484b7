//! Session store abstraction
//!
//! This module defines the trait a backend must implement to hold the
//! per-session anonymization maps.

use crate::domain::{SessionError, SessionId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Fake value to real value, for one session
pub type AnonymizationMap = HashMap<String, String>;

/// Key-value store of anonymization maps with per-entry expiry
///
/// Backend failures are reported as [`SessionError::Backend`]; callers
/// treat them like a missing map.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch the map for a session
    ///
    /// Returns `Ok(None)` if no map is stored or it has expired.
    async fn get(&self, session_id: &SessionId) -> Result<Option<AnonymizationMap>, SessionError>;

    /// Store a map, replacing any previous one, for `ttl`
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidMap`] if a fake value is empty.
    async fn put(
        &self,
        session_id: &SessionId,
        map: AnonymizationMap,
        ttl: Duration,
    ) -> Result<(), SessionError>;

    /// Remove a session's map. Returns true if one was stored.
    async fn delete(&self, session_id: &SessionId) -> Result<bool, SessionError>;

    /// Remaining lifetime of a session's map, `None` if absent
    async fn ttl(&self, session_id: &SessionId) -> Result<Option<Duration>, SessionError>;

    /// Push a session's expiry back by `additional`. Returns false if the
    /// session does not exist.
    async fn extend_ttl(
        &self,
        session_id: &SessionId,
        additional: Duration,
    ) -> Result<bool, SessionError>;

    /// Returns true if a live map is stored for the session
    async fn exists(&self, session_id: &SessionId) -> Result<bool, SessionError> {
        Ok(self.ttl(session_id).await?.is_some())
    }
}

/// Reject maps the engine cannot use
pub(crate) fn validate_map(map: &AnonymizationMap) -> Result<(), SessionError> {
    if map.keys().any(|fake| fake.is_empty()) {
        return Err(SessionError::InvalidMap(
            "fake values must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_map() {
        let mut map = AnonymizationMap::new();
        map.insert("Juan Pérez".to_string(), "María González".to_string());
        assert!(validate_map(&map).is_ok());

        map.insert(String::new(), "x".to_string());
        assert!(matches!(
            validate_map(&map),
            Err(SessionError::InvalidMap(_))
        ));
    }
}
