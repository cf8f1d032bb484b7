//! In-process session store

use super::store::{validate_map, AnonymizationMap, SessionStore};
use crate::domain::{SessionError, SessionId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use zeroize::Zeroize;

struct StoredMap {
    map: AnonymizationMap,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl StoredMap {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    fn wipe(&mut self) {
        for real in self.map.values_mut() {
            real.zeroize();
        }
        self.map.clear();
    }
}

/// Listing entry for a live session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub entries: usize,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// [`SessionStore`] backed by a `HashMap` behind a tokio `RwLock`
///
/// Expired maps are treated as absent and wiped the next time they are
/// touched or when [`purge_expired`](Self::purge_expired) runs.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, StoredMap>>,
}

fn to_chrono(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::days(36_500))
}

fn expiry(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    now.checked_add_signed(to_chrono(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live sessions, soonest expiry first
    pub async fn list_active(&self) -> Vec<SessionSummary> {
        let now = Utc::now();
        let sessions = self.sessions.read().await;
        let mut active: Vec<SessionSummary> = sessions
            .iter()
            .filter(|(_, stored)| !stored.is_expired(now))
            .map(|(id, stored)| SessionSummary {
                session_id: id.clone(),
                entries: stored.map.len(),
                created_at: stored.created_at,
                expires_at: stored.expires_at,
            })
            .collect();
        active.sort_by_key(|summary| summary.expires_at);
        active
    }

    /// Drop expired maps. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, stored| {
            if stored.is_expired(now) {
                stored.wipe();
                false
            } else {
                true
            }
        });
        let removed = before - sessions.len();
        if removed > 0 {
            tracing::debug!(removed, "Purged expired sessions");
        }
        removed
    }

    /// Drop every stored map. Returns how many were removed.
    pub async fn clear(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.len();
        for stored in sessions.values_mut() {
            stored.wipe();
        }
        sessions.clear();
        removed
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session_id: &SessionId) -> Result<Option<AnonymizationMap>, SessionError> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(session_id) {
                Some(stored) if !stored.is_expired(now) => return Ok(Some(stored.map.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // expired: wipe it while we are here
        let mut sessions = self.sessions.write().await;
        if let Some(mut stored) = sessions.remove(session_id) {
            stored.wipe();
            crate::log_session_event!(session_id, "expired");
        }
        Ok(None)
    }

    async fn put(
        &self,
        session_id: &SessionId,
        map: AnonymizationMap,
        ttl: Duration,
    ) -> Result<(), SessionError> {
        validate_map(&map)?;

        let now = Utc::now();
        let entries = map.len();
        let stored = StoredMap {
            map,
            created_at: now,
            expires_at: expiry(now, ttl),
        };

        let mut sessions = self.sessions.write().await;
        if let Some(mut previous) = sessions.insert(session_id.clone(), stored) {
            previous.wipe();
        }
        tracing::info!(
            session_id = %session_id,
            entries,
            ttl_secs = ttl.as_secs(),
            "Stored anonymization map"
        );
        Ok(())
    }

    async fn delete(&self, session_id: &SessionId) -> Result<bool, SessionError> {
        let mut sessions = self.sessions.write().await;
        match sessions.remove(session_id) {
            Some(mut stored) => {
                stored.wipe();
                crate::log_session_event!(session_id, "deleted");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ttl(&self, session_id: &SessionId) -> Result<Option<Duration>, SessionError> {
        let now = Utc::now();
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(session_id)
            .filter(|stored| !stored.is_expired(now))
            .and_then(|stored| (stored.expires_at - now).to_std().ok()))
    }

    async fn extend_ttl(
        &self,
        session_id: &SessionId,
        additional: Duration,
    ) -> Result<bool, SessionError> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(session_id) {
            Some(stored) if !stored.is_expired(now) => {
                stored.expires_at = expiry(stored.expires_at, additional);
                tracing::info!(
                    session_id = %session_id,
                    additional_secs = additional.as_secs(),
                    "Extended session TTL"
                );
                Ok(true)
            }
            _ => {
                tracing::warn!(session_id = %session_id, "Cannot extend TTL, session not found");
                Ok(false)
            }
        }
    }
}
