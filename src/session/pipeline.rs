//! Session wiring: from a stored map to a running de-anonymizer

use super::store::{AnonymizationMap, SessionStore};
use crate::config::StreamConfig;
use crate::deanonymization::{deanonymize_text, ReverseMap, StreamDeanonymizer};
use crate::domain::{SessionError, SessionId};
use futures::stream::{self, Stream, StreamExt};
use std::sync::Arc;

/// A session's reverse map, ready to de-anonymize replies
///
/// The reverse map is built once when the session opens and shared by every
/// reply de-anonymized in it.
#[derive(Debug)]
pub struct DeanonymizationSession {
    session_id: SessionId,
    reverse_map: Arc<ReverseMap>,
    config: StreamConfig,
}

impl DeanonymizationSession {
    /// Load the session's map from the store and build its reverse map
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MapUnavailable`] if the store has no map for
    /// the session or fails to answer.
    pub async fn open(
        store: &dyn SessionStore,
        session_id: &SessionId,
        config: &StreamConfig,
    ) -> Result<Self, SessionError> {
        let map = match store.get(session_id).await {
            Ok(Some(map)) => map,
            Ok(None) => {
                tracing::warn!(session_id = %session_id, "No anonymization map for session");
                return Err(SessionError::MapUnavailable(session_id.to_string()));
            }
            Err(e) => {
                tracing::error!(session_id = %session_id, error = %e, "Session store failure");
                return Err(SessionError::MapUnavailable(session_id.to_string()));
            }
        };

        let session = Self::from_map(session_id.clone(), &map, config);
        crate::log_session_event!(session_id, "opened");
        Ok(session)
    }

    /// Build a session directly from a map, without a store
    pub fn from_map(session_id: SessionId, map: &AnonymizationMap, config: &StreamConfig) -> Self {
        Self {
            session_id,
            reverse_map: Arc::new(ReverseMap::from_map(map, config)),
            config: config.clone(),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn reverse_map(&self) -> &ReverseMap {
        &self.reverse_map
    }

    /// A fresh engine for one streamed reply
    pub fn deanonymizer(&self) -> StreamDeanonymizer {
        StreamDeanonymizer::new(Arc::clone(&self.reverse_map), &self.config)
    }

    /// De-anonymize a complete, non-streamed reply
    pub fn deanonymize_text(&self, text: &str) -> String {
        deanonymize_text(&self.reverse_map, text)
    }
}

/// Adapt a stream of model fragments into a stream of de-anonymized text
///
/// Empty outputs are skipped. When `upstream` ends, the engine is finalized
/// and the remaining text yielded. An upstream error is passed through and
/// ends the stream without finalizing: whatever was retained is dropped
/// unseen.
///
/// The engine is borrowed so its [`stats`](StreamDeanonymizer::stats) stay
/// readable once the stream is done.
pub fn deanonymize_stream<'a, S, E>(
    engine: &'a mut StreamDeanonymizer,
    upstream: S,
) -> impl Stream<Item = Result<String, E>> + 'a
where
    S: Stream<Item = Result<String, E>> + Unpin + 'a,
    E: 'a,
{
    stream::unfold(Some((engine, upstream)), |state| async move {
        let (engine, mut upstream) = state?;
        loop {
            match upstream.next().await {
                Some(Ok(fragment)) => {
                    let output = engine.process_fragment(&fragment);
                    if !output.is_empty() {
                        return Some((Ok(output), Some((engine, upstream))));
                    }
                }
                Some(Err(e)) => {
                    tracing::warn!(
                        retained_chars = engine.retained_chars(),
                        "Upstream failed, discarding retained text"
                    );
                    return Some((Err(e), None));
                }
                None => {
                    let tail = engine.finalize();
                    return (!tail.is_empty()).then(|| (Ok(tail), None));
                }
            }
        }
    })
}
