//! Streaming de-anonymization state machine
//!
//! A [`StreamDeanonymizer`] owns one session's reply stream. Each fragment
//! is appended to a raw buffer, which is scanned left to right:
//!
//! - positions that can be decided are emitted, with placeholders replaced
//!   by their real value;
//! - the scan stops at the first position whose outcome depends on text
//!   not yet received, and everything from there on is retained.
//!
//! The decision made at every position is the one a full-text pass would
//! make, so the concatenated output does not depend on how the input was
//! split. [`StreamDeanonymizer::finalize`] scans the rest with no
//! ambiguity allowed.
//!
//! Retention is capped by `max_retain_size`; past it, the oldest retained
//! text is flushed unresolved so the stream always makes progress.

use super::audit::fingerprint;
use super::detector::{Decision, PartialMatchDetector};
use super::reverse_map::ReverseMap;
use super::stats::StreamStats;
use crate::config::StreamConfig;
use crate::domain::StreamError;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use zeroize::Zeroize;

/// Engine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamPhase {
    /// Nothing held back
    Streaming,
    /// Text held back pending a possible match
    Retaining,
    /// Finalized; terminal
    Draining,
}

/// Unemitted raw text and the character just before it
struct StreamState {
    buffer: String,
    left_context: Option<char>,
    phase: StreamPhase,
}

impl StreamState {
    fn new() -> Self {
        Self {
            buffer: String::new(),
            left_context: None,
            phase: StreamPhase::Streaming,
        }
    }

    /// Remove the first `len` bytes, remembering the last removed character
    fn consume(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.left_context = self.buffer[..len].chars().next_back();
        self.buffer.drain(..len);
    }
}

impl Drop for StreamState {
    fn drop(&mut self) {
        self.buffer.zeroize();
    }
}

/// Result of one scan
struct Resolution {
    output: String,
    consumed: usize,
    replacements: u64,
}

/// Scan `text` from the start until the end or the first ambiguous position.
///
/// Past the start of a trailing phone- or IBAN-shaped run only complete
/// replacements are taken, so a placeholder sitting inside the run is never
/// left behind for the retention cap to flush.
fn resolve(
    map: &ReverseMap,
    detector: &PartialMatchDetector,
    text: &str,
    previous: Option<char>,
    at_eof: bool,
) -> Resolution {
    let limit = if at_eof {
        text.len()
    } else {
        detector
            .shape_start(text, previous)
            .unwrap_or(text.len())
    };

    let mut output = String::with_capacity(text.len());
    let mut previous = previous;
    let mut pos = 0;
    let mut replacements = 0;

    loop {
        match detector.decide(map, text, pos, previous, at_eof) {
            Decision::Replace { entry, len } => {
                output.push_str(entry.real_value());
                previous = text[pos..pos + len].chars().next_back();
                pos += len;
                replacements += 1;
                crate::log_replacement!(
                    entry.entry().entity_type().label(),
                    fingerprint(entry.real_value())
                );
            }
            Decision::Literal if pos < limit => {
                let Some(c) = text[pos..].chars().next() else {
                    break;
                };
                output.push(c);
                pos += c.len_utf8();
                previous = Some(c);
            }
            Decision::Literal | Decision::Ambiguous => break,
        }
    }

    Resolution {
        output,
        consumed: pos,
        replacements,
    }
}

/// Replace every placeholder in a complete text
///
/// Equivalent to streaming `text` as a single fragment and finalizing.
pub fn deanonymize_text(map: &ReverseMap, text: &str) -> String {
    resolve(map, &PartialMatchDetector::new(false), text, None, true).output
}

/// Per-session streaming de-anonymizer
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use veil::config::StreamConfig;
/// use veil::deanonymization::StreamDeanonymizer;
///
/// let mut map = HashMap::new();
/// map.insert("Juan Pérez".to_string(), "María González".to_string());
///
/// let mut engine = StreamDeanonymizer::from_map(&map, &StreamConfig::default());
/// let mut output = engine.process_fragment("Hola Jua");
/// output.push_str(&engine.process_fragment("n Pérez, ¿qué tal?"));
/// output.push_str(&engine.finalize());
///
/// assert_eq!(output, "Hola María González, ¿qué tal?");
/// ```
pub struct StreamDeanonymizer {
    map: Arc<ReverseMap>,
    detector: PartialMatchDetector,
    max_retain_size: usize,
    state: StreamState,
    stats: StreamStats,
}

impl StreamDeanonymizer {
    /// Create an engine over a shared reverse map
    pub fn new(map: Arc<ReverseMap>, config: &StreamConfig) -> Self {
        if map.max_fake_chars() > config.max_retain_size {
            tracing::warn!(
                max_fake_chars = map.max_fake_chars(),
                max_retain_size = config.max_retain_size,
                "Longest placeholder exceeds the retention cap; it may leak when split"
            );
        }

        Self {
            map,
            detector: PartialMatchDetector::from_config(config),
            max_retain_size: config.max_retain_size,
            state: StreamState::new(),
            stats: StreamStats::default(),
        }
    }

    /// Build the reverse map from a session map and create an engine over it
    pub fn from_map(map: &HashMap<String, String>, config: &StreamConfig) -> Self {
        Self::new(Arc::new(ReverseMap::from_map(map, config)), config)
    }

    /// Feed one fragment and return the text that is safe to release.
    ///
    /// Empty fragments, and fragments arriving after [`finalize`], are
    /// rejected without touching the buffer.
    ///
    /// [`finalize`]: StreamDeanonymizer::finalize
    pub fn process_fragment(&mut self, fragment: &str) -> String {
        if self.state.phase == StreamPhase::Draining {
            self.stats.fragments_rejected += 1;
            tracing::warn!("Fragment received after finalize, ignoring");
            return String::new();
        }
        if fragment.is_empty() {
            self.stats.fragments_rejected += 1;
            tracing::warn!("Empty fragment rejected");
            return String::new();
        }

        self.stats.fragments_in += 1;
        self.stats.bytes_in += fragment.len() as u64;
        self.state.buffer.push_str(fragment);

        let Resolution {
            mut output,
            consumed,
            replacements,
        } = resolve(
            &self.map,
            &self.detector,
            &self.state.buffer,
            self.state.left_context,
            false,
        );
        self.state.consume(consumed);
        self.stats.replacements += replacements;

        let flushed = self.enforce_retention_cap(&mut output);

        let retained = self.state.buffer.chars().count();
        self.stats.peak_retained_chars = self.stats.peak_retained_chars.max(retained);

        let next = if retained > 0 && !flushed {
            StreamPhase::Retaining
        } else {
            StreamPhase::Streaming
        };
        if next != self.state.phase {
            tracing::debug!(from = ?self.state.phase, to = ?next, retained, "Stream phase changed");
            self.state.phase = next;
        }

        self.stats.bytes_out += output.len() as u64;
        output
    }

    /// Like [`process_fragment`](Self::process_fragment), for raw transport
    /// bytes.
    ///
    /// # Errors
    ///
    /// - [`StreamError::MalformedFragment`] for empty or non-UTF-8 input
    /// - [`StreamError::AlreadyFinalized`] after [`finalize`](Self::finalize)
    ///
    /// In every error case the buffer is left untouched.
    pub fn process_bytes(&mut self, fragment: &[u8]) -> Result<String, StreamError> {
        if self.state.phase == StreamPhase::Draining {
            self.stats.fragments_rejected += 1;
            return Err(StreamError::AlreadyFinalized);
        }
        if fragment.is_empty() {
            self.stats.fragments_rejected += 1;
            return Err(StreamError::MalformedFragment("empty fragment".to_string()));
        }

        match std::str::from_utf8(fragment) {
            Ok(text) => Ok(self.process_fragment(text)),
            Err(e) => {
                self.stats.fragments_rejected += 1;
                tracing::warn!(error = %e, "Non UTF-8 fragment rejected");
                Err(StreamError::MalformedFragment(format!("invalid UTF-8: {e}")))
            }
        }
    }

    /// Emit everything still retained, replacing whatever matches now that
    /// no more input will arrive. Moves the engine to
    /// [`StreamPhase::Draining`]; later calls return nothing.
    pub fn finalize(&mut self) -> String {
        if self.state.phase == StreamPhase::Draining {
            return String::new();
        }

        let Resolution {
            output,
            consumed,
            replacements,
        } = resolve(
            &self.map,
            &self.detector,
            &self.state.buffer,
            self.state.left_context,
            true,
        );
        self.state.consume(consumed);
        self.stats.replacements += replacements;
        self.stats.bytes_out += output.len() as u64;
        self.state.buffer.zeroize();
        self.state.phase = StreamPhase::Draining;

        tracing::debug!(stats = %self.stats.summary(), "Stream finalized");
        output
    }

    /// Flush the oldest retained text raw if retention exceeds the cap.
    /// Returns true if anything was flushed.
    fn enforce_retention_cap(&mut self, output: &mut String) -> bool {
        let retained = self.state.buffer.chars().count();
        if retained <= self.max_retain_size {
            return false;
        }

        let excess = retained - self.max_retain_size;
        let cut = self
            .state
            .buffer
            .char_indices()
            .nth(excess)
            .map_or(self.state.buffer.len(), |(index, _)| index);

        output.push_str(&self.state.buffer[..cut]);
        self.state.consume(cut);
        self.stats.liveness_fallbacks += 1;
        crate::log_liveness_fallback!(excess, self.max_retain_size);
        true
    }

    pub fn phase(&self) -> StreamPhase {
        self.state.phase
    }

    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    /// Characters currently held back
    pub fn retained_chars(&self) -> usize {
        self.state.buffer.chars().count()
    }

    pub fn reverse_map(&self) -> &ReverseMap {
        &self.map
    }
}

impl std::fmt::Debug for StreamDeanonymizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamDeanonymizer")
            .field("entries", &self.map.len())
            .field("max_retain_size", &self.max_retain_size)
            .field("phase", &self.state.phase)
            .field("retained_chars", &self.retained_chars())
            .finish()
    }
}
