//! Per-stream counters

use serde::{Deserialize, Serialize};

/// Counters kept by every [`super::StreamDeanonymizer`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamStats {
    /// Fragments accepted
    pub fragments_in: u64,

    /// Fragments rejected (empty, malformed, or after finalize)
    pub fragments_rejected: u64,

    /// Bytes accepted
    pub bytes_in: u64,

    /// Bytes emitted
    pub bytes_out: u64,

    /// Placeholders restored to their real value
    pub replacements: u64,

    /// Times retained text was flushed raw to stay under the retention cap
    pub liveness_fallbacks: u64,

    /// Largest number of characters held back at once
    pub peak_retained_chars: usize,
}

impl StreamStats {
    /// One-line summary for logs and the CLI
    pub fn summary(&self) -> String {
        format!(
            "{} fragments ({} rejected), {} bytes in, {} bytes out, {} replacements, {} liveness fallbacks, peak retention {} chars",
            self.fragments_in,
            self.fragments_rejected,
            self.bytes_in,
            self.bytes_out,
            self.replacements,
            self.liveness_fallbacks,
            self.peak_retained_chars
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization() {
        let stats = StreamStats {
            fragments_in: 3,
            replacements: 1,
            ..Default::default()
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["fragments_in"], 3);
        assert_eq!(json["replacements"], 1);
        assert_eq!(json["liveness_fallbacks"], 0);
    }

    #[test]
    fn test_summary() {
        let stats = StreamStats::default();
        assert!(stats.summary().starts_with("0 fragments (0 rejected)"));
    }
}
