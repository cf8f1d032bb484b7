//! Streaming de-anonymization
//!
//! This module restores real personal data in a language model's streamed
//! reply. The reply arrives as arbitrarily split fragments, so a placeholder
//! can straddle any number of them; the engine holds back only what might
//! still complete into a placeholder and releases everything else at once.
//!
//! # Architecture
//!
//! The pipeline, built once per session:
//! - **Classification**: tag each fake value with an [`EntityType`] from its shape
//! - **Variants**: add alternate spellings for phones and IBANs
//! - **Reverse map**: sort everything longest-first, with a boundary rule per entry
//! - **Streaming**: a [`StreamDeanonymizer`] per reply, fed fragment by fragment
//!
//! # Usage
//!
//! ```rust
//! use std::collections::HashMap;
//! use veil::config::StreamConfig;
//! use veil::deanonymization::StreamDeanonymizer;
//!
//! let mut map = HashMap::new();
//! map.insert("612 345 678".to_string(), "687654321".to_string());
//!
//! let mut engine = StreamDeanonymizer::from_map(&map, &StreamConfig::default());
//! let mut reply = String::new();
//! for fragment in ["Llama al +34 612-", "345-678 mañana"] {
//!     reply.push_str(&engine.process_fragment(fragment));
//! }
//! reply.push_str(&engine.finalize());
//!
//! assert_eq!(reply, "Llama al 687654321 mañana");
//! ```

pub mod audit;
pub mod boundary;
pub mod classifier;
pub mod detector;
pub mod models;
pub mod reverse_map;
pub mod stats;
pub mod stream;
pub mod variants;

// Re-export main types
pub use boundary::BoundaryRule;
pub use classifier::classify;
pub use detector::PartialMatchDetector;
pub use models::{AnonymizationEntry, EntityType};
pub use reverse_map::{MapEntry, ReverseMap};
pub use stats::StreamStats;
pub use stream::{deanonymize_text, StreamDeanonymizer, StreamPhase};
pub use variants::{VariantExpander, VariantGenerationFailure};
