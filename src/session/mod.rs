//! Session layer
//!
//! Anonymization maps are produced upstream, stored per session with a TTL,
//! and loaded here when a reply needs de-anonymizing. A missing map is a
//! not-found condition for the caller; no engine is built without one.

pub mod memory;
pub mod pipeline;
pub mod store;

pub use memory::{MemorySessionStore, SessionSummary};
pub use pipeline::{deanonymize_stream, DeanonymizationSession};
pub use store::{AnonymizationMap, SessionStore};
