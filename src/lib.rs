// Veil - Streaming de-anonymization for LLM replies
// Copyright (c) 2025 Veil Contributors
// Licensed under the MIT License

//! # Veil - Streaming de-anonymization for LLM replies
//!
//! Text sent to a language model has its personal data replaced by fake
//! values first. Veil restores the real values in the reply while it is
//! still streaming, fragment by fragment, without ever letting a half-written
//! placeholder reach the user.
//!
//! ## Overview
//!
//! This library provides:
//! - **Classification** of fake values into emails, phones, IBANs, person
//!   names and generic tokens
//! - **Variant expansion** so a phone or IBAN is recognised however the model
//!   chooses to format it
//! - **Streaming replacement** with bounded retention and tri-state boundary
//!   checks, so the output does not depend on how the reply was chunked
//! - **Sessions** that load an anonymization map from a store and wire a
//!   de-anonymizer onto an async stream of fragments
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`deanonymization`] - Reverse map, detector and streaming engine
//! - [`session`] - Session store and stream wiring
//! - [`domain`] - Error and identifier types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::HashMap;
//! use veil::config::StreamConfig;
//! use veil::deanonymization::StreamDeanonymizer;
//!
//! let map = HashMap::from([("Juan Pérez".to_string(), "María González".to_string())]);
//! let mut engine = StreamDeanonymizer::from_map(&map, &StreamConfig::default());
//!
//! let mut reply = String::new();
//! for fragment in ["Hola Ju", "an Pé", "rez, ¿qué tal?"] {
//!     reply.push_str(&engine.process_fragment(fragment));
//! }
//! reply.push_str(&engine.finalize());
//!
//! assert_eq!(reply, "Hola María González, ¿qué tal?");
//! ```
//!
//! ## Sessions
//!
//! ```rust,no_run
//! use veil::config::StreamConfig;
//! use veil::domain::SessionId;
//! use veil::session::{DeanonymizationSession, MemorySessionStore};
//!
//! # async fn example(session_id: SessionId) -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemorySessionStore::new();
//! let session = DeanonymizationSession::open(&store, &session_id, &StreamConfig::default()).await?;
//! let mut engine = session.deanonymizer();
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::VeilError`] or one of the narrower
//! errors it wraps ([`domain::SessionError`], [`domain::StreamError`]).
//!
//! ## Logging
//!
//! Veil logs through `tracing`. Fake and real values are never written to a
//! log line; only counts, entity types and truncated SHA-256 fingerprints.

pub mod cli;
pub mod config;
pub mod deanonymization;
pub mod domain;
pub mod logging;
pub mod session;
