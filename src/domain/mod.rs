//! Domain types for Veil.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`SessionId`])
//! - **Error types** ([`VeilError`], [`SessionError`], [`StreamError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations outside the streaming hot path return
//! [`Result<T, VeilError>`]:
//!
//! ```rust
//! use veil::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = veil::config::VeilConfig::default();
//!     config.validate().map_err(veil::domain::VeilError::Configuration)?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{SessionError, StreamError, VeilError};
pub use ids::SessionId;
pub use result::Result;
