//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod deanonymize;
pub mod init;
pub mod inspect;
pub mod validate;

use crate::domain::VeilError;
use crate::session::AnonymizationMap;
use std::path::Path;
use zeroize::Zeroizing;

/// Read a JSON object of fake value to real value
pub(crate) fn read_map_file(path: &Path) -> Result<AnonymizationMap, VeilError> {
    let contents = Zeroizing::new(std::fs::read_to_string(path).map_err(|e| {
        VeilError::Io(format!("Failed to read map file {}: {e}", path.display()))
    })?);

    serde_json::from_str(&contents).map_err(|e| {
        VeilError::Serialization(format!(
            "Map file {} must be a JSON object of strings: {e}",
            path.display()
        ))
    })
}
