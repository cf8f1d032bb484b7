//! Entity data models

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Kind of personal data a fake value stands in for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    /// Email addresses
    Email,
    /// Telephone numbers
    Phone,
    /// International bank account numbers
    Iban,
    /// Multi-word capitalised names
    PersonName,
    /// Anything else (single tokens, codes, identifiers)
    Generic,
}

impl EntityType {
    /// Get human-readable label for the entity type
    pub fn label(&self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::Phone => "PHONE",
            Self::Iban => "IBAN",
            Self::PersonName => "PERSON",
            Self::Generic => "GENERIC",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One fake-to-real association
///
/// Variant entries are generated from an original entry and share its
/// real value. Both strings are wiped from memory when the entry drops.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AnonymizationEntry {
    fake_value: String,
    real_value: String,
    #[zeroize(skip)]
    entity_type: EntityType,
    #[zeroize(skip)]
    is_variant: bool,
}

impl AnonymizationEntry {
    /// Create an entry for a fake value taken verbatim from the session map
    pub fn original(
        fake_value: impl Into<String>,
        real_value: impl Into<String>,
        entity_type: EntityType,
    ) -> Self {
        Self {
            fake_value: fake_value.into(),
            real_value: real_value.into(),
            entity_type,
            is_variant: false,
        }
    }

    /// Create a machine-generated spelling of an original entry
    pub fn variant(fake_value: impl Into<String>, source: &AnonymizationEntry) -> Self {
        Self {
            fake_value: fake_value.into(),
            real_value: source.real_value.clone(),
            entity_type: source.entity_type,
            is_variant: true,
        }
    }

    pub fn fake_value(&self) -> &str {
        &self.fake_value
    }

    pub fn real_value(&self) -> &str {
        &self.real_value
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn is_variant(&self) -> bool {
        self.is_variant
    }
}

// Real values stay out of Debug output
impl std::fmt::Debug for AnonymizationEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnonymizationEntry")
            .field("fake_value", &self.fake_value)
            .field("real_value", &"<redacted>")
            .field("entity_type", &self.entity_type)
            .field("is_variant", &self.is_variant)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_labels() {
        assert_eq!(EntityType::Email.label(), "EMAIL");
        assert_eq!(EntityType::PersonName.label(), "PERSON");
        assert_eq!(EntityType::Iban.to_string(), "IBAN");
    }

    #[test]
    fn test_entity_type_serialization() {
        let json = serde_json::to_string(&EntityType::PersonName).unwrap();
        assert_eq!(json, "\"PERSON_NAME\"");
    }

    #[test]
    fn test_variant_shares_real_value() {
        let original = AnonymizationEntry::original("687654321", "612345678", EntityType::Phone);
        let variant = AnonymizationEntry::variant("687 654 321", &original);

        assert!(!original.is_variant());
        assert!(variant.is_variant());
        assert_eq!(variant.real_value(), "612345678");
        assert_eq!(variant.entity_type(), EntityType::Phone);
    }

    #[test]
    fn test_debug_redacts_real_value() {
        let entry = AnonymizationEntry::original("[EMAIL_1]", "ana@example.com", EntityType::Email);
        let debug = format!("{entry:?}");
        assert!(debug.contains("[EMAIL_1]"));
        assert!(!debug.contains("ana@example.com"));
    }
}
