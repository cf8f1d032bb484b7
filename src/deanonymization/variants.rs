//! Alternate spellings for format-sensitive entries
//!
//! A model often reformats numbers it repeats: it drops or adds the
//! country code, or regroups digits. Phone and IBAN entries therefore get
//! extra entries covering the usual spellings, all pointing at the same
//! real value.

use super::classifier::{normalize_iban, COUNTRY_CODE_MAX_DIGITS};
use super::models::{AnonymizationEntry, EntityType};
use thiserror::Error;

/// Digits in a national phone number
const NATIONAL_DIGITS: usize = 9;

/// A fake value did not parse into the shape its entity type expects
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot generate {entity_type} variants: {reason}")]
pub struct VariantGenerationFailure {
    pub entity_type: EntityType,
    pub reason: String,
}

impl VariantGenerationFailure {
    fn new(entity_type: EntityType, reason: impl Into<String>) -> Self {
        Self {
            entity_type,
            reason: reason.into(),
        }
    }
}

/// Digits of a phone number, split at the country code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneDigits {
    /// `None` when the leading digits are not a recognised country code
    pub country_code: Option<String>,
    pub national: String,
}

/// Generates alternate spellings of phone and IBAN fake values
#[derive(Debug, Clone)]
pub struct VariantExpander {
    default_country_code: String,
}

impl VariantExpander {
    pub fn new(default_country_code: impl Into<String>) -> Self {
        Self {
            default_country_code: default_country_code.into(),
        }
    }

    /// Expand an entry into its variant entries, excluding the entry itself.
    ///
    /// Entries whose fake value cannot be parsed keep only their literal
    /// spelling.
    pub fn expand(&self, entry: &AnonymizationEntry) -> Vec<AnonymizationEntry> {
        match self.spellings(entry.fake_value(), entry.entity_type()) {
            Ok(spellings) => spellings
                .into_iter()
                .filter(|spelling| spelling != entry.fake_value())
                .map(|spelling| AnonymizationEntry::variant(spelling, entry))
                .collect(),
            Err(failure) => {
                tracing::debug!(
                    entity_type = entry.entity_type().label(),
                    reason = %failure.reason,
                    "Variant generation skipped"
                );
                Vec::new()
            }
        }
    }

    /// All spellings for a fake value of the given type, possibly including
    /// the value itself. Types without format variants yield nothing.
    pub fn spellings(
        &self,
        fake_value: &str,
        entity_type: EntityType,
    ) -> Result<Vec<String>, VariantGenerationFailure> {
        match entity_type {
            EntityType::Phone => self.phone_spellings(fake_value),
            EntityType::Iban => iban_spellings(fake_value),
            EntityType::Email | EntityType::PersonName | EntityType::Generic => Ok(Vec::new()),
        }
    }

    /// Split a phone fake value into its country code and national digits.
    ///
    /// A number whose leading digits are not a recognised country code is
    /// returned whole, without a country code.
    pub fn phone_digits(&self, fake_value: &str) -> Result<PhoneDigits, VariantGenerationFailure> {
        let digits: String = fake_value.chars().filter(char::is_ascii_digit).collect();
        if digits.len() < NATIONAL_DIGITS {
            return Err(VariantGenerationFailure::new(
                EntityType::Phone,
                format!("expected at least {NATIONAL_DIGITS} digits, found {}", digits.len()),
            ));
        }

        if digits.len() == NATIONAL_DIGITS {
            return Ok(PhoneDigits {
                country_code: Some(self.default_country_code.clone()),
                national: digits,
            });
        }

        let trimmed = fake_value.trim_start();
        let has_prefix = trimmed.starts_with('+') || trimmed.starts_with('(');
        let (code, national) = digits.split_at(digits.len() - NATIONAL_DIGITS);
        let recognised = code.len() <= COUNTRY_CODE_MAX_DIGITS
            && (has_prefix || code == self.default_country_code);
        if !recognised {
            return Ok(PhoneDigits {
                country_code: None,
                national: digits,
            });
        }
        Ok(PhoneDigits {
            country_code: Some(code.to_string()),
            national: national.to_string(),
        })
    }

    fn phone_spellings(&self, fake_value: &str) -> Result<Vec<String>, VariantGenerationFailure> {
        let PhoneDigits {
            country_code,
            national,
        } = self.phone_digits(fake_value)?;
        let Some(country_code) = country_code else {
            return Ok(vec![national]);
        };

        let groups = [&national[..3], &national[3..6], &national[6..]];
        let bodies = [
            national.to_string(),
            groups.join(" "),
            groups.join("-"),
        ];
        let prefixes = [
            String::new(),
            format!("+{country_code}"),
            format!("+{country_code} "),
            format!("+{country_code}-"),
            format!("(+{country_code}) "),
            format!("(+{country_code})"),
        ];

        let mut spellings = Vec::with_capacity(prefixes.len() * bodies.len());
        for prefix in &prefixes {
            for body in &bodies {
                spellings.push(format!("{prefix}{body}"));
            }
        }
        Ok(spellings)
    }
}

fn iban_spellings(fake_value: &str) -> Result<Vec<String>, VariantGenerationFailure> {
    let compact = normalize_iban(fake_value)
        .ok_or_else(|| VariantGenerationFailure::new(EntityType::Iban, "not an IBAN shape"))?;

    let grouped = compact
        .as_bytes()
        .chunks(4)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join(" ");

    Ok(vec![compact, grouped])
}
