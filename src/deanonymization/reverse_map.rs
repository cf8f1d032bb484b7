//! Longest-first reverse map with generated variants

use super::boundary::BoundaryRule;
use super::classifier::classify;
use super::models::{AnonymizationEntry, EntityType};
use super::variants::{PhoneDigits, VariantExpander};
use crate::config::StreamConfig;
use std::collections::{HashMap, HashSet};

/// A reverse-map entry with the data the matcher needs precomputed
#[derive(Debug, Clone)]
pub struct MapEntry {
    entry: AnonymizationEntry,
    rule: BoundaryRule,
    char_len: usize,
    first: char,
    last: char,
    phone: Option<PhoneDigits>,
}

impl MapEntry {
    fn new(entry: AnonymizationEntry) -> Option<Self> {
        let fake = entry.fake_value();
        let first = fake.chars().next()?;
        let last = fake.chars().next_back()?;
        Some(Self {
            rule: BoundaryRule::for_entry(entry.entity_type(), fake),
            char_len: fake.chars().count(),
            first,
            last,
            phone: None,
            entry,
        })
    }

    pub fn entry(&self) -> &AnonymizationEntry {
        &self.entry
    }

    pub fn fake_value(&self) -> &str {
        self.entry.fake_value()
    }

    pub fn real_value(&self) -> &str {
        self.entry.real_value()
    }

    pub fn rule(&self) -> BoundaryRule {
        self.rule
    }

    /// Length of the fake value in characters
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    pub fn first_char(&self) -> char {
        self.first
    }

    pub fn last_char(&self) -> char {
        self.last
    }

    /// Digits of an original phone entry, for matching regrouped spellings
    pub fn phone_digits(&self) -> Option<&PhoneDigits> {
        self.phone.as_ref()
    }
}

/// Case-folded key used to index entries by their first character
pub(crate) fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// The anonymization map, expanded with variants and sorted by descending
/// fake-value length.
///
/// Trying entries in this order means a shorter fake value contained in a
/// longer one can never pre-empt it.
#[derive(Debug, Default)]
pub struct ReverseMap {
    entries: Vec<MapEntry>,
    by_first_char: HashMap<char, Vec<usize>>,
    phones: Vec<usize>,
    max_fake_chars: usize,
}

impl ReverseMap {
    /// Build from `(fake, real)` pairs in registration order.
    ///
    /// Earlier pairs win collisions, and every original value is registered
    /// before any generated variant. Empty fake values are skipped.
    pub fn build<I, K, V>(pairs: I, config: &StreamConfig) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let expander = VariantExpander::new(config.default_country_code.clone());
        let mut seen = HashSet::new();
        let mut originals = Vec::new();

        for (fake, real) in pairs {
            let fake = fake.into();
            if fake.is_empty() {
                tracing::warn!("Skipping map entry with an empty fake value");
                continue;
            }
            if !seen.insert(fake.clone()) {
                continue;
            }
            let entity_type = classify(&fake);
            originals.push(AnonymizationEntry::original(fake, real, entity_type));
        }

        let mut variants = Vec::new();
        for original in &originals {
            for variant in expander.expand(original) {
                if seen.insert(variant.fake_value().to_string()) {
                    variants.push(variant);
                }
            }
        }
        let variant_count = variants.len();

        // originals go first so the stable sort keeps them ahead of equal-length variants
        let mut all: Vec<AnonymizationEntry> = originals;
        all.append(&mut variants);

        let mut entries: Vec<MapEntry> = all.into_iter().filter_map(MapEntry::new).collect();
        entries.sort_by(|a, b| b.char_len.cmp(&a.char_len));

        let mut by_first_char: HashMap<char, Vec<usize>> = HashMap::new();
        let mut phones = Vec::new();
        for (index, entry) in entries.iter_mut().enumerate() {
            by_first_char.entry(fold(entry.first)).or_default().push(index);
            if entry.entry.entity_type() == EntityType::Phone && !entry.entry.is_variant() {
                entry.phone = expander.phone_digits(entry.fake_value()).ok();
                if entry.phone.is_some() {
                    phones.push(index);
                }
            }
        }
        let max_fake_chars = entries.first().map_or(0, |e| e.char_len);

        tracing::debug!(
            entries = entries.len(),
            variants = variant_count,
            phones = phones.len(),
            max_fake_chars,
            "Reverse map built"
        );

        Self {
            entries,
            by_first_char,
            phones,
            max_fake_chars,
        }
    }

    /// Build from a session map. Keys are registered in sorted order so the
    /// result does not depend on hash iteration order.
    pub fn from_map(map: &HashMap<String, String>, config: &StreamConfig) -> Self {
        let mut pairs: Vec<(&String, &String)> = map.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        Self::build(
            pairs.into_iter().map(|(k, v)| (k.clone(), v.clone())),
            config,
        )
    }

    /// Entries in longest-first order
    pub fn entries(&self) -> &[MapEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&MapEntry> {
        self.entries.get(index)
    }

    /// Indices of entries whose fake value starts with `c`, compared
    /// case-insensitively, in longest-first order
    pub fn candidates(&self, c: char) -> &[usize] {
        self.by_first_char
            .get(&fold(c))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Indices of original phone entries, in longest-first order
    pub fn phones(&self) -> &[usize] {
        &self.phones
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Length in characters of the longest fake value
    pub fn max_fake_chars(&self) -> usize {
        self.max_fake_chars
    }
}
