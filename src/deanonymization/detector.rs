//! Partial-match detection
//!
//! The detector answers one question per buffer position: can the text
//! starting here be decided now, or does the answer depend on characters
//! that have not arrived yet? It also finds trailing runs that look like a
//! phone number or IBAN still being written.

use super::boundary::{BoundaryRule, Verdict};
use super::classifier::IBAN_MAX_LEN;
use super::reverse_map::{fold, MapEntry, ReverseMap};
use super::variants::PhoneDigits;
use crate::config::StreamConfig;

/// Most digits an international phone number can carry
const PHONE_SHAPE_MAX_DIGITS: usize = 15;

/// Longest phone-shaped run, separators included
const PHONE_SHAPE_MAX_CHARS: usize = 24;

/// Longest IBAN-shaped run: the compact form plus a space every four
const IBAN_SHAPE_MAX_CHARS: usize = IBAN_MAX_LEN + IBAN_MAX_LEN / 4;

/// Most separator characters between two digit groups of a regrouped phone
const PHONE_GROUP_MAX_SEPARATORS: usize = 2;

/// Outcome of examining one buffer position
#[derive(Debug, Clone, Copy)]
pub enum Decision<'a> {
    /// This reverse-map entry matches the next `len` bytes
    Replace { entry: &'a MapEntry, len: usize },
    /// No entry can match here; the character is emitted as is
    Literal,
    /// Depends on input not received yet
    Ambiguous,
}

/// Decides matches and retention for a [`ReverseMap`]
#[derive(Debug, Clone, Copy)]
pub struct PartialMatchDetector {
    shape_retention: bool,
}

impl PartialMatchDetector {
    pub fn new(shape_retention: bool) -> Self {
        Self { shape_retention }
    }

    pub fn from_config(config: &StreamConfig) -> Self {
        Self::new(config.entity_shape_retention)
    }

    /// Examine `text[pos..]`, `previous` being the character before `pos`.
    ///
    /// Entries are tried longest first. An exact, case-sensitive match with a
    /// valid right boundary wins. A match whose right boundary is not yet
    /// known, or a tail that is a proper case-insensitive prefix of an entry,
    /// makes the position ambiguous unless `at_eof` is set.
    ///
    /// When no spelling matches, phone entries are also tried digit by
    /// digit so a number the model regrouped (`612 34 56 78`) is still
    /// restored.
    pub fn decide<'a>(
        &self,
        map: &'a ReverseMap,
        text: &str,
        pos: usize,
        previous: Option<char>,
        at_eof: bool,
    ) -> Decision<'a> {
        let rest = &text[pos..];
        let Some(head) = rest.chars().next() else {
            return Decision::Literal;
        };

        for &index in map.candidates(head) {
            let Some(entry) = map.get(index) else {
                continue;
            };
            let rule = entry.rule();
            if !rule.left_ok(previous, entry.first_char()) {
                continue;
            }

            if let Some(after) = rest.strip_prefix(entry.fake_value()) {
                match rule.right(after, entry.last_char(), at_eof) {
                    Verdict::Valid => {
                        return Decision::Replace {
                            entry,
                            len: entry.fake_value().len(),
                        }
                    }
                    Verdict::Undecided => return Decision::Ambiguous,
                    Verdict::Invalid => {}
                }
            } else if !at_eof && is_proper_prefix_ignore_case(rest, entry.fake_value()) {
                return Decision::Ambiguous;
            }
        }

        if matches!(head, '0'..='9' | '+' | '(') {
            for &index in map.phones() {
                let Some(entry) = map.get(index) else {
                    continue;
                };
                let Some(phone) = entry.phone_digits() else {
                    continue;
                };
                let rule = entry.rule();
                if !rule.left_ok(previous, head) {
                    continue;
                }
                match match_phone_digits(rest, phone, rule, at_eof) {
                    DigitsMatch::Found(len) => return Decision::Replace { entry, len },
                    DigitsMatch::Pending => return Decision::Ambiguous,
                    DigitsMatch::Mismatch => {}
                }
            }
        }

        Decision::Literal
    }

    /// Byte offset where a trailing phone- or IBAN-shaped run begins, if
    /// shape retention is enabled and the run is still short enough to grow
    /// into a real number.
    pub fn shape_start(&self, text: &str, previous: Option<char>) -> Option<usize> {
        if !self.shape_retention {
            return None;
        }
        [phone_run_start(text, previous), iban_run_start(text, previous)]
            .into_iter()
            .flatten()
            .min()
    }
}

/// `candidate` is non-empty, shorter than `fake`, and equal to its start
/// ignoring case
pub fn is_proper_prefix_ignore_case(candidate: &str, fake: &str) -> bool {
    let mut fake_chars = fake.chars();
    for c in candidate.chars() {
        match fake_chars.next() {
            Some(f) if fold(f) == fold(c) => {}
            _ => return false,
        }
    }
    !candidate.is_empty() && fake_chars.next().is_some()
}

enum DigitsMatch {
    Found(usize),
    Pending,
    Mismatch,
}

/// Match the start of `rest` against a phone's digits in any grouping.
///
/// A leading `+` brings the country code into the expected digits. Groups
/// may be split by up to two of ` - . ( )`.
fn match_phone_digits(
    rest: &str,
    phone: &PhoneDigits,
    rule: BoundaryRule,
    at_eof: bool,
) -> DigitsMatch {
    let international = rest.starts_with('+') || rest.starts_with("(+");
    let country_code = match &phone.country_code {
        Some(code) if international => code.as_str(),
        _ => "",
    };
    let mut expected = country_code.chars().chain(phone.national.chars()).peekable();

    let mut opening = true;
    let mut separators = 0;
    for (offset, c) in rest.char_indices() {
        if c.is_ascii_digit() {
            if expected.next() != Some(c) {
                return DigitsMatch::Mismatch;
            }
            opening = false;
            separators = 0;
            if expected.peek().is_none() {
                let end = offset + c.len_utf8();
                return match rule.right(&rest[end..], c, at_eof) {
                    Verdict::Valid => DigitsMatch::Found(end),
                    Verdict::Undecided => DigitsMatch::Pending,
                    Verdict::Invalid => DigitsMatch::Mismatch,
                };
            }
        } else if opening && matches!(c, '(' | '+') && offset < 2 {
            continue;
        } else if !opening
            && matches!(c, ' ' | '-' | '.' | '(' | ')')
            && separators < PHONE_GROUP_MAX_SEPARATORS
        {
            separators += 1;
        } else {
            return DigitsMatch::Mismatch;
        }
    }

    if at_eof {
        DigitsMatch::Mismatch
    } else {
        DigitsMatch::Pending
    }
}

/// Start of the trailing run of characters matching `in_run`
fn trailing_run(text: &str, in_run: impl Fn(char) -> bool) -> Option<usize> {
    let mut start = None;
    for (index, c) in text.char_indices().rev() {
        if !in_run(c) {
            break;
        }
        start = Some(index);
    }
    start
}

fn char_before(text: &str, index: usize, previous: Option<char>) -> Option<char> {
    if index == 0 {
        previous
    } else {
        text[..index].chars().next_back()
    }
}

fn phone_run_start(text: &str, previous: Option<char>) -> Option<usize> {
    let run_start = trailing_run(text, |c| {
        c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')' | '+')
    })?;
    let run = &text[run_start..];

    let mut digits_left = run.chars().filter(char::is_ascii_digit).count();
    let mut before = char_before(text, run_start, previous);
    for (offset, c) in run.char_indices() {
        let starts_token = matches!(c, '0'..='9' | '+' | '(')
            && before.map_or(true, |b| !b.is_alphanumeric() && !matches!(b, '+' | '('));
        if starts_token
            && digits_left <= PHONE_SHAPE_MAX_DIGITS
            && run.len() - offset <= PHONE_SHAPE_MAX_CHARS
            && (digits_left > 0 || run[offset..].contains('+'))
        {
            return Some(run_start + offset);
        }
        if c.is_ascii_digit() {
            digits_left -= 1;
        }
        before = Some(c);
    }
    None
}

fn iban_run_start(text: &str, previous: Option<char>) -> Option<usize> {
    let run_start = trailing_run(text, |c| {
        c.is_ascii_uppercase() || c.is_ascii_digit() || c == ' '
    })?;
    let run = &text[run_start..];

    let mut before = char_before(text, run_start, previous);
    for (offset, c) in run.char_indices() {
        let starts_token =
            c.is_ascii_uppercase() && before.map_or(true, |b| !b.is_alphanumeric());
        if starts_token
            && run.len() - offset <= IBAN_SHAPE_MAX_CHARS
            && is_iban_prefix(&run[offset..])
        {
            return Some(run_start + offset);
        }
        before = Some(c);
    }
    None
}

/// Two letters, a check digit, then at most 34 alphanumerics in total
fn is_iban_prefix(candidate: &str) -> bool {
    let compact: Vec<u8> = candidate.bytes().filter(|b| *b != b' ').collect();
    if compact.len() < 3 || compact.len() > IBAN_MAX_LEN {
        return false;
    }
    compact[..2].iter().all(u8::is_ascii_uppercase)
        && compact[2..compact.len().min(4)].iter().all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> ReverseMap {
        ReverseMap::build(pairs.iter().copied(), &StreamConfig::default())
    }

    #[test]
    fn test_proper_prefix() {
        assert!(is_proper_prefix_ignore_case("jua", "Juan Pérez"));
        assert!(is_proper_prefix_ignore_case("Juan P", "Juan Pérez"));
        assert!(!is_proper_prefix_ignore_case("Juan Pérez", "Juan Pérez"));
        assert!(!is_proper_prefix_ignore_case("Juan Pérez,", "Juan Pérez"));
        assert!(!is_proper_prefix_ignore_case("Jux", "Juan Pérez"));
        assert!(!is_proper_prefix_ignore_case("", "Juan Pérez"));
    }

    fn replaced<'a>(decision: Decision<'a>) -> Option<&'a str> {
        match decision {
            Decision::Replace { entry, .. } => Some(entry.real_value()),
            _ => None,
        }
    }

    #[test]
    fn test_decide_replace() {
        let map = map(&[("Juan Pérez", "María González")]);
        let detector = PartialMatchDetector::new(true);
        let text = "Hola Juan Pérez, ¿qué tal?";
        assert_eq!(
            replaced(detector.decide(&map, text, 5, Some(' '), false)),
            Some("María González")
        );
        assert!(matches!(
            detector.decide(&map, text, 0, None, false),
            Decision::Literal
        ));
    }

    #[test]
    fn test_decide_prefix_is_ambiguous_until_eof() {
        let map = map(&[("Juan Pérez", "María González")]);
        let detector = PartialMatchDetector::new(true);
        assert!(matches!(
            detector.decide(&map, "Hola Jua", 5, Some(' '), false),
            Decision::Ambiguous
        ));
        assert!(matches!(
            detector.decide(&map, "Hola Jua", 5, Some(' '), true),
            Decision::Literal
        ));
    }

    #[test]
    fn test_decide_match_at_end_waits_for_boundary() {
        let map = map(&[("Juan Pérez", "María González")]);
        let detector = PartialMatchDetector::new(true);
        assert!(matches!(
            detector.decide(&map, "Juan Pérez", 0, None, false),
            Decision::Ambiguous
        ));
        assert_eq!(
            replaced(detector.decide(&map, "Juan Pérez", 0, None, true)),
            Some("María González")
        );
        assert!(matches!(
            detector.decide(&map, "Juan Pérezz", 0, None, false),
            Decision::Literal
        ));
    }

    #[test]
    fn test_decide_invalid_left_boundary() {
        let map = map(&[("Madrid", "Soria")]);
        let detector = PartialMatchDetector::new(true);
        assert!(matches!(
            detector.decide(&map, "xMadrid ", 1, Some('x'), false),
            Decision::Literal
        ));
    }

    #[test]
    fn test_longer_entry_preferred() {
        let map = map(&[("Ana", "Eva"), ("Ana Gómez", "Eva Ruiz")]);
        let detector = PartialMatchDetector::new(true);
        assert_eq!(
            replaced(detector.decide(&map, "Ana Gómez.", 0, None, false)),
            Some("Eva Ruiz")
        );

        // "Ana G" could still become the longer name
        assert!(matches!(
            detector.decide(&map, "Ana G", 0, None, false),
            Decision::Ambiguous
        ));
        assert_eq!(
            replaced(detector.decide(&map, "Ana Gil", 0, None, false)),
            Some("Eva")
        );
    }

    #[test]
    fn test_regrouped_phone_matches_by_digits() {
        let map = map(&[("612 345 678", "687654321")]);
        let detector = PartialMatchDetector::new(true);

        let text = "Tel 612 34 56 78, gracias";
        match detector.decide(&map, text, 4, Some(' '), false) {
            Decision::Replace { entry, len } => {
                assert_eq!(entry.real_value(), "687654321");
                assert_eq!(&text[4..4 + len], "612 34 56 78");
            }
            other => panic!("expected a replacement, got {other:?}"),
        }

        let text = "Tel +34 (612) 345.678 ya";
        match detector.decide(&map, text, 4, Some(' '), false) {
            Decision::Replace { len, .. } => assert_eq!(&text[4..4 + len], "+34 (612) 345.678"),
            other => panic!("expected a replacement, got {other:?}"),
        }
    }

    #[test]
    fn test_regrouped_phone_waits_then_rejects() {
        let map = map(&[("612 345 678", "687654321")]);
        let detector = PartialMatchDetector::new(true);
        assert!(matches!(
            detector.decide(&map, "6123 4", 0, None, false),
            Decision::Ambiguous
        ));
        assert!(matches!(
            detector.decide(&map, "6123 4", 0, None, true),
            Decision::Literal
        ));
        // different digits, a longer number, too many separators
        for text in ["612 34 56 79 ", "612 34 56 789 ", "612   345 678 "] {
            assert!(
                matches!(detector.decide(&map, text, 0, None, false), Decision::Literal),
                "{text}"
            );
        }
    }

    #[test]
    fn test_phone_shape_retention() {
        let detector = PartialMatchDetector::new(true);
        assert_eq!(detector.shape_start("Llama al 612 34", None), Some(9));
        assert_eq!(detector.shape_start("Llama al +34 6", None), Some(9));
        assert_eq!(detector.shape_start("Llama al +", None), Some(9));
        assert_eq!(detector.shape_start("abc123", None), None);
        assert_eq!(detector.shape_start("no digits here", None), None);
    }

    #[test]
    fn test_phone_shape_too_long_flows() {
        let detector = PartialMatchDetector::new(true);
        let digits = "9".repeat(40);
        assert_eq!(detector.shape_start(&digits, None), None);
    }

    #[test]
    fn test_shape_runs_are_bounded_in_length() {
        let detector = PartialMatchDetector::new(true);
        let padded = format!("Tel 612 345 678{}", " ".repeat(30));
        assert_eq!(detector.shape_start(&padded, None), None);
        let padded = format!("Cuenta ES91 2100{}", " ".repeat(40));
        assert_eq!(detector.shape_start(&padded, None), None);
    }

    #[test]
    fn test_phone_shape_uses_previous_context() {
        let detector = PartialMatchDetector::new(true);
        assert_eq!(detector.shape_start("123", Some('x')), None);
        assert_eq!(detector.shape_start("123", Some(' ')), Some(0));
    }

    #[test]
    fn test_iban_shape_retention() {
        let detector = PartialMatchDetector::new(true);
        assert_eq!(detector.shape_start("Cuenta ES91 2100 ", None), Some(7));
        assert_eq!(detector.shape_start("Cuenta ES", None), None);
        assert_eq!(detector.shape_start("HOLA ES", None), None);
    }

    #[test]
    fn test_shape_retention_disabled() {
        let detector = PartialMatchDetector::new(false);
        assert_eq!(detector.shape_start("Llama al 612 34", None), None);
    }
}
