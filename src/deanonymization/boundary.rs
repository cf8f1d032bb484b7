//! Boundary validation around a candidate match
//!
//! A fake value is only replaced where it stands on its own. What counts
//! as "on its own" depends on the entity: names need whitespace or
//! punctuation on both sides, emails must not be glued to a longer
//! address, numbers must not be glued to more digits.
//!
//! Right-hand checks can be [`Verdict::Undecided`] while streaming: the
//! character that decides them has not arrived yet.

use super::models::EntityType;
use serde::Serialize;

/// Result of a boundary check that may need more input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid,
    Undecided,
}

/// Boundary rule attached to each reverse-map entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryRule {
    /// Whitespace or punctuation on both sides
    Strict,
    /// Not inside a longer email address
    Email,
    /// Not inside a longer number
    Numeric,
    /// Whitespace or punctuation next to an alphanumeric edge; a
    /// bracketed placeholder delimits itself
    Word,
}

/// Punctuation accepted next to a strictly bounded match
pub fn is_boundary_punctuation(c: char) -> bool {
    matches!(
        c,
        '.' | ',' | ';' | ':' | '!' | '?' | ')' | ']' | '}'
            | '(' | '[' | '{' | '"' | '\'' | '¿' | '¡' | '«' | '»'
    )
}

fn is_strict_boundary(c: char) -> bool {
    c.is_whitespace() || is_boundary_punctuation(c)
}

fn is_email_local_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-')
}

impl BoundaryRule {
    /// Pick the rule for an entry from its type and spelling
    pub fn for_entry(entity_type: EntityType, fake_value: &str) -> Self {
        match entity_type {
            EntityType::Email => Self::Email,
            EntityType::Phone | EntityType::Iban => Self::Numeric,
            EntityType::PersonName => Self::Strict,
            EntityType::Generic if fake_value.contains(char::is_whitespace) => Self::Strict,
            EntityType::Generic => Self::Word,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Email => "email",
            Self::Numeric => "numeric",
            Self::Word => "word",
        }
    }

    /// Check the character before a match. `first` is the first character
    /// of the fake value.
    pub fn left_ok(&self, previous: Option<char>, first: char) -> bool {
        let Some(prev) = previous else {
            return true;
        };

        match self {
            Self::Strict => is_strict_boundary(prev),
            Self::Email => !is_email_local_char(prev),
            Self::Numeric => {
                // a '+' directly before a bare number makes it a different number
                !(prev.is_alphanumeric() || (prev == '+' && first.is_ascii_digit()))
            }
            Self::Word => !first.is_alphanumeric() || is_strict_boundary(prev),
        }
    }

    /// Check the text after a match. `last` is the last character of the
    /// fake value; `at_eof` means no more input will arrive.
    pub fn right(&self, after: &str, last: char, at_eof: bool) -> Verdict {
        let mut chars = after.chars();
        let Some(next) = chars.next() else {
            return if at_eof {
                Verdict::Valid
            } else {
                Verdict::Undecided
            };
        };

        let valid = match self {
            Self::Strict => is_strict_boundary(next),
            Self::Word => !last.is_alphanumeric() || is_strict_boundary(next),
            Self::Email => {
                if next.is_alphanumeric() || next == '@' || next == '_' {
                    false
                } else if next == '.' || next == '-' {
                    return continuation_verdict(chars.next(), at_eof, char::is_alphanumeric);
                } else {
                    true
                }
            }
            Self::Numeric => {
                if next.is_alphanumeric() {
                    false
                } else if next == '.' || next == '-' {
                    return continuation_verdict(chars.next(), at_eof, |c| c.is_ascii_digit());
                } else {
                    true
                }
            }
        };

        if valid {
            Verdict::Valid
        } else {
            Verdict::Invalid
        }
    }
}

/// A trailing `.` or `-` ends the match unless it continues it
fn continuation_verdict(
    following: Option<char>,
    at_eof: bool,
    continues: impl Fn(char) -> bool,
) -> Verdict {
    match following {
        Some(c) if continues(c) => Verdict::Invalid,
        Some(_) => Verdict::Valid,
        None if at_eof => Verdict::Valid,
        None => Verdict::Undecided,
    }
}
