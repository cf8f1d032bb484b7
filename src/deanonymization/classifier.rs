//! Entity classification from the shape of a fake value
//!
//! Classification runs once per map entry when the reverse map is built.
//! The checks are plain character predicates, evaluated in a fixed order:
//!
//! 1. contains `@` => [`EntityType::Email`]
//! 2. IBAN shape => [`EntityType::Iban`]
//! 3. phone shape => [`EntityType::Phone`]
//! 4. several capitalised words => [`EntityType::PersonName`]
//! 5. anything else => [`EntityType::Generic`]

use super::models::EntityType;

/// Minimum number of national digits in a phone number
pub const PHONE_MIN_DIGITS: usize = 7;
/// Maximum number of national digits in a phone number
pub const PHONE_MAX_DIGITS: usize = 12;
/// Longest country code accepted in front of a phone number
pub const COUNTRY_CODE_MAX_DIGITS: usize = 3;
/// Shortest IBAN across all countries
pub const IBAN_MIN_LEN: usize = 15;
/// Longest IBAN across all countries
pub const IBAN_MAX_LEN: usize = 34;
/// Spanish IBANs always have this length
pub const IBAN_ES_LEN: usize = 24;

/// Classify a fake value. Never fails; unknown shapes are `Generic`.
pub fn classify(fake_value: &str) -> EntityType {
    let value = fake_value.trim();

    if value.contains('@') {
        EntityType::Email
    } else if is_iban_shape(value) {
        EntityType::Iban
    } else if is_phone_shape(value) {
        EntityType::Phone
    } else if is_person_name_shape(value) {
        EntityType::PersonName
    } else {
        EntityType::Generic
    }
}

/// Returns the uppercase alphanumerics of an IBAN-shaped value, with
/// spaces and hyphens removed, or `None` if the value is not IBAN-shaped.
pub fn normalize_iban(value: &str) -> Option<String> {
    let mut compact = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            ' ' | '-' => continue,
            c if c.is_ascii_alphanumeric() => compact.push(c.to_ascii_uppercase()),
            _ => return None,
        }
    }

    let bytes = compact.as_bytes();
    if bytes.len() < 4
        || !bytes[..2].iter().all(u8::is_ascii_uppercase)
        || !bytes[2..4].iter().all(u8::is_ascii_digit)
        || !bytes[4..].iter().any(u8::is_ascii_digit)
    {
        return None;
    }

    let valid_len = if &compact[..2] == "ES" {
        compact.len() == IBAN_ES_LEN
    } else {
        (IBAN_MIN_LEN..=IBAN_MAX_LEN).contains(&compact.len())
    };

    valid_len.then_some(compact)
}

fn is_iban_shape(value: &str) -> bool {
    normalize_iban(value).is_some()
}

/// Split a phone-shaped value into its optional country-code marker and
/// the digits that follow it.
///
/// Accepted prefixes are `+CC`, `(+CC)` and `(CC)`; the rest may only hold
/// digits separated by single spaces or hyphens.
fn split_phone_prefix(value: &str) -> Option<(bool, &str)> {
    if let Some(rest) = value.strip_prefix("(+").or_else(|| value.strip_prefix('(')) {
        let close = rest.find(')')?;
        let code = &rest[..close];
        if code.is_empty()
            || code.len() > COUNTRY_CODE_MAX_DIGITS
            || !code.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        return Some((true, rest[close + 1..].trim_start()));
    }

    if let Some(rest) = value.strip_prefix('+') {
        return Some((true, rest));
    }

    Some((false, value))
}

fn is_phone_shape(value: &str) -> bool {
    let Some((has_country_code, body)) = split_phone_prefix(value) else {
        return false;
    };

    let mut digits = 0;
    let mut previous_separator = true;
    for c in body.chars() {
        match c {
            '0'..='9' => {
                digits += 1;
                previous_separator = false;
            }
            ' ' | '-' if !previous_separator => previous_separator = true,
            _ => return false,
        }
    }
    if previous_separator {
        // empty body or trailing separator
        return false;
    }

    let (min, max) = if has_country_code && value.starts_with('+') {
        // "+34612345678": the code is glued to the number
        (PHONE_MIN_DIGITS + 1, PHONE_MAX_DIGITS + COUNTRY_CODE_MAX_DIGITS)
    } else {
        (PHONE_MIN_DIGITS, PHONE_MAX_DIGITS)
    };
    (min..=max).contains(&digits)
}

fn is_person_name_shape(value: &str) -> bool {
    if !value.contains(char::is_whitespace) {
        return false;
    }
    value
        .split_whitespace()
        .all(|part| part.chars().next().is_some_and(char::is_uppercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert_eq!(classify("ana.lopez@example.com"), EntityType::Email);
        assert_eq!(classify("@handle"), EntityType::Email);
    }

    #[test]
    fn test_iban() {
        assert_eq!(classify("ES91 2100 0418 4502 0005 1332"), EntityType::Iban);
        assert_eq!(classify("ES9121000418450200051332"), EntityType::Iban);
        assert_eq!(classify("DE89370400440532013000"), EntityType::Iban);
        assert_eq!(classify("GB29-NWBK-6016-1331-9268-19"), EntityType::Iban);
    }

    #[test]
    fn test_iban_spanish_length_is_exact() {
        // 23 characters with an ES prefix is not a Spanish IBAN
        assert_ne!(classify("ES912100041845020005133"), EntityType::Iban);
    }

    #[test]
    fn test_normalize_iban() {
        assert_eq!(
            normalize_iban("es91 2100 0418 4502 0005 1332").as_deref(),
            Some("ES9121000418450200051332")
        );
        assert!(normalize_iban("ES91 2100 0418 4502 0005 133!").is_none());
        assert!(normalize_iban("ABCD").is_none());
    }

    #[test]
    fn test_phone() {
        assert_eq!(classify("612 345 678"), EntityType::Phone);
        assert_eq!(classify("612345678"), EntityType::Phone);
        assert_eq!(classify("+34 612-345-678"), EntityType::Phone);
        assert_eq!(classify("+34612345678"), EntityType::Phone);
        assert_eq!(classify("(+34) 612 345 678"), EntityType::Phone);
        assert_eq!(classify("(34) 612345678"), EntityType::Phone);
    }

    #[test]
    fn test_phone_rejects_bad_shapes() {
        assert_eq!(classify("123456"), EntityType::Generic);
        assert_eq!(classify("612--345-678"), EntityType::Generic);
        assert_eq!(classify("612 345 678-"), EntityType::Generic);
        assert_eq!(classify("(+1234) 612345678"), EntityType::Generic);
        assert_eq!(classify("6123456789012345"), EntityType::Generic);
    }

    #[test]
    fn test_person_name() {
        assert_eq!(classify("Juan Pérez"), EntityType::PersonName);
        assert_eq!(classify("Álvaro de la Torre"), EntityType::Generic);
        assert_eq!(classify("María José Ruiz"), EntityType::PersonName);
    }

    #[test]
    fn test_generic() {
        assert_eq!(classify("Madrid"), EntityType::Generic);
        assert_eq!(classify("[PERSON_1]"), EntityType::Generic);
        assert_eq!(classify("12345678Z"), EntityType::Generic);
    }
}
