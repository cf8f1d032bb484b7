//! Value fingerprints for log correlation

use sha2::{Digest, Sha256};

/// Hex characters kept from the digest
const FINGERPRINT_LEN: usize = 12;

/// Short SHA-256 fingerprint of a value. Never log plaintext real or fake
/// values; log this instead.
pub fn fingerprint(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    let mut hex = format!("{:x}", digest);
    hex.truncate(FINGERPRINT_LEN);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable_and_short() {
        let a = fingerprint("María González");
        assert_eq!(a.len(), FINGERPRINT_LEN);
        assert_eq!(a, fingerprint("María González"));
        assert_ne!(a, fingerprint("Juan Pérez"));
    }

    #[test]
    fn test_fingerprint_known_value() {
        // sha256("abc") = ba7816bf8f01cfea...
        assert_eq!(fingerprint("abc"), "ba7816bf8f01");
    }
}
