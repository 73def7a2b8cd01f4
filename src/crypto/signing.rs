use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::crypto::codec::base64_url_encode_bytes;
use crate::error::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Signs `data` with HMAC-SHA256 keyed by the raw secret bytes.
///
/// # Returns
///
/// The base64url (unpadded) encoding of the 32-byte MAC.
pub fn sign(secret: &str, data: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Encryption(format!("HMAC key rejected: {}", e)))?;
    mac.update(data.as_bytes());

    Ok(base64_url_encode_bytes(&mac.finalize().into_bytes()))
}

/// Plain SHA-256 of the UTF-8 input.
///
/// Only used to derive the AES key, so the encryption key never equals the
/// signing key.
pub fn sha256_bytes(input: &str) -> [u8; 32] {
    Sha256::digest(input.as_bytes()).into()
}

/// Compares two strings without leaking the position of the first mismatch.
///
/// A length mismatch returns early; signatures are fixed-length, so length is
/// not secret.
pub fn timing_safe_equal(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::codec::base64_url_decode_to_bytes;

    #[test]
    fn test_sign_matches_rfc4231_vector() {
        // RFC 4231 test case 2.
        let signature = sign("Jefe", "what do ya want for nothing?").unwrap();
        let raw = base64_url_decode_to_bytes(&signature).unwrap();

        let expected: [u8; 32] = [
            0x5b, 0xdc, 0xc1, 0x46, 0xbf, 0x60, 0x75, 0x4e, 0x6a, 0x04, 0x24, 0x26, 0x08, 0x95,
            0x75, 0xc7, 0x5a, 0x00, 0x3f, 0x08, 0x9d, 0x27, 0x39, 0x83, 0x9d, 0xec, 0x58, 0xb9,
            0x64, 0xec, 0x38, 0x43,
        ];
        assert_eq!(raw, expected);
        assert_eq!(signature.len(), 43);
        assert!(!signature.contains('='));
    }

    #[test]
    fn test_sign_depends_on_secret_and_data() {
        let base = sign("secret-a", "payload").unwrap();
        assert_eq!(base, sign("secret-a", "payload").unwrap());
        assert_ne!(base, sign("secret-b", "payload").unwrap());
        assert_ne!(base, sign("secret-a", "payload!").unwrap());
    }

    #[test]
    fn test_sha256_of_empty_string() {
        let digest = sha256_bytes("");
        assert_eq!(digest[..4], [0xe3, 0xb0, 0xc4, 0x42]);
    }

    #[test]
    fn test_timing_safe_equal() {
        assert!(timing_safe_equal("abcdef", "abcdef"));
        assert!(!timing_safe_equal("abcdef", "abcdeg"));
        assert!(!timing_safe_equal("xbcdef", "abcdef"));
        assert!(!timing_safe_equal("abc", "abcdef"));
        assert!(timing_safe_equal("", ""));
    }
}
