use std::fmt;

use serde::{Deserialize, Serialize};

/// The plaintext sealed inside an admin session cookie.
///
/// `access_token` is the backend's bearer credential; it is carried, never
/// interpreted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    /// Opaque bearer token issued by the backend.
    pub access_token: String,
    /// Issued-at, Unix seconds.
    pub iat: i64,
    /// Absolute expiry, Unix seconds.
    pub exp: i64,
}

impl fmt::Debug for SessionPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionPayload")
            .field("access_token", &"<redacted>")
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .finish()
    }
}

/// Outcome of checking a presented session token.
///
/// Deliberately carries no failure reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationResult {
    /// Signature, ciphertext, expiry and payload shape all check out.
    Valid(SessionPayload),
    /// Any failure: missing, malformed, forged, tampered or expired.
    Invalid,
}

impl VerificationResult {
    /// Whether the token grants access.
    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationResult::Valid(_))
    }

    /// The verified payload, if any.
    pub fn into_payload(self) -> Option<SessionPayload> {
        match self {
            VerificationResult::Valid(payload) => Some(payload),
            VerificationResult::Invalid => None,
        }
    }
}
