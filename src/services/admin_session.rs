use chrono::Utc;

use crate::crypto::aes::{decrypt_json, encrypt_json};
use crate::crypto::signing::{sign, timing_safe_equal};
use crate::error::{AppError, Result};
use crate::models::session::{SessionPayload, VerificationResult};

/// Name of the cookie carrying the admin session token.
pub const ADMIN_SESSION_COOKIE: &str = "connectnow_admin_session";

fn now_seconds() -> i64 {
    Utc::now().timestamp()
}

/// Mints a session token wrapping `access_token` for `expires_in_seconds`.
///
/// Token format: `base64url(nonce || AES-GCM ciphertext) "." base64url(HMAC-SHA256)`,
/// where the HMAC covers the encrypted segment.
pub fn create_admin_session_token(
    secret: &str,
    access_token: &str,
    expires_in_seconds: i64,
) -> Result<String> {
    create_admin_session_token_at(secret, access_token, expires_in_seconds, now_seconds())
}

/// Same as [`create_admin_session_token`] with an explicit issue time.
pub fn create_admin_session_token_at(
    secret: &str,
    access_token: &str,
    expires_in_seconds: i64,
    now: i64,
) -> Result<String> {
    if access_token.is_empty() {
        return Err(AppError::Validation("Access token must not be empty".to_string()));
    }
    if expires_in_seconds <= 0 {
        return Err(AppError::Validation(format!(
            "Session lifetime must be positive, got {}",
            expires_in_seconds
        )));
    }

    let exp = now
        .checked_add(expires_in_seconds)
        .ok_or_else(|| AppError::Validation("Session lifetime overflows".to_string()))?;

    let payload = SessionPayload {
        access_token: access_token.to_string(),
        iat: now,
        exp,
    };

    let encrypted_payload = encrypt_json(secret, &payload)?;
    let signature = sign(secret, &encrypted_payload)?;

    Ok(format!("{}.{}", encrypted_payload, signature))
}

/// Checks a presented token against `secret` at the current time.
pub fn verify_admin_session_token(token: Option<&str>, secret: &str) -> VerificationResult {
    verify_admin_session_token_at(token, secret, now_seconds())
}

/// Same as [`verify_admin_session_token`] with an explicit clock.
///
/// A token whose `exp` equals `now` is still accepted.
pub fn verify_admin_session_token_at(
    token: Option<&str>,
    secret: &str,
    now: i64,
) -> VerificationResult {
    let Some(token) = token else {
        return VerificationResult::Invalid;
    };

    let mut parts = token.split('.');
    let (Some(encrypted_payload), Some(signature), None) =
        (parts.next(), parts.next(), parts.next())
    else {
        return VerificationResult::Invalid;
    };
    if encrypted_payload.is_empty() || signature.is_empty() {
        return VerificationResult::Invalid;
    }

    let expected = match sign(secret, encrypted_payload) {
        Ok(expected) => expected,
        Err(e) => {
            tracing::error!("❌ Session signing unavailable: {}", e);
            return VerificationResult::Invalid;
        }
    };
    if !timing_safe_equal(&expected, signature) {
        tracing::debug!("Session signature mismatch");
        return VerificationResult::Invalid;
    }

    let payload: SessionPayload = match decrypt_json(secret, encrypted_payload) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::debug!("Session payload rejected: {}", e);
            return VerificationResult::Invalid;
        }
    };

    if payload.exp < now {
        tracing::debug!("Session expired at {}", payload.exp);
        return VerificationResult::Invalid;
    }

    if payload.access_token.is_empty() {
        return VerificationResult::Invalid;
    }

    VerificationResult::Valid(payload)
}
