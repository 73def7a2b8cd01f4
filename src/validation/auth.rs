use crate::error::{AppError, Result};

/// Upper bound accepted for a backend-issued session lifetime (one year).
const MAX_SESSION_LIFETIME_SECS: f64 = 365.0 * 86400.0;

/// Validates an admin login email.
///
/// Only shape is checked here; the backend decides whether the account exists.
pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(AppError::Validation("Email is required".to_string()));
    }

    if email.len() > 255 {
        return Err(AppError::Validation(
            "Email must be at most 255 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates an admin login password.
pub fn validate_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(AppError::Validation("Password is required".to_string()));
    }

    if password.len() > 1024 {
        return Err(AppError::Validation(
            "Password must be at most 1024 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates the access token returned by the backend.
pub fn validate_access_token(access_token: Option<&str>) -> Result<&str> {
    match access_token {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AppError::BadGateway(
            "Invalid response from authentication service".to_string(),
        )),
    }
}

/// Turns the backend's `expiresInSeconds` into whole seconds.
///
/// The value must be finite and positive, and at least one second once floored.
pub fn validate_session_lifetime(expires_in_seconds: Option<f64>) -> Result<i64> {
    let invalid = || {
        AppError::BadGateway("Invalid response from authentication service".to_string())
    };

    let seconds = expires_in_seconds.ok_or_else(invalid)?;
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(invalid());
    }

    let whole = seconds.min(MAX_SESSION_LIFETIME_SECS).floor();
    if whole < 1.0 {
        return Err(invalid());
    }

    Ok(whole as i64)
}
