use base64::{engine::general_purpose, Engine as _};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{AppError, Result};

/// Encodes bytes as standard, padded base64.
pub fn bytes_to_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decodes standard, padded base64.
pub fn base64_to_bytes(base64: &str) -> Result<Vec<u8>> {
    general_purpose::STANDARD
        .decode(base64)
        .map_err(|e| AppError::Decode(format!("Invalid base64: {}", e)))
}

/// Encodes bytes as base64url without padding.
pub fn base64_url_encode_bytes(bytes: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Decodes base64url. Trailing `=` padding is tolerated but not required.
pub fn base64_url_decode_to_bytes(input: &str) -> Result<Vec<u8>> {
    general_purpose::URL_SAFE_NO_PAD
        .decode(input.trim_end_matches('='))
        .map_err(|e| AppError::Decode(format!("Invalid base64url: {}", e)))
}

/// Serializes `value` to JSON and frames it as base64url.
pub fn base64_url_encode_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(base64_url_encode_bytes(&json_to_bytes(value)?))
}

/// Inverse of [`base64_url_encode_json`].
pub fn base64_url_decode_json<T: DeserializeOwned>(input: &str) -> Result<T> {
    json_from_bytes(&base64_url_decode_to_bytes(input)?)
}

/// UTF-8 JSON bytes of `value`.
pub fn json_to_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    sonic_rs::to_vec(value).map_err(|e| AppError::Internal(format!("JSON serialization failed: {}", e)))
}

/// Parses UTF-8 JSON bytes.
pub fn json_from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| AppError::Decode(format!("Invalid UTF-8: {}", e)))?;

    sonic_rs::from_str(text).map_err(|e| AppError::Decode(format!("Invalid JSON: {}", e)))
}
