use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use aes_gcm::aead::rand_core::RngCore;
use serde::{de::DeserializeOwned, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::codec::{
    base64_url_decode_to_bytes, base64_url_encode_bytes, json_from_bytes, json_to_bytes,
};
use crate::crypto::signing::sha256_bytes;
use crate::error::{AppError, Result};

/// Length of the session encryption key (SHA-256 output).
pub const KEY_SIZE: usize = 32;
/// Length of the IV that prefixes every encrypted session payload.
pub const NONCE_SIZE: usize = 12;

/// Session encryption key derived from `ADMIN_SESSION_SECRET`; wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecureKey([u8; KEY_SIZE]);

impl SecureKey {
    /// Wraps already-derived key bytes.
    pub fn new(key: [u8; KEY_SIZE]) -> Self {
        Self(key)
    }

    /// Raw key bytes for building the cipher.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

/// Derives the AES-256-GCM key for a session secret: `SHA-256(secret)`.
pub fn import_aes_gcm_key(secret: &str) -> SecureKey {
    SecureKey::new(sha256_bytes(secret))
}

/// Draws a fresh IV from the OS RNG. Called once per sealed payload; an IV is
/// never reused under the same session key.
pub fn generate_nonce() -> [u8; NONCE_SIZE] {
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Seals session bytes under `key`.
///
/// # Returns
///
/// The ciphertext with its 16-byte GCM tag appended, and the IV it was sealed
/// with (the caller prefixes it to the token segment).
pub fn encrypt(key: &SecureKey, plaintext: &[u8]) -> Result<(Vec<u8>, [u8; NONCE_SIZE])> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let nonce_bytes = generate_nonce();
    let nonce = Nonce::from(nonce_bytes);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| AppError::Encryption(format!("Encryption failed: {}", e)))?;

    Ok((ciphertext, nonce_bytes))
}

/// Opens a sealed session segment. A tag mismatch (tampering or the wrong
/// secret) is an `Encryption` error, never corrupted plaintext.
pub fn decrypt(key: &SecureKey, ciphertext: &[u8], nonce: &[u8; NONCE_SIZE]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());
    let nonce = Nonce::from(*nonce);

    cipher
        .decrypt(&nonce, ciphertext)
        .map_err(|e| AppError::Encryption(format!("Decryption failed: {}", e)))
}

/// Encrypts the JSON form of `value`.
///
/// # Returns
///
/// base64url of `nonce || ciphertext || tag`.
pub fn encrypt_json<T: Serialize>(secret: &str, value: &T) -> Result<String> {
    let key = import_aes_gcm_key(secret);
    let plaintext = zeroize::Zeroizing::new(json_to_bytes(value)?);
    let (ciphertext, nonce) = encrypt(&key, &plaintext)?;

    let mut framed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    framed.extend_from_slice(&nonce);
    framed.extend_from_slice(&ciphertext);

    Ok(base64_url_encode_bytes(&framed))
}

/// Inverse of [`encrypt_json`]. Fails on short input, a bad tag or invalid JSON.
pub fn decrypt_json<T: DeserializeOwned>(secret: &str, encrypted: &str) -> Result<T> {
    let framed = base64_url_decode_to_bytes(encrypted)?;
    if framed.len() <= NONCE_SIZE {
        return Err(AppError::Decode(format!(
            "Encrypted payload too short: {} bytes",
            framed.len()
        )));
    }

    let (nonce, ciphertext) = framed.split_at(NONCE_SIZE);
    let nonce: [u8; NONCE_SIZE] = nonce
        .try_into()
        .map_err(|_| AppError::Decode("Invalid nonce length".to_string()))?;

    let key = import_aes_gcm_key(secret);
    let plaintext = zeroize::Zeroizing::new(decrypt(&key, ciphertext, &nonce)?);

    json_from_bytes(&plaintext)
}
