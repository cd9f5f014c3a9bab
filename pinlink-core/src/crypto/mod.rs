//! Hash obfuscation module
//!
//! Turns a content hash into the opaque, URL-safe token used in preview links.
//! AES-256-GCM keyed by SHA-256 of the shared secret; the nonce is derived from
//! the secret and plaintext so the same input always yields the same token.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};

const NONCE_LENGTH: usize = 12;

/// Build the plaintext: `hash` alone, or `hash-deviceId` when a device is known.
fn plaintext(content_hash: &str, device_id: Option<&str>) -> String {
    match device_id.map(str::trim).filter(|d| !d.is_empty()) {
        Some(device) => format!("{content_hash}-{device}"),
        None => content_hash.to_string(),
    }
}

fn encrypt(plaintext: &[u8], secret: &str) -> Result<Vec<u8>, aes_gcm::Error> {
    let key = Sha256::digest(secret.as_bytes());
    let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| aes_gcm::Error)?;

    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(plaintext);
    let digest = hasher.finalize();
    let nonce_bytes = &digest[..NONCE_LENGTH];

    let ciphertext = cipher.encrypt(Nonce::from_slice(nonce_bytes), plaintext)?;

    let mut out = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
    out.extend_from_slice(nonce_bytes);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Obfuscate a content hash for use in a preview URL.
///
/// # Arguments
/// * `content_hash` - hash returned by the upload transport
/// * `secret` - shared secret; `None` or empty disables obfuscation
/// * `device_id` - optional device identifier appended to the plaintext
///
/// # Returns
/// The URL-safe token, or `content_hash` unchanged when no secret is set or the
/// cipher fails. Never an error: a deploy must always be able to report its link.
#[must_use]
pub fn obfuscate(content_hash: &str, secret: Option<&str>, device_id: Option<&str>) -> String {
    let Some(secret) = secret.filter(|s| !s.is_empty()) else {
        return content_hash.to_string();
    };

    let plaintext = plaintext(content_hash, device_id);
    match encrypt(plaintext.as_bytes(), secret) {
        Ok(bytes) => URL_SAFE_NO_PAD.encode(bytes),
        Err(e) => {
            log::warn!("Hash obfuscation failed, using raw hash: {e}");
            content_hash.to_string()
        }
    }
}
