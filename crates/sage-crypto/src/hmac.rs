//! HMAC-SHA256 (spec §4.1). Used for the handshake's ack-tag key
//! confirmation, directional message integrity tags, and the `hmac-sha256`
//! HTTP signature algorithm.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, thiserror::Error)]
pub enum HmacError {
    #[error("hmac key must be non-empty")]
    InvalidKeyLength,
    #[error("hmac tag verification failed")]
    VerificationFailed,
}

/// Compute an HMAC-SHA256 tag over `msg` with `key`.
pub fn hmac_sha256(key: &[u8], msg: &[u8]) -> Result<[u8; 32], HmacError> {
    if key.is_empty() {
        return Err(HmacError::InvalidKeyLength);
    }
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| HmacError::InvalidKeyLength)?;
    mac.update(msg);
    let tag = mac.finalize().into_bytes();
    let mut out = [0u8; 32];
    out.copy_from_slice(&tag);
    Ok(out)
}

/// Verify an HMAC-SHA256 tag in constant time.
pub fn hmac_sha256_verify(key: &[u8], msg: &[u8], tag: &[u8; 32]) -> Result<(), HmacError> {
    if key.is_empty() {
        return Err(HmacError::InvalidKeyLength);
    }
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| HmacError::InvalidKeyLength)?;
    mac.update(msg);
    mac.verify_slice(tag)
        .map_err(|_| HmacError::VerificationFailed)
}
