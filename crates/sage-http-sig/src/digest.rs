//! `Content-Digest` construction and verification (spec §4.6: "the
//! verifier MUST independently recompute SHA-256(body) and reject
//! mismatch").

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::HttpSigError;

/// `sha-256=:<base64 of SHA-256(body)>:`.
pub fn content_digest_header(body: &[u8]) -> String {
    let hash = sage_crypto::hash::sha256(body);
    format!("sha-256=:{}:", BASE64.encode(hash))
}

/// Recompute `SHA-256(body)` and compare it against the `sha-256=:...:`
/// value from a `Content-Digest` header.
pub fn verify_content_digest(body: &[u8], header_value: &str) -> Result<(), HttpSigError> {
    let encoded = header_value
        .strip_prefix("sha-256=:")
        .and_then(|s| s.strip_suffix(':'))
        .ok_or(HttpSigError::ContentDigestMismatch)?;
    let claimed = BASE64
        .decode(encoded)
        .map_err(|_| HttpSigError::ContentDigestMismatch)?;
    let actual = sage_crypto::hash::sha256(body);
    if constant_time_eq::constant_time_eq(&claimed, &actual) {
        Ok(())
    } else {
        Err(HttpSigError::ContentDigestMismatch)
    }
}
