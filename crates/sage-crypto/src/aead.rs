//! ChaCha20-Poly1305 AEAD (spec §4.1).
//!
//! `aead_seal`/`aead_open` take the nonce as an explicit argument rather
//! than generating one internally — the session layer constructs nonces
//! deterministically from a directional counter (spec §4.4), so this layer
//! must not own nonce generation.

use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AeadError {
    #[error("aead seal or open operation failed (wrong key, nonce, aad, or tampered ciphertext)")]
    OperationFailed,
}

/// Seal `plaintext` under `key` (32 bytes), `nonce` (12 bytes), and
/// associated data `aad`. Returns ciphertext with the 16-byte Poly1305 tag
/// appended.
pub fn aead_seal(
    key: &[u8; 32],
    nonce: &[u8; 12],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, AeadError> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    cipher
        .encrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|_| AeadError::OperationFailed)
}

/// Open a ciphertext produced by [`aead_seal`]. The Poly1305 tag is
/// verified in constant time by the underlying crate before any plaintext
/// is returned.
pub fn aead_open(
    key: &[u8; 32],
    nonce: &[u8; 12],
    aad: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, AeadError> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    cipher
        .decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| AeadError::OperationFailed)
}
