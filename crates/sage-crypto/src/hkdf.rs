//! HKDF-SHA256 extract-and-expand (spec §4.1, RFC 5869).

use hkdf::Hkdf;
use sha2::Sha256;

#[derive(Debug, thiserror::Error)]
pub enum HkdfError {
    #[error("requested output length {0} exceeds HKDF-SHA256's 255*32 byte limit")]
    OutputTooLong(usize),
}

/// Derive `length` bytes of output keying material from `ikm`, `salt`, and
/// `info`. An empty `salt` is replaced by a zero-filled salt of the hash
/// length, per RFC 5869.
pub fn hkdf_sha256(
    ikm: &[u8],
    salt: &[u8],
    info: &[u8],
    length: usize,
) -> Result<Vec<u8>, HkdfError> {
    let hk = Hkdf::<Sha256>::new(Some(salt), ikm);
    let mut okm = vec![0u8; length];
    hk.expand(info, &mut okm)
        .map_err(|_| HkdfError::OutputTooLong(length))?;
    Ok(okm)
}

/// Fixed-size variant for the common case of deriving exactly `N` bytes.
pub fn hkdf_sha256_fixed<const N: usize>(
    ikm: &[u8],
    salt: &[u8],
    info: &[u8],
) -> Result<[u8; N], HkdfError> {
    let hk = Hkdf::<Sha256>::new(Some(salt), ikm);
    let mut okm = [0u8; N];
    hk.expand(info, &mut okm)
        .map_err(|_| HkdfError::OutputTooLong(N))?;
    Ok(okm)
}
