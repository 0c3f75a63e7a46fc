//! Session-ID and directional key derivation (spec §4.4).

use sage_crypto::hkdf::hkdf_sha256;

const SID_SALT: &[u8] = b"sage/sid v1";
const SESSION_KEYS_INFO_PREFIX: &[u8] = b"sage-session-keys-v1";

/// `id = HKDF-SHA256(seed, salt = "sage/sid v1", info = context_label, L=32)`.
///
/// Deterministic: the same `(seed, context_label)` always yields the same
/// id, on either peer.
pub fn derive_session_id(seed: &[u8], context_label: &str) -> [u8; 32] {
    let okm = hkdf_sha256(seed, SID_SALT, context_label.as_bytes(), 32)
        .expect("32 bytes is well under HKDF-SHA256's output limit");
    let mut out = [0u8; 32];
    out.copy_from_slice(&okm);
    out
}

/// The four directional keys sliced out of one 128-byte HKDF expansion.
pub struct SessionKeyMaterial {
    pub k_c2s_aead: [u8; 32],
    pub k_s2c_aead: [u8; 32],
    pub k_c2s_hmac: [u8; 32],
    pub k_s2c_hmac: [u8; 32],
}

impl SessionKeyMaterial {
    /// `info = "sage-session-keys-v1" || seed_fingerprint`, where the
    /// fingerprint is SHA-256(seed) so the label doesn't grow with the
    /// seed's own length.
    pub fn derive(seed: &[u8]) -> Self {
        let fingerprint = sage_crypto::hash::sha256(seed);
        let mut info = Vec::with_capacity(SESSION_KEYS_INFO_PREFIX.len() + 32);
        info.extend_from_slice(SESSION_KEYS_INFO_PREFIX);
        info.extend_from_slice(&fingerprint);

        let km = hkdf_sha256(seed, &[], &info, 128)
            .expect("128 bytes is well under HKDF-SHA256's output limit");

        let mut k_c2s_aead = [0u8; 32];
        let mut k_s2c_aead = [0u8; 32];
        let mut k_c2s_hmac = [0u8; 32];
        let mut k_s2c_hmac = [0u8; 32];
        k_c2s_aead.copy_from_slice(&km[0..32]);
        k_s2c_aead.copy_from_slice(&km[32..64]);
        k_c2s_hmac.copy_from_slice(&km[64..96]);
        k_s2c_hmac.copy_from_slice(&km[96..128]);

        SessionKeyMaterial {
            k_c2s_aead,
            k_s2c_aead,
            k_c2s_hmac,
            k_s2c_hmac,
        }
    }

    /// `(k_out_aead, k_in_aead, k_out_hmac, k_in_hmac)` for the given role.
    pub fn directional(&self, is_initiator: bool) -> ([u8; 32], [u8; 32], [u8; 32], [u8; 32]) {
        if is_initiator {
            (
                self.k_c2s_aead,
                self.k_s2c_aead,
                self.k_c2s_hmac,
                self.k_s2c_hmac,
            )
        } else {
            (
                self.k_s2c_aead,
                self.k_c2s_aead,
                self.k_s2c_hmac,
                self.k_c2s_hmac,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_is_deterministic() {
        let seed = b"some combined handshake secret..";
        let a = derive_session_id(seed, "sage/hpke v1");
        let b = derive_session_id(seed, "sage/hpke v1");
        assert_eq!(a, b);
    }

    #[test]
    fn session_id_differs_by_label() {
        let seed = b"some combined handshake secret..";
        let a = derive_session_id(seed, "label-a");
        let b = derive_session_id(seed, "label-b");
        assert_ne!(a, b);
    }

    #[test]
    fn initiator_and_responder_see_swapped_directions() {
        let seed = b"seed-for-direction-test-12345678";
        let km = SessionKeyMaterial::derive(seed);
        let (c_out, c_in, c_out_h, c_in_h) = km.directional(true);
        let (s_out, s_in, s_out_h, s_in_h) = km.directional(false);
        assert_eq!(c_out, s_in);
        assert_eq!(c_in, s_out);
        assert_eq!(c_out_h, s_in_h);
        assert_eq!(c_in_h, s_out_h);
    }

    #[test]
    fn all_four_keys_distinct() {
        let km = SessionKeyMaterial::derive(b"another seed value 1234567890ab");
        let keys = [km.k_c2s_aead, km.k_s2c_aead, km.k_c2s_hmac, km.k_s2c_hmac];
        for i in 0..keys.len() {
            for j in (i + 1)..keys.len() {
                assert_ne!(keys[i], keys[j]);
            }
        }
    }
}
