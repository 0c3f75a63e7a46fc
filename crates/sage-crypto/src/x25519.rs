//! X25519 Diffie-Hellman (spec §4.1).
//!
//! Per RFC 7748 §6.1, an all-zero output indicates the peer supplied a
//! small-order or otherwise degenerate public point; every caller of
//! [`x25519_dh`] MUST reject the result rather than use it as key material.
//! That check lives here, once, so the handshake and session layers can't
//! forget it.

use x25519_dalek::{EphemeralSecret, PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum X25519Error {
    #[error("x25519 diffie-hellman produced an all-zero shared secret")]
    DegenerateSharedSecret,
}

/// A long-lived X25519 keypair. Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct X25519KeyPair {
    #[zeroize(skip)]
    pub public: [u8; 32],
    private: [u8; 32],
}

impl X25519KeyPair {
    pub fn generate() -> Self {
        let secret = StaticSecret::random_from_rng(rand_core::OsRng);
        let public = PublicKey::from(&secret);
        X25519KeyPair {
            public: public.to_bytes(),
            private: secret.to_bytes(),
        }
    }

    pub fn from_bytes(private: [u8; 32]) -> Self {
        let secret = StaticSecret::from(private);
        let public = PublicKey::from(&secret);
        X25519KeyPair {
            public: public.to_bytes(),
            private,
        }
    }

    pub fn diffie_hellman(&self, their_public: &[u8; 32]) -> Result<[u8; 32], X25519Error> {
        x25519_dh(&self.private, their_public)
    }
}

/// Compute the X25519 shared secret between a 32-byte private scalar and a
/// 32-byte public point, rejecting an all-zero result.
pub fn x25519_dh(private: &[u8; 32], public: &[u8; 32]) -> Result<[u8; 32], X25519Error> {
    let secret = StaticSecret::from(*private);
    let their_public = PublicKey::from(*public);
    let shared = secret.diffie_hellman(&their_public);
    let shared_bytes = shared.to_bytes();
    if constant_time_eq::constant_time_eq(&shared_bytes, &[0u8; 32]) {
        return Err(X25519Error::DegenerateSharedSecret);
    }
    Ok(shared_bytes)
}

/// A single-use ephemeral X25519 keypair for the handshake's per-session
/// ephemeral exchange. Consumed by [`EphemeralKeyPair::diffie_hellman`],
/// which takes `self` so the scalar cannot be reused.
pub struct EphemeralKeyPair {
    secret: EphemeralSecret,
    pub public: [u8; 32],
}

impl EphemeralKeyPair {
    pub fn generate() -> Self {
        let secret = EphemeralSecret::random_from_rng(rand_core::OsRng);
        let public = PublicKey::from(&secret);
        EphemeralKeyPair {
            secret,
            public: public.to_bytes(),
        }
    }

    pub fn diffie_hellman(self, their_public: &[u8; 32]) -> Result<[u8; 32], X25519Error> {
        let their_public = PublicKey::from(*their_public);
        let shared = self.secret.diffie_hellman(&their_public);
        let shared_bytes = shared.to_bytes();
        if constant_time_eq::constant_time_eq(&shared_bytes, &[0u8; 32]) {
            return Err(X25519Error::DegenerateSharedSecret);
        }
        Ok(shared_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dh_agrees_both_directions() {
        let a = X25519KeyPair::generate();
        let b = X25519KeyPair::generate();
        let shared_a = a.diffie_hellman(&b.public).unwrap();
        let shared_b = b.diffie_hellman(&a.public).unwrap();
        assert_eq!(shared_a, shared_b);
    }

    #[test]
    fn all_zero_public_key_is_rejected() {
        let a = X25519KeyPair::generate();
        let zero_public = [0u8; 32];
        assert_eq!(
            a.diffie_hellman(&zero_public),
            Err(X25519Error::DegenerateSharedSecret)
        );
    }

    #[test]
    fn ephemeral_exchange_agrees() {
        let eph = EphemeralKeyPair::generate();
        let eph_public = eph.public;
        let long_term = X25519KeyPair::generate();
        let shared_initiator = eph.diffie_hellman(&long_term.public).unwrap();
        let shared_responder = long_term.diffie_hellman(&eph_public).unwrap();
        assert_eq!(shared_initiator, shared_responder);
    }
}
