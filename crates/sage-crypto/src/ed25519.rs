//! Ed25519 signatures (spec §4.1).
//!
//! Free functions over `ed25519-dalek`, not a combined identity type: the
//! core signs handshake transcripts and HTTP message bases, neither of
//! which needs a bundled X25519 key alongside the signing key.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Debug, thiserror::Error)]
pub enum Ed25519Error {
    #[error("invalid ed25519 public key")]
    InvalidPublicKey,
    #[error("invalid ed25519 private key")]
    InvalidPrivateKey,
    #[error("signature verification failed")]
    VerificationFailed,
}

/// An Ed25519 keypair. Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Ed25519KeyPair {
    #[zeroize(skip)]
    pub public: [u8; 32],
    private: [u8; 32],
}

impl Ed25519KeyPair {
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut rand_core::OsRng);
        Ed25519KeyPair {
            public: signing_key.verifying_key().to_bytes(),
            private: signing_key.to_bytes(),
        }
    }

    pub fn from_bytes(private: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&private);
        Ed25519KeyPair {
            public: signing_key.verifying_key().to_bytes(),
            private,
        }
    }

    pub fn sign(&self, msg: &[u8]) -> [u8; 64] {
        let signing_key = SigningKey::from_bytes(&self.private);
        signing_key.sign(msg).to_bytes()
    }
}

/// Sign `msg` with the 32-byte Ed25519 seed `private`.
pub fn ed25519_sign(private: &[u8; 32], msg: &[u8]) -> [u8; 64] {
    let signing_key = SigningKey::from_bytes(private);
    signing_key.sign(msg).to_bytes()
}

/// Verify an Ed25519 signature. Returns `Ok(())` on success.
pub fn ed25519_verify(
    public: &[u8; 32],
    msg: &[u8],
    sig: &[u8; 64],
) -> Result<(), Ed25519Error> {
    let verifying_key =
        VerifyingKey::from_bytes(public).map_err(|_| Ed25519Error::InvalidPublicKey)?;
    let signature = ed25519_dalek::Signature::from_bytes(sig);
    verifying_key
        .verify(msg, &signature)
        .map_err(|_| Ed25519Error::VerificationFailed)
}
