//! Signing and verifying a `SecureMessage`'s envelope over its canonical
//! bytes (spec §6). Before a session exists (the handshake-completion
//! message itself) this is an Ed25519 signature under the agent's identity
//! key; afterward it's the session's own HMAC, the same split
//! `sage-http-sig::SigningKey`/`ResolvedKey` already draws between pre- and
//! post-handshake authentication.

use sage_crypto::ed25519::{ed25519_verify, Ed25519KeyPair};
use sage_session::Session;

use crate::error::SageError;
use crate::message::{canonical_secure_message_bytes, SecureMessage};

/// Key used to produce a `SecureMessage`'s `signature` field.
pub enum EnvelopeKey<'a> {
    Ed25519(&'a Ed25519KeyPair),
    Session(&'a Session),
}

/// Key used to check a `SecureMessage`'s `signature` field.
pub enum EnvelopeVerifyKey<'a> {
    Ed25519(&'a [u8; 32]),
    Session(&'a Session),
}

/// Sign `message`'s canonical bytes, filling in its `signature` field.
pub fn sign_secure_message(message: &mut SecureMessage, key: &EnvelopeKey<'_>) -> Result<(), SageError> {
    let base = canonical_secure_message_bytes(message);
    message.signature = match key {
        EnvelopeKey::Ed25519(kp) => kp.sign(&base).to_vec(),
        EnvelopeKey::Session(session) => session
            .sign_covered(&base)
            .map_err(SageError::Session)?
            .to_vec(),
    };
    Ok(())
}

/// Verify `message`'s `signature` field against its canonical bytes.
pub fn verify_secure_message(message: &SecureMessage, key: &EnvelopeVerifyKey<'_>) -> Result<(), SageError> {
    let base = canonical_secure_message_bytes(message);
    match key {
        EnvelopeVerifyKey::Ed25519(pub_key) => {
            let sig: [u8; 64] = message
                .signature
                .as_slice()
                .try_into()
                .map_err(|_| SageError::SignatureInvalid)?;
            ed25519_verify(pub_key, &base, &sig).map_err(|_| SageError::SignatureInvalid)
        }
        EnvelopeVerifyKey::Session(session) => {
            let tag: [u8; 32] = message
                .signature
                .as_slice()
                .try_into()
                .map_err(|_| SageError::SignatureInvalid)?;
            session
                .verify_covered(&base, &tag)
                .map_err(|_| SageError::SignatureInvalid)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Role, HPKE_COMPLETE_TASK_ID};
    use sage_session::SessionConfig;

    fn sample() -> SecureMessage {
        SecureMessage {
            id: "msg-1".to_string(),
            context_id: "ctx-1".to_string(),
            task_id: HPKE_COMPLETE_TASK_ID.to_string(),
            payload: b"ciphertext".to_vec(),
            did: "did:sage:test:client".to_string(),
            signature: Vec::new(),
            metadata: Vec::new(),
            role: Role::Agent,
        }
    }

    #[test]
    fn ed25519_sign_then_verify_succeeds() {
        let kp = Ed25519KeyPair::generate();
        let mut message = sample();
        sign_secure_message(&mut message, &EnvelopeKey::Ed25519(&kp)).unwrap();
        assert!(verify_secure_message(&message, &EnvelopeVerifyKey::Ed25519(&kp.public)).is_ok());
    }

    #[test]
    fn ed25519_verify_rejects_tampered_payload() {
        let kp = Ed25519KeyPair::generate();
        let mut message = sample();
        sign_secure_message(&mut message, &EnvelopeKey::Ed25519(&kp)).unwrap();
        message.payload = b"tampered".to_vec();
        assert!(verify_secure_message(&message, &EnvelopeVerifyKey::Ed25519(&kp.public)).is_err());
    }

    #[test]
    fn session_sign_then_verify_succeeds_across_peers() {
        let seed = b"shared combined handshake seed!";
        let client = Session::from_exporter(seed, "sage/hpke v1", true, SessionConfig::default());
        let server = Session::from_exporter(seed, "sage/hpke v1", false, SessionConfig::default());

        let mut message = sample();
        sign_secure_message(&mut message, &EnvelopeKey::Session(&client)).unwrap();
        assert!(verify_secure_message(&message, &EnvelopeVerifyKey::Session(&server)).is_ok());
    }
}
