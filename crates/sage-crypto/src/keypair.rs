//! The `KeyPair` sealed variant type (spec §3, §9).
//!
//! The data model describes a polymorphic keypair spanning four key types;
//! the core only ever exercises two of them. Rather than an open trait
//! hierarchy, this is a closed `enum` with match-based dispatch — the
//! unimplemented variants exist so callers reasoning about the wire format
//! (e.g. a `KeyTypeV1`-style tag from a resolver) have somewhere to land
//! without the core silently miscategorizing a key it can't use.

use crate::ed25519::Ed25519KeyPair;
use crate::x25519::X25519KeyPair;

/// Error produced when an operation is attempted on a key type the core
/// does not implement.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
#[error("key type {0:?} is not supported by the core")]
pub struct UnsupportedKeyType(pub KeyKind);

/// Discriminant for the four key types the data model names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Ed25519,
    X25519,
    Secp256k1,
    Rsa,
}

/// A polymorphic keypair. Only `Ed25519` (identity signatures) and
/// `X25519` (KEM and ephemeral DH) carry a usable implementation; the other
/// two variants are recognized but inert, matching spec §3's "the only
/// variants used by the core are Ed25519 and X25519".
pub enum KeyPair {
    Ed25519(Ed25519KeyPair),
    X25519(X25519KeyPair),
    Secp256k1,
    Rsa,
}

impl KeyPair {
    pub fn kind(&self) -> KeyKind {
        match self {
            KeyPair::Ed25519(_) => KeyKind::Ed25519,
            KeyPair::X25519(_) => KeyKind::X25519,
            KeyPair::Secp256k1 => KeyKind::Secp256k1,
            KeyPair::Rsa => KeyKind::Rsa,
        }
    }

    /// The stable fingerprint used as an ID: SHA-256 of the public key.
    pub fn fingerprint(&self) -> Result<[u8; 32], UnsupportedKeyType> {
        match self {
            KeyPair::Ed25519(kp) => Ok(crate::hash::sha256(&kp.public)),
            KeyPair::X25519(kp) => Ok(crate::hash::sha256(&kp.public)),
            KeyPair::Secp256k1 => Err(UnsupportedKeyType(KeyKind::Secp256k1)),
            KeyPair::Rsa => Err(UnsupportedKeyType(KeyKind::Rsa)),
        }
    }

    pub fn as_ed25519(&self) -> Option<&Ed25519KeyPair> {
        match self {
            KeyPair::Ed25519(kp) => Some(kp),
            _ => None,
        }
    }

    pub fn as_x25519(&self) -> Option<&X25519KeyPair> {
        match self {
            KeyPair::X25519(kp) => Some(kp),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_unsupported_kinds_error() {
        assert!(KeyPair::Secp256k1.fingerprint().is_err());
        assert!(KeyPair::Rsa.fingerprint().is_err());
    }

    #[test]
    fn kind_matches_variant() {
        let kp = KeyPair::Ed25519(Ed25519KeyPair::generate());
        assert_eq!(kp.kind(), KeyKind::Ed25519);
    }
}
