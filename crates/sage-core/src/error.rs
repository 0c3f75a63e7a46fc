//! Unified error taxonomy (spec §7): aggregates every sub-crate's error
//! enum via `#[from]`. `to_wire_safe` implements the propagation policy verbatim:
//! "errors surfaced outside the core SHOULD NOT leak details about which
//! check failed ... to avoid oracles; internal logs MAY be verbose" — the
//! `Display` impl (used in `tracing` fields) stays detailed, `to_wire_safe`
//! collapses everything to one of a handful of caller-facing categories.

use thiserror::Error;

use sage_crypto::aead::AeadError;
use sage_crypto::ed25519::Ed25519Error;
use sage_crypto::hkdf::HkdfError;
use sage_crypto::hmac::HmacError;
use sage_crypto::hpke::HpkeWrapError;
use sage_crypto::x25519::X25519Error;
use sage_handshake::HandshakeError;
use sage_http_sig::HttpSigError;
use sage_resolver::ResolverError;
use sage_session::SessionError;

#[derive(Debug, Error)]
pub enum SageError {
    #[error("resolver error: {0}")]
    Resolver(#[from] ResolverError),

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("handshake error: {0}")]
    Handshake(#[from] HandshakeError),

    #[error("http signature error: {0}")]
    HttpSig(#[from] HttpSigError),

    #[error("ed25519 error: {0}")]
    Ed25519(#[from] Ed25519Error),

    #[error("x25519 error: {0}")]
    X25519(#[from] X25519Error),

    #[error("hkdf error: {0}")]
    Hkdf(#[from] HkdfError),

    #[error("hmac error: {0}")]
    Hmac(#[from] HmacError),

    #[error("hpke error: {0}")]
    Hpke(#[from] HpkeWrapError),

    #[error("aead error: {0}")]
    Aead(#[from] AeadError),

    #[error("envelope signature is invalid or malformed")]
    SignatureInvalid,
}

/// Caller-facing error category. Deliberately coarser than `SageError`'s
/// variants so a caller outside the core can't distinguish, say, a
/// transcript mismatch from a plain signature failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireErrorKind {
    Authentication,
    Replay,
    SessionUnavailable,
    Internal,
}

impl SageError {
    /// Collapse to a wire-safe `(kind, message)` pair per spec §7's
    /// propagation policy. Never includes the `Display` text of the
    /// underlying variant.
    pub fn to_wire_safe(&self) -> (WireErrorKind, &'static str) {
        use SageError::*;
        match self {
            Handshake(HandshakeError::SignatureInvalid)
            | Handshake(HandshakeError::TranscriptMismatch)
            | HttpSig(HttpSigError::SignatureInvalid)
            | HttpSig(HttpSigError::AlgorithmKeyMismatch)
            | HttpSig(HttpSigError::ContentDigestMismatch)
            | SignatureInvalid
            | Ed25519(_)
            | Resolver(_) => (WireErrorKind::Authentication, "authentication failed"),

            Handshake(HandshakeError::Replay)
            | HttpSig(HttpSigError::Replay)
            | HttpSig(HttpSigError::Expired) => (WireErrorKind::Replay, "request rejected"),

            Session(SessionError::SessionNotFound)
            | Session(SessionError::Poisoned)
            | Session(SessionError::SessionExpired)
            | Session(SessionError::SessionExhausted)
            | Session(SessionError::SessionIdle) => {
                (WireErrorKind::SessionUnavailable, "session unavailable")
            }

            Handshake(HandshakeError::SkewExceeded) => {
                (WireErrorKind::Authentication, "authentication failed")
            }

            _ => (WireErrorKind::Internal, "internal error"),
        }
    }

    /// Whether the caller should poison/tear down the session this error
    /// occurred on, per spec §7's "policy-violating sessions are poisoned
    /// in place" (the session store itself already does this for policy
    /// errors; this flags the remainder — handshake-level authentication
    /// failures — for hosts that track sessions above the store).
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SageError::Session(SessionError::AeadFailure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_failures_collapse_to_one_category() {
        let a = SageError::Handshake(HandshakeError::SignatureInvalid);
        let b = SageError::Handshake(HandshakeError::TranscriptMismatch);
        assert_eq!(a.to_wire_safe().0, WireErrorKind::Authentication);
        assert_eq!(b.to_wire_safe().0, WireErrorKind::Authentication);
        assert_eq!(a.to_wire_safe().1, b.to_wire_safe().1);
    }

    #[test]
    fn aead_failure_is_not_fatal() {
        let err = SageError::Session(SessionError::AeadFailure);
        assert!(!err.is_fatal());
    }

    #[test]
    fn poisoned_session_is_fatal() {
        let err = SageError::Session(SessionError::Poisoned);
        assert!(err.is_fatal());
    }
}
