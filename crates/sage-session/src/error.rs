//! Session error taxonomy (spec §7).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session not found")]
    SessionNotFound,

    #[error("session expired (max_age exceeded)")]
    SessionExpired,

    #[error("session idle timeout exceeded")]
    SessionIdle,

    #[error("session message cap exhausted")]
    SessionExhausted,

    #[error("session is poisoned by a prior policy violation")]
    Poisoned,

    #[error("aead operation failed")]
    AeadFailure,

    #[error("kid already bound to a different session")]
    KeyIdConflict,

    #[error("wire message too short to contain a nonce and tag")]
    MalformedWire,

    #[error("unexpected inbound direction byte")]
    WrongDirection,

    #[error("crypto internal error: {0}")]
    CryptoInternal(String),
}
