//! Handshake error taxonomy (spec §7).

use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum HandshakeError {
    #[error("ed25519 signature verification failed")]
    SignatureInvalid,

    #[error("handshake init replayed within the replay window")]
    Replay,

    #[error("info or export_ctx disagree between peers, or ack_tag mismatch")]
    TranscriptMismatch,

    #[error("timestamp outside the allowed clock skew")]
    SkewExceeded,

    #[error("did resolution failed: {0}")]
    Resolver(String),

    #[error("crypto internal error: {0}")]
    CryptoInternal(String),

    #[error("kid already bound to a different session")]
    KeyIdConflict,
}
