//! HTTP signature error taxonomy (spec §7).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HttpSigError {
    #[error("missing Signature-Input header")]
    MissingSignatureInput,

    #[error("missing Signature header")]
    MissingSignature,

    #[error("malformed Signature-Input parameters")]
    MalformedParams,

    #[error("covered component is missing from the request")]
    MissingComponent,

    #[error("signature verification failed")]
    SignatureInvalid,

    #[error("algorithm does not match the resolved key type")]
    AlgorithmKeyMismatch,

    #[error("content-digest does not match the recomputed body hash")]
    ContentDigestMismatch,

    #[error("(kid, nonce) pair already seen")]
    Replay,

    #[error("signature is outside the allowed max_age window")]
    Expired,

    #[error("session or key lookup failed: {0}")]
    KeyResolution(String),
}
