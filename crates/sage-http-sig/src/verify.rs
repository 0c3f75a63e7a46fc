//! `verify_request` (spec §4.6): pure on inputs plus a replay-cache side
//! effect.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use sage_crypto::ed25519::ed25519_verify;
use sage_session::SessionStore;

use crate::base::build_signature_base;
use crate::components::Component;
use crate::digest::verify_content_digest;
use crate::error::HttpSigError;
use crate::params::{SignatureAlgorithm, SignatureParams};
use crate::request::SignableRequest;

/// What a covered signature resolves to: either a DID's Ed25519 signing
/// key, or the bound session (so HMAC verification can reuse the
/// session's own direction-appropriate `verify_covered`, rather than
/// handing raw HMAC keys outside the session boundary).
pub enum ResolvedKey<'a> {
    Ed25519([u8; 32]),
    Session(&'a sage_session::Session),
}

/// Resolves a `Signature-Input`'s `keyid`/`alg` to verifiable key
/// material. Implementations may consult `X-Agent-DID` (for `ed25519`)
/// or the session store (for `hmac-sha256`); DID resolution itself is
/// async and must happen before `verify_request` is called.
pub trait KeyResolver {
    fn resolve(&self, req: &dyn SignableRequest, params: &SignatureParams)
        -> Result<ResolvedKey<'_>, HttpSigError>;
}

pub struct VerifyOptions {
    /// Maximum age of the signature's `created` timestamp. Default 5
    /// minutes per spec §4.6.
    pub max_age: Duration,
    /// Caller-supplied "now", in unix seconds, for testability.
    pub now: i64,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        VerifyOptions {
            max_age: Duration::from_secs(5 * 60),
            now: 0,
        }
    }
}

pub fn verify_request(
    req: &impl SignableRequest,
    resolver: &dyn KeyResolver,
    store: &SessionStore,
    opts: &VerifyOptions,
) -> Result<(), HttpSigError> {
    let sig_input = req
        .header("signature-input")
        .ok_or(HttpSigError::MissingSignatureInput)?;
    let params = SignatureParams::parse(sig_input)?;

    let age = opts.now - params.created;
    if age < 0 || age as u64 > opts.max_age.as_secs() {
        return Err(HttpSigError::Expired);
    }
    if let Some(expires) = params.expires {
        if opts.now > expires {
            return Err(HttpSigError::Expired);
        }
    }

    if store.replay_guard_seen_once(&params.keyid, params.nonce.as_bytes()) {
        return Err(HttpSigError::Replay);
    }

    if params.covered.contains(&Component::Header("content-digest".to_string())) {
        let digest_header = req.header("content-digest").ok_or(HttpSigError::MissingComponent)?;
        verify_content_digest(req.body(), digest_header)?;
    }

    let base = build_signature_base(req, &params)?;
    let tag = extract_signature_tag(req, &params.sig_name)?;

    match resolver.resolve(req, &params)? {
        ResolvedKey::Ed25519(pub_key) => {
            if params.alg != SignatureAlgorithm::Ed25519 {
                return Err(HttpSigError::AlgorithmKeyMismatch);
            }
            if tag.len() != 64 {
                return Err(HttpSigError::SignatureInvalid);
            }
            let mut sig = [0u8; 64];
            sig.copy_from_slice(&tag);
            ed25519_verify(&pub_key, &base, &sig).map_err(|_| HttpSigError::SignatureInvalid)
        }
        ResolvedKey::Session(session) => {
            if params.alg != SignatureAlgorithm::HmacSha256 {
                return Err(HttpSigError::AlgorithmKeyMismatch);
            }
            if tag.len() != 32 {
                return Err(HttpSigError::SignatureInvalid);
            }
            let mut mac = [0u8; 32];
            mac.copy_from_slice(&tag);
            session
                .verify_covered(&base, &mac)
                .map_err(|_| HttpSigError::SignatureInvalid)
        }
    }
}

fn extract_signature_tag(req: &impl SignableRequest, sig_name: &str) -> Result<Vec<u8>, HttpSigError> {
    let header = req.header("signature").ok_or(HttpSigError::MissingSignature)?;
    let prefix = format!("{}=:", sig_name);
    let encoded = header
        .strip_prefix(prefix.as_str())
        .and_then(|s| s.strip_suffix(':'))
        .ok_or(HttpSigError::MalformedParams)?;
    BASE64.decode(encoded).map_err(|_| HttpSigError::MalformedParams)
}
