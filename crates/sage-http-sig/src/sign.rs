//! `sign_request` (spec §4.6): adds `Signature-Input` and `Signature`
//! headers; never touches the body.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use sage_crypto::ed25519::Ed25519KeyPair;
use sage_session::Session;

use crate::base::build_signature_base;
use crate::components::Component;
use crate::error::HttpSigError;
use crate::params::{SignatureAlgorithm, SignatureParams};
use crate::request::SignableRequest;

/// The key material used to produce a signature. The algorithm is
/// implied by the variant, not a separate free-standing parameter, so a
/// caller can't accidentally request `ed25519` with an HMAC key.
///
/// `Session` signs with its own outbound HMAC key via `sign_covered`,
/// keeping raw session key material from ever leaving the session
/// boundary. `HmacSha256` remains for callers holding a bare key
/// outside of a session (e.g. a pre-session bootstrap credential).
pub enum SigningKey<'a> {
    HmacSha256(&'a [u8; 32]),
    Session(&'a Session),
    Ed25519(&'a Ed25519KeyPair),
}

impl SigningKey<'_> {
    fn algorithm(&self) -> SignatureAlgorithm {
        match self {
            SigningKey::HmacSha256(_) | SigningKey::Session(_) => SignatureAlgorithm::HmacSha256,
            SigningKey::Ed25519(_) => SignatureAlgorithm::Ed25519,
        }
    }

    fn sign(&self, base: &[u8]) -> Result<Vec<u8>, HttpSigError> {
        match self {
            SigningKey::HmacSha256(key) => sage_crypto::hmac::hmac_sha256(key.as_slice(), base)
                .map(|tag| tag.to_vec())
                .map_err(|_| HttpSigError::SignatureInvalid),
            SigningKey::Session(session) => session
                .sign_covered(base)
                .map(|tag| tag.to_vec())
                .map_err(|_| HttpSigError::SignatureInvalid),
            SigningKey::Ed25519(kp) => Ok(kp.sign(base).to_vec()),
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn sign_request(
    req: &mut impl SignableRequest,
    sig_name: &str,
    covered: Vec<Component>,
    keyid: String,
    key: &SigningKey,
    created: i64,
    expires: Option<i64>,
    nonce: String,
) -> Result<(), HttpSigError> {
    let params = SignatureParams {
        sig_name: sig_name.to_string(),
        covered,
        keyid,
        alg: key.algorithm(),
        created,
        expires,
        nonce,
    };
    let base = build_signature_base(req, &params)?;
    let tag = key.sign(&base)?;

    req.set_header("signature-input", params.header_value());
    req.set_header(
        "signature",
        format!("{}=:{}:", params.sig_name, BASE64.encode(tag)),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::SimpleRequest;

    #[test]
    fn sign_request_adds_both_headers() {
        let mut req = SimpleRequest::new("POST", "/a2a", "agent.example")
            .with_header("host", "agent.example")
            .with_header("date", "Tue, 07 Jan 2026 20:00:00 GMT");
        let key = [0x11u8; 32];
        sign_request(
            &mut req,
            "sig1",
            vec![
                Component::Method,
                Component::Header("host".to_string()),
                Component::Header("date".to_string()),
            ],
            "kid-1".to_string(),
            &SigningKey::HmacSha256(&key),
            1_700_000_000,
            None,
            "nonce-abc".to_string(),
        )
        .unwrap();

        assert!(req.header("signature-input").is_some());
        assert!(req.header("signature").unwrap().starts_with("sig1=:"));
    }
}
