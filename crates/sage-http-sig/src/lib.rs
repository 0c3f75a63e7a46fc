//! RFC 9421-profile HTTP message signatures (C6, spec §4.6).
//!
//! Covers request-line pseudo-components, arbitrary headers, and body
//! integrity via `Content-Digest`. Two algorithms: `ed25519` against a
//! DID's signing key, and `hmac-sha256` against a bound session's
//! directional HMAC key. Transport-agnostic — callers implement
//! [`SignableRequest`] over whatever HTTP types their transport layer
//! uses.

#![forbid(unsafe_code)]

mod base;
mod components;
mod digest;
mod error;
mod params;
mod request;
mod sign;
mod verify;

pub use base::build_signature_base;
pub use components::Component;
pub use digest::{content_digest_header, verify_content_digest};
pub use error::HttpSigError;
pub use params::{SignatureAlgorithm, SignatureParams};
pub use request::{SignableRequest, SimpleRequest};
pub use sign::{sign_request, SigningKey};
pub use verify::{verify_request, KeyResolver, ResolvedKey, VerifyOptions};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use sage_session::{Session, SessionConfig, SessionStore};

    struct SessionResolver<'a> {
        session: &'a Session,
    }

    impl<'a> KeyResolver for SessionResolver<'a> {
        fn resolve(
            &self,
            _req: &dyn SignableRequest,
            _params: &SignatureParams,
        ) -> Result<ResolvedKey<'_>, HttpSigError> {
            Ok(ResolvedKey::Session(self.session))
        }
    }

    fn paired_sessions() -> (Session, Session) {
        let seed = b"integration test seed bytes 01!";
        (
            Session::from_exporter(seed, "label", true, SessionConfig::default()),
            Session::from_exporter(seed, "label", false, SessionConfig::default()),
        )
    }

    #[test]
    fn full_sign_and_verify_roundtrip() {
        let (client, server) = paired_sessions();
        let store = SessionStore::new();

        let mut req = SimpleRequest::new("POST", "/a2a", "agent.example")
            .with_header("host", "agent.example")
            .with_body(b"task payload".to_vec());
        req.headers.insert(
            "content-digest".to_string(),
            content_digest_header(req.body()),
        );

        sign_request(
            &mut req,
            "sig1",
            vec![
                Component::Method,
                Component::Path,
                Component::Header("host".to_string()),
                Component::Header("content-digest".to_string()),
            ],
            "kid-roundtrip".to_string(),
            &SigningKey::Session(&client),
            1_700_000_000,
            Some(1_700_000_300),
            "nonce-roundtrip".to_string(),
        )
        .unwrap();

        let resolver = SessionResolver { session: &server };
        let opts = VerifyOptions {
            max_age: std::time::Duration::from_secs(300),
            now: 1_700_000_030,
        };
        assert!(verify_request(&req, &resolver, &store, &opts).is_ok());
    }

    #[test]
    fn tampered_covered_header_is_rejected() {
        let (client, server) = paired_sessions();
        let store = SessionStore::new();

        let mut req = SimpleRequest::new("GET", "/a2a", "agent.example")
            .with_header("host", "agent.example");
        sign_request(
            &mut req,
            "sig1",
            vec![Component::Method, Component::Header("host".to_string())],
            "kid-tamper".to_string(),
            &SigningKey::Session(&client),
            1_700_000_000,
            None,
            "nonce-tamper".to_string(),
        )
        .unwrap();

        req.set_header("host", "evil.example");

        let resolver = SessionResolver { session: &server };
        let opts = VerifyOptions {
            max_age: std::time::Duration::from_secs(300),
            now: 1_700_000_030,
        };
        assert!(matches!(
            verify_request(&req, &resolver, &store, &opts),
            Err(HttpSigError::SignatureInvalid)
        ));
    }

    #[test]
    fn algorithm_key_mismatch_is_rejected_before_crypto() {
        use sage_crypto::ed25519::Ed25519KeyPair;

        let (_client, server) = paired_sessions();
        let store = SessionStore::new();
        let kp = Ed25519KeyPair::generate();

        let mut req = SimpleRequest::new("GET", "/a2a", "agent.example")
            .with_header("host", "agent.example");
        sign_request(
            &mut req,
            "sig1",
            vec![Component::Method, Component::Header("host".to_string())],
            "kid-mismatch".to_string(),
            &SigningKey::Ed25519(&kp),
            1_700_000_000,
            None,
            "nonce-mismatch".to_string(),
        )
        .unwrap();

        let resolver = SessionResolver { session: &server };
        let opts = VerifyOptions {
            max_age: std::time::Duration::from_secs(300),
            now: 1_700_000_030,
        };
        assert!(matches!(
            verify_request(&req, &resolver, &store, &opts),
            Err(HttpSigError::AlgorithmKeyMismatch)
        ));
    }
}
