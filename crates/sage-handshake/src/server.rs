//! Server side of the two-step handshake (spec §4.5 step 2).
//!
//! `process_init` takes the resolved client signing key as an argument
//! rather than a `DIDResolver` reference: resolution is the one
//! suspension point in the whole core, so the caller awaits it and hands
//! this synchronous function the result. State machine:
//! `AwaitInit -> Verified -> Derived -> Bound -> Replied`; any rejection
//! returns `Err` without ever reaching `ensure_from_exporter`.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use sage_crypto::ed25519::{ed25519_verify, Ed25519KeyPair};
use sage_crypto::hkdf::hkdf_sha256;
use sage_crypto::hmac::hmac_sha256;
use sage_crypto::hpke::{hpke_recv, KemPrivateKey};
use sage_crypto::x25519::EphemeralKeyPair;
use sage_session::{KeyIdBinder, Session, SessionConfig, SessionStore};
use tracing::{debug, warn};
use zeroize::Zeroize;

use crate::canonical::{canonical_ack_bytes, canonical_init_bytes};
use crate::config::HandshakeConfig;
use crate::error::HandshakeError;
use crate::messages::{AckContent, AckMessage, InitMessage};
use crate::transcript_info::{build_export_ctx, build_info};

/// Everything `process_init` returns on success: the response to send
/// back, plus the bound session.
pub struct HandshakeAccepted {
    pub ack: AckMessage,
    pub session: Arc<Session>,
    pub session_id: [u8; 32],
    pub kid: String,
}

#[allow(clippy::too_many_arguments)]
pub fn process_init(
    init: &InitMessage,
    init_signing_pub: &[u8; 32],
    server_kem_priv: &KemPrivateKey,
    server_kp: &Ed25519KeyPair,
    context_id: &str,
    store: &SessionStore,
    binder: &dyn KeyIdBinder,
    config: SessionConfig,
    handshake_config: HandshakeConfig,
) -> Result<HandshakeAccepted, HandshakeError> {
    // 1. Verify Ed25519 metadata signature; signer DID must agree with the
    //    payload's own `init_did`.
    if init.did != init.content.init_did {
        warn!(context_id, "handshake init rejected: did/signer mismatch");
        return Err(HandshakeError::SignatureInvalid);
    }
    let canonical = canonical_init_bytes(&init.content);
    if ed25519_verify(init_signing_pub, &canonical, &init.signature).is_err() {
        warn!(context_id, "handshake init rejected: signature invalid");
        return Err(HandshakeError::SignatureInvalid);
    }

    // 2. Reject if |now - ts| > max_skew.
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| HandshakeError::CryptoInternal(e.to_string()))?
        .as_secs() as i64;
    let skew = (now - init.content.ts).unsigned_abs();
    if skew > handshake_config.max_skew.as_secs() {
        warn!(context_id, skew, "handshake init rejected: clock skew exceeded");
        return Err(HandshakeError::SkewExceeded);
    }

    // 3. Replay check against the handshake-init cache, keyed by context_id.
    if store.handshake_replay_seen_once(context_id, &init.content.nonce) {
        warn!(context_id, "handshake init rejected: replay");
        return Err(HandshakeError::Replay);
    }

    // 4. Recompute canonical info/export_ctx and reject any mismatch.
    let expected_info = build_info(context_id, &init.content.init_did, &init.content.resp_did);
    let expected_export_ctx = build_export_ctx(context_id);
    if expected_info != init.content.info || expected_export_ctx != init.content.export_ctx {
        warn!(context_id, "handshake init rejected: transcript mismatch");
        return Err(HandshakeError::TranscriptMismatch);
    }

    // 5. HPKE receive; export the secret.
    let hpke_ctx = hpke_recv(server_kem_priv, &init.content.enc, &init.content.info)
        .map_err(|e| HandshakeError::CryptoInternal(e.to_string()))?;
    let exporter_hpke = hpke_ctx
        .export(&init.content.export_ctx, 32)
        .map_err(|e| HandshakeError::CryptoInternal(e.to_string()))?;

    // 6. Fresh ephemeral keypair, ephemeral-ephemeral DH.
    let eph_s = EphemeralKeyPair::generate();
    let eph_s_public = eph_s.public;
    let mut ss_e2e = eph_s
        .diffie_hellman(&init.content.eph_c)
        .map_err(|e| HandshakeError::CryptoInternal(e.to_string()))?;

    // 7. Combine into the session seed.
    let mut ikm = Vec::with_capacity(64);
    ikm.extend_from_slice(&exporter_hpke);
    ikm.extend_from_slice(&ss_e2e);
    let mut combined = hkdf_sha256(&ikm, &init.content.export_ctx, b"sage/combiner v1", 32)
        .map_err(|e| HandshakeError::CryptoInternal(e.to_string()))?;
    ikm.zeroize();
    ss_e2e.zeroize();

    // 8. Derive the session from the combined seed.
    let (session, session_id, _is_new) =
        store.ensure_from_exporter(&combined, "sage/hpke v1", false, config);

    // 9. Issue kid (binder hook, defaulting to a random UUID) and bind it.
    let kid = binder.generate();
    store
        .bind_key_id(&kid, session_id)
        .map_err(|_| HandshakeError::KeyIdConflict)?;

    // 10. Key-confirmation ack tag.
    let ack_key = hkdf_sha256(&combined, b"", b"ack-key", 32)
        .map_err(|e| HandshakeError::CryptoInternal(e.to_string()))?;
    combined.zeroize();
    let mut ack_input = Vec::new();
    ack_input.extend_from_slice(b"hpke-ack|");
    ack_input.extend_from_slice(context_id.as_bytes());
    ack_input.push(b'|');
    ack_input.extend_from_slice(&init.content.nonce);
    ack_input.push(b'|');
    ack_input.extend_from_slice(kid.as_bytes());
    let ack_tag = hmac_sha256(&ack_key, &ack_input)
        .map_err(|e| HandshakeError::CryptoInternal(e.to_string()))?;

    // 11. Respond with signed ack content.
    let ack_content = AckContent {
        kid: kid.clone(),
        eph_s: eph_s_public,
        ack_tag,
        ts: now,
    };
    let ack_canonical = canonical_ack_bytes(&ack_content);
    let signature = server_kp.sign(&ack_canonical);
    let ack = AckMessage {
        content: ack_content,
        did: init.content.resp_did.clone(),
        signature,
    };

    debug!(context_id, kid = %kid, "handshake completed");

    Ok(HandshakeAccepted {
        ack,
        session,
        session_id,
        kid,
    })
}
