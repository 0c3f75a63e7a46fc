//! Client side of the two-step handshake (spec §4.5, steps 1 and 3).

use std::sync::Arc;

use sage_crypto::ed25519::{ed25519_verify, Ed25519KeyPair};
use sage_crypto::hkdf::hkdf_sha256;
use sage_crypto::hmac::hmac_sha256;
use sage_crypto::hpke::{hpke_send, KemPublicKey};
use sage_crypto::x25519::EphemeralKeyPair;
use sage_session::{Session, SessionConfig, SessionStore};
use tracing::{debug, warn};
use zeroize::Zeroize;

use crate::canonical::{canonical_ack_bytes, canonical_init_bytes};
use crate::error::HandshakeError;
use crate::messages::{AckMessage, InitContent, InitMessage};
use crate::transcript_info::{build_export_ctx, build_info};

/// State the client holds between sending Initialize and receiving the
/// server's ack. Not `Clone`: the ephemeral secret must be consumed
/// exactly once.
pub struct PendingClientHandshake {
    eph_c: EphemeralKeyPair,
    exporter_hpke: Vec<u8>,
    context_id: String,
    nonce: Vec<u8>,
    export_ctx: Vec<u8>,
    resp_did: String,
}

impl Drop for PendingClientHandshake {
    fn drop(&mut self) {
        self.exporter_hpke.zeroize();
    }
}

/// Step 1: build and sign the Initialize message.
#[allow(clippy::too_many_arguments)]
pub fn initiate(
    init_kp: &Ed25519KeyPair,
    init_did: &str,
    resp_did: &str,
    server_kem_pub: &KemPublicKey,
    context_id: &str,
    nonce: Vec<u8>,
    ts: i64,
) -> Result<(InitMessage, PendingClientHandshake), HandshakeError> {
    let eph_c = EphemeralKeyPair::generate();
    let info = build_info(context_id, init_did, resp_did);
    let export_ctx = build_export_ctx(context_id);

    let (enc, hpke_ctx) =
        hpke_send(server_kem_pub, &info).map_err(|e| HandshakeError::CryptoInternal(e.to_string()))?;
    let exporter_hpke = hpke_ctx
        .export(&export_ctx, 32)
        .map_err(|e| HandshakeError::CryptoInternal(e.to_string()))?;

    let content = InitContent {
        init_did: init_did.to_string(),
        resp_did: resp_did.to_string(),
        info: info.clone(),
        export_ctx: export_ctx.clone(),
        enc,
        eph_c: eph_c.public,
        nonce: nonce.clone(),
        ts,
    };
    let canonical = canonical_init_bytes(&content);
    let signature = init_kp.sign(&canonical);

    let message = InitMessage {
        content,
        did: init_did.to_string(),
        signature,
    };
    let pending = PendingClientHandshake {
        eph_c,
        exporter_hpke,
        context_id: context_id.to_string(),
        nonce,
        export_ctx,
        resp_did: resp_did.to_string(),
    };
    Ok((message, pending))
}

/// Step 3: verify the server's ack, derive the combined seed, and bind the
/// session.
pub fn finalize(
    pending: PendingClientHandshake,
    ack: &AckMessage,
    resp_signing_pub: &[u8; 32],
    store: &SessionStore,
    config: SessionConfig,
) -> Result<(Arc<Session>, [u8; 32]), HandshakeError> {
    if ack.did != pending.resp_did {
        warn!(context_id = %pending.context_id, "handshake ack rejected: did mismatch");
        return Err(HandshakeError::SignatureInvalid);
    }
    let canonical = canonical_ack_bytes(&ack.content);
    if ed25519_verify(resp_signing_pub, &canonical, &ack.signature).is_err() {
        warn!(context_id = %pending.context_id, "handshake ack rejected: signature invalid");
        return Err(HandshakeError::SignatureInvalid);
    }

    let mut ss_e2e = pending
        .eph_c
        .diffie_hellman(&ack.content.eph_s)
        .map_err(|e| HandshakeError::CryptoInternal(e.to_string()))?;

    let mut ikm = Vec::with_capacity(32 + 32);
    ikm.extend_from_slice(&pending.exporter_hpke);
    ikm.extend_from_slice(&ss_e2e);
    let mut combined = hkdf_sha256(&ikm, &pending.export_ctx, b"sage/combiner v1", 32)
        .map_err(|e| HandshakeError::CryptoInternal(e.to_string()))?;
    ikm.zeroize();
    ss_e2e.zeroize();

    let ack_key = hkdf_sha256(&combined, b"", b"ack-key", 32)
        .map_err(|e| HandshakeError::CryptoInternal(e.to_string()))?;
    let mut ack_input = Vec::new();
    ack_input.extend_from_slice(b"hpke-ack|");
    ack_input.extend_from_slice(pending.context_id.as_bytes());
    ack_input.push(b'|');
    ack_input.extend_from_slice(&pending.nonce);
    ack_input.push(b'|');
    ack_input.extend_from_slice(ack.content.kid.as_bytes());
    let expected_tag = hmac_sha256(&ack_key, &ack_input)
        .map_err(|e| HandshakeError::CryptoInternal(e.to_string()))?;

    if !constant_time_eq::constant_time_eq(&expected_tag, &ack.content.ack_tag) {
        combined.zeroize();
        warn!(context_id = %pending.context_id, "handshake ack rejected: ack_tag mismatch");
        return Err(HandshakeError::TranscriptMismatch);
    }

    let (session, id, _is_new) =
        store.ensure_from_exporter(&combined, "sage/hpke v1", true, config);
    combined.zeroize();

    store
        .bind_key_id(&ack.content.kid, id)
        .map_err(|_| HandshakeError::KeyIdConflict)?;

    debug!(context_id = %pending.context_id, kid = %ack.content.kid, "handshake completed");

    Ok((session, id))
}
