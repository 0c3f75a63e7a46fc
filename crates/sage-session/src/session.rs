//! The secure session itself (C4, spec §4.4).

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use sage_crypto::aead::{aead_open, aead_seal};
use sage_crypto::hmac::{hmac_sha256, hmac_sha256_verify};
use tracing::warn;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::keys::{derive_session_id, SessionKeyMaterial};
use crate::nonce::{build_nonce, parse_nonce, OUTBOUND_TAG};

/// A derived, directional secure session. Key material is zeroized on
/// drop; everything else (counters, timestamps, the poisoned flag) is
/// plain state skipped by the zeroizing derive.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Session {
    #[zeroize(skip)]
    id: [u8; 32],
    #[zeroize(skip)]
    is_initiator: bool,
    k_out_aead: [u8; 32],
    k_in_aead: [u8; 32],
    k_out_hmac: [u8; 32],
    k_in_hmac: [u8; 32],
    /// Next outbound counter. Locked (not atomic) because reserving a
    /// counter and deciding whether to keep it spans the AEAD seal call;
    /// two threads must never walk away with the same value.
    #[zeroize(skip)]
    n_out: Mutex<u64>,
    #[zeroize(skip)]
    msg_count: AtomicU64,
    #[zeroize(skip)]
    created_at: Instant,
    #[zeroize(skip)]
    last_used_at: Mutex<Instant>,
    #[zeroize(skip)]
    poisoned: AtomicBool,
    #[zeroize(skip)]
    config: SessionConfig,
}

impl Session {
    /// `ensure_from_exporter`'s per-session half: derive id and directional
    /// keys from a combined seed and context label. Deterministic — the
    /// same seed and label always produce the same id and key material.
    pub fn from_exporter(
        seed: &[u8],
        context_label: &str,
        is_initiator: bool,
        config: SessionConfig,
    ) -> Self {
        let id = derive_session_id(seed, context_label);
        let km = SessionKeyMaterial::derive(seed);
        let (k_out_aead, k_in_aead, k_out_hmac, k_in_hmac) = km.directional(is_initiator);
        let now = Instant::now();
        Session {
            id,
            is_initiator,
            k_out_aead,
            k_in_aead,
            k_out_hmac,
            k_in_hmac,
            n_out: Mutex::new(0),
            msg_count: AtomicU64::new(0),
            created_at: now,
            last_used_at: Mutex::new(now),
            poisoned: AtomicBool::new(false),
            config,
        }
    }

    /// Re-derive this session in place from a new seed/label, for reuse out
    /// of the store's free-list instead of a fresh allocation. Old key
    /// material is zeroized before being overwritten.
    pub(crate) fn reset(
        &mut self,
        seed: &[u8],
        context_label: &str,
        is_initiator: bool,
        config: SessionConfig,
    ) {
        self.zeroize();

        let id = derive_session_id(seed, context_label);
        let km = SessionKeyMaterial::derive(seed);
        let (k_out_aead, k_in_aead, k_out_hmac, k_in_hmac) = km.directional(is_initiator);
        let now = Instant::now();

        self.id = id;
        self.is_initiator = is_initiator;
        self.k_out_aead = k_out_aead;
        self.k_in_aead = k_in_aead;
        self.k_out_hmac = k_out_hmac;
        self.k_in_hmac = k_in_hmac;
        self.n_out = Mutex::new(0);
        self.msg_count = AtomicU64::new(0);
        self.created_at = now;
        self.last_used_at = Mutex::new(now);
        self.poisoned = AtomicBool::new(false);
        self.config = config;
    }

    /// Non-blocking expiry probe for the background sweeper. `None` means
    /// the session is currently mid-operation (its clock lock is held) and
    /// should be left for the next sweep pass.
    pub(crate) fn is_expired_at(&self, now: Instant) -> Option<bool> {
        if self.poisoned.load(Ordering::SeqCst) {
            return Some(true);
        }
        let last_used_at = *self.last_used_at.try_lock().ok()?;
        let expired = now.duration_since(self.created_at) > self.config.max_age
            || now.duration_since(last_used_at) > self.config.idle_timeout
            || self.msg_count.load(Ordering::SeqCst) >= self.config.max_messages;
        Some(expired)
    }

    pub fn id(&self) -> [u8; 32] {
        self.id
    }

    pub fn is_initiator(&self) -> bool {
        self.is_initiator
    }

    pub fn n_out(&self) -> u64 {
        *self.n_out.lock().expect("n_out mutex poisoned")
    }

    pub fn msg_count(&self) -> u64 {
        self.msg_count.load(Ordering::SeqCst)
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned.load(Ordering::SeqCst)
    }

    /// Policy check run before every `encrypt`/`decrypt`. Any violation
    /// poisons the session permanently.
    fn check_policy(&self) -> Result<(), SessionError> {
        if self.poisoned.load(Ordering::SeqCst) {
            return Err(SessionError::Poisoned);
        }

        let now = Instant::now();

        if now.duration_since(self.created_at) > self.config.max_age {
            self.poisoned.store(true, Ordering::SeqCst);
            warn!(session_id = %hex::encode(self.id), "session poisoned: max_age exceeded");
            return Err(SessionError::SessionExpired);
        }

        let last_used_at = *self.last_used_at.lock().expect("last_used_at mutex poisoned");
        if now.duration_since(last_used_at) > self.config.idle_timeout {
            self.poisoned.store(true, Ordering::SeqCst);
            warn!(session_id = %hex::encode(self.id), "session poisoned: idle_timeout exceeded");
            return Err(SessionError::SessionIdle);
        }

        if self.msg_count.load(Ordering::SeqCst) >= self.config.max_messages {
            self.poisoned.store(true, Ordering::SeqCst);
            warn!(session_id = %hex::encode(self.id), "session poisoned: max_messages reached");
            return Err(SessionError::SessionExhausted);
        }

        Ok(())
    }

    fn touch(&self) {
        *self.last_used_at.lock().expect("last_used_at mutex poisoned") = Instant::now();
    }

    /// Seal `plaintext` under the outbound key and the next outbound
    /// nonce. On failure the outbound counter is left untouched.
    pub fn encrypt(&self, plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>, SessionError> {
        self.check_policy()?;

        // Hold the counter lock across the seal: reserving a value and
        // deciding whether to keep it must be one step, or two threads can
        // walk away with the same nonce.
        let mut n_out = self.n_out.lock().expect("n_out mutex poisoned");
        let counter = *n_out;
        let nonce = build_nonce(OUTBOUND_TAG, counter);
        let ciphertext = aead_seal(&self.k_out_aead, &nonce, aad, plaintext)
            .map_err(|_| SessionError::AeadFailure)?;
        *n_out += 1;
        drop(n_out);

        self.msg_count.fetch_add(1, Ordering::SeqCst);
        self.touch();

        let mut wire = Vec::with_capacity(12 + ciphertext.len());
        wire.extend_from_slice(&nonce);
        wire.extend_from_slice(&ciphertext);
        Ok(wire)
    }

    /// Open a wire message produced by the peer's `encrypt`. Does not
    /// require a monotonic inbound counter — replay protection for
    /// messages lives in the HTTP-signature layer's `(kid, nonce)` cache.
    pub fn decrypt(&self, wire: &[u8], aad: &[u8]) -> Result<Vec<u8>, SessionError> {
        self.check_policy()?;

        if wire.len() < 12 {
            return Err(SessionError::MalformedWire);
        }
        let mut nonce = [0u8; 12];
        nonce.copy_from_slice(&wire[0..12]);
        let (direction_tag, _counter) = parse_nonce(&nonce);
        // The peer's encrypt always stamps OUTBOUND_TAG; "inbound" is
        // relative to us, not a value anyone ever writes to the wire.
        if direction_tag != OUTBOUND_TAG {
            return Err(SessionError::WrongDirection);
        }

        let ciphertext = &wire[12..];
        let plaintext = aead_open(&self.k_in_aead, &nonce, aad, ciphertext)
            .map_err(|_| SessionError::AeadFailure)?;

        self.msg_count.fetch_add(1, Ordering::SeqCst);
        self.touch();
        Ok(plaintext)
    }

    /// HMAC-tag covered-content bytes with this session's outbound HMAC
    /// key, for use by the HTTP signature layer.
    pub fn sign_covered(&self, bytes: &[u8]) -> Result<[u8; 32], SessionError> {
        hmac_sha256(&self.k_out_hmac, bytes).map_err(|e| SessionError::CryptoInternal(e.to_string()))
    }

    /// Verify covered-content bytes against a tag produced with the peer's
    /// outbound (our inbound) HMAC key.
    pub fn verify_covered(&self, bytes: &[u8], tag: &[u8; 32]) -> Result<(), SessionError> {
        hmac_sha256_verify(&self.k_in_hmac, bytes, tag)
            .map_err(|_| SessionError::CryptoInternal("hmac verification failed".into()))
    }
}
