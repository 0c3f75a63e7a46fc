//! HPKE base mode (RFC 9180), spec §4.1 and §4.5.
//!
//! The handshake uses HPKE only to derive an exporter secret bound to the
//! recipient's long-term KEM key — no HPKE encryption context ever seals a
//! payload. `DHKEM(X25519, HKDF-SHA256)` / `HKDF-SHA256` / `ExportOnlyAead`
//! is the fixed suite: `ExportOnlyAead` is the `hpke` crate's marker AEAD
//! that supports `.export()` and refuses `seal`/`open`, which matches the
//! exporter-secret-only usage this core requires.

use ::hpke::aead::ExportOnlyAead;
use ::hpke::kdf::HkdfSha256 as HpkeKdf;
use ::hpke::kem::X25519HkdfSha256 as HpkeKem;
use ::hpke::{AeadCtxR, AeadCtxS, Deserializable, HpkeError as RawHpkeError, OpModeR, OpModeS, Serializable};
use rand_core::OsRng;

type Kem = HpkeKem;
pub type KemPublicKey = <Kem as ::hpke::Kem>::PublicKey;
pub type KemPrivateKey = <Kem as ::hpke::Kem>::PrivateKey;

#[derive(Debug, thiserror::Error)]
pub enum HpkeWrapError {
    #[error("invalid HPKE public key bytes")]
    InvalidPublicKey,
    #[error("invalid HPKE private key bytes")]
    InvalidPrivateKey,
    #[error("HPKE setup failed: {0}")]
    Setup(String),
    #[error("HPKE export failed: {0}")]
    Export(String),
}

impl From<RawHpkeError> for HpkeWrapError {
    fn from(e: RawHpkeError) -> Self {
        HpkeWrapError::Setup(e.to_string())
    }
}

/// Generate a long-term X25519 KEM keypair for use as an HPKE recipient key.
pub fn generate_kem_keypair() -> (KemPrivateKey, KemPublicKey) {
    <Kem as ::hpke::Kem>::gen_keypair(&mut OsRng)
}

pub fn kem_public_key_from_bytes(bytes: &[u8; 32]) -> Result<KemPublicKey, HpkeWrapError> {
    KemPublicKey::from_bytes(bytes).map_err(|_| HpkeWrapError::InvalidPublicKey)
}

pub fn kem_private_key_from_bytes(bytes: &[u8; 32]) -> Result<KemPrivateKey, HpkeWrapError> {
    KemPrivateKey::from_bytes(bytes).map_err(|_| HpkeWrapError::InvalidPrivateKey)
}

pub fn kem_public_key_to_bytes(pk: &KemPublicKey) -> Vec<u8> {
    pk.to_bytes().to_vec()
}

/// The sender side of an HPKE base-mode exchange: encapsulates a fresh
/// ephemeral key against the recipient's public key and exposes an
/// exporter-only context.
pub struct SenderContext {
    ctx: AeadCtxS<ExportOnlyAead, HpkeKdf, Kem>,
}

impl SenderContext {
    /// `.export(export_ctx, length)` derives `length` bytes bound to the
    /// exchange and `export_ctx`.
    pub fn export(&self, export_ctx: &[u8], length: usize) -> Result<Vec<u8>, HpkeWrapError> {
        let mut out = vec![0u8; length];
        self.ctx
            .export(export_ctx, &mut out)
            .map_err(|e| HpkeWrapError::Export(e.to_string()))?;
        Ok(out)
    }
}

/// The receiver side, built from the recipient's private key and the
/// sender's encapsulated key.
pub struct ReceiverContext {
    ctx: AeadCtxR<ExportOnlyAead, HpkeKdf, Kem>,
}

impl ReceiverContext {
    pub fn export(&self, export_ctx: &[u8], length: usize) -> Result<Vec<u8>, HpkeWrapError> {
        let mut out = vec![0u8; length];
        self.ctx
            .export(export_ctx, &mut out)
            .map_err(|e| HpkeWrapError::Export(e.to_string()))?;
        Ok(out)
    }
}

/// Run the sender half of HPKE base mode against recipient public key
/// `pk_r` with application-binding `info`. Returns the encapsulated key
/// (send this to the recipient) and the exporter-only context.
pub fn hpke_send(
    pk_r: &KemPublicKey,
    info: &[u8],
) -> Result<(Vec<u8>, SenderContext), HpkeWrapError> {
    let (encapped, ctx) = ::hpke::setup_sender::<ExportOnlyAead, HpkeKdf, Kem, _>(
        &OpModeS::Base,
        pk_r,
        info,
        &mut OsRng,
    )?;
    Ok((encapped.to_bytes().to_vec(), SenderContext { ctx }))
}

/// Run the receiver half of HPKE base mode given the recipient's private
/// key, the sender's encapsulated key bytes, and the same `info`.
pub fn hpke_recv(
    sk_r: &KemPrivateKey,
    enc: &[u8],
    info: &[u8],
) -> Result<ReceiverContext, HpkeWrapError> {
    let encapped = <Kem as ::hpke::Kem>::EncappedKey::from_bytes(enc)
        .map_err(|_| HpkeWrapError::InvalidPublicKey)?;
    let ctx = ::hpke::setup_receiver::<ExportOnlyAead, HpkeKdf, Kem>(
        &OpModeR::Base,
        sk_r,
        &encapped,
        info,
    )?;
    Ok(ReceiverContext { ctx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_and_receiver_export_matching_secrets() {
        let (sk_r, pk_r) = generate_kem_keypair();
        let info = b"sage/hpke-handshake v1";
        let (enc, sender_ctx) = hpke_send(&pk_r, info).unwrap();
        let receiver_ctx = hpke_recv(&sk_r, &enc, info).unwrap();

        let export_ctx = b"sage/hpke-export v1";
        let sender_secret = sender_ctx.export(export_ctx, 32).unwrap();
        let receiver_secret = receiver_ctx.export(export_ctx, 32).unwrap();
        assert_eq!(sender_secret, receiver_secret);
    }

    #[test]
    fn different_export_context_yields_different_secret() {
        let (sk_r, pk_r) = generate_kem_keypair();
        let info = b"info";
        let (enc, sender_ctx) = hpke_send(&pk_r, info).unwrap();
        let receiver_ctx = hpke_recv(&sk_r, &enc, info).unwrap();
        let a = sender_ctx.export(b"ctx-a", 32).unwrap();
        let b = receiver_ctx.export(b"ctx-b", 32).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_recipient_key_yields_different_secret() {
        let (_sk_r, pk_r) = generate_kem_keypair();
        let (sk_other, _pk_other) = generate_kem_keypair();
        let info = b"info";
        let (enc, sender_ctx) = hpke_send(&pk_r, info).unwrap();
        let receiver_ctx = hpke_recv(&sk_other, &enc, info).unwrap();
        let a = sender_ctx.export(b"ctx", 32).unwrap();
        let b = receiver_ctx.export(b"ctx", 32).unwrap();
        assert_ne!(a, b);
    }
}
