//! Canonical signing bytes for handshake content (spec §4.5, §6:
//! "a deterministic serialization of the content fields only — metadata
//! (which holds the signature) is excluded from its own signed input").
//!
//! Built on `Transcript` (tagged, length-prefixed, order- and
//! tag-sensitive), with fields appended in lexicographic key order so the
//! bytes match across implementations regardless of struct field order.

use sage_crypto::transcript::Transcript;

use crate::messages::{AckContent, InitContent};

mod init_tags {
    pub const ENC: u32 = 1;
    pub const EPH_C: u32 = 2;
    pub const EXPORT_CTX: u32 = 3;
    pub const INFO: u32 = 4;
    pub const INIT_DID: u32 = 5;
    pub const NONCE: u32 = 6;
    pub const RESP_DID: u32 = 7;
    pub const TS: u32 = 8;
}

mod ack_tags {
    pub const ACK_TAG: u32 = 1;
    pub const EPH_S: u32 = 2;
    pub const KID: u32 = 3;
    pub const TS: u32 = 4;
}

/// Canonical bytes for the step-1 (client Initialize) content, in
/// lexicographic field-name order: enc, eph_c, export_ctx, info, init_did,
/// nonce, resp_did, ts.
pub fn canonical_init_bytes(content: &InitContent) -> Vec<u8> {
    let mut t = Transcript::new("sage/handshake-init v1");
    t.append_bytes(init_tags::ENC, &content.enc);
    t.append_bytes(init_tags::EPH_C, &content.eph_c);
    t.append_bytes(init_tags::EXPORT_CTX, &content.export_ctx);
    t.append_bytes(init_tags::INFO, &content.info);
    t.append_str(init_tags::INIT_DID, &content.init_did);
    t.append_bytes(init_tags::NONCE, &content.nonce);
    t.append_str(init_tags::RESP_DID, &content.resp_did);
    t.append_u64(init_tags::TS, content.ts as u64);
    t.as_bytes().to_vec()
}

/// Canonical bytes for the step-2 (server Ack) content, in lexicographic
/// field-name order: ack_tag, eph_s, kid, ts.
pub fn canonical_ack_bytes(content: &AckContent) -> Vec<u8> {
    let mut t = Transcript::new("sage/handshake-ack v1");
    t.append_bytes(ack_tags::ACK_TAG, &content.ack_tag);
    t.append_bytes(ack_tags::EPH_S, &content.eph_s);
    t.append_str(ack_tags::KID, &content.kid);
    t.append_u64(ack_tags::TS, content.ts as u64);
    t.as_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_init() -> InitContent {
        InitContent {
            init_did: "did:sage:test:client".to_string(),
            resp_did: "did:sage:test:server".to_string(),
            info: b"info-bytes".to_vec(),
            export_ctx: b"export-ctx-bytes".to_vec(),
            enc: vec![7u8; 32],
            eph_c: [8u8; 32],
            nonce: b"nonce-bytes".to_vec(),
            ts: 1_700_000_000,
        }
    }

    #[test]
    fn canonical_bytes_are_deterministic() {
        let content = sample_init();
        assert_eq!(canonical_init_bytes(&content), canonical_init_bytes(&content));
    }

    #[test]
    fn changing_any_field_changes_canonical_bytes() {
        let base = sample_init();
        let mut changed = base.clone();
        changed.nonce = b"different-nonce".to_vec();
        assert_ne!(canonical_init_bytes(&base), canonical_init_bytes(&changed));
    }

    #[test]
    fn ack_canonical_bytes_are_deterministic() {
        let content = AckContent {
            kid: "kid-1".to_string(),
            eph_s: [1u8; 32],
            ack_tag: [2u8; 32],
            ts: 1_700_000_001,
        };
        assert_eq!(canonical_ack_bytes(&content), canonical_ack_bytes(&content));
    }
}
