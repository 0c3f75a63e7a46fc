//! The handshake's `info`/`export_ctx` construction (spec §4.5 step 1).
//!
//! Both are treated as raw bytes, not UTF-8-validated strings, even though
//! they're built from ASCII-safe DID/context-id concatenation — the HPKE
//! and HKDF primitives consume byte slices and neither peer ever parses
//! these back apart.

/// `info = "sage/hpke v1|ctx=" || context_id || "|init=" || init_did ||
/// "|resp=" || resp_did`.
pub fn build_info(context_id: &str, init_did: &str, resp_did: &str) -> Vec<u8> {
    let mut info = Vec::new();
    info.extend_from_slice(b"sage/hpke v1|ctx=");
    info.extend_from_slice(context_id.as_bytes());
    info.extend_from_slice(b"|init=");
    info.extend_from_slice(init_did.as_bytes());
    info.extend_from_slice(b"|resp=");
    info.extend_from_slice(resp_did.as_bytes());
    info
}

/// `export_ctx = "exporter:" || context_id`.
pub fn build_export_ctx(context_id: &str) -> Vec<u8> {
    let mut export_ctx = Vec::new();
    export_ctx.extend_from_slice(b"exporter:");
    export_ctx.extend_from_slice(context_id.as_bytes());
    export_ctx
}
