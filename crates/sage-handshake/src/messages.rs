//! Handshake wire content (spec §4.5). Only the data that must be signed
//! or transmitted; transport framing (`SecureMessage`) lives in `sage-core`.

/// Step-1 content: everything the client signs and sends.
#[derive(Clone, Debug)]
pub struct InitContent {
    pub init_did: String,
    pub resp_did: String,
    pub info: Vec<u8>,
    pub export_ctx: Vec<u8>,
    pub enc: Vec<u8>,
    pub eph_c: [u8; 32],
    pub nonce: Vec<u8>,
    pub ts: i64,
}

/// Step-1 message: signed content plus the metadata (did, signature) that
/// sits outside the signed input.
#[derive(Clone, Debug)]
pub struct InitMessage {
    pub content: InitContent,
    pub did: String,
    pub signature: [u8; 64],
}

/// Step-2 content: everything the server signs and sends back.
#[derive(Clone, Debug)]
pub struct AckContent {
    pub kid: String,
    pub eph_s: [u8; 32],
    pub ack_tag: [u8; 32],
    pub ts: i64,
}

/// Step-2 message.
#[derive(Clone, Debug)]
pub struct AckMessage {
    pub content: AckContent,
    pub did: String,
    pub signature: [u8; 64],
}
