//! Transport-boundary types (spec §6): `SecureMessage`, `Response`, and the
//! `MessageTransport` trait the core consumes but never implements. The
//! payload is opaque ciphertext from the transport's perspective; framing,
//! retries, and the wire encoding of these fields are a host concern.

use sage_crypto::transcript::Transcript;

/// Distinguished `task_id` used for the handshake-completion message
/// carried over a `MessageTransport`.
pub const HPKE_COMPLETE_TASK_ID: &str = "hpke/complete@v1";

/// The sender's role, as declared on the envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Agent,
}

impl Role {
    fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Agent => "agent",
        }
    }
}

/// Arbitrary caller-supplied key/value strings attached to a message.
/// Holds the envelope `signature` alongside whatever else a host wants to
/// carry; excluded from the message's own canonical signing bytes.
pub type Metadata = Vec<(String, String)>;

/// The abstract unit of exchange between two agents (spec §6). Everything
/// here is in-memory; a host owns serializing it onto an actual transport.
#[derive(Clone, Debug)]
pub struct SecureMessage {
    pub id: String,
    pub context_id: String,
    pub task_id: String,
    pub payload: Vec<u8>,
    pub did: String,
    pub signature: Vec<u8>,
    pub metadata: Metadata,
    pub role: Role,
}

/// What a `MessageTransport::send` call returns.
#[derive(Clone, Debug)]
pub struct Response {
    pub success: bool,
    pub message_id: String,
    pub task_id: String,
    pub data: Option<Vec<u8>>,
    pub error: Option<String>,
}

/// The one transport-facing interface the core consumes. Implementing it
/// (HTTP, WebSocket, gRPC, in-process channel) is entirely a host concern —
/// the core only ever calls through this boundary, synchronously: the only
/// suspension point this workspace defines is `DIDResolver::resolve`
/// (spec §5), so a host whose transport needs to await a network round
/// trip does so behind this trait, not inside it.
pub trait MessageTransport {
    fn send(&self, context_id: &str, message: SecureMessage) -> Response;
}

mod tags {
    pub const CONTEXT_ID: u32 = 1;
    pub const DID: u32 = 2;
    pub const ID: u32 = 3;
    pub const PAYLOAD: u32 = 4;
    pub const ROLE: u32 = 5;
    pub const TASK_ID: u32 = 6;
}

/// Canonical bytes for signing a `SecureMessage` (spec §6: "a deterministic
/// serialization ... over the content fields only — metadata (which holds
/// the signature) is excluded from its own signed input"). Fields are
/// appended in lexicographic name order via the same tagged `Transcript`
/// builder the handshake layer uses for its own canonical bytes, so the
/// two stay consistent across the workspace.
pub fn canonical_secure_message_bytes(message: &SecureMessage) -> Vec<u8> {
    let mut t = Transcript::new("sage/secure-message v1");
    t.append_str(tags::CONTEXT_ID, &message.context_id);
    t.append_str(tags::DID, &message.did);
    t.append_str(tags::ID, &message.id);
    t.append_bytes(tags::PAYLOAD, &message.payload);
    t.append_str(tags::ROLE, message.role.as_str());
    t.append_str(tags::TASK_ID, &message.task_id);
    t.as_bytes().to_vec()
}
