//! Top-level facade for the SAGE secure agent-to-agent core.
//!
//! Re-exports the layered crates below (C1-C6) and adds the three things a
//! host embedding this workspace needs that don't belong to any single
//! layer: the `SecureMessage`/`Response`/`MessageTransport` boundary types
//! (spec §6), the unified `SageError` taxonomy (spec §7), and a
//! metrics-free audit trail wired through `tracing`.

#![forbid(unsafe_code)]

pub mod audit;
pub mod envelope;
pub mod error;
pub mod message;

pub use audit::AuditEvent;
pub use envelope::{sign_secure_message, verify_secure_message, EnvelopeKey, EnvelopeVerifyKey};
pub use error::{SageError, WireErrorKind};
pub use message::{
    canonical_secure_message_bytes, MessageTransport, Metadata, Response, Role, SecureMessage,
    HPKE_COMPLETE_TASK_ID,
};

pub use sage_crypto;
pub use sage_handshake;
pub use sage_http_sig;
pub use sage_resolver;
pub use sage_session;
