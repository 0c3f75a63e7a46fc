//! Metrics-free audit trail: a lightweight event enum emitted via
//! `tracing` spans for handshake completion/rejection and session
//! poisoning. Grounded in `zrc-core::audit`'s event-sourcing style but
//! reduced to log emission only — no sink, no signing, no persistence;
//! those are outer, non-core concerns (spec §1). A host that wants a
//! durable audit log subscribes a `tracing` layer to these events.

use tracing::{info, warn};

/// Non-sensitive audit events a host can observe by subscribing to
/// `tracing`. Never carries key material, full DIDs beyond what's already
/// public on the wire, or raw session ids.
#[derive(Debug, Clone)]
pub enum AuditEvent {
    HandshakeCompleted { context_id: String, kid: String },
    HandshakeRejected { context_id: String, reason: &'static str },
    SessionPoisoned { kid: String, reason: &'static str },
}

impl AuditEvent {
    /// Emit this event at the appropriate `tracing` level.
    pub fn emit(&self) {
        match self {
            AuditEvent::HandshakeCompleted { context_id, kid } => {
                info!(context_id = %context_id, kid = %kid, event = "handshake_completed", "audit event");
            }
            AuditEvent::HandshakeRejected { context_id, reason } => {
                warn!(context_id = %context_id, reason, event = "handshake_rejected", "audit event");
            }
            AuditEvent::SessionPoisoned { kid, reason } => {
                warn!(kid = %kid, reason, event = "session_poisoned", "audit event");
            }
        }
    }
}
