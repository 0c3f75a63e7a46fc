//! Two-step HPKE handshake (C5).
//!
//! HPKE base mode alone gives integrity and one-way secrecy but not
//! forward secrecy against compromise of the responder's static KEM key.
//! Combining the HPKE exporter secret with a fresh ephemeral-ephemeral
//! X25519 exchange via HKDF buys PFS as long as both ephemeral private
//! keys are destroyed promptly — which is why every intermediate buffer
//! in `client`/`server` is zeroized the moment it's no longer needed.

#![forbid(unsafe_code)]

pub mod canonical;
pub mod client;
pub mod config;
pub mod error;
pub mod messages;
pub mod server;
pub mod transcript_info;

pub use client::{finalize as client_finalize, initiate, PendingClientHandshake};
pub use config::HandshakeConfig;
pub use error::HandshakeError;
pub use messages::{AckContent, AckMessage, InitContent, InitMessage};
pub use server::{process_init, HandshakeAccepted};
