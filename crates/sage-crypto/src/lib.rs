//! SAGE cryptographic primitives (C1).
//!
//! Thin, auditable wrappers around vetted crates. Nothing in this crate
//! touches a session, a DID, or the network — it only exposes the
//! primitive contracts spec'd for the handshake and session layers above
//! it: Ed25519 signatures, X25519 Diffie-Hellman, HKDF-SHA256, HMAC-SHA256,
//! ChaCha20-Poly1305 AEAD, and HPKE base mode (exporter only).

#![forbid(unsafe_code)]

pub mod aead;
pub mod ed25519;
pub mod hash;
pub mod hkdf;
pub mod hmac;
pub mod hpke;
pub mod keypair;
pub mod transcript;
pub mod utils;
pub mod x25519;

pub use keypair::KeyPair;
