//! Session store and secure session (C3/C4).
//!
//! Everything here is synchronous: the only suspension point in the whole
//! core is the DID resolver, so the session store uses plain
//! `std::sync::RwLock`/`Mutex` rather than an async runtime's equivalents.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod keyid;
pub mod keys;
pub mod nonce;
pub mod replay;
pub mod session;
pub mod store;

pub use config::SessionConfig;
pub use error::SessionError;
pub use keyid::{KeyIdBinder, RandomKeyIdBinder};
pub use session::Session;
pub use store::SessionStore;
