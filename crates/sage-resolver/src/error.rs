//! Resolver error taxonomy.

use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum ResolverError {
    #[error("DID not found: {0}")]
    NotFound(String),

    #[error("agent is inactive: {0}")]
    Inactive(String),

    #[error("agent {0} has no KEM public key registered")]
    NoKemKey(String),

    #[error("no resolver registered for DID method/prefix: {0}")]
    UnsupportedMethod(String),

    #[error("resolver backend error: {0}")]
    Backend(String),
}
