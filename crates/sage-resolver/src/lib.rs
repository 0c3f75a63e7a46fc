//! DID resolver abstraction (C2).
//!
//! The handshake and HTTP signature verifier both need to turn a DID into
//! the agent's signing and KEM public keys. `resolve` is the only
//! suspension point in the whole core — everything else in this workspace
//! is synchronous CPU work — so it is the one place `async` is allowed to
//! leak in.

pub mod cache;
pub mod dispatcher;
pub mod error;
pub mod metadata;
pub mod r#static;

pub use cache::CachingResolver;
pub use dispatcher::DispatchingResolver;
pub use error::ResolverError;
pub use metadata::AgentMetadata;
pub use r#static::StaticResolver;

use async_trait::async_trait;

/// Abstract DID → agent metadata lookup. Implementations may be
/// chain-specific; composition (caching, multi-chain dispatch) happens via
/// wrapper types rather than trait inheritance.
#[async_trait]
pub trait DIDResolver: Send + Sync {
    async fn resolve(&self, did: &str) -> Result<AgentMetadata, ResolverError>;

    /// Convenience: resolve and extract the signing key, rejecting inactive
    /// agents.
    async fn resolve_signing_key(&self, did: &str) -> Result<[u8; 32], ResolverError> {
        let meta = self.resolve(did).await?;
        if !meta.is_active {
            return Err(ResolverError::Inactive(did.to_string()));
        }
        Ok(meta.signing_public_key)
    }

    /// Convenience: resolve and extract the KEM key. Required only for
    /// agents that act as HPKE receivers.
    async fn resolve_kem_key(&self, did: &str) -> Result<[u8; 32], ResolverError> {
        let meta = self.resolve(did).await?;
        if !meta.is_active {
            return Err(ResolverError::Inactive(did.to_string()));
        }
        meta.kem_public_key
            .ok_or_else(|| ResolverError::NoKemKey(did.to_string()))
    }
}
