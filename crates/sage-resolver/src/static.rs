//! An in-memory `DIDResolver` for tests and local development.
//!
//! A `tokio::sync::RwLock`-guarded `HashMap`, async trait methods despite
//! never actually suspending, matching the shape real chain-backed
//! resolvers will have.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::ResolverError;
use crate::metadata::AgentMetadata;
use crate::DIDResolver;

/// A resolver backed by an in-memory map, populated by the caller. Useful
/// for tests and for composing into a [`crate::dispatcher::DispatchingResolver`].
pub struct StaticResolver {
    agents: RwLock<HashMap<String, AgentMetadata>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        StaticResolver {
            agents: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, metadata: AgentMetadata) {
        self.agents.write().await.insert(metadata.did.clone(), metadata);
    }

    pub async fn remove(&self, did: &str) {
        self.agents.write().await.remove(did);
    }
}

impl Default for StaticResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DIDResolver for StaticResolver {
    async fn resolve(&self, did: &str) -> Result<AgentMetadata, ResolverError> {
        self.agents
            .read()
            .await
            .get(did)
            .cloned()
            .ok_or_else(|| ResolverError::NotFound(did.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_inserted_agent() {
        let resolver = StaticResolver::new();
        let meta = AgentMetadata::new("did:sage:alice", [1u8; 32]);
        resolver.insert(meta.clone()).await;
        let resolved = resolver.resolve("did:sage:alice").await.unwrap();
        assert_eq!(resolved, meta);
    }

    #[tokio::test]
    async fn unknown_did_is_not_found() {
        let resolver = StaticResolver::new();
        assert!(matches!(
            resolver.resolve("did:sage:nobody").await,
            Err(ResolverError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn inactive_agent_rejected_by_convenience_methods() {
        let resolver = StaticResolver::new();
        let meta = AgentMetadata::new("did:sage:bob", [2u8; 32]).inactive();
        resolver.insert(meta).await;
        assert!(matches!(
            resolver.resolve_signing_key("did:sage:bob").await,
            Err(ResolverError::Inactive(_))
        ));
    }

    #[tokio::test]
    async fn missing_kem_key_errors() {
        let resolver = StaticResolver::new();
        resolver
            .insert(AgentMetadata::new("did:sage:carol", [3u8; 32]))
            .await;
        assert!(matches!(
            resolver.resolve_kem_key("did:sage:carol").await,
            Err(ResolverError::NoKemKey(_))
        ));
    }
}
