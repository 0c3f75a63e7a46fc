//! TTL-bounded caching wrapper (spec §3: "the resolver SHOULD cache with
//! bounded TTL, typical 5 minutes").

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::ResolverError;
use crate::metadata::AgentMetadata;
use crate::DIDResolver;

struct CacheEntry {
    metadata: AgentMetadata,
    expires_at: Instant,
}

/// Wraps any [`DIDResolver`] with a bounded-TTL cache. Invalidation on
/// explicit deactivate events is not implemented here — entries simply
/// expire and are re-fetched; eager invalidation is optional.
pub struct CachingResolver<R: DIDResolver> {
    inner: R,
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl<R: DIDResolver> CachingResolver<R> {
    pub fn new(inner: R, ttl: Duration) -> Self {
        CachingResolver {
            inner,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Default 5-minute TTL, the typical value for DID metadata caching.
    pub fn with_default_ttl(inner: R) -> Self {
        Self::new(inner, Duration::from_secs(5 * 60))
    }

    pub async fn invalidate(&self, did: &str) {
        self.entries.write().await.remove(did);
    }
}

#[async_trait]
impl<R: DIDResolver> DIDResolver for CachingResolver<R> {
    async fn resolve(&self, did: &str) -> Result<AgentMetadata, ResolverError> {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(did) {
                if entry.expires_at > Instant::now() {
                    return Ok(entry.metadata.clone());
                }
            }
        }

        debug!(did, "resolver cache miss, fetching");
        let metadata = self.inner.resolve(did).await?;
        let mut entries = self.entries.write().await;
        entries.insert(
            did.to_string(),
            CacheEntry {
                metadata: metadata.clone(),
                expires_at: Instant::now() + self.ttl,
            },
        );
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r#static::StaticResolver;

    #[tokio::test]
    async fn caches_within_ttl() {
        let inner = StaticResolver::new();
        inner.insert(AgentMetadata::new("did:sage:a", [1u8; 32])).await;
        let cached = CachingResolver::new(inner, Duration::from_secs(300));

        let first = cached.resolve("did:sage:a").await.unwrap();
        // Remove from the inner resolver; a cache hit should still succeed.
        cached.inner.remove("did:sage:a").await;
        let second = cached.resolve("did:sage:a").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn expired_entry_is_refetched() {
        let inner = StaticResolver::new();
        inner.insert(AgentMetadata::new("did:sage:b", [2u8; 32])).await;
        let cached = CachingResolver::new(inner, Duration::from_millis(0));

        let _ = cached.resolve("did:sage:b").await.unwrap();
        cached.inner.remove("did:sage:b").await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(matches!(
            cached.resolve("did:sage:b").await,
            Err(ResolverError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let inner = StaticResolver::new();
        inner.insert(AgentMetadata::new("did:sage:c", [3u8; 32])).await;
        let cached = CachingResolver::new(inner, Duration::from_secs(300));
        let _ = cached.resolve("did:sage:c").await.unwrap();
        cached.invalidate("did:sage:c").await;
        cached.inner.remove("did:sage:c").await;
        assert!(cached.resolve("did:sage:c").await.is_err());
    }
}
