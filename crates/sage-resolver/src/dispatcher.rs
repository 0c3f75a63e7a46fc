//! Multi-chain dispatching resolver (spec §4.2: "implementations MAY be
//! chain-specific ... and MAY be composed via a multi-chain dispatcher
//! keyed on DID prefix").

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::ResolverError;
use crate::metadata::AgentMetadata;
use crate::DIDResolver;

/// Routes `resolve` calls to a chain-specific resolver based on the DID
/// method segment (`did:<method>:...`).
pub struct DispatchingResolver {
    by_method: HashMap<String, Box<dyn DIDResolver>>,
}

impl DispatchingResolver {
    pub fn new() -> Self {
        DispatchingResolver {
            by_method: HashMap::new(),
        }
    }

    pub fn register(mut self, method: impl Into<String>, resolver: Box<dyn DIDResolver>) -> Self {
        self.by_method.insert(method.into(), resolver);
        self
    }

    fn method_of(did: &str) -> Option<&str> {
        let mut parts = did.splitn(3, ':');
        if parts.next()? != "did" {
            return None;
        }
        parts.next()
    }
}

impl Default for DispatchingResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DIDResolver for DispatchingResolver {
    async fn resolve(&self, did: &str) -> Result<AgentMetadata, ResolverError> {
        let method = Self::method_of(did)
            .ok_or_else(|| ResolverError::UnsupportedMethod(did.to_string()))?;
        let resolver = self
            .by_method
            .get(method)
            .ok_or_else(|| ResolverError::UnsupportedMethod(method.to_string()))?;
        resolver.resolve(did).await
    }
}
