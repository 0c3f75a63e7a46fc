//! `AgentMetadata` (spec §3).

/// What the resolver returns for a DID: the keys and activation state the
/// handshake and HTTP verifier need. `kem_public_key` is absent for agents
/// that never act as an HPKE receiver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentMetadata {
    pub did: String,
    pub signing_public_key: [u8; 32],
    pub kem_public_key: Option<[u8; 32]>,
    pub name: String,
    pub is_active: bool,
    pub capabilities: Vec<String>,
}

impl AgentMetadata {
    pub fn new(did: impl Into<String>, signing_public_key: [u8; 32]) -> Self {
        AgentMetadata {
            did: did.into(),
            signing_public_key,
            kem_public_key: None,
            name: String::new(),
            is_active: true,
            capabilities: Vec::new(),
        }
    }

    pub fn with_kem_key(mut self, kem_public_key: [u8; 32]) -> Self {
        self.kem_public_key = Some(kem_public_key);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}
