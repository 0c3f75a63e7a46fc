//! Handshake-level configuration.

use std::time::Duration;

#[derive(Clone, Copy, Debug)]
pub struct HandshakeConfig {
    /// Maximum allowed `|now - ts|` before an init is rejected for clock
    /// skew. Default 2 minutes per spec §4.5 step 2.
    pub max_skew: Duration,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        HandshakeConfig {
            max_skew: Duration::from_secs(2 * 60),
        }
    }
}
