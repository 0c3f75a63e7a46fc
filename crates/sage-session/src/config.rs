//! `SessionConfig` (spec §3, §4.3).

use std::time::Duration;

/// Lifetime policy enforced on every `encrypt`/`decrypt` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub max_age: Duration,
    pub idle_timeout: Duration,
    pub max_messages: u64,
}

impl SessionConfig {
    pub fn new(max_age: Duration, idle_timeout: Duration, max_messages: u64) -> Self {
        SessionConfig {
            max_age,
            idle_timeout,
            max_messages,
        }
    }
}

impl Default for SessionConfig {
    /// 1-hour max age, 30-minute idle timeout, 10,000 message cap — the
    /// recommended defaults.
    fn default() -> Self {
        SessionConfig {
            max_age: Duration::from_secs(60 * 60),
            idle_timeout: Duration::from_secs(30 * 60),
            max_messages: 10_000,
        }
    }
}
