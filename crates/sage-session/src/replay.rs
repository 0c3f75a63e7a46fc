//! `(kid, nonce)` replay cache (spec §4.3, §5).
//!
//! A sliding window of monotonic packet counters per stream is the usual
//! shape for this kind of guard, but that's only appropriate when nonces are
//! sequential. Handshake and HTTP-signature nonces here are opaque
//! caller-supplied values, so this is a bounded TTL map instead: a single
//! mutex over a `HashMap<(key, nonce), expiry>` with periodic sweeping,
//! matching the "single mutex with periodic eviction" discipline spec'd
//! for replay caches.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// A `(key, nonce) -> expiry` cache used both for handshake-init replay
/// (keyed on `context_id`) and HTTP-signature replay (keyed on `kid`).
pub struct NonceCache {
    ttl: Duration,
    entries: Mutex<HashMap<(String, Vec<u8>), Instant>>,
}

impl NonceCache {
    pub fn new(ttl: Duration) -> Self {
        NonceCache {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The 10-minute window spec'd for handshake-init replay.
    pub fn for_handshake() -> Self {
        Self::new(Duration::from_secs(10 * 60))
    }

    /// The default 5-minute `max_age` window spec'd for HTTP-signature
    /// replay.
    pub fn for_http_signatures() -> Self {
        Self::new(Duration::from_secs(5 * 60))
    }

    /// Atomic test-and-set: records `(key, nonce)` if unseen (or expired)
    /// and returns whether it had already been seen.
    pub fn seen_once(&self, key: &str, nonce: &[u8]) -> bool {
        let now = Instant::now();
        let mut entries = self.entries.lock().expect("nonce cache mutex poisoned");
        self.sweep_locked(&mut entries, now);

        let map_key = (key.to_string(), nonce.to_vec());
        if let Some(expiry) = entries.get(&map_key) {
            if *expiry > now {
                return true;
            }
        }
        entries.insert(map_key, now + self.ttl);
        false
    }

    fn sweep_locked(&self, entries: &mut HashMap<(String, Vec<u8>), Instant>, now: Instant) {
        entries.retain(|_, expiry| *expiry > now);
    }

    /// Force an eviction pass outside the hot path, e.g. from a background
    /// sweeper thread.
    pub fn sweep(&self) {
        self.evict_expired()
    }

    /// Same as [`Self::sweep`]; the name `evict_expired` mirrors the
    /// store-level sweep this cache is driven from.
    pub fn evict_expired(&self) {
        let now = Instant::now();
        let mut entries = self.entries.lock().expect("nonce cache mutex poisoned");
        self.sweep_locked(&mut entries, now);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("nonce cache mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sighting_returns_false_second_returns_true() {
        let cache = NonceCache::new(Duration::from_secs(60));
        assert!(!cache.seen_once("kid-1", b"nonce-a"));
        assert!(cache.seen_once("kid-1", b"nonce-a"));
    }

    #[test]
    fn different_keys_are_independent() {
        let cache = NonceCache::new(Duration::from_secs(60));
        assert!(!cache.seen_once("kid-1", b"nonce-a"));
        assert!(!cache.seen_once("kid-2", b"nonce-a"));
    }

    #[test]
    fn different_nonces_are_independent() {
        let cache = NonceCache::new(Duration::from_secs(60));
        assert!(!cache.seen_once("kid-1", b"nonce-a"));
        assert!(!cache.seen_once("kid-1", b"nonce-b"));
    }

    #[test]
    fn expired_entry_can_be_seen_again() {
        let cache = NonceCache::new(Duration::from_millis(0));
        assert!(!cache.seen_once("kid-1", b"nonce-a"));
        std::thread::sleep(Duration::from_millis(2));
        assert!(!cache.seen_once("kid-1", b"nonce-a"));
    }

    #[test]
    fn sweep_removes_expired_entries() {
        let cache = NonceCache::new(Duration::from_millis(0));
        cache.seen_once("kid-1", b"nonce-a");
        std::thread::sleep(Duration::from_millis(2));
        cache.sweep();
        assert!(cache.is_empty());
    }
}
