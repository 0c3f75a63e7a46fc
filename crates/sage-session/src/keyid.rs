//! `kid` generation hook (spec §4.5 step 9: "Issue `kid` (random UUID, or
//! via binder hook)").
//!
//! Production handshakes want unpredictable kids; deterministic tests want
//! reproducible ones. `KeyIdBinder` lets callers swap the generator
//! without touching the handshake or session-store logic.

pub trait KeyIdBinder: Send + Sync {
    fn generate(&self) -> String;
}

/// Default binder: a random UUID (v4) per kid, stringified.
pub struct RandomKeyIdBinder;

impl KeyIdBinder for RandomKeyIdBinder {
    fn generate(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_binder_produces_unique_ids() {
        let binder = RandomKeyIdBinder;
        let a = binder.generate();
        let b = binder.generate();
        assert_ne!(a, b);
    }
}
