//! Production Environment implementation using system time and RNG.

use std::{
    collections::hash_map::RandomState,
    hash::{BuildHasher, Hasher},
    sync::atomic::{AtomicU64, Ordering},
    time::Instant,
};

use lockey_core::Environment;

/// Production environment using system time and cryptographic RNG.
///
/// Session IDs are drawn from `getrandom` (OS entropy).
#[derive(Clone, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        if let Err(e) = getrandom::fill(buffer) {
            // Not secure, but keeps issued IDs distinct so the registry never
            // spins on collisions.
            tracing::error!("getrandom failed: {}", e);
            fill_fallback(buffer);
        }
    }
}

fn fill_fallback(buffer: &mut [u8]) {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let state = RandomState::new();
    for chunk in buffer.chunks_mut(8) {
        let mut hasher = state.build_hasher();
        hasher.write_u64(COUNTER.fetch_add(1, Ordering::Relaxed));
        let bytes = hasher.finish().to_le_bytes();
        chunk.copy_from_slice(&bytes[..chunk.len()]);
    }
}
