//! Environment abstraction for deterministic testing.
//!
//! The `Environment` trait decouples session issuing and lock bookkeeping
//! from system resources. Tests supply a seeded implementation so issued
//! session IDs are reproducible; the server supplies one backed by the OS.
//!
//! # Invariants
//!
//! - Monotonicity: `env.now()` must never go backwards
//! - Isolation: Implementations must not share global state

use std::time::Instant;

/// Abstract environment providing time and randomness.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Returns the current time.
    ///
    /// MUST return values that never decrease within a single execution
    /// context.
    fn now(&self) -> Instant;

    /// Fills the provided buffer with random bytes.
    ///
    /// # Security
    ///
    /// Session IDs are derived from these bytes. Production implementations
    /// MUST use OS entropy (`getrandom`), not a userspace PRNG.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a random `u128`.
    fn random_u128(&self) -> u128 {
        let mut bytes = [0u8; 16];
        self.random_bytes(&mut bytes);
        u128::from_be_bytes(bytes)
    }
}
