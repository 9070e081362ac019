//! Random number generator abstraction for determinism.
//!
//! Content selection is the only random draw in the engine. In production it
//! is backed by a seeded-from-entropy `StdRng`; tests inject a scripted
//! implementation.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random index in `[0, len)`.
    ///
    /// Callers never pass `len == 0`.
    fn next_index(&mut self, len: usize) -> usize;
}

/// Builds the RNG owned by a newly created session.
pub type RngFactory = Arc<dyn Fn() -> Box<dyn DeterministicRng> + Send + Sync>;

/// Production RNG seeded from operating-system entropy.
#[derive(Debug)]
pub struct SystemRng(StdRng);

impl SystemRng {
    /// Creates an RNG seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// A factory giving every session its own entropy-seeded RNG.
    #[must_use]
    pub fn factory() -> RngFactory {
        Arc::new(|| -> Box<dyn DeterministicRng> { Box::new(Self::from_entropy()) })
    }
}

impl DeterministicRng for SystemRng {
    fn next_index(&mut self, len: usize) -> usize {
        self.0.random_range(0..len)
    }
}
