//! Test RNG — deterministic `DeterministicRng` implementations for tests.

use std::sync::Arc;

use odyssey_core::rng::{DeterministicRng, RngFactory};

/// An RNG that always picks the first candidate. Suitable for tests that do
/// not depend on which unused row is drawn.
#[derive(Debug, Clone, Copy)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_index(&mut self, _len: usize) -> usize {
        0
    }
}

/// An RNG that returns indices from a predetermined sequence, each reduced
/// modulo the candidate count. Panics if the sequence is exhausted. Used in
/// tests that need to steer which row gets drawn.
#[derive(Debug, Clone)]
pub struct SequenceRng {
    values: Vec<usize>,
    index: usize,
}

impl SequenceRng {
    /// Create a new `SequenceRng` with the given values.
    #[must_use]
    pub fn new(values: Vec<usize>) -> Self {
        Self { values, index: 0 }
    }
}

impl DeterministicRng for SequenceRng {
    fn next_index(&mut self, len: usize) -> usize {
        let val = self.values[self.index];
        self.index += 1;
        val % len
    }
}

/// A factory handing each new session a fresh copy of `rng`.
pub fn rng_factory<R>(rng: R) -> RngFactory
where
    R: DeterministicRng + Clone + 'static,
{
    Arc::new(move || -> Box<dyn DeterministicRng> { Box::new(rng.clone()) })
}
