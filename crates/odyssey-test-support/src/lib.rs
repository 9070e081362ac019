//! Shared test doubles and fixtures for the Odyssey chat adventure engine.

mod clock;
mod fixtures;
mod repository;
mod rng;

pub use clock::{FixedClock, ManualClock};
pub use fixtures::{question, scenario, scenario_with_bonus};
pub use repository::{FailingContentRepository, FlakyContentRepository, StaticContentRepository};
pub use rng::{MockRng, SequenceRng, rng_factory};
