//! Odyssey — Session & Game Engine bounded context.
//!
//! Owns the per-player state machine: round progression, anti-repeat
//! content selection, time/score/distinction counters and the end-of-game
//! summary, plus the keyed session store that serializes each player's
//! inputs.

pub mod application;
pub mod domain;
