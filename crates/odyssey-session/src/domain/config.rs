//! Deployment policy for a game.

use std::time::Duration;

use super::schedule::PhaseSchedule;

/// Default number of rounds in a session.
pub const DEFAULT_MAX_ROUNDS: u32 = 10;

/// Default inactivity window after which a session may be reclaimed.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Engine-facing game configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Rounds played before the summary, unless content runs out first.
    pub max_rounds: u32,
    /// Which kind of round each round index plays.
    pub schedule: PhaseSchedule,
    /// Inactivity window after which an idle session may be evicted.
    pub idle_timeout: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            schedule: PhaseSchedule::default(),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}
