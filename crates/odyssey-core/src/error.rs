//! Domain error types.

use thiserror::Error;

use crate::content::RoundKind;
use crate::player::PlayerId;

/// Top-level domain error type.
///
/// Every variant is scoped to one player's session and one interaction;
/// none of them is fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The content source failed or had no usable rows for this round.
    #[error("no {0} content is available right now, please try again")]
    ContentUnavailable(RoundKind),

    /// Input outside the valid token set for the current phase.
    #[error("invalid input {input:?}: expected a number from 1 to {}", .expected.max())]
    InvalidInput {
        /// The raw input as received (trimmed).
        input: String,
        /// The token range the current phase accepts.
        expected: TokenRange,
    },

    /// Input received before a session was started.
    #[error("no session in progress, start a session first")]
    SessionNotStarted,

    /// Input received after the session reached its summary.
    #[error("session complete, restart to play again")]
    SessionFinished,

    /// Another input from the same player is still being resolved.
    #[error("still resolving your previous answer")]
    InputInProgress,

    /// No session exists for the player.
    #[error("session not found for player {0}")]
    SessionNotFound(PlayerId),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure error (content transport, lock poisoning).
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

/// Inclusive range of option tokens `1..=max` accepted by a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRange(u8);

impl TokenRange {
    /// Creates a range accepting tokens `1..=max`.
    #[must_use]
    pub const fn up_to(max: u8) -> Self {
        Self(max)
    }

    /// The largest accepted token.
    #[must_use]
    pub const fn max(self) -> u8 {
        self.0
    }
}
