//! Query handlers for the Session & Game Engine context.
//!
//! This module contains query handlers that read a player's session and
//! return read-only view DTOs.

use odyssey_core::error::DomainError;
use odyssey_core::player::PlayerId;
use serde::Serialize;

use crate::application::store::SessionStore;
use crate::domain::session::{PhaseKind, Session};
use crate::domain::values::{RunningTotals, SummaryValue};

/// Read-only view of a player's session.
///
/// The pending item's text is included, but never its costs, points or
/// correct answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    /// The player this session belongs to.
    pub player_id: PlayerId,
    /// Current phase.
    pub phase: PhaseKind,
    /// Completed rounds.
    pub round_index: u32,
    /// Current counters.
    pub totals: RunningTotals,
    /// Number of scenarios offered so far.
    pub used_scenario_count: usize,
    /// Number of questions offered so far.
    pub used_question_count: usize,
    /// Text of the item awaiting an answer, if any.
    pub pending_item: Option<String>,
}

impl SessionView {
    fn from_session(player_id: &PlayerId, session: &Session) -> Self {
        Self {
            player_id: player_id.clone(),
            phase: session.phase_kind(),
            round_index: session.round_index(),
            totals: session.totals(),
            used_scenario_count: session.used_scenario_keys().len(),
            used_question_count: session.used_question_keys().len(),
            pending_item: session.pending_item().map(|item| item.key().to_owned()),
        }
    }
}

/// Retrieves a player's session.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` if the player has no session.
/// Returns `DomainError::Infrastructure` if a lock is poisoned.
pub fn get_session(player_id: &PlayerId, store: &SessionStore) -> Result<SessionView, DomainError> {
    store
        .read(player_id, |session| SessionView::from_session(player_id, session))?
        .ok_or_else(|| DomainError::SessionNotFound(player_id.clone()))
}

/// Retrieves the frozen summary of a finished session. Repeated calls return
/// the same values.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` if the player has no session,
/// `DomainError::Validation` if the session has not finished yet, or
/// `DomainError::Infrastructure` if a lock is poisoned.
pub fn get_summary(player_id: &PlayerId, store: &SessionStore) -> Result<SummaryValue, DomainError> {
    store
        .read(player_id, Session::summary)?
        .ok_or_else(|| DomainError::SessionNotFound(player_id.clone()))?
        .ok_or_else(|| DomainError::Validation("session has not finished yet".to_owned()))
}
