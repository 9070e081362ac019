//! Transport-facing values produced by the engine.
//!
//! These are handed to a presenter that turns them into chat text. None of
//! them ever carries an option's cost, a question's points or its correct
//! answer ahead of the player's choice.

use odyssey_core::content::{OptionToken, RoundKind};
use serde::Serialize;

/// The item currently awaiting the player's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptValue {
    /// Scenario or question text.
    pub item_text: String,
    /// Option labels in the order the player numbers them.
    pub option_labels: Vec<String>,
    /// 1-based round number.
    pub round_number: u32,
    /// Rounds in a full game.
    pub max_rounds: u32,
    /// Whether this is a scenario or a question.
    pub phase_kind: RoundKind,
}

/// Counters after a round has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RunningTotals {
    /// Accumulated time from scenario choices.
    pub time: u64,
    /// Accumulated points from correct answers.
    pub score: u64,
    /// Distinctions earned.
    pub bonus: u32,
}

/// Outcome of one resolved round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultValue {
    /// Whether a scenario or a question was resolved.
    pub phase_kind: RoundKind,
    /// The option the player picked.
    pub chosen: OptionToken,
    /// Label of the picked option.
    pub outcome_text: String,
    /// Time cost (scenario) or points awarded (question) applied this round.
    pub cost_or_points_applied: u32,
    /// For questions, whether the answer was correct.
    pub correct: Option<bool>,
    /// For questions answered wrongly, the label of the right answer.
    pub correct_text: Option<String>,
    /// Whether this choice earned a distinction.
    pub bonus_awarded: bool,
    /// Counters after applying this round.
    pub running_totals: RunningTotals,
}

/// Frozen end-of-game totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SummaryValue {
    /// Total time accumulated.
    pub total_time: u64,
    /// Total score accumulated.
    pub total_score: u64,
    /// Total distinctions earned.
    pub total_bonus: u32,
    /// Rounds completed before the game ended.
    pub rounds_played: u32,
    /// `true` if the game ended because content ran out before the round
    /// limit.
    pub content_exhausted: bool,
}

/// What the player sees next after a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    /// A new item awaits an answer.
    Prompt(PromptValue),
    /// The game is over.
    Summary(SummaryValue),
}

/// Engine output for one accepted player action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    /// Outcome of the round the input resolved; absent for a fresh start.
    pub result: Option<ResultValue>,
    /// The next prompt or the final summary.
    pub step: Step,
}
