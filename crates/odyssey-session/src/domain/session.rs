//! The per-player session state machine.
//!
//! A transition is split in two so the content fetch can happen without
//! holding the player's lock: `plan_*` inspects the session and decides what
//! content the next round needs, the caller fetches it, and `start` / `submit`
//! apply the whole transition in one step. Nothing is mutated unless the
//! transition succeeds.

use std::collections::BTreeSet;

use odyssey_core::content::{OptionToken, QuestionRow, RoundKind, ScenarioRow};
use odyssey_core::error::{DomainError, TokenRange};
use odyssey_core::rng::DeterministicRng;
use serde::Serialize;

use super::config::GameConfig;
use super::sampling::draw_unused;
use super::values::{PromptValue, Reply, ResultValue, RunningTotals, Step, SummaryValue};

/// Session phase. The awaiting phases own the item the player is answering,
/// so a pending item exists exactly when one of them is active.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    /// Created, first round not yet offered.
    #[default]
    Idle,
    /// Waiting for option 1 or 2 on a scenario.
    AwaitingScenarioChoice(ScenarioRow),
    /// Waiting for option 1, 2 or 3 on a question.
    AwaitingQuestionAnswer(QuestionRow),
    /// Game over; the summary is frozen.
    Finished(SummaryValue),
}

/// Phase discriminant without the pending item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    /// See [`Phase::Idle`].
    Idle,
    /// See [`Phase::AwaitingScenarioChoice`].
    AwaitingScenarioChoice,
    /// See [`Phase::AwaitingQuestionAnswer`].
    AwaitingQuestionAnswer,
    /// See [`Phase::Finished`].
    Finished,
}

/// Borrowed view of the item awaiting an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingItem<'a> {
    /// A scenario awaiting a choice.
    Scenario(&'a ScenarioRow),
    /// A question awaiting an answer.
    Question(&'a QuestionRow),
}

impl PendingItem<'_> {
    /// Key of the pending row.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Scenario(row) => &row.key,
            Self::Question(row) => &row.key,
        }
    }
}

/// What the next round needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextRound {
    /// The round limit is reached; go straight to the summary.
    Finish,
    /// Fetch content of this kind and offer an unused item.
    Play(RoundKind),
}

/// Rows fetched for the next round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    /// Scenario rows in source order.
    Scenarios(Vec<ScenarioRow>),
    /// Question rows in source order.
    Questions(Vec<QuestionRow>),
}

impl Fetched {
    /// The kind of rows held.
    #[must_use]
    pub fn kind(&self) -> RoundKind {
        match self {
            Self::Scenarios(_) => RoundKind::Scenario,
            Self::Questions(_) => RoundKind::Question,
        }
    }
}

/// A validated player input, ready to be committed once the next round's
/// content is in hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputPlan {
    token: OptionToken,
    kind: RoundKind,
    next: NextRound,
}

impl InputPlan {
    /// The chosen option.
    #[must_use]
    pub fn token(&self) -> OptionToken {
        self.token
    }

    /// What the round after this answer needs.
    #[must_use]
    pub fn next(&self) -> NextRound {
        self.next
    }
}

/// Content checked against the planned round, ready to apply.
enum Advance {
    Finish,
    Scenarios(Vec<ScenarioRow>),
    Questions(Vec<QuestionRow>),
}

/// One player's game state from start to summary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    phase: Phase,
    round_index: u32,
    used_scenario_keys: BTreeSet<String>,
    used_question_keys: BTreeSet<String>,
    time_total: u64,
    score_total: u64,
    bonus_count: u32,
}

impl Session {
    /// Creates an idle session with every counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase, including the pending item.
    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Current phase discriminant.
    #[must_use]
    pub fn phase_kind(&self) -> PhaseKind {
        match self.phase {
            Phase::Idle => PhaseKind::Idle,
            Phase::AwaitingScenarioChoice(_) => PhaseKind::AwaitingScenarioChoice,
            Phase::AwaitingQuestionAnswer(_) => PhaseKind::AwaitingQuestionAnswer,
            Phase::Finished(_) => PhaseKind::Finished,
        }
    }

    /// The item awaiting an answer, if any.
    #[must_use]
    pub fn pending_item(&self) -> Option<PendingItem<'_>> {
        match &self.phase {
            Phase::AwaitingScenarioChoice(row) => Some(PendingItem::Scenario(row)),
            Phase::AwaitingQuestionAnswer(row) => Some(PendingItem::Question(row)),
            Phase::Idle | Phase::Finished(_) => None,
        }
    }

    /// Completed rounds.
    #[must_use]
    pub fn round_index(&self) -> u32 {
        self.round_index
    }

    /// Scenario keys offered so far.
    #[must_use]
    pub fn used_scenario_keys(&self) -> &BTreeSet<String> {
        &self.used_scenario_keys
    }

    /// Question keys offered so far.
    #[must_use]
    pub fn used_question_keys(&self) -> &BTreeSet<String> {
        &self.used_question_keys
    }

    /// Current counters.
    #[must_use]
    pub fn totals(&self) -> RunningTotals {
        RunningTotals {
            time: self.time_total,
            score: self.score_total,
            bonus: self.bonus_count,
        }
    }

    /// The frozen summary, once the session is finished.
    #[must_use]
    pub fn summary(&self) -> Option<SummaryValue> {
        match self.phase {
            Phase::Finished(summary) => Some(summary),
            _ => None,
        }
    }

    /// Decides what the first round needs.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the session has already left
    /// `Idle`; a restart replaces the session instead.
    pub fn plan_start(&self, config: &GameConfig) -> Result<NextRound, DomainError> {
        if self.phase != Phase::Idle {
            return Err(DomainError::Validation(
                "session must be in Idle phase to start".to_owned(),
            ));
        }
        Ok(next_round_at(self.round_index, config))
    }

    /// Validates raw player text against the current phase and decides what
    /// the following round needs. Never mutates the session.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotStarted` in `Idle`, `SessionFinished` in
    /// `Finished`, and `InvalidInput` if the trimmed text is not one of the
    /// pending item's option numbers.
    pub fn plan_input(&self, raw: &str, config: &GameConfig) -> Result<InputPlan, DomainError> {
        let kind = match self.phase {
            Phase::Idle => return Err(DomainError::SessionNotStarted),
            Phase::Finished(_) => return Err(DomainError::SessionFinished),
            Phase::AwaitingScenarioChoice(_) => RoundKind::Scenario,
            Phase::AwaitingQuestionAnswer(_) => RoundKind::Question,
        };
        let token = OptionToken::parse(raw, kind.option_count()).ok_or_else(|| {
            DomainError::InvalidInput {
                input: raw.trim().to_owned(),
                expected: TokenRange::up_to(kind.option_count()),
            }
        })?;

        Ok(InputPlan {
            token,
            kind,
            next: next_round_at(self.round_index + 1, config),
        })
    }

    /// Offers the first round using the planned content.
    ///
    /// # Errors
    ///
    /// Returns `ContentUnavailable` if the fetched rows are empty (the
    /// session stays `Idle`), or `Validation` if the session is not `Idle` or
    /// the content does not match the plan.
    pub fn start(
        &mut self,
        next: NextRound,
        fetched: Option<Fetched>,
        config: &GameConfig,
        rng: &mut dyn DeterministicRng,
    ) -> Result<Reply, DomainError> {
        if self.phase != Phase::Idle {
            return Err(DomainError::Validation(
                "session must be in Idle phase to start".to_owned(),
            ));
        }
        let advance = prepare(next, fetched)?;
        let step = self.advance(advance, config, rng);
        Ok(Reply { result: None, step })
    }

    /// Applies a planned answer and advances to the next round in one step.
    ///
    /// # Errors
    ///
    /// Returns `ContentUnavailable` if the next round's rows are empty, or
    /// `Validation` if the session changed since the plan was made or the
    /// content does not match the plan. The session is unchanged on error.
    pub fn submit(
        &mut self,
        plan: InputPlan,
        fetched: Option<Fetched>,
        config: &GameConfig,
        rng: &mut dyn DeterministicRng,
    ) -> Result<Reply, DomainError> {
        let advance = prepare(plan.next, fetched)?;
        let token = plan.token;

        let result = match (&self.phase, plan.kind) {
            (Phase::AwaitingScenarioChoice(row), RoundKind::Scenario) => {
                let option = row.option(token);
                let bonus_awarded = row.bonus_option == Some(token);
                self.time_total += u64::from(option.cost);
                if bonus_awarded {
                    self.bonus_count += 1;
                }
                ResultValue {
                    phase_kind: RoundKind::Scenario,
                    chosen: token,
                    outcome_text: option.text.clone(),
                    cost_or_points_applied: option.cost,
                    correct: None,
                    correct_text: None,
                    bonus_awarded,
                    running_totals: RunningTotals::default(),
                }
            }
            (Phase::AwaitingQuestionAnswer(row), RoundKind::Question) => {
                let correct = row.correct == token;
                let awarded = if correct { row.points } else { 0 };
                self.score_total += u64::from(awarded);
                ResultValue {
                    phase_kind: RoundKind::Question,
                    chosen: token,
                    outcome_text: row.options[token.index()].clone(),
                    cost_or_points_applied: awarded,
                    correct: Some(correct),
                    correct_text: (!correct).then(|| row.options[row.correct.index()].clone()),
                    bonus_awarded: false,
                    running_totals: RunningTotals::default(),
                }
            }
            _ => {
                return Err(DomainError::Validation(
                    "session changed while the answer was in flight".to_owned(),
                ));
            }
        };

        self.round_index += 1;
        let result = ResultValue {
            running_totals: self.totals(),
            ..result
        };
        let step = self.advance(advance, config, rng);
        Ok(Reply {
            result: Some(result),
            step,
        })
    }

    fn advance(
        &mut self,
        advance: Advance,
        config: &GameConfig,
        rng: &mut dyn DeterministicRng,
    ) -> Step {
        match advance {
            Advance::Finish => self.finish(false),
            Advance::Scenarios(rows) => {
                let Some(row) = draw_unused(&rows, &self.used_scenario_keys, rng).cloned() else {
                    return self.finish(true);
                };
                self.used_scenario_keys.insert(row.key.clone());
                let prompt = PromptValue {
                    item_text: row.key.clone(),
                    option_labels: row.options.iter().map(|o| o.text.clone()).collect(),
                    round_number: self.round_index + 1,
                    max_rounds: config.max_rounds,
                    phase_kind: RoundKind::Scenario,
                };
                self.phase = Phase::AwaitingScenarioChoice(row);
                Step::Prompt(prompt)
            }
            Advance::Questions(rows) => {
                let Some(row) = draw_unused(&rows, &self.used_question_keys, rng).cloned() else {
                    return self.finish(true);
                };
                self.used_question_keys.insert(row.key.clone());
                let prompt = PromptValue {
                    item_text: row.key.clone(),
                    option_labels: row.options.to_vec(),
                    round_number: self.round_index + 1,
                    max_rounds: config.max_rounds,
                    phase_kind: RoundKind::Question,
                };
                self.phase = Phase::AwaitingQuestionAnswer(row);
                Step::Prompt(prompt)
            }
        }
    }

    fn finish(&mut self, content_exhausted: bool) -> Step {
        let summary = SummaryValue {
            total_time: self.time_total,
            total_score: self.score_total,
            total_bonus: self.bonus_count,
            rounds_played: self.round_index,
            content_exhausted,
        };
        self.phase = Phase::Finished(summary);
        Step::Summary(summary)
    }
}

fn next_round_at(round_index: u32, config: &GameConfig) -> NextRound {
    if round_index >= config.max_rounds {
        NextRound::Finish
    } else {
        NextRound::Play(config.schedule.kind_for(round_index, config.max_rounds))
    }
}

fn prepare(next: NextRound, fetched: Option<Fetched>) -> Result<Advance, DomainError> {
    match (next, fetched) {
        (NextRound::Finish, None) => Ok(Advance::Finish),
        (NextRound::Play(kind), Some(fetched)) if fetched.kind() == kind => match fetched {
            Fetched::Scenarios(rows) if rows.is_empty() => {
                Err(DomainError::ContentUnavailable(RoundKind::Scenario))
            }
            Fetched::Questions(rows) if rows.is_empty() => {
                Err(DomainError::ContentUnavailable(RoundKind::Question))
            }
            Fetched::Scenarios(rows) => Ok(Advance::Scenarios(rows)),
            Fetched::Questions(rows) => Ok(Advance::Questions(rows)),
        },
        _ => Err(DomainError::Validation(
            "fetched content does not match the planned round".to_owned(),
        )),
    }
}
