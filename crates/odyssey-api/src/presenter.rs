//! Renders engine values as plain chat text.
//!
//! Prompts list the options by number only; costs, points and correct
//! answers are never shown before the player has chosen.

use odyssey_core::content::RoundKind;
use odyssey_core::error::DomainError;
use odyssey_session::domain::values::{PromptValue, Reply, ResultValue, Step, SummaryValue};

/// Renders the item awaiting an answer.
#[must_use]
pub fn render_prompt(prompt: &PromptValue) -> String {
    let options: String = prompt
        .option_labels
        .iter()
        .enumerate()
        .map(|(number, label)| format!("\n{}. {label}", number + 1))
        .collect();
    let choices = match prompt.phase_kind {
        RoundKind::Scenario => "Reply with 1 or 2 to choose.",
        RoundKind::Question => "Reply with 1, 2 or 3 to answer.",
    };
    format!(
        "Round {}/{}\n{}\n{options}\n\n{choices}",
        prompt.round_number, prompt.max_rounds, prompt.item_text
    )
}

/// Renders the outcome of a resolved round.
#[must_use]
pub fn render_result(result: &ResultValue) -> String {
    let mut text = match (result.phase_kind, result.correct) {
        (RoundKind::Question, Some(true)) => {
            format!("Correct! +{} points.", result.cost_or_points_applied)
        }
        (RoundKind::Question, _) => match &result.correct_text {
            Some(answer) => format!("Not quite. The answer was: {answer}."),
            None => "Not quite.".to_owned(),
        },
        (RoundKind::Scenario, _) => format!(
            "You chose: {}\nTime added: {}s.",
            result.outcome_text, result.cost_or_points_applied
        ),
    };
    if result.bonus_awarded {
        text.push_str("\nYou earned a distinction!");
    }
    let totals = result.running_totals;
    format!(
        "{text}\nTime {}s | Score {} | Distinctions {}",
        totals.time, totals.score, totals.bonus
    )
}

/// Renders the end-of-game summary.
#[must_use]
pub fn render_summary(summary: &SummaryValue) -> String {
    let exhausted = if summary.content_exhausted {
        format!(
            "You have seen everything we have after {} rounds.\n",
            summary.rounds_played
        )
    } else {
        String::new()
    };
    format!(
        "Your journey is over!\n{exhausted}\nTotal time: {}s\nScore: {}\nDistinctions: {}\n\nSend /start to play again.",
        summary.total_time, summary.total_score, summary.total_bonus
    )
}

/// Renders a full reply: the outcome (if any) followed by the next prompt or
/// the summary.
#[must_use]
pub fn render_reply(reply: &Reply) -> String {
    let next = match &reply.step {
        Step::Prompt(prompt) => render_prompt(prompt),
        Step::Summary(summary) => render_summary(summary),
    };
    match &reply.result {
        Some(result) => format!("{}\n\n{next}", render_result(result)),
        None => next,
    }
}

/// Renders the guidance shown when an action is rejected.
#[must_use]
pub fn render_rejection(err: &DomainError) -> String {
    match err {
        DomainError::InvalidInput { expected, .. } if expected.max() == 2 => {
            "Please reply with 1 or 2.".to_owned()
        }
        DomainError::InvalidInput { expected, .. } => {
            format!("Please reply with a number from 1 to {}.", expected.max())
        }
        DomainError::SessionNotStarted | DomainError::SessionNotFound(_) => {
            "Start a session first with /start.".to_owned()
        }
        DomainError::SessionFinished => {
            "This session is complete. Send /start to play again.".to_owned()
        }
        DomainError::InputInProgress => {
            "Still working on your previous answer, one moment.".to_owned()
        }
        DomainError::ContentUnavailable(_) => {
            "The game content could not be loaded. Please try again in a moment.".to_owned()
        }
        DomainError::Validation(_) | DomainError::Infrastructure(_) => {
            "Something went wrong. Please try again.".to_owned()
        }
    }
}
