//! Row builders for tests.

use odyssey_core::content::{OptionToken, QuestionRow, ScenarioOption, ScenarioRow};

/// A scenario with no bonus option.
#[must_use]
pub fn scenario(key: &str, cost_1: u32, cost_2: u32) -> ScenarioRow {
    ScenarioRow {
        key: key.to_owned(),
        options: [
            ScenarioOption {
                text: format!("{key} / first"),
                cost: cost_1,
            },
            ScenarioOption {
                text: format!("{key} / second"),
                cost: cost_2,
            },
        ],
        bonus_option: None,
    }
}

/// A scenario whose option `bonus` (1 or 2) grants a distinction.
///
/// # Panics
///
/// Panics if `bonus` is not 1 or 2.
#[must_use]
pub fn scenario_with_bonus(key: &str, cost_1: u32, cost_2: u32, bonus: u8) -> ScenarioRow {
    ScenarioRow {
        bonus_option: Some(
            OptionToken::parse(&bonus.to_string(), ScenarioRow::OPTION_COUNT)
                .expect("bonus option must be 1 or 2"),
        ),
        ..scenario(key, cost_1, cost_2)
    }
}

/// A question whose answer `correct` (1 to 3) is worth `points`.
///
/// # Panics
///
/// Panics if `correct` is not between 1 and 3.
#[must_use]
pub fn question(key: &str, correct: u8, points: u32) -> QuestionRow {
    QuestionRow {
        key: key.to_owned(),
        options: [
            format!("{key} / a"),
            format!("{key} / b"),
            format!("{key} / c"),
        ],
        correct: OptionToken::parse(&correct.to_string(), QuestionRow::OPTION_COUNT)
            .expect("correct option must be between 1 and 3"),
        points,
    }
}
