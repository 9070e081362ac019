//! Per-round phase selection.

use std::fmt;
use std::str::FromStr;

use odyssey_core::content::RoundKind;
use thiserror::Error;

/// Policy deciding whether a round plays a scenario or a question.
///
/// `Alternating` is the default: scenarios on even round indices, questions
/// on odd ones, so a ten-round game plays five of each starting with a
/// scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhaseSchedule {
    /// Scenario, question, scenario, ...
    #[default]
    Alternating,
    /// The first half of the rounds (rounded up) are scenarios, the rest are
    /// questions.
    ScenariosFirst,
    /// Every round is a scenario.
    ScenariosOnly,
    /// Every round is a question.
    QuestionsOnly,
}

impl PhaseSchedule {
    /// Returns the kind of round played at `round_index` in a game of
    /// `max_rounds` rounds.
    #[must_use]
    pub fn kind_for(self, round_index: u32, max_rounds: u32) -> RoundKind {
        match self {
            Self::Alternating if round_index % 2 == 0 => RoundKind::Scenario,
            Self::Alternating => RoundKind::Question,
            Self::ScenariosFirst if round_index < max_rounds.div_ceil(2) => RoundKind::Scenario,
            Self::ScenariosFirst | Self::QuestionsOnly => RoundKind::Question,
            Self::ScenariosOnly => RoundKind::Scenario,
        }
    }
}

impl fmt::Display for PhaseSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Alternating => "alternating",
            Self::ScenariosFirst => "scenarios-first",
            Self::ScenariosOnly => "scenarios-only",
            Self::QuestionsOnly => "questions-only",
        })
    }
}

/// Returned when a schedule name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown phase schedule {0:?}")]
pub struct UnknownSchedule(pub String);

impl FromStr for PhaseSchedule {
    type Err = UnknownSchedule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alternating" => Ok(Self::Alternating),
            "scenarios-first" => Ok(Self::ScenariosFirst),
            "scenarios-only" => Ok(Self::ScenariosOnly),
            "questions-only" => Ok(Self::QuestionsOnly),
            _ => Err(UnknownSchedule(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(schedule: PhaseSchedule, max_rounds: u32) -> Vec<RoundKind> {
        (0..max_rounds)
            .map(|round| schedule.kind_for(round, max_rounds))
            .collect()
    }

    #[test]
    fn test_alternating_starts_with_scenario() {
        use RoundKind::{Question, Scenario};

        assert_eq!(
            kinds(PhaseSchedule::Alternating, 4),
            [Scenario, Question, Scenario, Question]
        );
    }

    #[test]
    fn test_scenarios_first_rounds_split_up() {
        use RoundKind::{Question, Scenario};

        assert_eq!(
            kinds(PhaseSchedule::ScenariosFirst, 5),
            [Scenario, Scenario, Scenario, Question, Question]
        );
    }

    #[test]
    fn test_single_kind_schedules() {
        assert!(
            kinds(PhaseSchedule::ScenariosOnly, 3)
                .iter()
                .all(|kind| *kind == RoundKind::Scenario)
        );
        assert!(
            kinds(PhaseSchedule::QuestionsOnly, 3)
                .iter()
                .all(|kind| *kind == RoundKind::Question)
        );
    }

    #[test]
    fn test_from_str_round_trips_display() {
        for schedule in [
            PhaseSchedule::Alternating,
            PhaseSchedule::ScenariosFirst,
            PhaseSchedule::ScenariosOnly,
            PhaseSchedule::QuestionsOnly,
        ] {
            assert_eq!(schedule.to_string().parse::<PhaseSchedule>(), Ok(schedule));
        }
        assert_eq!(
            " Alternating ".parse::<PhaseSchedule>(),
            Ok(PhaseSchedule::Alternating)
        );
    }

    #[test]
    fn test_from_str_rejects_unknown_names() {
        assert_eq!(
            "round-robin".parse::<PhaseSchedule>(),
            Err(UnknownSchedule("round-robin".to_owned()))
        );
    }
}
