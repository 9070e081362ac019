//! Row validation shared by every content source.

use odyssey_core::content::{QuestionRow, RowError, ScenarioRow, parse_rows};
use tracing::warn;

/// Keeps the well-formed scenario rows, logging each one dropped.
pub(crate) fn valid_scenarios<R, S>(rows: &[R], source: &str) -> Vec<ScenarioRow>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let (parsed, rejected) = parse_rows(rows, ScenarioRow::from_fields);
    log_rejected(source, "scenario", &rejected);
    parsed
}

/// Keeps the well-formed question rows, logging each one dropped.
pub(crate) fn valid_questions<R, S>(rows: &[R], source: &str) -> Vec<QuestionRow>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let (parsed, rejected) = parse_rows(rows, QuestionRow::from_fields);
    log_rejected(source, "question", &rejected);
    parsed
}

fn log_rejected(source: &str, kind: &str, rejected: &[(usize, RowError)]) {
    for (index, err) in rejected {
        warn!(source, kind, row = index, %err, "skipping malformed content row");
    }
}
